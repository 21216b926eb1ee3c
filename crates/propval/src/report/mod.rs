//! Report data validation: the required-field gate and per-section completeness.

pub mod bundle;
pub mod completeness;
pub mod router;
pub mod sections;

pub use bundle::{AssessmentBundle, Presence};
pub use completeness::{
    check_address_data, check_file_attachments, check_planning_data,
    check_property_identification, check_tenancy_data, check_valuation_approaches, DataQuality,
    FieldCheckResult, QualityThresholds,
};
pub use router::report_router;
pub use sections::{
    missing_required_fields, validate_and_filter_report_data, ReportSection, ReportValidation,
    RequiredField, SectionInclusionMap,
};

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::bundle::AssessmentBundle;
use super::completeness::{
    check_address_data, check_file_attachments, check_planning_data,
    check_property_identification, check_tenancy_data, check_valuation_approaches,
    FieldCheckResult,
};

/// Named parts of a generated report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ReportSection {
    PropertyDetails,
    LegalAndPlanning,
    TenancySchedule,
    FileAttachments,
    ValuationApproaches,
    PropertyIdentification,
    ValuationCertificate,
    RiskAssessment,
    SalesHistory,
}

impl ReportSection {
    pub const ALL: [ReportSection; 9] = [
        ReportSection::PropertyDetails,
        ReportSection::LegalAndPlanning,
        ReportSection::TenancySchedule,
        ReportSection::FileAttachments,
        ReportSection::ValuationApproaches,
        ReportSection::PropertyIdentification,
        ReportSection::ValuationCertificate,
        ReportSection::RiskAssessment,
        ReportSection::SalesHistory,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ReportSection::PropertyDetails => "Property Details",
            ReportSection::LegalAndPlanning => "Legal and Planning",
            ReportSection::TenancySchedule => "Tenancy Schedule",
            ReportSection::FileAttachments => "File Attachments",
            ReportSection::ValuationApproaches => "Valuation Approaches",
            ReportSection::PropertyIdentification => "Property Identification",
            ReportSection::ValuationCertificate => "Valuation Certificate",
            ReportSection::RiskAssessment => "Risk Assessment",
            ReportSection::SalesHistory => "Sales History",
        }
    }

    /// Runs the section's checker against a bundle.
    pub fn check(self, bundle: &AssessmentBundle) -> FieldCheckResult {
        match self {
            ReportSection::PropertyDetails => check_address_data(bundle),
            ReportSection::LegalAndPlanning => check_planning_data(bundle),
            ReportSection::TenancySchedule => check_tenancy_data(bundle),
            ReportSection::FileAttachments => check_file_attachments(bundle),
            ReportSection::ValuationApproaches => check_valuation_approaches(bundle),
            ReportSection::PropertyIdentification => check_property_identification(bundle),
            // No meaningful absent state in the current data model.
            ReportSection::ValuationCertificate
            | ReportSection::RiskAssessment
            | ReportSection::SalesHistory => FieldCheckResult::always_included(),
        }
    }
}

pub type SectionInclusionMap = BTreeMap<ReportSection, FieldCheckResult>;

/// Fields the report cannot be generated without.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RequiredField {
    PropertyAddress,
    PropertyType,
    ReportType,
}

impl RequiredField {
    pub fn label(self) -> &'static str {
        match self {
            RequiredField::PropertyAddress => "Property Address",
            RequiredField::PropertyType => "Property Type",
            RequiredField::ReportType => "Report Type",
        }
    }
}

/// Result of the report generation gate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportValidation {
    pub is_valid: bool,
    pub missing_fields: Vec<String>,
    pub section_results: SectionInclusionMap,
    pub include_sections: SectionInclusionMap,
}

impl ReportValidation {
    pub fn includes(&self, section: ReportSection) -> bool {
        self.include_sections.contains_key(&section)
    }

    /// Mean completeness across every checked section.
    pub fn overall_completeness(&self) -> f64 {
        if self.section_results.is_empty() {
            return 0.0;
        }
        let total: f64 = self
            .section_results
            .values()
            .map(|result| result.completeness)
            .sum();
        total / self.section_results.len() as f64
    }
}

pub fn missing_required_fields(bundle: &AssessmentBundle) -> Vec<RequiredField> {
    let mut missing = Vec::new();
    if bundle.resolved_address().is_none() {
        missing.push(RequiredField::PropertyAddress);
    }
    if bundle.resolved_property_type().is_none() {
        missing.push(RequiredField::PropertyType);
    }
    if bundle.resolved_report_type().is_none() {
        missing.push(RequiredField::ReportType);
    }
    missing
}

/// Gate the bundle on its required fields, then grade every section.
///
/// An invalid bundle short-circuits with empty maps; no section checker runs.
pub fn validate_and_filter_report_data(bundle: &AssessmentBundle) -> ReportValidation {
    let missing = missing_required_fields(bundle);
    if !missing.is_empty() {
        debug!(missing = missing.len(), "report bundle failed required field gate");
        return ReportValidation {
            is_valid: false,
            missing_fields: missing
                .into_iter()
                .map(|field| field.label().to_string())
                .collect(),
            section_results: SectionInclusionMap::new(),
            include_sections: SectionInclusionMap::new(),
        };
    }

    let section_results: SectionInclusionMap = ReportSection::ALL
        .into_iter()
        .map(|section| (section, section.check(bundle)))
        .collect();

    let include_sections: SectionInclusionMap = section_results
        .iter()
        .filter(|(_, result)| result.should_include)
        .map(|(section, result)| (*section, result.clone()))
        .collect();

    debug!(
        included = include_sections.len(),
        checked = section_results.len(),
        "report sections filtered"
    );

    ReportValidation {
        is_valid: true,
        missing_fields: Vec::new(),
        section_results,
        include_sections,
    }
}

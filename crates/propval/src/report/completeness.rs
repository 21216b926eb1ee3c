//! Per-section data completeness checks.
//!
//! Each checker is a pure function of the bundle: it never fails, and missing
//! data only lowers the score.

use serde::{Deserialize, Serialize};

use super::bundle::{AssessmentBundle, Presence, LEASEHOLD_INTERESTS};

/// Qualitative bucket derived from a completeness score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataQuality {
    Poor,
    Fair,
    Good,
    Excellent,
}

impl DataQuality {
    pub fn label(self) -> &'static str {
        match self {
            DataQuality::Poor => "poor",
            DataQuality::Fair => "fair",
            DataQuality::Good => "good",
            DataQuality::Excellent => "excellent",
        }
    }
}

/// Minimum scores for the excellent, good and fair buckets.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QualityThresholds {
    pub excellent: f64,
    pub good: f64,
    pub fair: f64,
}

impl QualityThresholds {
    pub const STANDARD: Self = Self {
        excellent: 80.0,
        good: 60.0,
        fair: 40.0,
    };

    pub const LENIENT: Self = Self {
        excellent: 80.0,
        good: 60.0,
        fair: 30.0,
    };

    pub fn grade(&self, completeness: f64) -> DataQuality {
        if completeness >= self.excellent {
            DataQuality::Excellent
        } else if completeness >= self.good {
            DataQuality::Good
        } else if completeness >= self.fair {
            DataQuality::Fair
        } else {
            DataQuality::Poor
        }
    }
}

/// Outcome of checking one report section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldCheckResult {
    pub should_include: bool,
    pub has_required_data: bool,
    pub completeness: f64,
    pub data_quality: DataQuality,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl FieldCheckResult {
    fn graded(
        should_include: bool,
        completeness: f64,
        thresholds: QualityThresholds,
        exclusion_reason: &str,
    ) -> Self {
        let completeness = clamp_score(completeness);
        Self {
            should_include,
            has_required_data: should_include,
            completeness,
            data_quality: thresholds.grade(completeness),
            reason: (!should_include).then(|| exclusion_reason.to_string()),
        }
    }

    /// Result for sections that are always rendered.
    pub fn always_included() -> Self {
        Self {
            should_include: true,
            has_required_data: true,
            completeness: 100.0,
            data_quality: DataQuality::Excellent,
            reason: None,
        }
    }
}

fn clamp_score(score: f64) -> f64 {
    if score.is_finite() {
        (score.clamp(0.0, 100.0) * 100.0).round() / 100.0
    } else {
        0.0
    }
}

/// Equal share of 100 for every populated flag.
fn share_score(flags: &[bool]) -> f64 {
    if flags.is_empty() {
        return 0.0;
    }
    let present = flags.iter().filter(|flag| **flag).count();
    present as f64 * 100.0 / flags.len() as f64
}

const ADDRESS_BASE_POINTS: f64 = 20.0;
const STREET_NUMBER_POINTS: f64 = 15.0;
const STREET_NAME_POINTS: f64 = 15.0;
const SUBURB_POINTS: f64 = 20.0;
const STATE_POINTS: f64 = 15.0;
const POSTCODE_POINTS: f64 = 15.0;

pub fn check_address_data(bundle: &AssessmentBundle) -> FieldCheckResult {
    let Some(address) = bundle.address_data.as_ref() else {
        return FieldCheckResult::graded(
            false,
            0.0,
            QualityThresholds::STANDARD,
            "No address data captured",
        );
    };

    let has_address =
        address.property_address.is_present() || address.formatted_address.is_present();

    let weighted = [
        (has_address, ADDRESS_BASE_POINTS),
        (address.street_number.is_present(), STREET_NUMBER_POINTS),
        (address.street_name.is_present(), STREET_NAME_POINTS),
        (address.suburb.is_present(), SUBURB_POINTS),
        (address.state.is_present(), STATE_POINTS),
        (address.postcode.is_present(), POSTCODE_POINTS),
    ];
    let completeness: f64 = weighted
        .iter()
        .filter(|(present, _)| *present)
        .map(|(_, points)| points)
        .sum();

    FieldCheckResult::graded(
        has_address,
        completeness,
        QualityThresholds::STANDARD,
        "Property address has not been entered",
    )
}

pub fn check_planning_data(bundle: &AssessmentBundle) -> FieldCheckResult {
    let Some(planning) = bundle
        .report_data
        .as_ref()
        .and_then(|data| data.planning_data.as_ref())
    else {
        return FieldCheckResult::graded(
            false,
            0.0,
            QualityThresholds::LENIENT,
            "No planning data captured",
        );
    };

    let completeness = share_score(&[
        planning.zoning.is_present(),
        planning.local_government_area.is_present(),
        planning.planning_scheme.is_present(),
        planning.overlays.is_present(),
        planning.land_use.is_present(),
        planning.heritage_status.is_present(),
        planning.development_potential.is_present(),
    ]);
    let should_include =
        planning.zoning.is_present() || planning.local_government_area.is_present();

    FieldCheckResult::graded(
        should_include,
        completeness,
        QualityThresholds::LENIENT,
        "Zoning or local government area is required for the planning section",
    )
}

pub fn check_tenancy_data(bundle: &AssessmentBundle) -> FieldCheckResult {
    let report_data = bundle.report_data.as_ref();
    let leasehold = report_data
        .and_then(|data| data.report_config.as_ref())
        .is_some_and(|config| config.is_leasehold());

    if !leasehold {
        return FieldCheckResult::graded(
            false,
            0.0,
            QualityThresholds::STANDARD,
            &format!(
                "Tenancy details only apply to {} valuations",
                LEASEHOLD_INTERESTS.join(" or ")
            ),
        );
    }

    let details = report_data.and_then(|data| data.tenancy_details.as_ref());
    let lease = details.and_then(|details| details.lease_terms.as_ref());
    let rental = details.and_then(|details| details.rental_details.as_ref());

    let completeness = share_score(&[
        lease.is_some_and(|lease| lease.tenant_name.is_present()),
        lease.is_some_and(|lease| lease.commencement_date.is_present()),
        lease.is_some_and(|lease| lease.expiry_date.is_present()),
        lease.is_some_and(|lease| lease.option_terms.is_present()),
        rental.is_some_and(|rental| rental.annual_rent.is_present()),
        rental.is_some_and(|rental| rental.review_mechanism.is_present()),
        rental.is_some_and(|rental| rental.outgoings_recovery.is_present()),
        rental.is_some_and(|rental| rental.security_deposit.is_present()),
    ]);
    let should_include = lease.is_some() || rental.is_some();

    FieldCheckResult::graded(
        should_include,
        completeness,
        QualityThresholds::STANDARD,
        "Lease terms or rental details are required for the tenancy section",
    )
}

pub fn check_file_attachments(bundle: &AssessmentBundle) -> FieldCheckResult {
    let Some(files) = bundle
        .report_data
        .as_ref()
        .and_then(|data| data.file_attachments.as_ref())
    else {
        return FieldCheckResult::graded(
            false,
            0.0,
            QualityThresholds::STANDARD,
            "No files attached",
        );
    };

    let flags = [
        files.property_photos.is_present(),
        files.floor_plans.is_present(),
        files.title_documents.is_present(),
        files.planning_documents.is_present(),
        files.lease_documents.is_present(),
    ];

    FieldCheckResult::graded(
        flags.contains(&true),
        share_score(&flags),
        QualityThresholds::STANDARD,
        "No files attached",
    )
}

pub fn check_valuation_approaches(bundle: &AssessmentBundle) -> FieldCheckResult {
    let Some(approaches) = bundle
        .report_data
        .as_ref()
        .and_then(|data| data.valuation_approaches.as_ref())
    else {
        return FieldCheckResult::graded(
            false,
            0.0,
            QualityThresholds::STANDARD,
            "No valuation approach has been completed",
        );
    };

    let flags = [
        approaches.sales_comparison.is_present(),
        approaches.income_capitalisation.is_present(),
        approaches.summation.is_present(),
        approaches.hypothetical_development.is_present(),
        approaches.discounted_cash_flow.is_present(),
    ];

    FieldCheckResult::graded(
        flags.contains(&true),
        share_score(&flags),
        QualityThresholds::STANDARD,
        "No valuation approach has been completed",
    )
}

pub fn check_property_identification(bundle: &AssessmentBundle) -> FieldCheckResult {
    let Some(identification) = bundle
        .report_data
        .as_ref()
        .and_then(|data| data.property_identification.as_ref())
    else {
        return FieldCheckResult::graded(
            false,
            0.0,
            QualityThresholds::STANDARD,
            "No title or lot/plan details captured",
        );
    };

    let completeness = share_score(&[
        identification.title_reference.is_present(),
        identification.lot_number.is_present(),
        identification.plan_number.is_present(),
        identification.parcel_id.is_present(),
        identification.land_area.is_present(),
        identification.legal_description.is_present(),
    ]);
    let should_include = identification.title_reference.is_present()
        || (identification.lot_number.is_present() && identification.plan_number.is_present());

    FieldCheckResult::graded(
        should_include,
        completeness,
        QualityThresholds::STANDARD,
        "A title reference or lot and plan number is required",
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::bundle::{
        AddressData, FileAttachments, LeaseTerms, PlanningData, PropertyIdentification,
        RentalDetails, ReportConfig, ReportData, TenancyDetails, ValuationApproaches,
    };
    use crate::report::sections::ReportSection;

    fn full_address() -> AddressData {
        AddressData {
            property_address: Some("10 Collins St, Melbourne VIC 3000".to_string()),
            formatted_address: None,
            street_number: Some("10".to_string()),
            street_name: Some("Collins St".to_string()),
            suburb: Some("Melbourne".to_string()),
            state: Some("VIC".to_string()),
            postcode: Some("3000".to_string()),
        }
    }

    fn with_report_data(report_data: ReportData) -> AssessmentBundle {
        AssessmentBundle {
            report_data: Some(report_data),
            ..AssessmentBundle::default()
        }
    }

    #[test]
    fn full_address_scores_one_hundred() {
        let bundle = AssessmentBundle {
            address_data: Some(full_address()),
            ..AssessmentBundle::default()
        };

        let result = check_address_data(&bundle);
        assert_eq!(result.completeness, 100.0);
        assert_eq!(result.data_quality, DataQuality::Excellent);
        assert!(result.should_include);
        assert!(result.reason.is_none());
    }

    #[test]
    fn address_components_without_address_string_are_excluded() {
        let mut address = full_address();
        address.property_address = None;
        let bundle = AssessmentBundle {
            address_data: Some(address),
            ..AssessmentBundle::default()
        };

        let result = check_address_data(&bundle);
        assert!(!result.should_include);
        assert_eq!(result.completeness, 80.0);
        assert!(result.reason.is_some());
    }

    #[test]
    fn bare_address_string_is_poor_but_included() {
        let bundle = AssessmentBundle {
            address_data: Some(AddressData {
                formatted_address: Some("Lot 4 Ridge Rd".to_string()),
                ..AddressData::default()
            }),
            ..AssessmentBundle::default()
        };

        let result = check_address_data(&bundle);
        assert!(result.should_include);
        assert_eq!(result.completeness, 20.0);
        assert_eq!(result.data_quality, DataQuality::Poor);
    }

    #[test]
    fn planning_requires_zoning_or_lga() {
        let bundle = with_report_data(ReportData {
            planning_data: Some(PlanningData {
                planning_scheme: Some("Melbourne Planning Scheme".to_string()),
                overlays: vec!["Heritage Overlay".to_string()],
                ..PlanningData::default()
            }),
            ..ReportData::default()
        });

        let result = check_planning_data(&bundle);
        assert!(!result.should_include);
        assert!(result.completeness > 28.0 && result.completeness < 29.0);
        assert_eq!(result.data_quality, DataQuality::Poor);
    }

    #[test]
    fn planning_uses_lenient_fair_threshold() {
        let bundle = with_report_data(ReportData {
            planning_data: Some(PlanningData {
                zoning: Some("Commercial 1 Zone".to_string()),
                local_government_area: Some("City of Melbourne".to_string()),
                planning_scheme: Some("Melbourne Planning Scheme".to_string()),
                ..PlanningData::default()
            }),
            ..ReportData::default()
        });

        let result = check_planning_data(&bundle);
        assert!(result.should_include);
        assert_eq!(result.data_quality, DataQuality::Fair);
    }

    fn tenancy_details() -> TenancyDetails {
        TenancyDetails {
            lease_terms: Some(LeaseTerms {
                tenant_name: Some("Acme Retail Pty Ltd".to_string()),
                commencement_date: Some("2022-07-01".to_string()),
                expiry_date: Some("2032-06-30".to_string()),
                option_terms: Some("2 x 5 years".to_string()),
            }),
            rental_details: Some(RentalDetails {
                annual_rent: Some(185_000.0),
                review_mechanism: Some("CPI".to_string()),
                outgoings_recovery: Some("Net".to_string()),
                security_deposit: Some(46_250.0),
            }),
        }
    }

    #[test]
    fn tenancy_excluded_without_leasehold_interest() {
        let bundle = with_report_data(ReportData {
            report_config: Some(ReportConfig {
                interest_values: vec!["Freehold Interest".to_string()],
                valuation_basis: None,
            }),
            tenancy_details: Some(tenancy_details()),
            ..ReportData::default()
        });

        let result = check_tenancy_data(&bundle);
        assert!(!result.should_include);
        assert_eq!(result.completeness, 0.0);
        assert!(result
            .reason
            .as_deref()
            .is_some_and(|reason| reason.contains("Ground Lease")));
    }

    #[test]
    fn tenancy_included_for_ground_lease_with_details() {
        let bundle = with_report_data(ReportData {
            report_config: Some(ReportConfig {
                interest_values: vec!["Ground Lease".to_string()],
                valuation_basis: None,
            }),
            tenancy_details: Some(tenancy_details()),
            ..ReportData::default()
        });

        let result = check_tenancy_data(&bundle);
        assert!(result.should_include);
        assert_eq!(result.completeness, 100.0);
    }

    #[test]
    fn tenancy_leasehold_without_details_is_excluded() {
        let bundle = with_report_data(ReportData {
            report_config: Some(ReportConfig {
                interest_values: vec!["Leasehold Interest".to_string()],
                valuation_basis: None,
            }),
            tenancy_details: Some(TenancyDetails::default()),
            ..ReportData::default()
        });

        let result = check_tenancy_data(&bundle);
        assert!(!result.should_include);
        assert!(!result.has_required_data);
    }

    #[test]
    fn lot_without_plan_does_not_identify_property() {
        let bundle = with_report_data(ReportData {
            property_identification: Some(PropertyIdentification {
                lot_number: Some("4".to_string()),
                land_area: Some(612.0),
                ..PropertyIdentification::default()
            }),
            ..ReportData::default()
        });

        let result = check_property_identification(&bundle);
        assert!(!result.should_include);

        let mut bundle = bundle;
        if let Some(identification) = bundle
            .report_data
            .as_mut()
            .and_then(|data| data.property_identification.as_mut())
        {
            identification.plan_number = Some("PS512345".to_string());
        }
        assert!(check_property_identification(&bundle).should_include);
    }

    #[test]
    fn checkers_are_repeatable() {
        let bundle = AssessmentBundle {
            address_data: Some(full_address()),
            report_data: Some(ReportData {
                report_config: Some(ReportConfig {
                    interest_values: vec!["Leasehold Interest".to_string()],
                    valuation_basis: None,
                }),
                tenancy_details: Some(tenancy_details()),
                planning_data: Some(PlanningData {
                    zoning: Some("C1Z".to_string()),
                    overlays: vec!["DDO10".to_string()],
                    ..PlanningData::default()
                }),
                file_attachments: Some(FileAttachments {
                    floor_plans: vec!["ground.pdf".to_string()],
                    ..FileAttachments::default()
                }),
                valuation_approaches: Some(ValuationApproaches {
                    summation: Some(1_250_000.0),
                    ..ValuationApproaches::default()
                }),
                property_identification: Some(PropertyIdentification {
                    title_reference: Some("Vol 1234 Fol 567".to_string()),
                    ..PropertyIdentification::default()
                }),
                ..ReportData::default()
            }),
            ..AssessmentBundle::default()
        };

        for section in ReportSection::ALL {
            assert_eq!(
                section.check(&bundle),
                section.check(&bundle),
                "{} is repeatable",
                section.label()
            );
        }
        let checkers: [fn(&AssessmentBundle) -> FieldCheckResult; 6] = [
            check_address_data,
            check_planning_data,
            check_tenancy_data,
            check_file_attachments,
            check_valuation_approaches,
            check_property_identification,
        ];
        for checker in checkers {
            assert_eq!(checker(&bundle), checker(&bundle));
        }
    }

    #[test]
    fn scores_are_clamped() {
        assert_eq!(clamp_score(140.0), 100.0);
        assert_eq!(clamp_score(-3.0), 0.0);
        assert_eq!(clamp_score(f64::NAN), 0.0);
    }
}

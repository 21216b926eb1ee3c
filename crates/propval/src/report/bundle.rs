use serde::{Deserialize, Serialize};

/// In-progress report data for one property, as submitted by the report builder.
///
/// Every field is optional: a half-completed form is a valid bundle, and the
/// checkers in [`super::completeness`] grade how much of it is filled in.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AssessmentBundle {
    pub address_data: Option<AddressData>,
    pub report_data: Option<ReportData>,
    pub property: Option<PropertyIdentity>,
    pub report: Option<ReportIdentity>,
}

impl AssessmentBundle {
    /// First usable address out of the three places the builder may store one.
    pub fn resolved_address(&self) -> Option<&str> {
        let address = self.address_data.as_ref();
        [
            address.and_then(|data| data.property_address.as_deref()),
            address.and_then(|data| data.formatted_address.as_deref()),
            self.property
                .as_ref()
                .and_then(|property| property.address.as_deref()),
        ]
        .into_iter()
        .flatten()
        .find(|value| value.is_present())
    }

    pub fn resolved_property_type(&self) -> Option<&str> {
        self.report_data
            .as_ref()
            .and_then(|data| data.property_type.as_deref())
            .filter(|value| value.is_present())
            .or_else(|| {
                self.property
                    .as_ref()
                    .and_then(|property| property.property_type.as_deref())
                    .filter(|value| value.is_present())
            })
    }

    pub fn resolved_report_type(&self) -> Option<&str> {
        self.report_data
            .as_ref()
            .and_then(|data| data.report_type.as_deref())
            .filter(|value| value.is_present())
            .or_else(|| {
                self.report
                    .as_ref()
                    .and_then(|report| report.report_type.as_deref())
                    .filter(|value| value.is_present())
            })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AddressData {
    pub property_address: Option<String>,
    pub formatted_address: Option<String>,
    pub street_number: Option<String>,
    pub street_name: Option<String>,
    pub suburb: Option<String>,
    pub state: Option<String>,
    pub postcode: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReportData {
    pub property_type: Option<String>,
    pub report_type: Option<String>,
    pub planning_data: Option<PlanningData>,
    pub report_config: Option<ReportConfig>,
    pub file_attachments: Option<FileAttachments>,
    pub tenancy_details: Option<TenancyDetails>,
    pub property_identification: Option<PropertyIdentification>,
    pub valuation_approaches: Option<ValuationApproaches>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PlanningData {
    pub zoning: Option<String>,
    pub local_government_area: Option<String>,
    pub planning_scheme: Option<String>,
    pub overlays: Vec<String>,
    pub land_use: Option<String>,
    pub heritage_status: Option<String>,
    pub development_potential: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReportConfig {
    /// Interests being valued, e.g. "Freehold Interest", "Leasehold Interest".
    pub interest_values: Vec<String>,
    pub valuation_basis: Option<String>,
}

impl ReportConfig {
    pub fn is_leasehold(&self) -> bool {
        self.interest_values
            .iter()
            .any(|interest| LEASEHOLD_INTERESTS.contains(&interest.trim()))
    }
}

pub(crate) const LEASEHOLD_INTERESTS: &[&str] = &["Leasehold Interest", "Ground Lease"];

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FileAttachments {
    pub property_photos: Vec<String>,
    pub floor_plans: Vec<String>,
    pub title_documents: Vec<String>,
    pub planning_documents: Vec<String>,
    pub lease_documents: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TenancyDetails {
    pub lease_terms: Option<LeaseTerms>,
    pub rental_details: Option<RentalDetails>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LeaseTerms {
    pub tenant_name: Option<String>,
    pub commencement_date: Option<String>,
    pub expiry_date: Option<String>,
    pub option_terms: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RentalDetails {
    pub annual_rent: Option<f64>,
    pub review_mechanism: Option<String>,
    pub outgoings_recovery: Option<String>,
    pub security_deposit: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PropertyIdentification {
    pub title_reference: Option<String>,
    pub lot_number: Option<String>,
    pub plan_number: Option<String>,
    pub parcel_id: Option<String>,
    pub land_area: Option<f64>,
    pub legal_description: Option<String>,
}

/// Value conclusions recorded per approach, in dollars.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ValuationApproaches {
    pub sales_comparison: Option<f64>,
    pub income_capitalisation: Option<f64>,
    pub summation: Option<f64>,
    pub hypothetical_development: Option<f64>,
    pub discounted_cash_flow: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PropertyIdentity {
    pub id: Option<String>,
    pub address: Option<String>,
    pub property_type: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReportIdentity {
    pub id: Option<String>,
    pub report_type: Option<String>,
}

/// Whether a form value counts as filled in.
///
/// Blank strings, zero or non-finite numbers, and empty lists are treated as
/// not entered, matching how the form layer leaves untouched inputs.
pub trait Presence {
    fn is_present(&self) -> bool;
}

impl Presence for str {
    fn is_present(&self) -> bool {
        !self.trim().is_empty()
    }
}

impl Presence for String {
    fn is_present(&self) -> bool {
        self.as_str().is_present()
    }
}

impl Presence for f64 {
    fn is_present(&self) -> bool {
        self.is_finite() && *self != 0.0
    }
}

impl Presence for bool {
    fn is_present(&self) -> bool {
        *self
    }
}

impl<T> Presence for Vec<T> {
    fn is_present(&self) -> bool {
        !self.is_empty()
    }
}

impl<T: Presence> Presence for Option<T> {
    fn is_present(&self) -> bool {
        self.as_ref().is_some_and(Presence::is_present)
    }
}

impl<T: Presence + ?Sized> Presence for &T {
    fn is_present(&self) -> bool {
        (**self).is_present()
    }
}

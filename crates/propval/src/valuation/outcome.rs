use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdvertisingAssetType {
    Signage,
    DigitalDisplay,
}

/// One applied premium (positive) or discount (negative), in percent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PremiumAdjustment {
    pub factor: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub percent: f64,
}

/// Market value estimate with the figures it was derived from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdvertisingValuation {
    pub asset_type: AdvertisingAssetType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub site_name: Option<String>,
    pub market_value: f64,
    pub gross_income: f64,
    pub total_costs: f64,
    pub net_income: f64,
    pub total_premium: f64,
    pub adjusted_income: f64,
    pub adjusted_net_income: f64,
    pub adjustments: Vec<PremiumAdjustment>,
    pub yield_percent: Option<f64>,
    pub price_per_square_metre: Option<f64>,
    pub cost_per_thousand: Option<f64>,
    pub payback_years: Option<f64>,
    pub recommendations: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValuationError {
    #[error("{field} is required")]
    MissingInput { field: &'static str },
    #[error("{field} is invalid: {reason}")]
    InvalidInput { field: &'static str, reason: String },
}

pub(crate) fn round_currency(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

pub(crate) fn required_positive(value: Option<f64>, field: &'static str) -> Result<f64, ValuationError> {
    match value {
        None => Err(ValuationError::MissingInput { field }),
        Some(value) if !value.is_finite() || value <= 0.0 => Err(ValuationError::InvalidInput {
            field,
            reason: format!("must be a positive number (got {value})"),
        }),
        Some(value) => Ok(value),
    }
}

/// Optional cost lines are zero when not supplied, but never negative.
pub(crate) fn cost(value: Option<f64>, field: &'static str) -> Result<f64, ValuationError> {
    match value {
        None => Ok(0.0),
        Some(value) if !value.is_finite() || value < 0.0 => Err(ValuationError::InvalidInput {
            field,
            reason: format!("must not be negative (got {value})"),
        }),
        Some(value) => Ok(value),
    }
}

pub(crate) fn ratio(numerator: f64, denominator: f64) -> Option<f64> {
    (denominator > 0.0 && numerator.is_finite()).then(|| numerator / denominator)
}

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::outcome::{
    cost, ratio, required_positive, round_currency, AdvertisingAssetType, AdvertisingValuation,
    PremiumAdjustment, ValuationError,
};
use super::premiums::{
    contract_term_premium, normalize, COMPETITIVE_POSITION_PREMIUMS, DEMOGRAPHIC_PREMIUMS,
    LOCATION_QUALITY_PREMIUMS, TECHNOLOGY_TIER_PREMIUMS,
};

const LOW_OCCUPANCY_PERCENT: f64 = 60.0;
const SHORT_CONTRACT_YEARS: f64 = 3.0;
const COST_RATIO_LIMIT: f64 = 0.35;

/// Trading metrics for a digital display screen. Money is annual AUD.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DigitalDisplayValuationInput {
    pub site_name: Option<String>,
    pub annual_revenue: Option<f64>,
    pub site_rent: Option<f64>,
    pub power_costs: Option<f64>,
    pub maintenance_costs: Option<f64>,
    pub content_management_costs: Option<f64>,
    pub operating_costs: Option<f64>,
    pub location_quality: Option<String>,
    pub demographics: Option<String>,
    pub technology_tier: Option<String>,
    /// Remaining contract term in years.
    pub contract_term: Option<f64>,
    pub competitive_position: Option<String>,
    pub screen_width: Option<f64>,
    pub screen_height: Option<f64>,
    pub faces: Option<u32>,
    pub daily_impressions: Option<f64>,
    /// Share of sellable slots booked, as a percentage.
    pub occupancy_rate: Option<f64>,
    pub revenue_multiple: Option<f64>,
    pub valuation_date: Option<NaiveDate>,
}

/// Apply the premium stack to revenue and value the resulting net income on a multiple.
pub fn calculate_digital_display_value(
    input: &DigitalDisplayValuationInput,
) -> Result<AdvertisingValuation, ValuationError> {
    let annual_revenue = required_positive(input.annual_revenue, "annualRevenue")?;
    let revenue_multiple = required_positive(input.revenue_multiple, "revenueMultiple")?;
    let total_costs = cost(input.site_rent, "siteRent")?
        + cost(input.power_costs, "powerCosts")?
        + cost(input.maintenance_costs, "maintenanceCosts")?
        + cost(input.content_management_costs, "contentManagementCosts")?
        + cost(input.operating_costs, "operatingCosts")?;
    if let Some(occupancy) = input.occupancy_rate {
        if !(0.0..=100.0).contains(&occupancy) {
            return Err(ValuationError::InvalidInput {
                field: "occupancyRate",
                reason: format!("must be between 0 and 100 (got {occupancy})"),
            });
        }
    }
    let net_income = annual_revenue - total_costs;

    let adjustments = vec![
        PremiumAdjustment {
            factor: LOCATION_QUALITY_PREMIUMS.factor.to_string(),
            category: input.location_quality.clone(),
            percent: LOCATION_QUALITY_PREMIUMS.lookup(input.location_quality.as_deref()),
        },
        PremiumAdjustment {
            factor: DEMOGRAPHIC_PREMIUMS.factor.to_string(),
            category: input.demographics.clone(),
            percent: DEMOGRAPHIC_PREMIUMS.lookup(input.demographics.as_deref()),
        },
        PremiumAdjustment {
            factor: TECHNOLOGY_TIER_PREMIUMS.factor.to_string(),
            category: input.technology_tier.clone(),
            percent: TECHNOLOGY_TIER_PREMIUMS.lookup(input.technology_tier.as_deref()),
        },
        PremiumAdjustment {
            factor: "contract term".to_string(),
            category: input.contract_term.map(|years| format!("{years} years")),
            percent: contract_term_premium(input.contract_term),
        },
        PremiumAdjustment {
            factor: COMPETITIVE_POSITION_PREMIUMS.factor.to_string(),
            category: input.competitive_position.clone(),
            percent: COMPETITIVE_POSITION_PREMIUMS.lookup(input.competitive_position.as_deref()),
        },
    ];
    let total_premium: f64 = adjustments.iter().map(|adjustment| adjustment.percent).sum();

    let adjusted_revenue = annual_revenue * (1.0 + total_premium / 100.0);
    let adjusted_net_income = adjusted_revenue - total_costs;
    let market_value = round_currency((adjusted_net_income * revenue_multiple).max(0.0));

    let screen_area = match (input.screen_width, input.screen_height) {
        (Some(width), Some(height)) if width > 0.0 && height > 0.0 => {
            width * height * f64::from(input.faces.unwrap_or(1).max(1))
        }
        _ => 0.0,
    };
    let annual_impressions_thousands = input.daily_impressions.unwrap_or(0.0) * 365.0 / 1000.0;

    let recommendations =
        digital_recommendations(input, annual_revenue, total_costs, adjusted_net_income);

    Ok(AdvertisingValuation {
        asset_type: AdvertisingAssetType::DigitalDisplay,
        site_name: input.site_name.clone(),
        market_value,
        gross_income: round_currency(annual_revenue),
        total_costs: round_currency(total_costs),
        net_income: round_currency(net_income),
        total_premium,
        adjusted_income: round_currency(adjusted_revenue),
        adjusted_net_income: round_currency(adjusted_net_income),
        adjustments,
        yield_percent: ratio(adjusted_net_income * 100.0, market_value),
        price_per_square_metre: ratio(market_value, screen_area).map(round_currency),
        cost_per_thousand: ratio(adjusted_revenue, annual_impressions_thousands)
            .map(round_currency),
        payback_years: ratio(market_value, adjusted_net_income),
        recommendations,
    })
}

fn digital_recommendations(
    input: &DigitalDisplayValuationInput,
    annual_revenue: f64,
    total_costs: f64,
    adjusted_net_income: f64,
) -> Vec<String> {
    let mut recommendations = Vec::new();

    if adjusted_net_income <= 0.0 {
        recommendations.push(
            "Costs exceed adjusted revenue; the screen has no income-supported value".to_string(),
        );
    }

    if let Some(occupancy) = input
        .occupancy_rate
        .filter(|occupancy| *occupancy < LOW_OCCUPANCY_PERCENT)
    {
        recommendations.push(format!(
            "Occupancy of {occupancy:.0}% is below {LOW_OCCUPANCY_PERCENT:.0}%; review slot pricing and sales coverage"
        ));
    }

    if input
        .contract_term
        .is_some_and(|years| years < SHORT_CONTRACT_YEARS)
    {
        recommendations.push(
            "Contract term under three years; seek an extension before marketing the asset"
                .to_string(),
        );
    }

    if input
        .competitive_position
        .as_deref()
        .is_some_and(|position| normalize(position) == "saturated")
    {
        recommendations.push(
            "Saturated catchment; differentiate on audience data or programmatic access"
                .to_string(),
        );
    }

    if input
        .technology_tier
        .as_deref()
        .map(normalize)
        .is_some_and(|tier| matches!(tier.as_str(), "legacy" | "lcd"))
    {
        recommendations.push(
            "Display technology trails the market; budget for an LED upgrade".to_string(),
        );
    }

    if total_costs > annual_revenue * COST_RATIO_LIMIT {
        recommendations.push(format!(
            "Operating costs are {:.0}% of revenue; review power and maintenance contracts",
            total_costs / annual_revenue * 100.0
        ));
    }

    recommendations
}

use chrono::{Local, Months, NaiveDate};
use serde::{Deserialize, Serialize};

use super::outcome::{
    cost, ratio, required_positive, round_currency, AdvertisingAssetType, AdvertisingValuation,
    PremiumAdjustment, ValuationError,
};
use super::premiums::{
    location_premium, normalize, sides_premium, DEMOGRAPHIC_PREMIUMS, RENEWAL_RISK_DISCOUNTS,
    SIGNAGE_TYPE_PREMIUMS,
};

const PERMIT_WARNING_MONTHS: u32 = 36;
const SHORT_LEASE_YEARS: f64 = 5.0;
const HIGH_TRAFFIC_DAILY: f64 = 50_000.0;
const COST_RATIO_LIMIT: f64 = 0.30;
const HIGH_CAP_RATE: f64 = 10.0;

/// Observed metrics for a static or digital advertising sign.
///
/// Money is annual AUD; `capRate` is a percentage.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SignageValuationInput {
    pub site_name: Option<String>,
    pub current_rent: Option<f64>,
    pub operating_costs: Option<f64>,
    pub maintenance_costs: Option<f64>,
    pub insurance_costs: Option<f64>,
    pub public_benefit_fee: Option<f64>,
    pub demographics: Option<String>,
    pub signage_type: Option<String>,
    pub sides: Option<u32>,
    pub cap_rate: Option<f64>,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub road_type: Option<String>,
    pub daily_traffic: Option<f64>,
    pub renewal_risk: Option<String>,
    pub planning_permit_expiry: Option<NaiveDate>,
    pub lease_term: Option<f64>,
    pub valuation_date: Option<NaiveDate>,
}

/// Capitalise the premium-adjusted net rent of a sign.
pub fn calculate_advertising_signage_value(
    input: &SignageValuationInput,
) -> Result<AdvertisingValuation, ValuationError> {
    let current_rent = required_positive(input.current_rent, "currentRent")?;
    let cap_rate = required_positive(input.cap_rate, "capRate")?;
    let total_costs = cost(input.operating_costs, "operatingCosts")?
        + cost(input.maintenance_costs, "maintenanceCosts")?
        + cost(input.insurance_costs, "insuranceCosts")?
        + cost(input.public_benefit_fee, "publicBenefitFee")?;
    let net_income = current_rent - total_costs;

    let sides = input.sides.unwrap_or(1);
    let risk_discount = RENEWAL_RISK_DISCOUNTS.lookup(input.renewal_risk.as_deref());
    let adjustments = vec![
        PremiumAdjustment {
            factor: DEMOGRAPHIC_PREMIUMS.factor.to_string(),
            category: input.demographics.clone(),
            percent: DEMOGRAPHIC_PREMIUMS.lookup(input.demographics.as_deref()),
        },
        PremiumAdjustment {
            factor: SIGNAGE_TYPE_PREMIUMS.factor.to_string(),
            category: input.signage_type.clone(),
            percent: SIGNAGE_TYPE_PREMIUMS.lookup(input.signage_type.as_deref()),
        },
        PremiumAdjustment {
            factor: "sides".to_string(),
            category: Some(sides.to_string()),
            percent: sides_premium(sides),
        },
        PremiumAdjustment {
            factor: "location".to_string(),
            category: input.road_type.clone(),
            percent: location_premium(input.road_type.as_deref(), input.daily_traffic),
        },
        PremiumAdjustment {
            factor: RENEWAL_RISK_DISCOUNTS.factor.to_string(),
            category: input.renewal_risk.clone(),
            percent: -risk_discount,
        },
    ];
    let total_premium: f64 = adjustments.iter().map(|adjustment| adjustment.percent).sum();

    let adjusted_rent = current_rent * (1.0 + total_premium / 100.0);
    let adjusted_net_income = adjusted_rent - total_costs;
    let market_value = round_currency((adjusted_net_income * 100.0 / cap_rate).max(0.0));

    let display_area = match (input.width, input.height) {
        (Some(width), Some(height)) if width > 0.0 && height > 0.0 => {
            width * height * f64::from(sides.max(1))
        }
        _ => 0.0,
    };
    let annual_impressions_thousands = input.daily_traffic.unwrap_or(0.0) * 365.0 / 1000.0;

    let valuation_date = input
        .valuation_date
        .unwrap_or_else(|| Local::now().date_naive());
    let recommendations = signage_recommendations(
        input,
        valuation_date,
        current_rent,
        total_costs,
        cap_rate,
        adjusted_net_income,
    );

    Ok(AdvertisingValuation {
        asset_type: AdvertisingAssetType::Signage,
        site_name: input.site_name.clone(),
        market_value,
        gross_income: round_currency(current_rent),
        total_costs: round_currency(total_costs),
        net_income: round_currency(net_income),
        total_premium,
        adjusted_income: round_currency(adjusted_rent),
        adjusted_net_income: round_currency(adjusted_net_income),
        adjustments,
        yield_percent: ratio(adjusted_net_income * 100.0, market_value),
        price_per_square_metre: ratio(market_value, display_area).map(round_currency),
        cost_per_thousand: ratio(adjusted_rent, annual_impressions_thousands)
            .map(round_currency),
        payback_years: ratio(market_value, adjusted_net_income),
        recommendations,
    })
}

fn signage_recommendations(
    input: &SignageValuationInput,
    valuation_date: NaiveDate,
    current_rent: f64,
    total_costs: f64,
    cap_rate: f64,
    adjusted_net_income: f64,
) -> Vec<String> {
    let mut recommendations = Vec::new();

    if adjusted_net_income <= 0.0 {
        recommendations.push(
            "Costs exceed adjusted rent; the site has no income-supported value".to_string(),
        );
    }

    if let Some(expiry) = input.planning_permit_expiry {
        let warning_horizon = valuation_date
            .checked_add_months(Months::new(PERMIT_WARNING_MONTHS))
            .unwrap_or(NaiveDate::MAX);
        if expiry < valuation_date {
            recommendations.push(format!(
                "Planning permit expired on {expiry}; confirm renewal before relying on this valuation"
            ));
        } else if expiry < warning_horizon {
            recommendations.push(format!(
                "Planning permit expires on {expiry}; reflect renewal risk in the capitalisation rate"
            ));
        }
    }

    if let Some(term) = input.lease_term.filter(|term| *term < SHORT_LEASE_YEARS) {
        recommendations.push(format!(
            "Lease term of {term} years is under {SHORT_LEASE_YEARS} years; negotiate an extension to secure income"
        ));
    }

    if input
        .renewal_risk
        .as_deref()
        .is_some_and(|risk| normalize(risk) == "high")
    {
        recommendations
            .push("High renewal risk; line up alternative operators for the site".to_string());
    }

    let static_face = input
        .signage_type
        .as_deref()
        .map(normalize)
        .is_some_and(|kind| matches!(kind.as_str(), "static" | "billboard" | "poster"));
    if static_face && input.daily_traffic.unwrap_or(0.0) > HIGH_TRAFFIC_DAILY {
        recommendations.push(
            "Static face on a high-traffic road; assess the uplift from a digital conversion"
                .to_string(),
        );
    }

    if total_costs > current_rent * COST_RATIO_LIMIT {
        recommendations.push(format!(
            "Outgoings are {:.0}% of rent; review operating and maintenance costs",
            total_costs / current_rent * 100.0
        ));
    }

    if cap_rate > HIGH_CAP_RATE {
        recommendations.push(format!(
            "Capitalisation rate of {cap_rate}% indicates elevated risk; verify against market evidence"
        ));
    }

    recommendations
}

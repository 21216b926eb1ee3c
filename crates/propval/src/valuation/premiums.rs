//! Percentage premium and discount tables for advertising asset valuation.
//!
//! Categorical keys are matched case-insensitively after trimming; unknown or
//! missing categories contribute nothing.

/// A named map from category to percentage adjustment.
#[derive(Debug, Clone, Copy)]
pub struct PremiumTable {
    pub factor: &'static str,
    pub entries: &'static [(&'static str, f64)],
}

impl PremiumTable {
    pub fn lookup(&self, category: Option<&str>) -> f64 {
        let Some(category) = category.map(normalize) else {
            return 0.0;
        };
        self.entries
            .iter()
            .find(|(key, _)| *key == category)
            .map(|(_, percent)| *percent)
            .unwrap_or(0.0)
    }
}

pub(crate) fn normalize(category: &str) -> String {
    category.trim().to_ascii_lowercase().replace([' ', '_'], "-")
}

pub const DEMOGRAPHIC_PREMIUMS: PremiumTable = PremiumTable {
    factor: "demographic",
    entries: &[
        ("high-income", 15.0),
        ("affluent", 15.0),
        ("professional", 10.0),
        ("tourist", 10.0),
        ("middle-income", 5.0),
        ("mixed", 5.0),
        ("low-income", -10.0),
    ],
};

pub const SIGNAGE_TYPE_PREMIUMS: PremiumTable = PremiumTable {
    factor: "signage type",
    entries: &[
        ("digital", 25.0),
        ("led", 25.0),
        ("illuminated", 10.0),
        ("backlit", 10.0),
        ("static", 0.0),
        ("billboard", 0.0),
        ("poster", -5.0),
    ],
};

/// Discounts, so a negative entry raises value.
pub const RENEWAL_RISK_DISCOUNTS: PremiumTable = PremiumTable {
    factor: "renewal risk",
    entries: &[
        ("low", -5.0),
        ("medium", 0.0),
        ("moderate", 0.0),
        ("high", 15.0),
    ],
};

pub const LOCATION_QUALITY_PREMIUMS: PremiumTable = PremiumTable {
    factor: "location quality",
    entries: &[
        ("premium", 30.0),
        ("prime", 20.0),
        ("secondary", 5.0),
        ("tertiary", -10.0),
    ],
};

pub const TECHNOLOGY_TIER_PREMIUMS: PremiumTable = PremiumTable {
    factor: "technology tier",
    entries: &[
        ("fine-pitch-led", 20.0),
        ("premium-led", 20.0),
        ("standard-led", 5.0),
        ("lcd", 0.0),
        ("legacy", -15.0),
    ],
};

pub const COMPETITIVE_POSITION_PREMIUMS: PremiumTable = PremiumTable {
    factor: "competitive position",
    entries: &[
        ("dominant", 15.0),
        ("strong", 10.0),
        ("competitive", 0.0),
        ("saturated", -15.0),
    ],
};

pub(crate) const MAJOR_ROAD_TYPES: &[&str] = &["highway", "freeway", "motorway"];

pub fn sides_premium(sides: u32) -> f64 {
    match sides {
        0 | 1 => 0.0,
        2 => 15.0,
        _ => 25.0,
    }
}

/// Road exposure premium. Missing traffic counts contribute nothing.
pub fn location_premium(road_type: Option<&str>, daily_traffic: Option<f64>) -> f64 {
    let Some(traffic) = daily_traffic.filter(|traffic| *traffic > 0.0) else {
        return 0.0;
    };
    let road = road_type.map(normalize).unwrap_or_default();
    let major_road = MAJOR_ROAD_TYPES.contains(&road.as_str());

    if major_road && traffic > 100_000.0 {
        20.0
    } else if traffic > 50_000.0 {
        10.0
    } else if road == "arterial" && traffic > 20_000.0 {
        5.0
    } else if traffic < 5_000.0 {
        -10.0
    } else {
        0.0
    }
}

pub fn contract_term_premium(years: Option<f64>) -> f64 {
    match years {
        Some(years) if years >= 10.0 => 15.0,
        Some(years) if years >= 5.0 => 10.0,
        Some(years) if years >= 3.0 => 5.0,
        Some(years) if years > 0.0 => -5.0,
        _ => 0.0,
    }
}

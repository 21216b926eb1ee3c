//! Advertising asset valuation: premium stacking over net income.

pub mod batch;
pub mod digital;
pub mod outcome;
pub mod premiums;
pub mod router;
pub mod signage;

pub use batch::{BatchRowOutcome, BatchValuationError, SignageBatchReport, SignageBatchValuer};
pub use digital::{calculate_digital_display_value, DigitalDisplayValuationInput};
pub use outcome::{AdvertisingAssetType, AdvertisingValuation, PremiumAdjustment, ValuationError};
pub use premiums::PremiumTable;
pub use router::valuation_router;
pub use signage::{calculate_advertising_signage_value, SignageValuationInput};

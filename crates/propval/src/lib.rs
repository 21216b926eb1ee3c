pub mod config;
pub mod error;
pub mod listings;
pub mod report;
pub mod telemetry;
pub mod valuation;

use std::io::Read;
use std::path::Path;

use serde::Serialize;

use super::outcome::{AdvertisingValuation, ValuationError};
use super::signage::{calculate_advertising_signage_value, SignageValuationInput};

/// Failures reading a signage batch export.
#[derive(Debug, thiserror::Error)]
pub enum BatchValuationError {
    #[error("failed to read signage batch: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid signage CSV data: {0}")]
    Csv(#[from] csv::Error),
}

/// Outcome for one CSV row. Rows are numbered from 1, excluding the header.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchRowOutcome {
    pub row: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub site_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub valuation: Option<AdvertisingValuation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignageBatchReport {
    pub rows: Vec<BatchRowOutcome>,
    pub valued: usize,
    pub failed: usize,
    pub total_market_value: f64,
}

pub struct SignageBatchValuer;

impl SignageBatchValuer {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<SignageBatchReport, BatchValuationError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    /// Value every row of a camelCase-headed CSV. A bad row is reported, not fatal;
    /// only unreadable input aborts the batch.
    pub fn from_reader<R: Read>(reader: R) -> Result<SignageBatchReport, BatchValuationError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut rows = Vec::new();
        for (index, record) in csv_reader.deserialize::<SignageValuationInput>().enumerate() {
            let row = index + 1;
            let outcome = match record {
                Ok(input) => value_row(row, &input),
                Err(err) if err.is_io_error() => return Err(err.into()),
                Err(err) => BatchRowOutcome {
                    row,
                    site_name: None,
                    valuation: None,
                    error: Some(err.to_string()),
                },
            };
            rows.push(outcome);
        }

        let valued = rows.iter().filter(|row| row.valuation.is_some()).count();
        let total_market_value = rows
            .iter()
            .filter_map(|row| row.valuation.as_ref())
            .map(|valuation| valuation.market_value)
            .sum();

        Ok(SignageBatchReport {
            failed: rows.len() - valued,
            valued,
            total_market_value,
            rows,
        })
    }
}

fn value_row(row: usize, input: &SignageValuationInput) -> BatchRowOutcome {
    let result: Result<AdvertisingValuation, ValuationError> =
        calculate_advertising_signage_value(input);
    match result {
        Ok(valuation) => BatchRowOutcome {
            row,
            site_name: input.site_name.clone(),
            valuation: Some(valuation),
            error: None,
        },
        Err(err) => BatchRowOutcome {
            row,
            site_name: input.site_name.clone(),
            valuation: None,
            error: Some(err.to_string()),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const SITES: &str = "\
siteName,currentRent,operatingCosts,maintenanceCosts,insuranceCosts,publicBenefitFee,demographics,signageType,sides,capRate,width,height,roadType,dailyTraffic,renewalRisk,planningPermitExpiry,leaseTerm,valuationDate
M1 Gateway,10000,1000,500,300,200,high-income,digital,2,8,4,3,highway,120000,low,2030-01-01,10,2025-06-30
Suburban poster,2400,,,,,mixed,poster,1,9,3,2,local,8000,medium,,3,2025-06-30
Missing rent,,100,,,,,static,1,8,,,local,,,,,2025-06-30
";

    #[test]
    fn values_each_row_and_reports_failures() {
        let report = SignageBatchValuer::from_reader(Cursor::new(SITES)).expect("batch reads");

        assert_eq!(report.rows.len(), 3);
        assert_eq!(report.valued, 2);
        assert_eq!(report.failed, 1);

        let gateway = &report.rows[0];
        assert_eq!(gateway.site_name.as_deref(), Some("M1 Gateway"));
        assert_eq!(
            gateway.valuation.as_ref().map(|valuation| valuation.market_value),
            Some(200_000.0)
        );

        let missing = &report.rows[2];
        assert_eq!(missing.row, 3);
        assert!(missing
            .error
            .as_deref()
            .is_some_and(|error| error.contains("currentRent")));
    }

    #[test]
    fn malformed_numbers_fail_only_their_row() {
        let csv = "siteName,currentRent,capRate\nGood,1000,10\nBad,lots,10\n";
        let report = SignageBatchValuer::from_reader(Cursor::new(csv)).expect("batch reads");

        assert_eq!(report.valued, 1);
        assert_eq!(report.failed, 1);
        assert!(report.rows[1].error.is_some());
        assert_eq!(report.total_market_value, 10_000.0);
    }
}

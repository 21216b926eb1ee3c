use crate::infra::read_json_file;
use clap::Args;
use propval::error::AppError;
use propval::report::{validate_and_filter_report_data, AssessmentBundle, ReportValidation};
use propval::valuation::{
    calculate_advertising_signage_value, calculate_digital_display_value, AdvertisingValuation,
    DigitalDisplayValuationInput, SignageBatchReport, SignageBatchValuer, SignageValuationInput,
};
use serde::Serialize;
use std::fmt::Write;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub(crate) struct InputFileArgs {
    /// JSON input file
    #[arg(long)]
    pub(crate) file: PathBuf,
    /// Print the raw JSON result instead of a summary
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug)]
pub(crate) struct BatchArgs {
    /// CSV export with camelCase headers, one site per row
    #[arg(long)]
    pub(crate) csv: PathBuf,
    /// Print the raw JSON result instead of a summary
    #[arg(long)]
    pub(crate) json: bool,
}

pub(crate) fn run_report_validation(args: InputFileArgs) -> Result<(), AppError> {
    let bundle: AssessmentBundle = read_json_file(&args.file)?;
    let validation = validate_and_filter_report_data(&bundle);
    emit(&validation, args.json, render_validation)
}

pub(crate) fn run_signage_valuation(args: InputFileArgs) -> Result<(), AppError> {
    let input: SignageValuationInput = read_json_file(&args.file)?;
    let valuation = calculate_advertising_signage_value(&input)?;
    emit(&valuation, args.json, render_valuation)
}

pub(crate) fn run_digital_valuation(args: InputFileArgs) -> Result<(), AppError> {
    let input: DigitalDisplayValuationInput = read_json_file(&args.file)?;
    let valuation = calculate_digital_display_value(&input)?;
    emit(&valuation, args.json, render_valuation)
}

pub(crate) fn run_signage_batch(args: BatchArgs) -> Result<(), AppError> {
    let report = SignageBatchValuer::from_path(&args.csv)?;
    emit(&report, args.json, render_batch)
}

fn emit<T: Serialize>(value: &T, json: bool, render: fn(&T) -> String) -> Result<(), AppError> {
    if json {
        println!("{}", serde_json::to_string_pretty(value)?);
    } else {
        print!("{}", render(value));
    }
    Ok(())
}

fn currency(amount: f64) -> String {
    let whole = amount.abs().round() as u64;
    let digits = whole.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, ch) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if amount < 0.0 && whole > 0 {
        format!("-${grouped}")
    } else {
        format!("${grouped}")
    }
}

pub(crate) fn render_validation(validation: &ReportValidation) -> String {
    let mut out = String::new();
    if !validation.is_valid {
        let _ = writeln!(out, "Report data incomplete");
        for field in &validation.missing_fields {
            let _ = writeln!(out, "- missing {field}");
        }
        return out;
    }

    let _ = writeln!(
        out,
        "Report data valid | {}/{} sections included | {:.0}% overall completeness",
        validation.include_sections.len(),
        validation.section_results.len(),
        validation.overall_completeness()
    );
    for (section, result) in &validation.section_results {
        let status = if result.should_include {
            "included"
        } else {
            "excluded"
        };
        let _ = write!(
            out,
            "- {}: {status} ({:.0}%, {})",
            section.label(),
            result.completeness,
            result.data_quality.label()
        );
        if let Some(reason) = &result.reason {
            let _ = write!(out, " {reason}");
        }
        out.push('\n');
    }
    out
}

pub(crate) fn render_valuation(valuation: &AdvertisingValuation) -> String {
    let mut out = String::new();
    let title = valuation.site_name.as_deref().unwrap_or("Advertising asset");
    let _ = writeln!(out, "{title}: market value {}", currency(valuation.market_value));
    let _ = writeln!(
        out,
        "- gross {} | costs {} | net {}",
        currency(valuation.gross_income),
        currency(valuation.total_costs),
        currency(valuation.net_income)
    );
    let _ = writeln!(
        out,
        "- premium {:+.0}% | adjusted net {}",
        valuation.total_premium,
        currency(valuation.adjusted_net_income)
    );
    for adjustment in valuation
        .adjustments
        .iter()
        .filter(|adjustment| adjustment.percent != 0.0)
    {
        let category = adjustment.category.as_deref().unwrap_or("-");
        let _ = writeln!(
            out,
            "  - {} ({category}): {:+.0}%",
            adjustment.factor, adjustment.percent
        );
    }
    if let Some(yield_percent) = valuation.yield_percent {
        let _ = writeln!(out, "- yield {yield_percent:.2}%");
    }
    if let Some(rate) = valuation.price_per_square_metre {
        let _ = writeln!(out, "- {} per square metre", currency(rate));
    }
    if !valuation.recommendations.is_empty() {
        let _ = writeln!(out, "Recommendations:");
        for note in &valuation.recommendations {
            let _ = writeln!(out, "  - {note}");
        }
    }
    out
}

pub(crate) fn render_batch(report: &SignageBatchReport) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} sites valued, {} failed | total market value {}",
        report.valued,
        report.failed,
        currency(report.total_market_value)
    );
    for row in &report.rows {
        let name = row.site_name.as_deref().unwrap_or("unnamed site");
        match (&row.valuation, &row.error) {
            (Some(valuation), _) => {
                let _ = writeln!(
                    out,
                    "- row {} {name}: {}",
                    row.row,
                    currency(valuation.market_value)
                );
            }
            (None, Some(error)) => {
                let _ = writeln!(out, "- row {} {name}: failed ({error})", row.row);
            }
            (None, None) => {}
        }
    }
    out
}

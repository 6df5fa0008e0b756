use clap::Args;
use serde_json::Value;

use calcsuite_core::projection::amortization::{self, LoanTerms};
use calcsuite_core::projection::projector::{self, ProjectionInput};

use crate::input;

/// Arguments for the amortization schedule
#[derive(Args)]
pub struct AmortizeArgs {
    /// Loan principal
    #[arg(long)]
    pub principal: Option<rust_decimal::Decimal>,

    /// Annual interest rate (e.g. 0.07 for 7%)
    #[arg(long)]
    pub rate: Option<rust_decimal::Decimal>,

    /// Term in years
    #[arg(long, default_value = "30")]
    pub years: u32,

    /// Term in months (overrides --years)
    #[arg(long)]
    pub months: Option<u32>,

    /// Include the month-by-month schedule, not just yearly totals
    #[arg(long)]
    pub schedule: bool,

    /// Path to JSON input file with loan terms
    #[arg(long)]
    pub input: Option<String>,
}

/// Arguments for the year-by-year projection
#[derive(Args)]
pub struct ProjectArgs {
    /// Path to JSON input file with projection assumptions
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_amortize(args: AmortizeArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let terms: LoanTerms = match input::load(args.input.as_deref())? {
        Some(terms) => terms,
        None => {
            let principal = args
                .principal
                .ok_or("--principal is required (or provide --input)")?;
            let rate = args.rate.ok_or("--rate is required (or provide --input)")?;
            let months = args.months.unwrap_or(args.years.saturating_mul(12));
            LoanTerms::new(principal, rate, months)?
        }
    };

    let result = amortization::build_amortization(&terms)?;
    let mut value = serde_json::to_value(result)?;
    if !args.schedule {
        if let Some(result) = value.get_mut("result").and_then(Value::as_object_mut) {
            result.remove("schedule");
        }
    }
    Ok(value)
}

pub fn run_project(args: ProjectArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let projection_input: ProjectionInput = input::require(args.input.as_deref(), "projection")?;
    let snapshots = projector::project(&projection_input)?;
    Ok(serde_json::to_value(snapshots)?)
}

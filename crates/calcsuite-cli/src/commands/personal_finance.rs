use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use calcsuite_core::personal_finance::debt_to_income::{self, DtiInput, MonthlyDebt};
use calcsuite_core::personal_finance::time_value::{self, FutureValueInput};

use crate::input;

/// Arguments for a savings projection
#[derive(Args)]
pub struct FutureValueArgs {
    /// Starting balance
    #[arg(long, default_value = "0")]
    pub present_value: Decimal,

    /// Contribution each period
    #[arg(long, default_value = "0")]
    pub contribution: Decimal,

    /// Annual return (e.g. 0.06)
    #[arg(long)]
    pub rate: Option<Decimal>,

    /// Years to project
    #[arg(long)]
    pub years: Option<u32>,

    /// Compounding periods per year
    #[arg(long, default_value = "12")]
    pub periods_per_year: u32,

    /// Annual inflation, to report the value in today's money
    #[arg(long)]
    pub inflation: Option<Decimal>,

    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

/// Arguments for debt-to-income
#[derive(Args)]
pub struct DtiArgs {
    /// Gross monthly income
    #[arg(long)]
    pub income: Option<Decimal>,

    /// A monthly debt payment; repeat for each debt
    #[arg(long = "debt")]
    pub debts: Vec<Decimal>,

    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_future_value(args: FutureValueArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let fv_input: FutureValueInput = match input::load(args.input.as_deref())? {
        Some(parsed) => parsed,
        None => FutureValueInput {
            present_value: args.present_value,
            periodic_contribution: args.contribution,
            annual_rate: args.rate.ok_or("--rate is required (or provide --input)")?,
            years: args.years.ok_or("--years is required (or provide --input)")?,
            periods_per_year: args.periods_per_year,
            inflation_rate: args.inflation,
        },
    };
    let result = time_value::project_savings(&fv_input)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_dti(args: DtiArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let dti_input: DtiInput = match input::load(args.input.as_deref())? {
        Some(parsed) => parsed,
        None => DtiInput {
            gross_monthly_income: args
                .income
                .ok_or("--income is required (or provide --input)")?,
            debts: args
                .debts
                .iter()
                .enumerate()
                .map(|(i, payment)| MonthlyDebt {
                    name: format!("debt {}", i + 1),
                    payment: *payment,
                })
                .collect(),
        },
    };
    let result = debt_to_income::calculate_dti(&dti_input)?;
    Ok(serde_json::to_value(result)?)
}

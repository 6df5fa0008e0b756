use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use calcsuite_core::student_loans::repayment::{self, StudentLoanInput};

use crate::input;

/// Arguments for the student loan plan comparison
#[derive(Args)]
pub struct StudentLoanArgs {
    /// Outstanding loan balance
    #[arg(long)]
    pub balance: Option<Decimal>,

    /// Annual interest rate (e.g. 0.0499)
    #[arg(long)]
    pub rate: Option<Decimal>,

    /// Annual adjusted gross income
    #[arg(long, default_value = "0")]
    pub income: Decimal,

    /// Household size
    #[arg(long, default_value = "1")]
    pub family_size: u32,

    /// Poverty guideline for a single person
    #[arg(long, default_value = "15060")]
    pub poverty_line: Decimal,

    /// Share of discretionary income paid under income-driven plans
    #[arg(long, default_value = "0.10")]
    pub idr_percent: Decimal,

    /// Borrower has graduate loans (25-year forgiveness)
    #[arg(long)]
    pub graduate: bool,

    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_student_loans(args: StudentLoanArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let loan_input: StudentLoanInput = match input::load(args.input.as_deref())? {
        Some(parsed) => parsed,
        None => StudentLoanInput {
            loan_balance: args
                .balance
                .ok_or("--balance is required (or provide --input)")?,
            annual_rate: args.rate.ok_or("--rate is required (or provide --input)")?,
            annual_income: args.income,
            family_size: args.family_size,
            poverty_line: args.poverty_line,
            idr_percent: args.idr_percent,
            graduate_loans: args.graduate,
        },
    };
    let result = repayment::compare_repayment_plans(&loan_input)?;
    Ok(serde_json::to_value(result)?)
}

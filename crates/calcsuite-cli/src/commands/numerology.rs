use chrono::NaiveDate;
use clap::Args;
use serde_json::Value;

use calcsuite_core::numerology::life_path::{self, NumerologyInput};

use crate::input;

/// Arguments for the life path number
#[derive(Args)]
pub struct LifePathArgs {
    /// Birth date (YYYY-MM-DD)
    #[arg(long)]
    pub date: Option<NaiveDate>,

    /// Full birth name, for the expression number
    #[arg(long)]
    pub name: Option<String>,

    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_life_path(args: LifePathArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let numerology_input: NumerologyInput = match input::load(args.input.as_deref())? {
        Some(parsed) => parsed,
        None => NumerologyInput {
            birth_date: args.date.ok_or("--date is required (or provide --input)")?,
            full_name: args.name,
        },
    };
    let result = life_path::calculate_numerology(&numerology_input)?;
    Ok(serde_json::to_value(result)?)
}

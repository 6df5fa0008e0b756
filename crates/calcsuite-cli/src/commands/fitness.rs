use clap::Args;
use rust_decimal::Decimal;
use serde_json::{json, Value};

use calcsuite_core::fitness::cardio::{self, HeartRateInput};

use crate::input;

/// Arguments for the Cooper VO2max estimate
#[derive(Args)]
pub struct Vo2maxArgs {
    /// Distance covered in 12 minutes, in metres
    #[arg(long)]
    pub distance: Decimal,
}

/// Arguments for heart rate zones
#[derive(Args)]
pub struct HeartRateArgs {
    /// Age in years
    #[arg(long)]
    pub age: Option<u32>,

    /// Resting heart rate (bpm); 70 if omitted
    #[arg(long)]
    pub resting: Option<u32>,

    /// Target intensity (e.g. 0.7 for 70%)
    #[arg(long)]
    pub intensity: Option<Decimal>,

    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_vo2max(args: Vo2maxArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let vo2max = cardio::vo2max_cooper(args.distance)?;
    Ok(json!({
        "result": {
            "distance_m": args.distance,
            "vo2max": vo2max,
        },
        "methodology": "Cooper 12-minute run: (d - 504.9) / 44.73",
    }))
}

pub fn run_heart_rate(args: HeartRateArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let hr_input: HeartRateInput = match input::load(args.input.as_deref())? {
        Some(parsed) => parsed,
        None => HeartRateInput {
            age: args.age.ok_or("--age is required (or provide --input)")?,
            resting_heart_rate: args.resting,
            intensity: args.intensity,
        },
    };
    let result = cardio::heart_rate_zones(&hr_input)?;
    Ok(serde_json::to_value(result)?)
}

use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use calcsuite_core::chemistry::solutions::{self, DilutionInput, MolarityInput, Solute};

use crate::input;

/// Arguments for molarity
#[derive(Args)]
pub struct MolarityArgs {
    /// Moles of solute
    #[arg(long, conflicts_with_all = ["grams", "molar_mass"])]
    pub moles: Option<Decimal>,

    /// Mass of solute in grams
    #[arg(long, requires = "molar_mass")]
    pub grams: Option<Decimal>,

    /// Molar mass in g/mol
    #[arg(long)]
    pub molar_mass: Option<Decimal>,

    /// Solution volume in litres
    #[arg(long)]
    pub volume: Option<Decimal>,

    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

/// Arguments for dilution; leave exactly one quantity out
#[derive(Args)]
pub struct DilutionArgs {
    /// Initial molarity (M1)
    #[arg(long)]
    pub m1: Option<Decimal>,

    /// Initial volume (V1)
    #[arg(long)]
    pub v1: Option<Decimal>,

    /// Final molarity (M2)
    #[arg(long)]
    pub m2: Option<Decimal>,

    /// Final volume (V2)
    #[arg(long)]
    pub v2: Option<Decimal>,

    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_molarity(args: MolarityArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let molarity_input: MolarityInput = match input::load(args.input.as_deref())? {
        Some(parsed) => parsed,
        None => {
            let solute = match (args.moles, args.grams, args.molar_mass) {
                (Some(moles), _, _) => Solute::Moles(moles),
                (None, Some(grams), Some(molar_mass)) => Solute::Mass { grams, molar_mass },
                _ => return Err("--moles or --grams with --molar-mass is required".into()),
            };
            MolarityInput {
                solute,
                volume_liters: args
                    .volume
                    .ok_or("--volume is required (or provide --input)")?,
            }
        }
    };
    let result = solutions::calculate_molarity(&molarity_input)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_dilution(args: DilutionArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let dilution_input: DilutionInput = match input::load(args.input.as_deref())? {
        Some(parsed) => parsed,
        None => DilutionInput {
            initial_molarity: args.m1,
            initial_volume: args.v1,
            final_molarity: args.m2,
            final_volume: args.v2,
        },
    };
    let result = solutions::solve_dilution(&dilution_input)?;
    Ok(serde_json::to_value(result)?)
}

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::CalcError;
use crate::types::{with_metadata, ComputationOutput};
use crate::CalcResult;

/// Solute given either directly in moles or as a mass of a known compound.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Solute {
    Moles(Decimal),
    Mass { grams: Decimal, molar_mass: Decimal },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MolarityInput {
    pub solute: Solute,
    pub volume_liters: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MolarityOutput {
    pub moles: Decimal,
    /// mol/L
    pub molarity: Decimal,
}

/// Dilution problem M1·V1 = M2·V2 with exactly one unknown (`None`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DilutionInput {
    pub initial_molarity: Option<Decimal>,
    pub initial_volume: Option<Decimal>,
    pub final_molarity: Option<Decimal>,
    pub final_volume: Option<Decimal>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DilutionUnknown {
    InitialMolarity,
    InitialVolume,
    FinalMolarity,
    FinalVolume,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DilutionOutput {
    pub solved_for: DilutionUnknown,
    pub value: Decimal,
    pub initial_molarity: Decimal,
    pub initial_volume: Decimal,
    pub final_molarity: Decimal,
    pub final_volume: Decimal,
    /// Final volume minus initial volume
    pub solvent_to_add: Decimal,
}

fn positive(field: &str, value: Decimal) -> CalcResult<Decimal> {
    if value <= Decimal::ZERO {
        return Err(CalcError::invalid(field, "Must be greater than zero"));
    }
    Ok(value)
}

/// Molarity = moles of solute / litres of solution.
pub fn calculate_molarity(input: &MolarityInput) -> CalcResult<ComputationOutput<MolarityOutput>> {
    let start = Instant::now();
    let volume = positive("volume_liters", input.volume_liters)?;
    let moles = match &input.solute {
        Solute::Moles(n) => positive("moles", *n)?,
        Solute::Mass { grams, molar_mass } => {
            positive("grams", *grams)? / positive("molar_mass", *molar_mass)?
        }
    };

    let output = MolarityOutput {
        moles,
        molarity: moles / volume,
    };
    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata("Molarity (n / V)", input, Vec::new(), elapsed, output))
}

/// Solve M1·V1 = M2·V2 for whichever quantity is missing.
pub fn solve_dilution(input: &DilutionInput) -> CalcResult<ComputationOutput<DilutionOutput>> {
    let start = Instant::now();
    let mut warnings = Vec::new();

    let known = [
        input.initial_molarity,
        input.initial_volume,
        input.final_molarity,
        input.final_volume,
    ];
    if known.iter().filter(|v| v.is_none()).count() != 1 {
        return Err(CalcError::InsufficientData(
            "Exactly one of M1, V1, M2, V2 must be left blank".into(),
        ));
    }

    let (m1, v1, m2, v2, solved_for) = match (
        input.initial_molarity,
        input.initial_volume,
        input.final_molarity,
        input.final_volume,
    ) {
        (None, Some(v1), Some(m2), Some(v2)) => {
            let v1 = positive("initial_volume", v1)?;
            let m1 = positive("final_molarity", m2)? * positive("final_volume", v2)? / v1;
            (m1, v1, m2, v2, DilutionUnknown::InitialMolarity)
        }
        (Some(m1), None, Some(m2), Some(v2)) => {
            let m1 = positive("initial_molarity", m1)?;
            let v1 = positive("final_molarity", m2)? * positive("final_volume", v2)? / m1;
            (m1, v1, m2, v2, DilutionUnknown::InitialVolume)
        }
        (Some(m1), Some(v1), None, Some(v2)) => {
            let v2 = positive("final_volume", v2)?;
            let m2 = positive("initial_molarity", m1)? * positive("initial_volume", v1)? / v2;
            (m1, v1, m2, v2, DilutionUnknown::FinalMolarity)
        }
        (Some(m1), Some(v1), Some(m2), None) => {
            let m2 = positive("final_molarity", m2)?;
            let v2 = positive("initial_molarity", m1)? * positive("initial_volume", v1)? / m2;
            (m1, v1, m2, v2, DilutionUnknown::FinalVolume)
        }
        _ => {
            return Err(CalcError::InsufficientData(
                "Exactly one of M1, V1, M2, V2 must be left blank".into(),
            ))
        }
    };

    if m2 > m1 {
        warnings.push("Final concentration exceeds initial: this is a concentration, not a dilution".into());
    }

    let value = match solved_for {
        DilutionUnknown::InitialMolarity => m1,
        DilutionUnknown::InitialVolume => v1,
        DilutionUnknown::FinalMolarity => m2,
        DilutionUnknown::FinalVolume => v2,
    };

    let output = DilutionOutput {
        solved_for,
        value,
        initial_molarity: m1,
        initial_volume: v1,
        final_molarity: m2,
        final_volume: v2,
        solvent_to_add: v2 - v1,
    };
    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata("Dilution (M1·V1 = M2·V2)", input, warnings, elapsed, output))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_molarity_from_moles() {
        let input = MolarityInput {
            solute: Solute::Moles(dec!(0.5)),
            volume_liters: dec!(2),
        };
        assert_eq!(calculate_molarity(&input).unwrap().result.molarity, dec!(0.25));
    }

    #[test]
    fn test_molarity_from_mass() {
        // 58.44 g NaCl in 1 L => 1 M
        let input = MolarityInput {
            solute: Solute::Mass {
                grams: dec!(58.44),
                molar_mass: dec!(58.44),
            },
            volume_liters: dec!(1),
        };
        let out = calculate_molarity(&input).unwrap().result;
        assert_eq!(out.moles, dec!(1));
        assert_eq!(out.molarity, dec!(1));
    }

    #[test]
    fn test_zero_volume_rejected() {
        let input = MolarityInput {
            solute: Solute::Moles(dec!(1)),
            volume_liters: Decimal::ZERO,
        };
        assert!(calculate_molarity(&input).is_err());
    }

    #[test]
    fn test_dilution_final_volume() {
        // 2 M × 0.5 L = 0.5 M × V2 => V2 = 2 L
        let input = DilutionInput {
            initial_molarity: Some(dec!(2)),
            initial_volume: Some(dec!(0.5)),
            final_molarity: Some(dec!(0.5)),
            final_volume: None,
        };
        let out = solve_dilution(&input).unwrap().result;
        assert_eq!(out.solved_for, DilutionUnknown::FinalVolume);
        assert_eq!(out.value, dec!(2));
        assert_eq!(out.solvent_to_add, dec!(1.5));
    }

    #[test]
    fn test_dilution_initial_molarity() {
        let input = DilutionInput {
            initial_molarity: None,
            initial_volume: Some(dec!(0.1)),
            final_molarity: Some(dec!(0.2)),
            final_volume: Some(dec!(1)),
        };
        assert_eq!(solve_dilution(&input).unwrap().result.value, dec!(2));
    }

    #[test]
    fn test_dilution_requires_exactly_one_unknown() {
        let input = DilutionInput {
            initial_molarity: None,
            initial_volume: None,
            final_molarity: Some(dec!(0.2)),
            final_volume: Some(dec!(1)),
        };
        assert!(solve_dilution(&input).is_err());
    }

    #[test]
    fn test_concentration_warns() {
        let input = DilutionInput {
            initial_molarity: Some(dec!(1)),
            initial_volume: Some(dec!(1)),
            final_molarity: None,
            final_volume: Some(dec!(0.5)),
        };
        let result = solve_dilution(&input).unwrap();
        assert_eq!(result.result.value, dec!(2));
        assert_eq!(result.warnings.len(), 1);
    }
}

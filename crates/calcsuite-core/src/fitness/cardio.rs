use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::CalcError;
use crate::types::{with_metadata, ComputationOutput};
use crate::CalcResult;

/// Cooper 12-minute run test coefficients (distance in metres).
const COOPER_OFFSET: Decimal = dec!(504.9);
const COOPER_DIVISOR: Decimal = dec!(44.73);

/// Used when the resting heart rate is left blank.
pub const DEFAULT_RESTING_HEART_RATE: u32 = 70;

const MAX_AGE: u32 = 120;

/// Training zones as (name, low intensity, high intensity).
const TRAINING_ZONES: [(&str, Decimal, Decimal); 5] = [
    ("Recovery", dec!(0.50), dec!(0.60)),
    ("Fat Burn", dec!(0.60), dec!(0.70)),
    ("Aerobic", dec!(0.70), dec!(0.80)),
    ("Anaerobic", dec!(0.80), dec!(0.90)),
    ("Maximum", dec!(0.90), dec!(1.00)),
];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeartRateInput {
    pub age: u32,
    /// Defaults to 70 bpm when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resting_heart_rate: Option<u32>,
    /// Single target intensity (0.70 = 70%) in addition to the zone table
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intensity: Option<Decimal>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeartRateZone {
    pub name: String,
    pub low_bpm: Decimal,
    pub high_bpm: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeartRateOutput {
    pub max_heart_rate: u32,
    pub resting_heart_rate: u32,
    pub heart_rate_reserve: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_heart_rate: Option<Decimal>,
    pub zones: Vec<HeartRateZone>,
}

/// VO2max estimate (ml/kg/min) from a 12-minute run, rounded to 0.1.
pub fn vo2max_cooper(distance_m: Decimal) -> CalcResult<Decimal> {
    if distance_m <= Decimal::ZERO {
        return Err(CalcError::invalid("distance_m", "Distance must be positive"));
    }
    Ok(((distance_m - COOPER_OFFSET) / COOPER_DIVISOR).round_dp(1))
}

/// Age-predicted maximum heart rate (220 - age).
pub fn max_heart_rate(age: u32) -> CalcResult<u32> {
    if age == 0 || age > MAX_AGE {
        return Err(CalcError::invalid(
            "age",
            format!("Age must be between 1 and {MAX_AGE}"),
        ));
    }
    Ok(220 - age)
}

/// Karvonen target: (max - resting) × intensity + resting.
pub fn karvonen_target(max_hr: u32, resting_hr: u32, intensity: Decimal) -> Decimal {
    Decimal::from(max_hr - resting_hr.min(max_hr)) * intensity + Decimal::from(resting_hr)
}

/// Heart-rate-reserve training zones for an athlete.
pub fn heart_rate_zones(input: &HeartRateInput) -> CalcResult<ComputationOutput<HeartRateOutput>> {
    let start = Instant::now();
    let mut warnings = Vec::new();

    let max_hr = max_heart_rate(input.age)?;
    let resting = input.resting_heart_rate.unwrap_or_else(|| {
        warnings.push(format!(
            "Resting heart rate not provided; assuming {DEFAULT_RESTING_HEART_RATE} bpm"
        ));
        DEFAULT_RESTING_HEART_RATE
    });
    if resting == 0 || resting >= max_hr {
        return Err(CalcError::invalid(
            "resting_heart_rate",
            format!("Resting heart rate must be between 1 and {} bpm", max_hr - 1),
        ));
    }
    if let Some(i) = input.intensity {
        if i <= Decimal::ZERO || i > Decimal::ONE {
            return Err(CalcError::invalid(
                "intensity",
                "Intensity must be between 0% and 100%",
            ));
        }
    }

    let zones = TRAINING_ZONES
        .iter()
        .map(|(name, low, high)| HeartRateZone {
            name: name.to_string(),
            low_bpm: karvonen_target(max_hr, resting, *low).round(),
            high_bpm: karvonen_target(max_hr, resting, *high).round(),
        })
        .collect();

    let output = HeartRateOutput {
        max_heart_rate: max_hr,
        resting_heart_rate: resting,
        heart_rate_reserve: max_hr - resting,
        target_heart_rate: input
            .intensity
            .map(|i| karvonen_target(max_hr, resting, i).round()),
        zones,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Karvonen Heart Rate Reserve",
        input,
        warnings,
        elapsed,
        output,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cooper_2400m() {
        // (2400 - 504.9) / 44.73 = 42.367...
        assert_eq!(vo2max_cooper(dec!(2400)).unwrap(), dec!(42.4));
    }

    #[test]
    fn test_cooper_rejects_non_positive_distance() {
        assert!(vo2max_cooper(Decimal::ZERO).is_err());
    }

    #[test]
    fn test_max_heart_rate() {
        assert_eq!(max_heart_rate(40).unwrap(), 180);
        assert!(max_heart_rate(0).is_err());
        assert!(max_heart_rate(150).is_err());
    }

    #[test]
    fn test_karvonen_formula() {
        // (180 - 60) * 0.7 + 60 = 144
        assert_eq!(karvonen_target(180, 60, dec!(0.7)), dec!(144));
    }

    #[test]
    fn test_zones_default_resting_rate() {
        let input = HeartRateInput {
            age: 30,
            resting_heart_rate: None,
            intensity: Some(dec!(0.75)),
        };
        let result = heart_rate_zones(&input).unwrap();
        let out = &result.result;
        assert_eq!(out.resting_heart_rate, 70);
        assert_eq!(out.heart_rate_reserve, 120);
        // (190 - 70) * 0.75 + 70 = 160
        assert_eq!(out.target_heart_rate, Some(dec!(160)));
        assert_eq!(out.zones.len(), 5);
        assert_eq!(out.zones[0].low_bpm, dec!(130));
        assert_eq!(out.zones[4].high_bpm, dec!(190));
        assert_eq!(result.warnings.len(), 1);
    }

    #[test]
    fn test_resting_above_max_rejected() {
        let input = HeartRateInput {
            age: 30,
            resting_heart_rate: Some(195),
            intensity: None,
        };
        assert!(heart_rate_zones(&input).is_err());
    }
}

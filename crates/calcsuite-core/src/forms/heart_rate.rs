use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::fitness::cardio::HeartRateInput;
use crate::forms::parse::{parse_count, parse_optional_count, parse_or};

/// Target intensity shown before the user picks one, in percent.
const DEFAULT_INTENSITY_PERCENT: Decimal = dec!(70);

/// The heart rate calculator's fields as typed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeartRateForm {
    pub age: String,
    /// Blank leaves the calculator's resting default in place
    pub resting_heart_rate: String,
    pub intensity_percent: String,
}

impl HeartRateForm {
    pub fn to_input(&self) -> HeartRateInput {
        let intensity = parse_or(&self.intensity_percent, DEFAULT_INTENSITY_PERCENT);
        HeartRateInput {
            age: parse_count(&self.age),
            resting_heart_rate: parse_optional_count(&self.resting_heart_rate),
            intensity: Some(intensity / Decimal::ONE_HUNDRED),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fitness::cardio::heart_rate_zones;

    #[test]
    fn test_blank_fields_use_calculator_defaults() {
        let form = HeartRateForm {
            age: "40".into(),
            ..Default::default()
        };
        let input = form.to_input();
        assert_eq!(input.resting_heart_rate, None);
        assert_eq!(input.intensity, Some(dec!(0.7)));

        let out = heart_rate_zones(&input).unwrap();
        assert_eq!(out.result.resting_heart_rate, 70);
        // 70 + 0.7 * (180 - 70)
        assert_eq!(out.result.target_heart_rate, Some(dec!(147)));
        assert_eq!(out.warnings.len(), 1);
    }

    #[test]
    fn test_garbage_age_is_rejected_downstream() {
        let form = HeartRateForm {
            age: "forty".into(),
            resting_heart_rate: "58".into(),
            intensity_percent: "85%".into(),
        };
        let input = form.to_input();
        assert_eq!(input.age, 0);
        assert_eq!(input.resting_heart_rate, Some(58));
        assert!(heart_rate_zones(&input).is_err());
    }
}

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::CalcError;
use crate::types::{safe_divide, with_metadata, ComputationOutput, Money, Rate};
use crate::CalcResult;

/// Upper bounds (inclusive) for each DTI band.
const DTI_BANDS: [(Rate, DtiStatus); 3] = [
    (dec!(0.36), DtiStatus::Healthy),
    (dec!(0.43), DtiStatus::Manageable),
    (dec!(0.50), DtiStatus::Stretched),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DtiStatus {
    Healthy,
    Manageable,
    Stretched,
    Overextended,
    Unavailable,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonthlyDebt {
    pub name: String,
    pub payment: Money,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DtiInput {
    pub gross_monthly_income: Money,
    pub debts: Vec<MonthlyDebt>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DtiOutput {
    pub total_monthly_debt: Money,
    pub dti_ratio: Rate,
    pub status: DtiStatus,
    /// Extra monthly debt that keeps the ratio within the healthy band
    pub headroom_to_healthy: Money,
}

pub fn dti_status(ratio: Rate) -> DtiStatus {
    DTI_BANDS
        .iter()
        .find(|(upper, _)| ratio <= *upper)
        .map(|(_, s)| *s)
        .unwrap_or(DtiStatus::Overextended)
}

/// Monthly debt payments divided by gross monthly income.
pub fn calculate_dti(input: &DtiInput) -> CalcResult<ComputationOutput<DtiOutput>> {
    let start = Instant::now();
    let mut warnings = Vec::new();

    if input.gross_monthly_income < Decimal::ZERO {
        return Err(CalcError::invalid(
            "gross_monthly_income",
            "Income cannot be negative",
        ));
    }
    if let Some(d) = input.debts.iter().find(|d| d.payment < Decimal::ZERO) {
        return Err(CalcError::invalid(
            "debts",
            format!("Payment for '{}' cannot be negative", d.name),
        ));
    }

    let total_monthly_debt: Money = input.debts.iter().map(|d| d.payment).sum();
    let dti_ratio = safe_divide(total_monthly_debt, input.gross_monthly_income);
    let status = if input.gross_monthly_income.is_zero() {
        warnings.push("Gross income is zero, so DTI is unavailable".into());
        DtiStatus::Unavailable
    } else {
        dti_status(dti_ratio)
    };
    let healthy_limit = input.gross_monthly_income * DTI_BANDS[0].0;

    let output = DtiOutput {
        total_monthly_debt,
        dti_ratio,
        status,
        headroom_to_healthy: (healthy_limit - total_monthly_debt).max(Decimal::ZERO),
    };
    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata("Debt-to-Income Ratio", input, warnings, elapsed, output))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(income: Money, payments: &[Money]) -> DtiInput {
        DtiInput {
            gross_monthly_income: income,
            debts: payments
                .iter()
                .enumerate()
                .map(|(i, p)| MonthlyDebt {
                    name: format!("debt{i}"),
                    payment: *p,
                })
                .collect(),
        }
    }

    #[test]
    fn test_dti_basic() {
        let out = calculate_dti(&input(dec!(6000), &[dec!(1500), dec!(300)]))
            .unwrap()
            .result;
        assert_eq!(out.total_monthly_debt, dec!(1800));
        assert_eq!(out.dti_ratio, dec!(0.3));
        assert_eq!(out.status, DtiStatus::Healthy);
        assert_eq!(out.headroom_to_healthy, dec!(360));
    }

    #[test]
    fn test_dti_bands_inclusive() {
        assert_eq!(dti_status(dec!(0.36)), DtiStatus::Healthy);
        assert_eq!(dti_status(dec!(0.43)), DtiStatus::Manageable);
        assert_eq!(dti_status(dec!(0.5)), DtiStatus::Stretched);
        assert_eq!(dti_status(dec!(0.51)), DtiStatus::Overextended);
    }

    #[test]
    fn test_zero_income_unavailable() {
        let result = calculate_dti(&input(Decimal::ZERO, &[dec!(100)])).unwrap();
        assert_eq!(result.result.status, DtiStatus::Unavailable);
        assert_eq!(result.result.dti_ratio, Decimal::ZERO);
        assert_eq!(result.warnings.len(), 1);
    }
}

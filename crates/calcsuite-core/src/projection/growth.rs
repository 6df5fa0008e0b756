use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;
use serde::{Deserialize, Serialize};

use crate::types::{checked_product, Money, Rate, Years};
use crate::CalcResult;

/// Annual growth applied from a given period onwards.
///
/// Property values appreciate from year 0 (`applied_from = 0`), so the value
/// at the end of year 1 already carries one year of growth. Rents and
/// operating expenses are quoted for year 1 and only start growing in year 2
/// (`applied_from = 1`).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GrowthAssumption {
    /// Annual rate (0.03 = 3%). May be negative.
    pub annual_rate: Rate,
    /// First period index whose value is the unchanged base
    #[serde(default)]
    pub applied_from: Years,
}

impl GrowthAssumption {
    pub fn new(annual_rate: Rate, applied_from: Years) -> Self {
        Self {
            annual_rate,
            applied_from,
        }
    }

    /// Value of `base` at `period`, compounding once per elapsed year.
    pub fn value_at(&self, base: Money, period: Years) -> CalcResult<Money> {
        compound(base, self.annual_rate, period.saturating_sub(self.applied_from))
    }
}

/// Compute (1 + r)^n via iterative multiplication (avoids Decimal::powd drift).
///
/// Fails with `CalcError::Overflow` once the factor leaves the Decimal range.
pub fn compound_factor(rate: Rate, years: Years) -> CalcResult<Decimal> {
    let mut result = Decimal::ONE;
    let factor = Decimal::ONE + rate;
    for _ in 0..years {
        result = checked_product(result, factor, "compound_factor")?;
    }
    Ok(result)
}

/// `base × (1 + rate)^years`
pub fn compound(base: Money, rate: Rate, years: Years) -> CalcResult<Money> {
    checked_product(base, compound_factor(rate, years)?, "compound")
}

/// Constant annual rate that turns 1 into `1 + total_growth` over `years`.
///
/// Returns -1 when the total growth wipes out the base entirely and 0 for a
/// zero-length horizon.
pub fn annualized_rate(total_growth: Rate, years: Years) -> Rate {
    if years == 0 {
        return Decimal::ZERO;
    }
    let ending = Decimal::ONE + total_growth;
    if ending <= Decimal::ZERO {
        return Decimal::NEGATIVE_ONE;
    }
    if years == 1 {
        return total_growth;
    }
    let exponent = Decimal::ONE / Decimal::from(years);
    ending
        .checked_powd(exponent)
        .map(|root| root - Decimal::ONE)
        .unwrap_or(Decimal::ZERO)
}

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::CalcError;
use crate::CalcResult;

/// All monetary values. Wraps Decimal to prevent accidental f64 usage.
pub type Money = Decimal;

/// Rates expressed as decimals (0.05 = 5%). Never as percentages.
pub type Rate = Decimal;

/// Year or month counts used in projections
pub type Years = u32;

/// Divide, returning zero when the denominator is zero.
pub fn safe_divide(numerator: Decimal, denominator: Decimal) -> Decimal {
    if denominator.is_zero() {
        Decimal::ZERO
    } else {
        numerator / denominator
    }
}

/// Highest nominal annual interest rate a loan may carry (40%).
pub const MAX_ANNUAL_RATE: Rate = dec!(0.40);

/// Growth and appreciation rates are accepted within -100%..=+100% a year.
pub const MAX_GROWTH_RATE: Rate = Decimal::ONE;

/// Longest loan term, 50 years of monthly payments.
pub const MAX_TERM_MONTHS: u32 = 600;

/// Longest holding, comparison or savings horizon.
pub const MAX_HORIZON_YEARS: Years = 50;

/// Largest single money input (one trillion).
pub const MAX_AMOUNT: Money = dec!(1000000000000);

/// Multiply, reporting overflow instead of panicking.
pub fn checked_product(a: Decimal, b: Decimal, context: &str) -> CalcResult<Decimal> {
    a.checked_mul(b).ok_or_else(|| CalcError::overflow(context))
}

/// Add, reporting overflow instead of panicking.
pub fn checked_total(a: Decimal, b: Decimal, context: &str) -> CalcResult<Decimal> {
    a.checked_add(b).ok_or_else(|| CalcError::overflow(context))
}

/// Reject a loan rate outside `0..=MAX_ANNUAL_RATE`.
pub fn validate_loan_rate(field: &str, rate: Rate) -> CalcResult<()> {
    if rate < Decimal::ZERO {
        return Err(CalcError::invalid(field, "Interest rate cannot be negative"));
    }
    if rate > MAX_ANNUAL_RATE {
        return Err(CalcError::invalid(field, "Interest rate cannot exceed 40%"));
    }
    Ok(())
}

/// Reject a yearly growth rate outside `-1..=MAX_GROWTH_RATE`.
pub fn validate_growth_rate(field: &str, rate: Rate) -> CalcResult<()> {
    if rate < Decimal::NEGATIVE_ONE || rate > MAX_GROWTH_RATE {
        return Err(CalcError::invalid(
            field,
            "Growth rate must be between -100% and 100% a year",
        ));
    }
    Ok(())
}

/// Reject money inputs above `MAX_AMOUNT`. Sign checks stay with each caller.
pub fn validate_amounts(amounts: &[(&str, Money)]) -> CalcResult<()> {
    match amounts.iter().find(|(_, value)| *value > MAX_AMOUNT) {
        Some((field, _)) => Err(CalcError::invalid(
            field,
            format!("Cannot exceed {MAX_AMOUNT}"),
        )),
        None => Ok(()),
    }
}

/// Reject a horizon of zero years or more than `MAX_HORIZON_YEARS`.
pub fn validate_horizon(field: &str, years: Years) -> CalcResult<()> {
    if years == 0 {
        return Err(CalcError::invalid(field, "Must be at least one year"));
    }
    if years > MAX_HORIZON_YEARS {
        return Err(CalcError::invalid(
            field,
            format!("Cannot exceed {MAX_HORIZON_YEARS} years"),
        ));
    }
    Ok(())
}

/// Standard computation output envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationOutput<T: Serialize> {
    pub result: T,
    pub methodology: String,
    pub assumptions: serde_json::Value,
    pub warnings: Vec<String>,
    pub metadata: ComputationMetadata,
}

/// Metadata for every computation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationMetadata {
    pub version: String,
    pub computation_time_us: u64,
    pub precision: String,
}

/// Helper to wrap computation results with metadata
pub fn with_metadata<T: Serialize>(
    methodology: &str,
    assumptions: &impl Serialize,
    warnings: Vec<String>,
    elapsed_us: u64,
    result: T,
) -> ComputationOutput<T> {
    ComputationOutput {
        result,
        methodology: methodology.to_string(),
        assumptions: serde_json::to_value(assumptions).unwrap_or_default(),
        warnings,
        metadata: ComputationMetadata {
            version: env!("CARGO_PKG_VERSION").to_string(),
            computation_time_us: elapsed_us,
            precision: "rust_decimal_128bit".to_string(),
        },
    }
}

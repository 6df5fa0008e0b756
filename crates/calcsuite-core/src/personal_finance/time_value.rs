use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::CalcError;
use crate::projection::growth::{annualized_rate, compound_factor};
use crate::types::{
    checked_product, checked_total, validate_amounts, validate_growth_rate, with_metadata,
    ComputationOutput, Money, Rate, Years, MAX_GROWTH_RATE, MAX_HORIZON_YEARS,
};
use crate::CalcResult;

/// Daily compounding is the finest frequency accepted.
const MAX_PERIODS_PER_YEAR: u32 = 365;

fn default_periods_per_year() -> u32 {
    12
}

/// Savings growth with regular end-of-period contributions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FutureValueInput {
    #[serde(default)]
    pub present_value: Money,
    /// Deposited at the end of every compounding period
    #[serde(default)]
    pub periodic_contribution: Money,
    pub annual_rate: Rate,
    pub years: Years,
    #[serde(default = "default_periods_per_year")]
    pub periods_per_year: u32,
    /// Deflates the result into today's money when set
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inflation_rate: Option<Rate>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FutureValueYear {
    pub year: Years,
    pub balance: Money,
    pub total_contributions: Money,
    pub total_interest: Money,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FutureValueOutput {
    pub future_value: Money,
    pub total_contributions: Money,
    pub total_interest: Money,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub real_future_value: Option<Money>,
    /// Compound annual growth of the money put in
    pub annualized_return: Rate,
    pub yearly: Vec<FutureValueYear>,
}

/// FV = PV(1+i)^n + PMT·((1+i)^n − 1)/i, with i the per-period rate.
pub fn future_value(
    rate: Rate,
    nper: u32,
    pmt: Money,
    present_value: Money,
) -> CalcResult<Money> {
    if rate.is_zero() {
        let paid_in = checked_product(pmt, Decimal::from(nper), "future_value")?;
        return checked_total(present_value, paid_in, "future_value");
    }
    let growth = compound_factor(rate, nper)?;
    let grown = checked_product(present_value, growth, "future_value")?;
    let annuity = checked_product(pmt, growth - Decimal::ONE, "future_value")? / rate;
    checked_total(grown, annuity, "future_value")
}

/// Project a savings balance with a year-by-year table.
pub fn project_savings(
    input: &FutureValueInput,
) -> CalcResult<ComputationOutput<FutureValueOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    if input.periods_per_year == 0 || input.periods_per_year > MAX_PERIODS_PER_YEAR {
        return Err(CalcError::invalid(
            "periods_per_year",
            format!("Compounding frequency must be between 1 and {MAX_PERIODS_PER_YEAR} a year"),
        ));
    }
    if input.years > MAX_HORIZON_YEARS {
        return Err(CalcError::invalid(
            "years",
            format!("Cannot exceed {MAX_HORIZON_YEARS} years"),
        ));
    }
    if input.present_value < Decimal::ZERO || input.periodic_contribution < Decimal::ZERO {
        return Err(CalcError::invalid(
            "present_value",
            "Starting balance and contributions cannot be negative",
        ));
    }
    validate_amounts(&[
        ("present_value", input.present_value),
        ("periodic_contribution", input.periodic_contribution),
    ])?;
    if input.annual_rate <= Decimal::NEGATIVE_ONE || input.annual_rate > MAX_GROWTH_RATE {
        return Err(CalcError::invalid(
            "annual_rate",
            "Rate must be greater than -100% and at most 100%",
        ));
    }
    if let Some(inflation) = input.inflation_rate {
        validate_growth_rate("inflation_rate", inflation)?;
    }
    if input.annual_rate < Decimal::ZERO {
        warnings.push("Negative rate: balance shrinks over time".into());
    }

    let periods = Decimal::from(input.periods_per_year);
    let period_rate = input.annual_rate / periods;

    let yearly = (1..=input.years)
        .map(|year| {
            let nper = year * input.periods_per_year;
            let balance = future_value(
                period_rate,
                nper,
                input.periodic_contribution,
                input.present_value,
            )?;
            let contributions =
                input.present_value + input.periodic_contribution * Decimal::from(nper);
            Ok(FutureValueYear {
                year,
                balance,
                total_contributions: contributions,
                total_interest: balance - contributions,
            })
        })
        .collect::<CalcResult<Vec<FutureValueYear>>>()?;

    let (fv, contributions) = yearly
        .last()
        .map(|y| (y.balance, y.total_contributions))
        .unwrap_or((input.present_value, input.present_value));

    let real_future_value = match input.inflation_rate {
        Some(inflation) => {
            let deflator = compound_factor(inflation, input.years)?;
            Some(if deflator.is_zero() { fv } else { fv / deflator })
        }
        None => None,
    };

    let total_growth = if contributions.is_zero() {
        Decimal::ZERO
    } else {
        fv / contributions - Decimal::ONE
    };

    let output = FutureValueOutput {
        future_value: fv,
        total_contributions: contributions,
        total_interest: fv - contributions,
        real_future_value,
        annualized_return: annualized_rate(total_growth, input.years),
        yearly,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Future Value with Periodic Contributions",
        input,
        warnings,
        elapsed,
        output,
    ))
}

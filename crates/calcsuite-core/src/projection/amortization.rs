use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::CalcError;
use crate::projection::growth::compound_factor;
use crate::types::{
    checked_product, validate_loan_rate, with_metadata, ComputationOutput, Money, Rate,
    MAX_TERM_MONTHS,
};
use crate::CalcResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Fixed-rate, fully amortising loan.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LoanTerms {
    /// Amount borrowed
    pub principal: Money,
    /// Nominal annual rate, compounded monthly (0.07 = 7%)
    pub annual_rate: Rate,
    /// Number of monthly payments
    pub term_months: u32,
}

/// One application of a monthly payment against a balance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AmortizationStep {
    pub interest: Money,
    /// Negative when the payment does not cover the interest
    pub principal_portion: Money,
    pub new_balance: Money,
}

/// A single month in an amortization schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmortizationRow {
    pub month: u32,
    pub payment: Money,
    pub interest: Money,
    pub principal: Money,
    pub balance: Money,
}

/// Calendar-year roll-up of the monthly schedule (chart data).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmortizationYear {
    pub year: u32,
    pub principal_paid: Money,
    pub interest_paid: Money,
    pub ending_balance: Money,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AmortizationOutput {
    pub monthly_payment: Money,
    pub total_payments: Money,
    pub total_interest: Money,
    pub yearly: Vec<AmortizationYear>,
    pub schedule: Vec<AmortizationRow>,
}

impl LoanTerms {
    /// Validate and build loan terms.
    pub fn new(principal: Money, annual_rate: Rate, term_months: u32) -> CalcResult<Self> {
        if principal < Decimal::ZERO {
            return Err(CalcError::invalid("principal", "Principal cannot be negative"));
        }
        validate_loan_rate("annual_rate", annual_rate)?;
        if term_months == 0 {
            return Err(CalcError::invalid(
                "term_months",
                "Loan term must be at least one month",
            ));
        }
        if term_months > MAX_TERM_MONTHS {
            return Err(CalcError::invalid(
                "term_months",
                format!("Loan term cannot exceed {MAX_TERM_MONTHS} months"),
            ));
        }
        Ok(Self {
            principal,
            annual_rate,
            term_months,
        })
    }

    /// Convenience constructor for terms quoted in years.
    pub fn from_years(principal: Money, annual_rate: Rate, term_years: u32) -> CalcResult<Self> {
        Self::new(principal, annual_rate, term_years.saturating_mul(12))
    }

    pub fn monthly_rate(&self) -> Rate {
        self.annual_rate / Decimal::from(12)
    }
}

// ---------------------------------------------------------------------------
// Primitives
// ---------------------------------------------------------------------------

/// Standard fixed-rate payment: P * r(1+r)^n / ((1+r)^n - 1)
pub fn monthly_payment(terms: &LoanTerms) -> CalcResult<Money> {
    if terms.principal.is_zero() || terms.term_months == 0 {
        return Ok(Decimal::ZERO);
    }

    let monthly_rate = terms.monthly_rate();
    if monthly_rate.is_zero() {
        // Interest-free: straight-line amortisation
        return Ok(terms.principal / Decimal::from(terms.term_months));
    }

    let compound = compound_factor(monthly_rate, terms.term_months)?;
    let denominator = compound - Decimal::ONE;
    if denominator.is_zero() {
        return Ok(terms.principal / Decimal::from(terms.term_months));
    }

    let interest = checked_product(terms.principal, monthly_rate, "monthly_payment")?;
    Ok(checked_product(interest, compound, "monthly_payment")? / denominator)
}

/// Apply one monthly payment to `balance`.
///
/// The principal portion never exceeds the outstanding balance, and the new
/// balance is clamped at zero. A payment smaller than the interest grows the
/// balance.
pub fn step_balance(
    balance: Money,
    payment: Money,
    monthly_rate: Rate,
) -> CalcResult<AmortizationStep> {
    let interest = checked_product(balance, monthly_rate, "step_balance")?;
    let principal_portion = payment
        .checked_sub(interest)
        .ok_or_else(|| CalcError::overflow("step_balance"))?
        .min(balance);
    let new_balance = balance
        .checked_sub(principal_portion)
        .ok_or_else(|| CalcError::overflow("step_balance"))?
        .max(Decimal::ZERO);
    Ok(AmortizationStep {
        interest,
        principal_portion,
        new_balance,
    })
}

/// Outstanding balance after `months` scheduled payments.
pub fn balance_after(terms: &LoanTerms, months: u32) -> CalcResult<Money> {
    let payment = monthly_payment(terms)?;
    let rate = terms.monthly_rate();
    let mut balance = terms.principal;
    for _ in 0..months.min(terms.term_months) {
        balance = step_balance(balance, payment, rate)?.new_balance;
    }
    Ok(balance)
}

/// Month-by-month schedule over the full term.
pub fn amortization_schedule(terms: &LoanTerms) -> CalcResult<Vec<AmortizationRow>> {
    let payment = monthly_payment(terms)?;
    let rate = terms.monthly_rate();
    let mut balance = terms.principal;
    let mut rows = Vec::with_capacity(terms.term_months as usize);

    for month in 1..=terms.term_months {
        let step = step_balance(balance, payment, rate)?;
        balance = step.new_balance;
        rows.push(AmortizationRow {
            month,
            payment: step.interest + step.principal_portion,
            interest: step.interest,
            principal: step.principal_portion,
            balance,
        });
    }

    Ok(rows)
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Build a full amortization table with yearly totals.
pub fn build_amortization(terms: &LoanTerms) -> CalcResult<ComputationOutput<AmortizationOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    // Re-validate: terms may arrive straight from JSON.
    let terms = LoanTerms::new(terms.principal, terms.annual_rate, terms.term_months)?;
    tracing::debug!(
        principal = %terms.principal,
        rate = %terms.annual_rate,
        months = terms.term_months,
        "building amortization schedule"
    );

    if terms.principal.is_zero() {
        warnings.push("Principal is zero, so every scheduled payment is zero".into());
    }

    let monthly = monthly_payment(&terms)?;
    let schedule = amortization_schedule(&terms)?;

    let yearly: Vec<AmortizationYear> = schedule
        .chunks(12)
        .enumerate()
        .map(|(i, months)| AmortizationYear {
            year: i as u32 + 1,
            principal_paid: months.iter().map(|r| r.principal).sum(),
            interest_paid: months.iter().map(|r| r.interest).sum(),
            ending_balance: months.last().map(|r| r.balance).unwrap_or_default(),
        })
        .collect();

    let total_payments: Money = schedule.iter().map(|r| r.payment).sum();
    let total_interest: Money = schedule.iter().map(|r| r.interest).sum();

    let output = AmortizationOutput {
        monthly_payment: monthly,
        total_payments,
        total_interest,
        yearly,
        schedule,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Fixed-Rate Loan Amortization (monthly compounding)",
        &terms,
        warnings,
        elapsed,
        output,
    ))
}

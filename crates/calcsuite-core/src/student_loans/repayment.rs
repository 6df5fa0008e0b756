use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::CalcError;
use crate::projection::amortization::{monthly_payment, step_balance, LoanTerms};
use crate::types::{
    checked_total, validate_amounts, validate_loan_rate, with_metadata, ComputationOutput, Money,
    Rate,
};
use crate::CalcResult;

const STANDARD_TERM_YEARS: u32 = 10;
const EXTENDED_TERM_YEARS: u32 = 25;
const GRADUATED_TERM_YEARS: u32 = 10;
/// Graduated payments are approximated, not amortised step by step.
const GRADUATED_START_FACTOR: Decimal = dec!(0.70);
const GRADUATED_AVERAGE_FACTOR: Decimal = dec!(1.08);
const IDR_POVERTY_MULTIPLIER: Decimal = dec!(1.5);
const IDR_FORGIVENESS_YEARS: u32 = 20;
const IDR_FORGIVENESS_YEARS_GRADUATE: u32 = 25;
const PSLF_QUALIFYING_PAYMENTS: u32 = 120;
/// Balances under half a cent count as repaid.
const PAID_OFF_TOLERANCE: Decimal = dec!(0.005);

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanKind {
    Standard,
    Extended,
    Graduated,
    IncomeDriven,
    Pslf,
}

impl PlanKind {
    pub fn display_name(&self) -> &'static str {
        match self {
            PlanKind::Standard => "Standard (10-year)",
            PlanKind::Extended => "Extended (25-year)",
            PlanKind::Graduated => "Graduated (10-year)",
            PlanKind::IncomeDriven => "Income-Driven Repayment",
            PlanKind::Pslf => "Public Service Loan Forgiveness",
        }
    }
}

fn default_family_size() -> u32 {
    1
}

fn default_poverty_line() -> Money {
    dec!(15060)
}

fn default_idr_percent() -> Rate {
    dec!(0.10)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudentLoanInput {
    pub loan_balance: Money,
    pub annual_rate: Rate,
    /// Adjusted gross income
    #[serde(default)]
    pub annual_income: Money,
    #[serde(default = "default_family_size")]
    pub family_size: u32,
    /// Federal poverty guideline for a single person
    #[serde(default = "default_poverty_line")]
    pub poverty_line: Money,
    /// Share of discretionary income paid under income-driven plans
    #[serde(default = "default_idr_percent")]
    pub idr_percent: Rate,
    /// Graduate borrowers wait 25 rather than 20 years for IDR forgiveness
    #[serde(default)]
    pub graduate_loans: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepaymentPlan {
    pub plan: PlanKind,
    pub name: String,
    /// Fixed payment, or the average payment for graduated plans
    pub monthly_payment: Money,
    /// First payment where it differs from the average
    #[serde(skip_serializing_if = "Option::is_none")]
    pub initial_payment: Option<Money>,
    pub total_interest: Money,
    pub total_payments: Money,
    pub payoff_years: Decimal,
    pub forgiveness_amount: Money,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payments_until_forgiveness: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepaymentComparison {
    pub discretionary_income: Money,
    pub plans: Vec<RepaymentPlan>,
    /// Plan with the lowest total nominal payments
    pub best_plan: PlanKind,
    /// Standard total minus best-plan total
    pub savings_vs_standard: Money,
}

/// Result of paying a fixed amount monthly until repaid or forgiven.
struct PaymentRun {
    months: u32,
    total_paid: Money,
    remaining: Money,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Compute every repayment plan and pick the cheapest in nominal terms.
///
/// Payments are not discounted: a plan that pays less over a longer period
/// wins even when its present value is higher.
pub fn compare_repayment_plans(
    input: &StudentLoanInput,
) -> CalcResult<ComputationOutput<RepaymentComparison>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    validate_input(input)?;
    tracing::debug!(
        balance = %input.loan_balance,
        rate = %input.annual_rate,
        income = %input.annual_income,
        "comparing student loan repayment plans"
    );

    let standard = fixed_plan(input, PlanKind::Standard, STANDARD_TERM_YEARS)?;
    let extended = fixed_plan(input, PlanKind::Extended, EXTENDED_TERM_YEARS)?;
    let graduated = graduated_plan(input, &standard);

    let discretionary_income = discretionary_income(input);
    let idr_payment = discretionary_income * input.idr_percent / dec!(12);
    let idr_years = if input.graduate_loans {
        IDR_FORGIVENESS_YEARS_GRADUATE
    } else {
        IDR_FORGIVENESS_YEARS
    };
    let income_driven =
        forgiveness_plan(input, PlanKind::IncomeDriven, idr_payment, idr_years * 12)?;
    let pslf = forgiveness_plan(
        input,
        PlanKind::Pslf,
        idr_payment.min(standard.monthly_payment),
        PSLF_QUALIFYING_PAYMENTS,
    )?;

    let monthly_interest = input.loan_balance * input.annual_rate / dec!(12);
    if idr_payment < monthly_interest {
        warnings.push(format!(
            "Income-driven payment {idr_payment:.2} is below monthly interest {monthly_interest:.2}; the balance grows until forgiven"
        ));
    }

    let plans = vec![standard, extended, graduated, income_driven, pslf];
    let best = plans
        .iter()
        .fold(&plans[0], |best, p| {
            if p.total_payments < best.total_payments {
                p
            } else {
                best
            }
        });
    let best_plan = best.plan;
    let savings_vs_standard = plans[0].total_payments - best.total_payments;

    let output = RepaymentComparison {
        discretionary_income,
        plans,
        best_plan,
        savings_vs_standard,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Student Loan Repayment Comparison (nominal totals)",
        input,
        warnings,
        elapsed,
        output,
    ))
}

/// Income above 150% of the poverty line for the household.
pub fn discretionary_income(input: &StudentLoanInput) -> Money {
    let protected = IDR_POVERTY_MULTIPLIER * input.poverty_line * Decimal::from(input.family_size);
    (input.annual_income - protected).max(Decimal::ZERO)
}

// ---------------------------------------------------------------------------
// Plans
// ---------------------------------------------------------------------------

fn validate_input(input: &StudentLoanInput) -> CalcResult<()> {
    if input.loan_balance < Decimal::ZERO {
        return Err(CalcError::invalid("loan_balance", "Loan balance cannot be negative"));
    }
    validate_loan_rate("annual_rate", input.annual_rate)?;
    if input.annual_income < Decimal::ZERO {
        return Err(CalcError::invalid("annual_income", "Income cannot be negative"));
    }
    if input.poverty_line < Decimal::ZERO {
        return Err(CalcError::invalid("poverty_line", "Poverty line cannot be negative"));
    }
    if input.idr_percent < Decimal::ZERO || input.idr_percent > Decimal::ONE {
        return Err(CalcError::invalid(
            "idr_percent",
            "Income-driven share must be between 0% and 100% of discretionary income",
        ));
    }
    if input.family_size == 0 {
        return Err(CalcError::invalid("family_size", "Family size must be at least 1"));
    }
    validate_amounts(&[
        ("loan_balance", input.loan_balance),
        ("annual_income", input.annual_income),
        ("poverty_line", input.poverty_line),
    ])
}

fn fixed_plan(input: &StudentLoanInput, plan: PlanKind, years: u32) -> CalcResult<RepaymentPlan> {
    let terms = LoanTerms::from_years(input.loan_balance, input.annual_rate, years)?;
    let payment = monthly_payment(&terms)?;
    let total_payments = payment * Decimal::from(terms.term_months);
    Ok(RepaymentPlan {
        plan,
        name: plan.display_name().to_string(),
        monthly_payment: payment,
        initial_payment: None,
        total_interest: total_payments - input.loan_balance,
        total_payments,
        payoff_years: Decimal::from(years),
        forgiveness_amount: Decimal::ZERO,
        payments_until_forgiveness: None,
    })
}

/// Average-payment approximation: payments start below the standard amount
/// and average slightly above it over ten years.
fn graduated_plan(input: &StudentLoanInput, standard: &RepaymentPlan) -> RepaymentPlan {
    let average = standard.monthly_payment * GRADUATED_AVERAGE_FACTOR;
    let total_payments = average * Decimal::from(GRADUATED_TERM_YEARS * 12);
    RepaymentPlan {
        plan: PlanKind::Graduated,
        name: PlanKind::Graduated.display_name().to_string(),
        monthly_payment: average,
        initial_payment: Some(standard.monthly_payment * GRADUATED_START_FACTOR),
        total_interest: total_payments - input.loan_balance,
        total_payments,
        payoff_years: Decimal::from(GRADUATED_TERM_YEARS),
        forgiveness_amount: Decimal::ZERO,
        payments_until_forgiveness: None,
    }
}

/// Pay `payment` monthly for up to `max_months`; whatever remains is forgiven.
fn forgiveness_plan(
    input: &StudentLoanInput,
    plan: PlanKind,
    payment: Money,
    max_months: u32,
) -> CalcResult<RepaymentPlan> {
    let run = run_payments(input.loan_balance, input.annual_rate / dec!(12), payment, max_months)?;
    let forgiven = run.remaining > PAID_OFF_TOLERANCE;
    let forgiveness_amount = if forgiven { run.remaining } else { Decimal::ZERO };
    // Interest is what was paid beyond the principal actually retired.
    let principal_retired = input.loan_balance - run.remaining;

    Ok(RepaymentPlan {
        plan,
        name: plan.display_name().to_string(),
        monthly_payment: payment,
        initial_payment: None,
        total_interest: (run.total_paid - principal_retired).max(Decimal::ZERO),
        total_payments: run.total_paid,
        payoff_years: Decimal::from(run.months) / dec!(12),
        forgiveness_amount,
        payments_until_forgiveness: forgiven.then_some(max_months),
    })
}

fn run_payments(
    balance: Money,
    monthly_rate: Rate,
    payment: Money,
    max_months: u32,
) -> CalcResult<PaymentRun> {
    let mut balance = balance;
    let mut total_paid = Decimal::ZERO;
    let mut months = 0;

    while months < max_months && balance > PAID_OFF_TOLERANCE {
        let step = step_balance(balance, payment, monthly_rate)?;
        total_paid = checked_total(
            total_paid,
            step.interest + step.principal_portion,
            "total_payments",
        )?;
        balance = step.new_balance;
        months += 1;
    }

    Ok(PaymentRun {
        months,
        total_paid,
        remaining: balance,
    })
}

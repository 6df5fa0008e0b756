use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::CalcError;
use crate::projection::amortization::{monthly_payment, step_balance, LoanTerms};
use crate::projection::growth::GrowthAssumption;
use crate::types::{checked_product, checked_total, Money, Rate, Years, MAX_HORIZON_YEARS};
use crate::CalcResult;

const MONTHS_PER_YEAR: u32 = 12;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// An operating expense with its own growth rate (taxes, insurance, HOA...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenseLine {
    pub name: String,
    /// Year-one annual amount
    pub base_annual: Money,
    #[serde(default)]
    pub growth_rate: Rate,
}

impl ExpenseLine {
    pub fn new(name: &str, base_annual: Money, growth_rate: Rate) -> Self {
        Self {
            name: name.to_string(),
            base_annual,
            growth_rate,
        }
    }
}

/// Everything the projector needs for one run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionInput {
    pub purchase_price: Money,
    /// `None` is an all-cash purchase: no debt service, no equity buildup
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub loan: Option<LoanTerms>,
    /// Year-one gross rent (or other income)
    pub base_annual_rent: Money,
    #[serde(default)]
    pub rent_growth: Rate,
    #[serde(default)]
    pub expenses: Vec<ExpenseLine>,
    /// Fraction of gross rent lost to vacancy (0.05 = 5%)
    #[serde(default)]
    pub vacancy_rate: Rate,
    #[serde(default)]
    pub appreciation_rate: Rate,
    pub holding_years: Years,
}

/// State of the investment at the end of one projection year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodSnapshot {
    pub year: Years,
    pub property_value: Money,
    pub gross_income: Money,
    pub vacancy_loss: Money,
    /// Sum of the expense lines (excludes debt service and vacancy)
    pub operating_expenses: Money,
    pub debt_service: Money,
    pub total_expenses: Money,
    pub cash_flow: Money,
    pub cumulative_cash_flow: Money,
    pub loan_balance: Money,
    /// Loan principal repaid so far; appreciation is tracked by callers
    pub equity: Money,
}

impl PeriodSnapshot {
    /// Net operating income: income after vacancy and operating expenses,
    /// before debt service.
    pub fn noi(&self) -> Money {
        self.gross_income - self.vacancy_loss - self.operating_expenses
    }

    /// Market value less the outstanding loan.
    pub fn owner_equity(&self) -> Money {
        self.property_value - self.loan_balance
    }
}

// ---------------------------------------------------------------------------
// Projector
// ---------------------------------------------------------------------------

/// Produce one snapshot per holding year.
///
/// Pure: rates are not validated here and negative rates compound downward.
/// Fails when the horizon exceeds `MAX_HORIZON_YEARS` or a figure leaves the
/// Decimal range. A zero holding period yields an empty projection.
pub fn project(input: &ProjectionInput) -> CalcResult<Vec<PeriodSnapshot>> {
    let years = input.holding_years;
    if years > MAX_HORIZON_YEARS {
        return Err(CalcError::invalid(
            "holding_years",
            format!("Cannot exceed {MAX_HORIZON_YEARS} years"),
        ));
    }
    let mut snapshots = Vec::with_capacity(years as usize);

    let appreciation = GrowthAssumption::new(input.appreciation_rate, 0);
    let rent = GrowthAssumption::new(input.rent_growth, 1);
    let expense_growth: Vec<GrowthAssumption> = input
        .expenses
        .iter()
        .map(|e| GrowthAssumption::new(e.growth_rate, 1))
        .collect();

    let (original_loan, payment, monthly_rate, term_months) = match &input.loan {
        Some(terms) => (
            terms.principal,
            monthly_payment(terms)?,
            terms.monthly_rate(),
            terms.term_months,
        ),
        None => (Decimal::ZERO, Decimal::ZERO, Decimal::ZERO, 0),
    };

    let months_per_year = Decimal::from(MONTHS_PER_YEAR);
    let mut balance = original_loan;
    let mut cumulative = Decimal::ZERO;

    for year in 1..=years {
        let property_value = appreciation.value_at(input.purchase_price, year)?;
        let gross_income = rent.value_at(input.base_annual_rent, year)?;

        let mut operating_expenses = Decimal::ZERO;
        for (line, growth) in input.expenses.iter().zip(expense_growth.iter()) {
            let amount = growth.value_at(line.base_annual, year)?;
            operating_expenses = checked_total(operating_expenses, amount, "operating_expenses")?;
        }

        // Vacancy is applied to the monthly rent, then annualised.
        let monthly_rent = gross_income / months_per_year;
        let vacancy_loss = checked_product(
            checked_product(monthly_rent, input.vacancy_rate, "vacancy_loss")?,
            months_per_year,
            "vacancy_loss",
        )?;

        // Debt service stays flat while the loan is within its term.
        let first_month = (year - 1) * MONTHS_PER_YEAR;
        let months_paying = term_months
            .saturating_sub(first_month)
            .min(MONTHS_PER_YEAR);
        let debt_service = checked_product(payment, Decimal::from(months_paying), "debt_service")?;

        for _ in 0..months_paying {
            balance = step_balance(balance, payment, monthly_rate)?.new_balance;
        }

        let total_expenses = checked_total(
            checked_total(debt_service, operating_expenses, "total_expenses")?,
            vacancy_loss,
            "total_expenses",
        )?;
        let cash_flow = gross_income
            .checked_sub(total_expenses)
            .ok_or_else(|| CalcError::overflow("cash_flow"))?;
        cumulative = checked_total(cumulative, cash_flow, "cumulative_cash_flow")?;

        snapshots.push(PeriodSnapshot {
            year,
            property_value,
            gross_income,
            vacancy_loss,
            operating_expenses,
            debt_service,
            total_expenses,
            cash_flow,
            cumulative_cash_flow: cumulative,
            loan_balance: balance,
            equity: original_loan - balance,
        });
    }

    Ok(snapshots)
}

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::CalcError;
use crate::housing::rating::{default_rules, rate_investment, InvestmentRating, RatingMetrics, RatingRule};
use crate::projection::amortization::{monthly_payment, LoanTerms};
use crate::projection::growth::annualized_rate;
use crate::projection::projector::{project, ExpenseLine, PeriodSnapshot, ProjectionInput};
use crate::types::{
    safe_divide, validate_amounts, validate_growth_rate, validate_horizon, validate_loan_rate,
    with_metadata, ComputationOutput, Money, Rate, Years, MAX_TERM_MONTHS,
};
use crate::CalcResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

fn default_true() -> bool {
    true
}

fn default_loan_term() -> u32 {
    30
}

/// Input parameters for a buy-to-let analysis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RentalPropertyInput {
    pub purchase_price: Money,
    /// `false` analyses an all-cash purchase
    #[serde(default = "default_true")]
    pub use_loan: bool,
    /// Down payment as a fraction of price (0.20 = 20%)
    #[serde(default)]
    pub down_payment_rate: Rate,
    #[serde(default)]
    pub loan_rate: Rate,
    #[serde(default = "default_loan_term")]
    pub loan_term_years: u32,
    #[serde(default)]
    pub closing_costs: Money,
    pub monthly_rent: Money,
    #[serde(default)]
    pub rent_growth: Rate,
    /// Vacancy and collection loss (0.05 = 5%)
    #[serde(default)]
    pub vacancy_rate: Rate,
    /// Annual operating expenses, each with its own growth rate
    #[serde(default)]
    pub expenses: Vec<ExpenseLine>,
    #[serde(default)]
    pub appreciation_rate: Rate,
    pub holding_years: Years,
    /// Agent fees and transfer costs at exit, fraction of sale price
    #[serde(default)]
    pub selling_cost_rate: Rate,
    /// Replaces the default rating table
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating_rules: Option<Vec<RatingRule>>,
}

/// Aggregates over the holding period, including exit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvestmentSummary {
    pub total_cash_flow: Money,
    /// Final property value less purchase price
    pub total_appreciation: Money,
    /// Loan principal repaid over the hold
    pub total_equity_buildup: Money,
    pub sale_price: Money,
    pub selling_costs: Money,
    pub remaining_loan_balance: Money,
    /// Sale price - remaining loan - selling costs
    pub net_sale_proceeds: Money,
    /// Cash flow + net sale proceeds - cash invested
    pub total_profit: Money,
    /// Total profit / cash invested
    pub total_return: Rate,
    /// Compound annual rate equivalent to total_return
    pub annualized_return: Rate,
    /// Simple average: total_return / holding years
    pub average_annual_return: Rate,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RentalAnalysisOutput {
    pub loan_amount: Money,
    pub down_payment: Money,
    /// Down payment (or full price when all cash) plus closing costs
    pub total_cash_invested: Money,
    pub monthly_mortgage_payment: Money,
    pub annual_debt_service: Money,
    /// Year-one net operating income
    pub noi: Money,
    pub cap_rate: Rate,
    pub cash_on_cash_return: Rate,
    /// NOI / annual debt service; absent for all-cash purchases
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dscr: Option<Decimal>,
    pub ltv: Rate,
    pub monthly_cash_flow: Money,
    pub projections: Vec<PeriodSnapshot>,
    pub summary: InvestmentSummary,
    pub rating: InvestmentRating,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Analyse a rental property: year-one yield metrics, a year-by-year
/// projection, exit proceeds and an investment rating.
pub fn analyze_rental(
    input: &RentalPropertyInput,
) -> CalcResult<ComputationOutput<RentalAnalysisOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    validate_input(input)?;
    tracing::debug!(
        price = %input.purchase_price,
        rent = %input.monthly_rent,
        years = input.holding_years,
        "analysing rental property"
    );

    let vacancy_rate = clamp_vacancy(input.vacancy_rate, &mut warnings);

    // --- Financing ---
    let (loan, down_payment) = if input.use_loan {
        let down_payment = input.purchase_price * input.down_payment_rate;
        let terms = LoanTerms::from_years(
            input.purchase_price - down_payment,
            input.loan_rate,
            input.loan_term_years,
        )?;
        (Some(terms), down_payment)
    } else {
        (None, input.purchase_price)
    };

    let loan_amount = loan.as_ref().map(|l| l.principal).unwrap_or_default();
    let monthly_mortgage_payment = match &loan {
        Some(terms) => monthly_payment(terms)?,
        None => Decimal::ZERO,
    };
    let total_cash_invested = down_payment + input.closing_costs;

    // --- Projection ---
    let projection_input = ProjectionInput {
        purchase_price: input.purchase_price,
        loan,
        base_annual_rent: input.monthly_rent * dec!(12),
        rent_growth: input.rent_growth,
        expenses: input.expenses.clone(),
        vacancy_rate,
        appreciation_rate: input.appreciation_rate,
        holding_years: input.holding_years,
    };
    let projections = project(&projection_input)?;

    let (year_one, final_year) = match (projections.first(), projections.last()) {
        (Some(first), Some(last)) => (first.clone(), last.clone()),
        _ => {
            return Err(CalcError::InsufficientData(
                "Projection produced no periods".into(),
            ))
        }
    };

    // --- Year-one metrics ---
    let noi = year_one.noi();
    let annual_debt_service = year_one.debt_service;
    let cap_rate = safe_divide(noi, input.purchase_price);
    let cash_on_cash_return = safe_divide(year_one.cash_flow, total_cash_invested);
    let dscr = if annual_debt_service.is_zero() {
        None
    } else {
        Some(noi / annual_debt_service)
    };
    let ltv = safe_divide(loan_amount, input.purchase_price);
    let monthly_cash_flow = year_one.cash_flow / dec!(12);

    // --- Exit ---
    let summary = summarize(
        input,
        &projections,
        &final_year,
        loan_amount,
        total_cash_invested,
    );

    // --- Rating ---
    let rules = input.rating_rules.clone().unwrap_or_else(default_rules);
    let rating = rate_investment(
        &RatingMetrics {
            monthly_cash_flow,
            cap_rate,
            dscr,
            average_annual_return: summary.average_annual_return,
        },
        &rules,
    );

    // --- Warnings ---
    if year_one.cash_flow < Decimal::ZERO {
        warnings.push(format!(
            "Year-one cash flow is negative ({:.2}/month)",
            monthly_cash_flow
        ));
    }
    if let Some(d) = dscr {
        if d < dec!(1.2) {
            warnings.push(format!(
                "DSCR of {d:.2} is below the 1.20x lender covenant minimum"
            ));
        }
    }
    if ltv > dec!(0.80) {
        warnings.push(format!(
            "LTV of {:.1}% exceeds 80%, leaving little equity cushion",
            ltv * dec!(100)
        ));
    }

    let output = RentalAnalysisOutput {
        loan_amount,
        down_payment,
        total_cash_invested,
        monthly_mortgage_payment,
        annual_debt_service,
        noi,
        cap_rate,
        cash_on_cash_return,
        dscr,
        ltv,
        monthly_cash_flow,
        projections,
        summary,
        rating,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Rental Property Investment Analysis",
        input,
        warnings,
        elapsed,
        output,
    ))
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate_input(input: &RentalPropertyInput) -> CalcResult<()> {
    if input.purchase_price <= Decimal::ZERO {
        return Err(CalcError::invalid(
            "purchase_price",
            "Purchase price must be positive",
        ));
    }
    validate_horizon("holding_years", input.holding_years)?;
    if input.monthly_rent < Decimal::ZERO {
        return Err(CalcError::invalid("monthly_rent", "Rent cannot be negative"));
    }
    if input.closing_costs < Decimal::ZERO {
        return Err(CalcError::invalid(
            "closing_costs",
            "Closing costs cannot be negative",
        ));
    }
    if let Some(line) = input.expenses.iter().find(|e| e.base_annual < Decimal::ZERO) {
        return Err(CalcError::invalid(
            "expenses",
            format!("Expense '{}' cannot be negative", line.name),
        ));
    }
    validate_amounts(&[
        ("purchase_price", input.purchase_price),
        ("monthly_rent", input.monthly_rent),
        ("closing_costs", input.closing_costs),
    ])?;
    validate_growth_rate("rent_growth", input.rent_growth)?;
    validate_growth_rate("appreciation_rate", input.appreciation_rate)?;
    for line in &input.expenses {
        validate_amounts(&[("expenses", line.base_annual)])?;
        validate_growth_rate("expenses", line.growth_rate)?;
    }
    if input.use_loan {
        if input.down_payment_rate < Decimal::ZERO || input.down_payment_rate > Decimal::ONE {
            return Err(CalcError::invalid(
                "down_payment_rate",
                "Down payment must be between 0% and 100% of price",
            ));
        }
        if input.loan_term_years < 1 || input.loan_term_years > MAX_TERM_MONTHS / 12 {
            return Err(CalcError::invalid(
                "loan_term_years",
                format!("Loan term must be between 1 and {} years", MAX_TERM_MONTHS / 12),
            ));
        }
        validate_loan_rate("loan_rate", input.loan_rate)?;
    }
    if input.selling_cost_rate < Decimal::ZERO || input.selling_cost_rate >= Decimal::ONE {
        return Err(CalcError::invalid(
            "selling_cost_rate",
            "Selling costs must be between 0% and 100% of sale price",
        ));
    }
    Ok(())
}

/// Vacancy is a fraction of rent; out-of-range values are clamped, not rejected.
pub(crate) fn clamp_vacancy(rate: Rate, warnings: &mut Vec<String>) -> Rate {
    let clamped = rate.max(Decimal::ZERO).min(Decimal::ONE);
    if clamped != rate {
        tracing::warn!(requested = %rate, used = %clamped, "vacancy rate clamped");
        warnings.push(format!(
            "Vacancy rate {rate} outside 0–100%; using {clamped}"
        ));
    }
    clamped
}

// ---------------------------------------------------------------------------
// Summary
// ---------------------------------------------------------------------------

fn summarize(
    input: &RentalPropertyInput,
    projections: &[PeriodSnapshot],
    final_year: &PeriodSnapshot,
    loan_amount: Money,
    cash_invested: Money,
) -> InvestmentSummary {
    let total_cash_flow = final_year.cumulative_cash_flow;
    let sale_price = final_year.property_value;
    let selling_costs = sale_price * input.selling_cost_rate;
    let remaining_loan_balance = final_year.loan_balance;
    let net_sale_proceeds = sale_price - remaining_loan_balance - selling_costs;
    let total_profit = total_cash_flow + net_sale_proceeds - cash_invested;
    let total_return = safe_divide(total_profit, cash_invested);
    let years = projections.len() as u32;

    InvestmentSummary {
        total_cash_flow,
        total_appreciation: sale_price - input.purchase_price,
        total_equity_buildup: loan_amount - remaining_loan_balance,
        sale_price,
        selling_costs,
        remaining_loan_balance,
        net_sale_proceeds,
        total_profit,
        total_return,
        annualized_return: annualized_rate(total_return, years),
        average_annual_return: safe_divide(total_return, Decimal::from(years)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::housing::rating::RatingLabel;

    fn sample_input() -> RentalPropertyInput {
        RentalPropertyInput {
            purchase_price: dec!(300000),
            use_loan: true,
            down_payment_rate: dec!(0.20),
            loan_rate: dec!(0.07),
            loan_term_years: 30,
            closing_costs: dec!(9000),
            monthly_rent: dec!(2500),
            rent_growth: dec!(0.03),
            vacancy_rate: dec!(0.05),
            expenses: vec![
                ExpenseLine::new("property_tax", dec!(3600), dec!(0.02)),
                ExpenseLine::new("insurance", dec!(1500), dec!(0.03)),
                ExpenseLine::new("maintenance", dec!(3000), dec!(0.03)),
            ],
            appreciation_rate: dec!(0.03),
            holding_years: 10,
            selling_cost_rate: dec!(0.06),
            rating_rules: None,
        }
    }

    #[test]
    fn test_mortgage_on_twenty_percent_down() {
        let out = analyze_rental(&sample_input()).unwrap().result;
        assert_eq!(out.down_payment, dec!(60000));
        assert_eq!(out.loan_amount, dec!(240000));
        assert!(
            (out.monthly_mortgage_payment - dec!(1596.73)).abs() < dec!(0.01),
            "got {}",
            out.monthly_mortgage_payment
        );
        assert_eq!(out.total_cash_invested, dec!(69000));
        assert_eq!(out.ltv, dec!(0.8));
    }

    #[test]
    fn test_year_one_noi_and_cap_rate() {
        let out = analyze_rental(&sample_input()).unwrap().result;
        // 30000 - 1500 vacancy - 8100 expenses
        assert!((out.noi - dec!(20400)).abs() < dec!(0.000001));
        assert!((out.cap_rate - dec!(0.068)).abs() < dec!(0.000001));
    }

    #[test]
    fn test_dscr_uses_annual_debt_service() {
        let out = analyze_rental(&sample_input()).unwrap().result;
        let dscr = out.dscr.unwrap();
        assert!((dscr - out.noi / out.annual_debt_service).abs() < dec!(0.000001));
        assert!(dscr > dec!(1.0) && dscr < dec!(1.1));
    }

    #[test]
    fn test_all_cash_has_no_dscr() {
        let mut input = sample_input();
        input.use_loan = false;
        let out = analyze_rental(&input).unwrap().result;
        assert!(out.dscr.is_none());
        assert_eq!(out.loan_amount, Decimal::ZERO);
        assert_eq!(out.total_cash_invested, dec!(309000));
        assert_eq!(out.summary.remaining_loan_balance, Decimal::ZERO);
        assert!(out.monthly_cash_flow > Decimal::ZERO);
    }

    #[test]
    fn test_summary_exit_arithmetic() {
        let out = analyze_rental(&sample_input()).unwrap().result;
        let s = &out.summary;
        let last = out.projections.last().unwrap();
        assert_eq!(s.sale_price, last.property_value);
        assert_eq!(s.selling_costs, s.sale_price * dec!(0.06));
        assert_eq!(
            s.net_sale_proceeds,
            s.sale_price - s.remaining_loan_balance - s.selling_costs
        );
        assert_eq!(s.total_cash_flow, last.cumulative_cash_flow);
        assert!(s.total_equity_buildup > Decimal::ZERO);
        assert!(s.total_appreciation > Decimal::ZERO);
    }

    #[test]
    fn test_annualized_below_average_for_positive_returns() {
        let out = analyze_rental(&sample_input()).unwrap().result;
        let s = &out.summary;
        assert!(s.total_return > Decimal::ZERO);
        assert!(s.annualized_return < s.average_annual_return);
    }

    #[test]
    fn test_projection_length_and_rating_present() {
        let out = analyze_rental(&sample_input()).unwrap().result;
        assert_eq!(out.projections.len(), 10);
        assert!(out.rating.score <= 100);
        assert!(!out.rating.messages.is_empty());
    }

    #[test]
    fn test_negative_cash_flow_warns_and_penalises() {
        let mut input = sample_input();
        input.monthly_rent = dec!(1500);
        let result = analyze_rental(&input).unwrap();
        assert!(result.warnings.iter().any(|w| w.contains("negative")));
        assert!(result.result.rating.score <= 70);
        assert_ne!(result.result.rating.label, RatingLabel::Excellent);
    }

    #[test]
    fn test_vacancy_clamped_with_warning() {
        let mut input = sample_input();
        input.vacancy_rate = dec!(1.5);
        let result = analyze_rental(&input).unwrap();
        assert!(result.warnings.iter().any(|w| w.contains("Vacancy")));
        let y1 = &result.result.projections[0];
        assert_eq!(y1.vacancy_loss, y1.gross_income);
    }

    #[test]
    fn test_zero_holding_years_rejected() {
        let mut input = sample_input();
        input.holding_years = 0;
        assert!(analyze_rental(&input).is_err());
    }

    #[test]
    fn test_zero_price_rejected() {
        let mut input = sample_input();
        input.purchase_price = Decimal::ZERO;
        assert!(analyze_rental(&input).is_err());
    }

    #[test]
    fn test_zero_rent_stays_finite() {
        let mut input = sample_input();
        input.monthly_rent = Decimal::ZERO;
        let out = analyze_rental(&input).unwrap().result;
        assert!(out.cap_rate < Decimal::ZERO);
        assert!(out.summary.total_return < Decimal::ZERO);
    }

    #[test]
    fn test_custom_rules_override() {
        let mut input = sample_input();
        input.rating_rules = Some(vec![]);
        let out = analyze_rental(&input).unwrap().result;
        assert_eq!(out.rating.score, 100);
    }

    #[test]
    fn test_leverage_warnings_are_plain_sentences() {
        let mut input = sample_input();
        input.down_payment_rate = dec!(0.10);
        let warnings = analyze_rental(&input).unwrap().warnings;
        let dscr = warnings.iter().find(|w| w.starts_with("DSCR")).unwrap();
        assert!(dscr.ends_with("lender covenant minimum"), "{dscr}");
        let ltv = warnings.iter().find(|w| w.starts_with("LTV")).unwrap();
        assert_eq!(ltv, "LTV of 90.0% exceeds 80%, leaving little equity cushion");
        assert!(warnings.iter().all(|w| !w.contains('\u{2014}')));
    }
}

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::CalcError;
use crate::projection::amortization::{monthly_payment, LoanTerms};
use crate::projection::growth::compound;
use crate::projection::projector::{project, ExpenseLine, ProjectionInput};
use crate::types::{
    checked_total, safe_divide, validate_amounts, validate_growth_rate, validate_horizon,
    validate_loan_rate, with_metadata, ComputationOutput, Money, Rate, Years, MAX_TERM_MONTHS,
};
use crate::CalcResult;

/// Break-even is only searched within this many years.
const BREAK_EVEN_SCAN_YEARS: Years = 10;

/// Rent share of income considered affordable.
const RECOMMENDED_RENT_SHARE: Rate = dec!(0.30);

/// Upper bounds (inclusive) for each affordability band.
const AFFORDABILITY_BANDS: [(Rate, AffordabilityStatus); 3] = [
    (dec!(0.25), AffordabilityStatus::Excellent),
    (dec!(0.30), AffordabilityStatus::Good),
    (dec!(0.40), AffordabilityStatus::Stretched),
];

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AffordabilityStatus {
    Excellent,
    Good,
    Stretched,
    Overextended,
    /// No income entered, so the ratio is undefined
    Unavailable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Recommendation {
    Buy,
    Rent,
}

fn default_years() -> Years {
    5
}

fn default_loan_term() -> u32 {
    30
}

/// Renting and owning costs for the same household.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RentVsBuyInput {
    pub monthly_income: Money,
    pub monthly_rent: Money,
    /// Annual rent increase
    #[serde(default)]
    pub rent_increase_rate: Rate,
    #[serde(default)]
    pub utilities: Money,
    #[serde(default)]
    pub renters_insurance: Money,
    #[serde(default)]
    pub parking: Money,
    #[serde(default)]
    pub pet_fee: Money,

    pub home_price: Money,
    #[serde(default)]
    pub down_payment_rate: Rate,
    #[serde(default)]
    pub mortgage_rate: Rate,
    #[serde(default = "default_loan_term")]
    pub loan_term_years: u32,
    /// Closing costs as a fraction of price
    #[serde(default)]
    pub closing_cost_rate: Rate,
    /// Annual property tax as a fraction of value
    #[serde(default)]
    pub property_tax_rate: Rate,
    /// Annual maintenance as a fraction of value
    #[serde(default)]
    pub maintenance_rate: Rate,
    /// Annual homeowners insurance
    #[serde(default)]
    pub home_insurance: Money,
    /// Monthly HOA dues
    #[serde(default)]
    pub hoa_monthly: Money,
    #[serde(default)]
    pub appreciation_rate: Rate,
    /// Growth of insurance and HOA
    #[serde(default)]
    pub cost_inflation: Rate,
    /// Comparison horizon
    #[serde(default = "default_years")]
    pub years: Years,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Affordability {
    pub rent_to_income_ratio: Rate,
    pub status: AffordabilityStatus,
    pub recommended_max_rent: Money,
    /// Monthly rent plus ancillary costs
    pub total_monthly_housing_cost: Money,
}

/// Cumulative position at the end of a year (chart data).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearComparison {
    pub year: Years,
    pub cumulative_rent_cost: Money,
    pub cumulative_ownership_cost: Money,
    pub home_equity: Money,
    /// Ownership cost less equity
    pub net_buy_cost: Money,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RentVsBuyOutput {
    pub affordability: Affordability,
    pub monthly_mortgage_payment: Money,
    pub upfront_cost: Money,
    pub total_rent_cost: Money,
    pub total_ownership_cost: Money,
    pub ending_equity: Money,
    pub net_buy_cost: Money,
    /// First year (1..=10) where buying is no dearer than renting; 0 if never
    pub break_even_year: Years,
    pub recommendation: Recommendation,
    /// Renting cost minus net buying cost over the horizon
    pub buy_advantage: Money,
    pub yearly: Vec<YearComparison>,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Classify a rent-to-income ratio. Band upper bounds are inclusive.
pub fn affordability_status(ratio: Rate) -> AffordabilityStatus {
    AFFORDABILITY_BANDS
        .iter()
        .find(|(upper, _)| ratio <= *upper)
        .map(|(_, status)| *status)
        .unwrap_or(AffordabilityStatus::Overextended)
}

/// Rent-to-income ratio and status. Zero income yields `Unavailable`.
pub fn assess_affordability(input: &RentVsBuyInput) -> Affordability {
    let ratio = safe_divide(input.monthly_rent, input.monthly_income);
    let status = if input.monthly_income <= Decimal::ZERO {
        AffordabilityStatus::Unavailable
    } else {
        affordability_status(ratio)
    };
    Affordability {
        rent_to_income_ratio: ratio,
        status,
        recommended_max_rent: input.monthly_income.max(Decimal::ZERO) * RECOMMENDED_RENT_SHARE,
        total_monthly_housing_cost: input.monthly_rent + ancillary_monthly(input),
    }
}

/// Compare N years of renting against N years of owning.
pub fn compare_rent_vs_buy(
    input: &RentVsBuyInput,
) -> CalcResult<ComputationOutput<RentVsBuyOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    validate_input(input)?;
    tracing::debug!(
        rent = %input.monthly_rent,
        price = %input.home_price,
        years = input.years,
        "comparing rent vs buy"
    );

    let affordability = assess_affordability(input);
    if affordability.status == AffordabilityStatus::Unavailable {
        warnings.push(
            "Monthly income is zero, so the rent-to-income ratio is unavailable".into(),
        );
    }

    // Cover the horizon and the break-even window in one projection.
    let horizon = input.years.max(BREAK_EVEN_SCAN_YEARS);

    let down_payment = input.home_price * input.down_payment_rate;
    let loan = LoanTerms::from_years(
        input.home_price - down_payment,
        input.mortgage_rate,
        input.loan_term_years,
    )?;
    let upfront_cost = down_payment + input.home_price * input.closing_cost_rate;

    let ownership = project(&ProjectionInput {
        purchase_price: input.home_price,
        loan: Some(loan),
        base_annual_rent: Decimal::ZERO,
        rent_growth: Decimal::ZERO,
        expenses: ownership_expenses(input),
        vacancy_rate: Decimal::ZERO,
        appreciation_rate: input.appreciation_rate,
        holding_years: horizon,
    })?;

    let ancillary_annual = ancillary_monthly(input) * dec!(12);
    let mut cumulative_rent = Decimal::ZERO;
    let mut cumulative_owning = upfront_cost;
    let mut yearly = Vec::with_capacity(horizon as usize);

    for snap in &ownership {
        let rent_this_year =
            compound(input.monthly_rent, input.rent_increase_rate, snap.year - 1)? * dec!(12);
        cumulative_rent = checked_total(
            cumulative_rent,
            rent_this_year + ancillary_annual,
            "cumulative_rent_cost",
        )?;
        cumulative_owning =
            checked_total(cumulative_owning, snap.total_expenses, "cumulative_ownership_cost")?;
        let home_equity = snap.owner_equity();
        yearly.push(YearComparison {
            year: snap.year,
            cumulative_rent_cost: cumulative_rent,
            cumulative_ownership_cost: cumulative_owning,
            home_equity,
            net_buy_cost: cumulative_owning - home_equity,
        });
    }

    let break_even_year = yearly
        .iter()
        .take(BREAK_EVEN_SCAN_YEARS as usize)
        .find(|y| y.net_buy_cost <= y.cumulative_rent_cost)
        .map(|y| y.year)
        .unwrap_or(0);

    yearly.truncate(input.years as usize);
    let at_horizon = yearly
        .last()
        .cloned()
        .ok_or_else(|| CalcError::InsufficientData("Comparison produced no years".into()))?;

    let net_buy_cost = at_horizon.net_buy_cost;
    let total_rent_cost = at_horizon.cumulative_rent_cost;
    let recommendation = if net_buy_cost < total_rent_cost {
        Recommendation::Buy
    } else {
        Recommendation::Rent
    };

    if break_even_year == 0 {
        warnings.push(format!(
            "Buying does not break even within {BREAK_EVEN_SCAN_YEARS} years"
        ));
    }

    let output = RentVsBuyOutput {
        affordability,
        monthly_mortgage_payment: monthly_payment(&loan)?,
        upfront_cost,
        total_rent_cost,
        total_ownership_cost: at_horizon.cumulative_ownership_cost,
        ending_equity: at_horizon.home_equity,
        net_buy_cost,
        break_even_year,
        recommendation,
        buy_advantage: total_rent_cost - net_buy_cost,
        yearly,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Rent vs Buy Comparison (nominal, undiscounted)",
        input,
        warnings,
        elapsed,
        output,
    ))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn validate_input(input: &RentVsBuyInput) -> CalcResult<()> {
    let money_fields = [
        ("monthly_income", input.monthly_income),
        ("monthly_rent", input.monthly_rent),
        ("utilities", input.utilities),
        ("renters_insurance", input.renters_insurance),
        ("parking", input.parking),
        ("pet_fee", input.pet_fee),
        ("home_price", input.home_price),
        ("home_insurance", input.home_insurance),
        ("hoa_monthly", input.hoa_monthly),
    ];
    if let Some((field, _)) = money_fields.iter().find(|(_, v)| *v < Decimal::ZERO) {
        return Err(CalcError::invalid(field, "Amount cannot be negative"));
    }
    if input.down_payment_rate < Decimal::ZERO || input.down_payment_rate > Decimal::ONE {
        return Err(CalcError::invalid(
            "down_payment_rate",
            "Down payment must be between 0% and 100% of price",
        ));
    }
    validate_amounts(&money_fields)?;
    // Fractions of the home price, charged once or yearly
    let price_rates = [
        ("closing_cost_rate", input.closing_cost_rate),
        ("property_tax_rate", input.property_tax_rate),
        ("maintenance_rate", input.maintenance_rate),
    ];
    if let Some((field, _)) = price_rates
        .iter()
        .find(|(_, v)| *v < Decimal::ZERO || *v > Decimal::ONE)
    {
        return Err(CalcError::invalid(
            field,
            "Must be between 0% and 100% of the home price",
        ));
    }
    validate_loan_rate("mortgage_rate", input.mortgage_rate)?;
    validate_growth_rate("rent_increase_rate", input.rent_increase_rate)?;
    validate_growth_rate("appreciation_rate", input.appreciation_rate)?;
    validate_growth_rate("cost_inflation", input.cost_inflation)?;
    validate_horizon("years", input.years)?;
    if input.loan_term_years < 1 || input.loan_term_years > MAX_TERM_MONTHS / 12 {
        return Err(CalcError::invalid(
            "loan_term_years",
            format!("Loan term must be between 1 and {} years", MAX_TERM_MONTHS / 12),
        ));
    }
    Ok(())
}

fn ancillary_monthly(input: &RentVsBuyInput) -> Money {
    input.utilities + input.renters_insurance + input.parking + input.pet_fee
}

/// Taxes and maintenance track the home's value; insurance and HOA track
/// general cost inflation.
fn ownership_expenses(input: &RentVsBuyInput) -> Vec<ExpenseLine> {
    vec![
        ExpenseLine::new(
            "property_tax",
            input.home_price * input.property_tax_rate,
            input.appreciation_rate,
        ),
        ExpenseLine::new(
            "maintenance",
            input.home_price * input.maintenance_rate,
            input.appreciation_rate,
        ),
        ExpenseLine::new("home_insurance", input.home_insurance, input.cost_inflation),
        ExpenseLine::new("hoa", input.hoa_monthly * dec!(12), input.cost_inflation),
    ]
}

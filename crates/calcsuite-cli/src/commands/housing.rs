use clap::Args;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::Value;

use calcsuite_core::forms::share::RentalForm;
use calcsuite_core::housing::rent_vs_buy::{self, RentVsBuyInput};
use calcsuite_core::housing::rental_property::{self, RentalPropertyInput};

use crate::input;

/// Arguments for rental property analysis
///
/// Flags not given keep the rental calculator's defaults.
#[derive(Args)]
pub struct RentalArgs {
    /// Purchase price
    #[arg(long)]
    pub price: Option<Decimal>,

    /// Monthly rent
    #[arg(long)]
    pub rent: Option<Decimal>,

    /// Down payment as a fraction of price (e.g. 0.20)
    #[arg(long)]
    pub down_payment: Option<Decimal>,

    /// Annual mortgage rate (e.g. 0.07)
    #[arg(long)]
    pub rate: Option<Decimal>,

    /// Mortgage term in years
    #[arg(long)]
    pub term: Option<u32>,

    /// Buy with cash, no mortgage
    #[arg(long)]
    pub cash: bool,

    /// Vacancy rate (e.g. 0.05)
    #[arg(long)]
    pub vacancy: Option<Decimal>,

    /// Annual rent growth
    #[arg(long)]
    pub rent_growth: Option<Decimal>,

    /// Annual appreciation
    #[arg(long)]
    pub appreciation: Option<Decimal>,

    /// Holding period in years
    #[arg(long)]
    pub years: Option<u32>,

    /// Closing costs paid at purchase
    #[arg(long)]
    pub closing_costs: Option<Decimal>,

    /// Selling costs as a fraction of sale price
    #[arg(long)]
    pub selling_cost: Option<Decimal>,

    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

/// Arguments for the rent vs buy comparison
#[derive(Args)]
pub struct RentVsBuyArgs {
    /// Gross monthly income
    #[arg(long)]
    pub income: Option<Decimal>,

    /// Current monthly rent
    #[arg(long)]
    pub rent: Option<Decimal>,

    /// Annual rent increase
    #[arg(long, default_value = "0.03")]
    pub rent_increase: Decimal,

    /// Monthly utilities, renters insurance, parking and pet fees combined
    #[arg(long, default_value = "0")]
    pub rent_extras: Decimal,

    /// Home price
    #[arg(long)]
    pub home_price: Option<Decimal>,

    /// Down payment as a fraction of price
    #[arg(long, default_value = "0.20")]
    pub down_payment: Decimal,

    /// Annual mortgage rate
    #[arg(long, default_value = "0.07")]
    pub rate: Decimal,

    /// Mortgage term in years
    #[arg(long, default_value = "30")]
    pub term: u32,

    /// Closing costs as a fraction of price
    #[arg(long, default_value = "0.03")]
    pub closing_cost: Decimal,

    /// Annual property tax as a fraction of value
    #[arg(long, default_value = "0.012")]
    pub property_tax: Decimal,

    /// Annual maintenance as a fraction of value
    #[arg(long, default_value = "0.01")]
    pub maintenance: Decimal,

    /// Annual homeowners insurance
    #[arg(long, default_value = "1200")]
    pub home_insurance: Decimal,

    /// Monthly HOA dues
    #[arg(long, default_value = "0")]
    pub hoa: Decimal,

    /// Annual home appreciation
    #[arg(long, default_value = "0.03")]
    pub appreciation: Decimal,

    /// Comparison horizon in years
    #[arg(long, default_value = "5")]
    pub years: u32,

    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_rental(args: RentalArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let rental_input: RentalPropertyInput = match input::load(args.input.as_deref())? {
        Some(parsed) => parsed,
        None => rental_from_flags(&args),
    };
    let result = rental_property::analyze_rental(&rental_input)?;
    Ok(serde_json::to_value(result)?)
}

fn rental_from_flags(args: &RentalArgs) -> RentalPropertyInput {
    let mut rental = RentalForm::default().to_input();
    rental.use_loan = !args.cash;

    let overrides = [
        (args.price, &mut rental.purchase_price),
        (args.rent, &mut rental.monthly_rent),
        (args.down_payment, &mut rental.down_payment_rate),
        (args.rate, &mut rental.loan_rate),
        (args.vacancy, &mut rental.vacancy_rate),
        (args.rent_growth, &mut rental.rent_growth),
        (args.appreciation, &mut rental.appreciation_rate),
        (args.closing_costs, &mut rental.closing_costs),
        (args.selling_cost, &mut rental.selling_cost_rate),
    ];
    for (flag, field) in overrides {
        if let Some(value) = flag {
            *field = value;
        }
    }
    if let Some(term) = args.term {
        rental.loan_term_years = term;
    }
    if let Some(years) = args.years {
        rental.holding_years = years;
    }
    rental
}

pub fn run_rent_vs_buy(args: RentVsBuyArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let comparison_input: RentVsBuyInput = match input::load(args.input.as_deref())? {
        Some(parsed) => parsed,
        None => RentVsBuyInput {
            monthly_income: args
                .income
                .ok_or("--income is required (or provide --input)")?,
            monthly_rent: args.rent.ok_or("--rent is required (or provide --input)")?,
            rent_increase_rate: args.rent_increase,
            utilities: args.rent_extras,
            renters_insurance: dec!(0),
            parking: dec!(0),
            pet_fee: dec!(0),
            home_price: args
                .home_price
                .ok_or("--home-price is required (or provide --input)")?,
            down_payment_rate: args.down_payment,
            mortgage_rate: args.rate,
            loan_term_years: args.term,
            closing_cost_rate: args.closing_cost,
            property_tax_rate: args.property_tax,
            maintenance_rate: args.maintenance,
            home_insurance: args.home_insurance,
            hoa_monthly: args.hoa,
            appreciation_rate: args.appreciation,
            cost_inflation: dec!(0.02),
            years: args.years,
        },
    };
    let result = rent_vs_buy::compare_rent_vs_buy(&comparison_input)?;
    Ok(serde_json::to_value(result)?)
}

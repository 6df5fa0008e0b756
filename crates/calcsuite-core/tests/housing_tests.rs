use calcsuite_core::housing::rating::{default_rules, RatingLabel, RatingMetric, RatingRule};
use calcsuite_core::housing::rent_vs_buy::{
    compare_rent_vs_buy, AffordabilityStatus, Recommendation, RentVsBuyInput,
};
use calcsuite_core::housing::rental_property::{analyze_rental, RentalPropertyInput};
use calcsuite_core::projection::projector::ExpenseLine;
use calcsuite_core::CalcError;
use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn assert_close(actual: Decimal, expected: Decimal, tolerance: Decimal) {
    assert!(
        (actual - expected).abs() <= tolerance,
        "expected {expected} ± {tolerance}, got {actual}"
    );
}

fn single_family_rental() -> RentalPropertyInput {
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
            ExpenseLine::new("insurance", dec!(1500), dec!(0.02)),
            ExpenseLine::new("maintenance", dec!(3000), dec!(0.02)),
        ],
        appreciation_rate: dec!(0.03),
        holding_years: 10,
        selling_cost_rate: dec!(0.06),
        rating_rules: None,
    }
}

fn starter_home() -> RentVsBuyInput {
    RentVsBuyInput {
        monthly_income: dec!(8000),
        monthly_rent: dec!(2000),
        rent_increase_rate: dec!(0.03),
        utilities: dec!(150),
        renters_insurance: dec!(20),
        parking: Decimal::ZERO,
        pet_fee: Decimal::ZERO,
        home_price: dec!(350000),
        down_payment_rate: dec!(0.20),
        mortgage_rate: dec!(0.065),
        loan_term_years: 30,
        closing_cost_rate: dec!(0.03),
        property_tax_rate: dec!(0.012),
        maintenance_rate: dec!(0.01),
        home_insurance: dec!(1200),
        hoa_monthly: Decimal::ZERO,
        appreciation_rate: dec!(0.03),
        cost_inflation: dec!(0.02),
        years: 7,
    }
}

// ===========================================================================
// Rental property
// ===========================================================================

#[test]
fn test_rental_financing() {
    let out = analyze_rental(&single_family_rental()).unwrap().result;

    assert_eq!(out.loan_amount, dec!(240000));
    assert_eq!(out.down_payment, dec!(60000));
    assert_eq!(out.total_cash_invested, dec!(69000));
    assert_close(out.monthly_mortgage_payment, dec!(1596.73), dec!(0.01));
    assert_eq!(out.ltv, dec!(0.8));
    assert_eq!(out.projections.len(), 10);
}

#[test]
fn test_rental_year_one_metrics() {
    let out = analyze_rental(&single_family_rental()).unwrap().result;

    // NOI = 30000 - 1500 vacancy - 8100 expenses
    assert_close(out.noi, dec!(20400), dec!(0.000001));
    assert_close(out.cap_rate, dec!(0.068), dec!(0.000001));
    let dscr = out.dscr.unwrap();
    assert_close(dscr, dec!(1.0647), dec!(0.0001));
    assert!(out.monthly_cash_flow > Decimal::ZERO);
}

#[test]
fn test_cash_purchase_has_no_dscr() {
    let mut input = single_family_rental();
    input.use_loan = false;
    let output = analyze_rental(&input).unwrap();
    let out = &output.result;

    assert_eq!(out.loan_amount, Decimal::ZERO);
    assert_eq!(out.down_payment, dec!(300000));
    assert_eq!(out.dscr, None);
    assert_eq!(out.monthly_mortgage_payment, Decimal::ZERO);
    assert_eq!(out.summary.remaining_loan_balance, Decimal::ZERO);
}

#[test]
fn test_exit_summary() {
    let out = analyze_rental(&single_family_rental()).unwrap().result;
    let last = out.projections.last().unwrap();

    assert_eq!(out.summary.sale_price, last.property_value);
    assert_eq!(out.summary.selling_costs, last.property_value * dec!(0.06));
    assert_eq!(
        out.summary.net_sale_proceeds,
        last.property_value - last.loan_balance - out.summary.selling_costs
    );
    assert_eq!(out.summary.total_cash_flow, last.cumulative_cash_flow);
    assert!(out.summary.total_return > Decimal::ZERO);
}

#[test]
fn test_vacancy_out_of_range_is_clamped() {
    let mut input = single_family_rental();
    input.vacancy_rate = dec!(1.5);
    let output = analyze_rental(&input).unwrap();

    assert!(output.warnings.iter().any(|w| w.contains("Vacancy")));
    assert_eq!(output.result.projections[0].vacancy_loss, dec!(30000));
}

#[test]
fn test_rental_rejects_zero_price() {
    let mut input = single_family_rental();
    input.purchase_price = Decimal::ZERO;
    match analyze_rental(&input) {
        Err(CalcError::InvalidInput { field, .. }) => assert_eq!(field, "purchase_price"),
        other => panic!("expected InvalidInput, got {other:?}"),
    }
}

#[test]
fn test_weak_deal_is_downgraded() {
    let mut input = single_family_rental();
    input.monthly_rent = dec!(1500);
    let out = analyze_rental(&input).unwrap().result;

    assert!(out.monthly_cash_flow < Decimal::ZERO);
    assert!(out.rating.score < 60);
    assert!(!out.rating.messages.is_empty());
    assert_eq!(out.rating.label, RatingLabel::from_score(out.rating.score));
}

#[test]
fn test_custom_rating_rules_replace_defaults() {
    let mut input = single_family_rental();
    input.rating_rules = Some(vec![RatingRule {
        metric: RatingMetric::CapRate,
        below: dec!(0.10),
        deduction: 50,
        message: "Cap rate under 10%".into(),
    }]);
    let out = analyze_rental(&input).unwrap().result;

    assert_eq!(out.rating.score, 50);
    assert_eq!(out.rating.messages, vec!["Cap rate under 10%".to_string()]);
    assert!(!default_rules().is_empty());
}

// ===========================================================================
// Rent vs buy
// ===========================================================================

#[test]
fn test_affordability_bands() {
    let out = compare_rent_vs_buy(&starter_home()).unwrap().result;

    assert_eq!(out.affordability.rent_to_income_ratio, dec!(0.25));
    assert_eq!(out.affordability.status, AffordabilityStatus::Excellent);
    assert_eq!(out.affordability.recommended_max_rent, dec!(2400));
    assert_eq!(out.affordability.total_monthly_housing_cost, dec!(2170));
}

#[test]
fn test_zero_income_is_unavailable() {
    let mut input = starter_home();
    input.monthly_income = Decimal::ZERO;
    let out = compare_rent_vs_buy(&input).unwrap().result;

    assert_eq!(out.affordability.rent_to_income_ratio, Decimal::ZERO);
    assert_eq!(out.affordability.status, AffordabilityStatus::Unavailable);
}

#[test]
fn test_comparison_shape() {
    let out = compare_rent_vs_buy(&starter_home()).unwrap().result;

    // Chart data stops at the horizon even though break-even scans ten years
    assert_eq!(out.yearly.len(), 7);
    assert_eq!(out.upfront_cost, dec!(70000) + dec!(10500));
    assert!(out.break_even_year <= 10);

    let at_horizon = &out.yearly[6];
    assert_eq!(out.total_rent_cost, at_horizon.cumulative_rent_cost);
    assert_eq!(out.net_buy_cost, at_horizon.net_buy_cost);
    assert_eq!(out.buy_advantage, out.total_rent_cost - out.net_buy_cost);

    let expected = if out.net_buy_cost < out.total_rent_cost {
        Recommendation::Buy
    } else {
        Recommendation::Rent
    };
    assert_eq!(out.recommendation, expected);
}

#[test]
fn test_cheap_rent_never_breaks_even() {
    let mut input = starter_home();
    input.monthly_rent = dec!(500);
    input.utilities = Decimal::ZERO;
    input.renters_insurance = Decimal::ZERO;
    let out = compare_rent_vs_buy(&input).unwrap().result;

    assert_eq!(out.break_even_year, 0);
    assert_eq!(out.recommendation, Recommendation::Rent);
}

#[test]
fn test_rental_rejects_percentage_as_loan_rate() {
    let mut input = single_family_rental();
    input.loan_rate = dec!(7);
    match analyze_rental(&input) {
        Err(CalcError::InvalidInput { field, .. }) => assert_eq!(field, "loan_rate"),
        other => panic!("expected InvalidInput, got {other:?}"),
    }
}

#[test]
fn test_rental_rejects_unbounded_horizons() {
    let mut input = single_family_rental();
    input.holding_years = 51;
    assert!(matches!(analyze_rental(&input), Err(CalcError::InvalidInput { .. })));

    let mut input = single_family_rental();
    input.loan_term_years = u32::MAX;
    match analyze_rental(&input) {
        Err(CalcError::InvalidInput { field, .. }) => assert_eq!(field, "loan_term_years"),
        other => panic!("expected InvalidInput, got {other:?}"),
    }
}

#[test]
fn test_rental_rejects_runaway_appreciation() {
    let mut input = single_family_rental();
    input.appreciation_rate = dec!(7);
    match analyze_rental(&input) {
        Err(CalcError::InvalidInput { field, .. }) => assert_eq!(field, "appreciation_rate"),
        other => panic!("expected InvalidInput, got {other:?}"),
    }
}

#[test]
fn test_rent_vs_buy_rejects_negative_rates() {
    let cases: [(&str, fn(&mut RentVsBuyInput)); 4] = [
        ("mortgage_rate", |i| i.mortgage_rate = dec!(-0.01)),
        ("closing_cost_rate", |i| i.closing_cost_rate = dec!(-0.03)),
        ("property_tax_rate", |i| i.property_tax_rate = dec!(-0.012)),
        ("maintenance_rate", |i| i.maintenance_rate = dec!(-0.01)),
    ];
    for (expected, mutate) in cases {
        let mut input = starter_home();
        mutate(&mut input);
        match compare_rent_vs_buy(&input) {
            Err(CalcError::InvalidInput { field, .. }) => assert_eq!(field, expected),
            other => panic!("expected InvalidInput for {expected}, got {other:?}"),
        }
    }
}

#[test]
fn test_rent_vs_buy_rejects_rate_and_horizon_beyond_caps() {
    let mut input = starter_home();
    input.mortgage_rate = dec!(6.5);
    match compare_rent_vs_buy(&input) {
        Err(CalcError::InvalidInput { field, .. }) => assert_eq!(field, "mortgage_rate"),
        other => panic!("expected InvalidInput, got {other:?}"),
    }

    let mut input = starter_home();
    input.years = 500;
    match compare_rent_vs_buy(&input) {
        Err(CalcError::InvalidInput { field, .. }) => assert_eq!(field, "years"),
        other => panic!("expected InvalidInput, got {other:?}"),
    }
}

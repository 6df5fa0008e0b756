use calcsuite_core::student_loans::repayment::{
    compare_repayment_plans, discretionary_income, PlanKind, StudentLoanInput,
};
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

fn undergrad(income: Decimal) -> StudentLoanInput {
    StudentLoanInput {
        loan_balance: dec!(30000),
        annual_rate: dec!(0.0499),
        annual_income: income,
        family_size: 1,
        poverty_line: dec!(15060),
        idr_percent: dec!(0.10),
        graduate_loans: false,
    }
}

#[test]
fn test_plans_in_fixed_order() {
    let out = compare_repayment_plans(&undergrad(dec!(40000))).unwrap().result;
    let kinds: Vec<PlanKind> = out.plans.iter().map(|p| p.plan).collect();
    assert_eq!(
        kinds,
        vec![
            PlanKind::Standard,
            PlanKind::Extended,
            PlanKind::Graduated,
            PlanKind::IncomeDriven,
            PlanKind::Pslf,
        ]
    );
}

#[test]
fn test_standard_and_extended_payments() {
    let out = compare_repayment_plans(&undergrad(dec!(40000))).unwrap().result;
    assert_close(out.plans[0].monthly_payment, dec!(318.05), dec!(0.01));
    assert_close(out.plans[1].monthly_payment, dec!(175.20), dec!(0.01));
    // Longer term, more interest
    assert!(out.plans[1].total_interest > out.plans[0].total_interest);
}

#[test]
fn test_low_income_favours_pslf() {
    let out = compare_repayment_plans(&undergrad(dec!(40000))).unwrap().result;

    assert_eq!(out.discretionary_income, dec!(17410));
    let idr = &out.plans[3];
    assert_close(idr.monthly_payment, dec!(145.0833), dec!(0.0001));
    assert!(idr.forgiveness_amount > Decimal::ZERO);

    let pslf = &out.plans[4];
    assert_close(pslf.total_payments, dec!(17410), dec!(0.01));
    assert_eq!(out.best_plan, PlanKind::Pslf);
    assert!(out.savings_vs_standard > Decimal::ZERO);
}

#[test]
fn test_high_income_repays_early_under_idr() {
    let out = compare_repayment_plans(&undergrad(dec!(150000))).unwrap().result;
    let idr = &out.plans[3];

    assert_eq!(idr.forgiveness_amount, Decimal::ZERO);
    assert!(idr.payoff_years < dec!(3));
    assert_eq!(out.best_plan, PlanKind::IncomeDriven);
}

#[test]
fn test_income_below_protection_pays_nothing() {
    let input = undergrad(dec!(20000));
    assert_eq!(discretionary_income(&input), Decimal::ZERO);

    let output = compare_repayment_plans(&input).unwrap();
    assert_eq!(output.result.plans[3].monthly_payment, Decimal::ZERO);
    assert!(!output.warnings.is_empty());
}

#[test]
fn test_negative_balance_rejected() {
    let mut input = undergrad(dec!(40000));
    input.loan_balance = dec!(-1);
    assert!(matches!(
        compare_repayment_plans(&input),
        Err(CalcError::InvalidInput { .. })
    ));
}

fn rejected_field(input: &StudentLoanInput) -> String {
    match compare_repayment_plans(input) {
        Err(CalcError::InvalidInput { field, .. }) => field,
        other => panic!("expected InvalidInput, got {other:?}"),
    }
}

#[test]
fn test_percentage_typed_as_rate_rejected() {
    // 4.99 means 499% a year, not 4.99%
    let mut input = undergrad(dec!(40000));
    input.annual_rate = dec!(4.99);
    assert_eq!(rejected_field(&input), "annual_rate");
}

#[test]
fn test_rate_at_ceiling_still_compares() {
    let mut input = undergrad(dec!(40000));
    input.annual_rate = dec!(0.40);
    let out = compare_repayment_plans(&input).unwrap().result;
    assert_eq!(out.plans.len(), 5);
}

#[test]
fn test_negative_idr_percent_rejected() {
    let mut input = undergrad(dec!(40000));
    input.idr_percent = dec!(-0.10);
    assert_eq!(rejected_field(&input), "idr_percent");
}

#[test]
fn test_negative_poverty_line_rejected() {
    let mut input = undergrad(dec!(40000));
    input.poverty_line = dec!(-15060);
    assert_eq!(rejected_field(&input), "poverty_line");
}

use std::str::FromStr;

use napi::Result as NapiResult;
use napi_derive::napi;
use rust_decimal::Decimal;
use serde::{de::DeserializeOwned, Serialize};

use calcsuite_core::forms::heart_rate::HeartRateForm;
use calcsuite_core::forms::share::{self, RentalForm, RentalShareParams};
use calcsuite_core::{chemistry, fitness, housing, numerology, personal_finance, projection};
use calcsuite_core::{student_loans, CalcResult};

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

/// Decode a JSON input, run a calculator, encode its output.
fn run_json<I, O>(input_json: &str, calculate: impl FnOnce(&I) -> CalcResult<O>) -> NapiResult<String>
where
    I: DeserializeOwned,
    O: Serialize,
{
    let input: I = serde_json::from_str(input_json).map_err(to_napi_error)?;
    let output = calculate(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Projection
// ---------------------------------------------------------------------------

#[napi]
pub fn amortize(input_json: String) -> NapiResult<String> {
    run_json(&input_json, projection::amortization::build_amortization)
}

#[napi]
pub fn project(input_json: String) -> NapiResult<String> {
    run_json(&input_json, projection::projector::project)
}

// ---------------------------------------------------------------------------
// Housing
// ---------------------------------------------------------------------------

#[napi]
pub fn analyze_rental(input_json: String) -> NapiResult<String> {
    run_json(&input_json, housing::rental_property::analyze_rental)
}

#[napi]
pub fn compare_rent_vs_buy(input_json: String) -> NapiResult<String> {
    run_json(&input_json, housing::rent_vs_buy::compare_rent_vs_buy)
}

// ---------------------------------------------------------------------------
// Student loans
// ---------------------------------------------------------------------------

#[napi]
pub fn compare_student_loans(input_json: String) -> NapiResult<String> {
    run_json(&input_json, student_loans::repayment::compare_repayment_plans)
}

// ---------------------------------------------------------------------------
// Fitness, chemistry, numerology
// ---------------------------------------------------------------------------

/// Distance in metres as a decimal string.
#[napi]
pub fn vo2max_cooper(distance_m: String) -> NapiResult<String> {
    let distance = Decimal::from_str(distance_m.trim()).map_err(to_napi_error)?;
    let vo2max = fitness::cardio::vo2max_cooper(distance).map_err(to_napi_error)?;
    Ok(vo2max.to_string())
}

#[napi]
pub fn heart_rate_zones(input_json: String) -> NapiResult<String> {
    run_json(&input_json, fitness::cardio::heart_rate_zones)
}

#[napi]
pub fn calculate_molarity(input_json: String) -> NapiResult<String> {
    run_json(&input_json, chemistry::solutions::calculate_molarity)
}

#[napi]
pub fn solve_dilution(input_json: String) -> NapiResult<String> {
    run_json(&input_json, chemistry::solutions::solve_dilution)
}

#[napi]
pub fn calculate_numerology(input_json: String) -> NapiResult<String> {
    run_json(&input_json, numerology::life_path::calculate_numerology)
}

// ---------------------------------------------------------------------------
// Personal finance
// ---------------------------------------------------------------------------

#[napi]
pub fn project_savings(input_json: String) -> NapiResult<String> {
    run_json(&input_json, personal_finance::time_value::project_savings)
}

#[napi]
pub fn calculate_dti(input_json: String) -> NapiResult<String> {
    run_json(&input_json, personal_finance::debt_to_income::calculate_dti)
}

// ---------------------------------------------------------------------------
// Forms and share links
// ---------------------------------------------------------------------------

/// Analyse the rental calculator exactly as typed; blank fields count as zero.
#[napi]
pub fn analyze_rental_form(form_json: String) -> NapiResult<String> {
    run_json(&form_json, |form: &RentalForm| {
        housing::rental_property::analyze_rental(&form.to_input())
    })
}

#[napi]
pub fn heart_rate_form(form_json: String) -> NapiResult<String> {
    run_json(&form_json, |form: &HeartRateForm| {
        fitness::cardio::heart_rate_zones(&form.to_input())
    })
}

/// Form values a share link restores, as JSON.
#[napi]
pub fn rental_form_from_query(query: String) -> NapiResult<String> {
    let params = RentalShareParams::from_query(&query).map_err(to_napi_error)?;
    serde_json::to_string(&params.to_form()).map_err(to_napi_error)
}

#[napi]
pub fn rental_share_url(base_url: String, form_json: String) -> NapiResult<String> {
    let form: RentalForm = serde_json::from_str(&form_json).map_err(to_napi_error)?;
    share::share_url(&base_url, &RentalShareParams::from_form(&form)).map_err(to_napi_error)
}

#[napi]
pub fn rental_share_text(form_json: String) -> NapiResult<String> {
    let form: RentalForm = serde_json::from_str(&form_json).map_err(to_napi_error)?;
    let input = form.to_input();
    let output = housing::rental_property::analyze_rental(&input).map_err(to_napi_error)?;
    Ok(share::share_text(&output.result, input.holding_years))
}

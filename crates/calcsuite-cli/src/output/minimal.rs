use serde_json::Value;

use super::{cell, result_of};

/// Headline answer of each calculator, checked in order.
const HEADLINE_FIELDS: [&str; 13] = [
    "monthly_payment",
    "best_plan",
    "recommendation",
    "monthly_cash_flow",
    "url",
    "vo2max",
    "target_heart_rate",
    "max_heart_rate",
    "molarity",
    "value",
    "life_path_number",
    "future_value",
    "dti_ratio",
];

/// Print just the headline value.
///
/// Falls back to the first field when no headline field is present, and to
/// the last row's cash flow for a bare projection.
pub fn print_minimal(value: &Value) {
    let result = result_of(value);

    match result {
        Value::Object(map) => {
            let headline = HEADLINE_FIELDS
                .iter()
                .find_map(|key| map.get(*key).filter(|v| !v.is_null()));
            match headline {
                Some(val) => println!("{}", cell(val)),
                None => {
                    if let Some((key, val)) = map.iter().next() {
                        println!("{key}: {}", cell(val));
                    }
                }
            }
        }
        Value::Array(rows) => match rows.last().and_then(|r| r.get("cumulative_cash_flow")) {
            Some(total) => println!("{}", cell(total)),
            None => println!("{} rows", rows.len()),
        },
        other => println!("{}", cell(other)),
    }
}

pub mod debt_to_income;
pub mod time_value;

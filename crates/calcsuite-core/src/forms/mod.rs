pub mod heart_rate;
pub mod parse;
pub mod share;

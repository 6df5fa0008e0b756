//! Turning raw form strings into engine inputs.
//!
//! Form fields and share-link query values go through the same functions so
//! a reloaded link reproduces exactly what was typed.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use std::str::FromStr;

use crate::types::Rate;

/// Parse a money or number field. Empty or unparseable input becomes zero.
///
/// Currency symbols, thousands separators, percent signs and surrounding
/// whitespace are ignored: "$1,250.50" parses as 1250.50.
pub fn parse_amount(raw: &str) -> Decimal {
    parse_optional(raw).unwrap_or(Decimal::ZERO)
}

/// Parse a field that has a domain default when left blank or invalid.
pub fn parse_or(raw: &str, default: Decimal) -> Decimal {
    parse_optional(raw).unwrap_or(default)
}

/// Parse a percentage ("7.5" or "7.5%") into a decimal rate (0.075).
pub fn parse_percent(raw: &str) -> Rate {
    parse_amount(raw) / Decimal::ONE_HUNDRED
}

/// Parse a whole count (years, bpm). Fractions truncate; negatives and
/// garbage become zero.
pub fn parse_count(raw: &str) -> u32 {
    parse_amount(raw).trunc().to_u32().unwrap_or(0)
}

/// Parse a count that may legitimately be blank.
pub fn parse_optional_count(raw: &str) -> Option<u32> {
    parse_optional(raw).and_then(|d| d.trunc().to_u32())
}

/// Render a decimal rate back into the percentage a user would type.
pub fn format_percent(rate: Rate) -> String {
    (rate * Decimal::ONE_HUNDRED).normalize().to_string()
}

fn parse_optional(raw: &str) -> Option<Decimal> {
    let cleaned: String = raw
        .chars()
        .filter(|c| !matches!(c, '$' | ',' | '%' | '_') && !c.is_whitespace())
        .collect();
    if cleaned.is_empty() {
        return None;
    }
    Decimal::from_str(&cleaned).ok()
}

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::CalcError;
use crate::types::{with_metadata, ComputationOutput};
use crate::CalcResult;

/// Numbers that are never reduced further.
const MASTER_NUMBERS: [u32; 3] = [11, 22, 33];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NumerologyInput {
    /// ISO date, e.g. "1990-07-15"
    pub birth_date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NumerologyOutput {
    pub life_path_number: u32,
    pub is_master_number: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expression_number: Option<u32>,
}

fn digit_sum(mut n: u32) -> u32 {
    let mut sum = 0;
    while n > 0 {
        sum += n % 10;
        n /= 10;
    }
    sum
}

/// Repeatedly sum digits until a single digit or a master number remains.
pub fn reduce(mut n: u32) -> u32 {
    while n > 9 && !MASTER_NUMBERS.contains(&n) {
        n = digit_sum(n);
    }
    n
}

/// Month, day and year are reduced separately before being combined.
pub fn life_path_number(date: NaiveDate) -> CalcResult<u32> {
    let year = u32::try_from(date.year())
        .map_err(|_| CalcError::DateError(format!("Year {} is before the common era", date.year())))?;
    Ok(reduce(reduce(date.month()) + reduce(date.day()) + reduce(year)))
}

/// Pythagorean value of a letter: A=1 … I=9, J=1 …
fn letter_value(c: char) -> Option<u32> {
    let c = c.to_ascii_uppercase();
    c.is_ascii_uppercase()
        .then(|| (c as u32 - 'A' as u32) % 9 + 1)
}

/// Expression (destiny) number from the letters of a full name.
pub fn expression_number(name: &str) -> CalcResult<u32> {
    let values: Vec<u32> = name.chars().filter_map(letter_value).collect();
    if values.is_empty() {
        return Err(CalcError::invalid("full_name", "Name must contain letters A-Z"));
    }
    Ok(reduce(values.iter().sum()))
}

pub fn calculate_numerology(
    input: &NumerologyInput,
) -> CalcResult<ComputationOutput<NumerologyOutput>> {
    let start = Instant::now();
    let life_path = life_path_number(input.birth_date)?;
    let expression = input
        .full_name
        .as_deref()
        .map(expression_number)
        .transpose()?;

    let output = NumerologyOutput {
        life_path_number: life_path,
        is_master_number: MASTER_NUMBERS.contains(&life_path),
        expression_number: expression,
    };
    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Pythagorean Numerology",
        input,
        Vec::new(),
        elapsed,
        output,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_reduce_keeps_master_numbers() {
        assert_eq!(reduce(29), 11);
        assert_eq!(reduce(22), 22);
        assert_eq!(reduce(38), 11);
        assert_eq!(reduce(1990), 1);
    }

    #[test]
    fn test_life_path_number() {
        // 7 + 15->6 + 1990->19->10->1 = 14 -> 5
        assert_eq!(life_path_number(date(1990, 7, 15)).unwrap(), 5);
    }

    #[test]
    fn test_life_path_master_number() {
        // 11 + 29->11 + 1978->25->7 = 29 -> 11
        assert_eq!(life_path_number(date(1978, 11, 29)).unwrap(), 11);
    }

    #[test]
    fn test_expression_number() {
        // J1 O6 H8 N5 = 20 -> 2
        assert_eq!(expression_number("John").unwrap(), 2);
        assert!(expression_number("123 !").is_err());
    }

    #[test]
    fn test_calculate_numerology() {
        let input = NumerologyInput {
            birth_date: date(1978, 11, 29),
            full_name: Some("John".into()),
        };
        let out = calculate_numerology(&input).unwrap().result;
        assert!(out.is_master_number);
        assert_eq!(out.expression_number, Some(2));
    }
}

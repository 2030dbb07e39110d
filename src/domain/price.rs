//! Fixed-point prices stored as integer cents.

use std::str::FromStr;

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use thiserror::Error;

/// Price assigned to products created without an explicit price (99.99).
pub const DEFAULT_PRICE_CENTS: i64 = 9_999;

/// Largest price that fits the catalog's seven digit precision (99999.99).
pub const MAX_PRICE_CENTS: i64 = 9_999_999;

/// Digits allowed before the decimal separator.
const MAX_WHOLE_DIGITS: usize = 5;

/// Errors returned when parsing a decimal price.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PriceError {
    #[error("price cannot be empty")]
    Empty,
    #[error("invalid price `{0}`")]
    Invalid(String),
    #[error("price `{0}` has more than two decimal places")]
    TooPrecise(String),
    #[error("price `{0}` is out of range")]
    OutOfRange(String),
}

/// Parse a decimal string such as `12.5` or `99,99` into cents.
///
/// Only unsigned plain decimals are accepted: no sign, exponent or digit
/// separators, and at most two fraction digits.
pub fn parse_price_cents(input: &str) -> Result<i64, PriceError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(PriceError::Empty);
    }

    let normalized = trimmed.replace(',', ".");
    if normalized.starts_with('.') || !normalized.chars().all(|ch| ch.is_ascii_digit() || ch == '.')
    {
        return Err(PriceError::Invalid(trimmed.to_string()));
    }

    let whole = normalized.split('.').next().unwrap_or_default();
    if whole.trim_start_matches('0').len() > MAX_WHOLE_DIGITS {
        return Err(PriceError::OutOfRange(trimmed.to_string()));
    }

    let value = Decimal::from_str(&normalized)
        .map_err(|_| PriceError::Invalid(trimmed.to_string()))?;

    if value.scale() > 2 {
        return Err(PriceError::TooPrecise(trimmed.to_string()));
    }

    (value * Decimal::ONE_HUNDRED)
        .to_i64()
        .filter(|cents| (0..=MAX_PRICE_CENTS).contains(cents))
        .ok_or_else(|| PriceError::OutOfRange(trimmed.to_string()))
}

/// Render cents as a decimal string with exactly two fraction digits.
pub fn format_price_cents(cents: i64) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let abs = cents.unsigned_abs();
    format!("{sign}{}.{:02}", abs / 100, abs % 100)
}

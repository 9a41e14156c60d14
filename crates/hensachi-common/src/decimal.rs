//! Decimal parsing and column validation.
//!
//! Every stored observation is a `NUMERIC(20, 6)`-style decimal: at most six
//! fractional digits and at most fourteen integer digits. Values are kept as
//! [`Decimal`] end to end so that what a client submits is what it reads back.

use rust_decimal::Decimal;
use std::str::FromStr;
use thiserror::Error;

/// Maximum number of significant digits a stored value may carry.
pub const MAX_DIGITS: u32 = 20;

/// Maximum number of fractional digits a stored value may carry.
pub const DECIMAL_PLACES: u32 = 6;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DecimalError {
    #[error("not a number: {0}")]
    NotANumber(String),

    #[error("ensure that there are no more than {DECIMAL_PLACES} decimal places: {0}")]
    TooManyDecimalPlaces(String),

    #[error("ensure that there are no more than {MAX_DIGITS} digits in total: {0}")]
    TooManyDigits(String),
}

/// Parse a decimal string without applying column limits.
pub fn parse_decimal(raw: &str) -> Result<Decimal, DecimalError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(DecimalError::NotANumber(raw.to_string()));
    }
    Decimal::from_str(trimmed)
        .or_else(|_| Decimal::from_scientific(trimmed))
        .map_err(|_| DecimalError::NotANumber(raw.to_string()))
}

/// Parse a decimal from a JSON value (number or string) and check it fits
/// the storage column.
///
/// JSON numbers are read through their textual form so `12.5` stays `12.5`
/// rather than passing through binary floating point.
pub fn parse_json_decimal(value: &serde_json::Value) -> Result<Decimal, DecimalError> {
    let parsed = match value {
        serde_json::Value::String(s) => parse_decimal(s)?,
        serde_json::Value::Number(n) => parse_decimal(&n.to_string())?,
        other => return Err(DecimalError::NotANumber(other.to_string())),
    };
    check_column(parsed)
}

/// Reject values that would not fit a `(MAX_DIGITS, DECIMAL_PLACES)` column.
pub fn check_column(value: Decimal) -> Result<Decimal, DecimalError> {
    if value.scale() > DECIMAL_PLACES {
        // Trailing zeros beyond the column scale carry no information.
        let normalized = value.normalize();
        if normalized.scale() > DECIMAL_PLACES {
            return Err(DecimalError::TooManyDecimalPlaces(value.to_string()));
        }
        return check_column(normalized);
    }

    let integer_digits = digit_count(value.trunc().abs());
    if integer_digits > MAX_DIGITS - DECIMAL_PLACES {
        return Err(DecimalError::TooManyDigits(value.to_string()));
    }
    Ok(value)
}

fn digit_count(integer: Decimal) -> u32 {
    let mut n = integer.mantissa().unsigned_abs() / 10u128.pow(integer.scale());
    if n == 0 {
        return 0;
    }
    let mut digits = 0;
    while n > 0 {
        n /= 10;
        digits += 1;
    }
    digits
}

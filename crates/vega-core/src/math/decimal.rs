//! Exact conversion between decimal strings and fixed-point integers.

use ethnum::I256;

use crate::errors::{CoreError, CoreResult};
use crate::math::safe_math::{safe_add, safe_mul, safe_pow10};

/// Parse `"-12.345"` into a fixed-point integer with `decimals` digits
///
/// Rejects more fractional digits than `decimals` rather than rounding.
pub fn parse_decimal(text: &str, decimals: u32) -> CoreResult<I256> {
    let invalid = || CoreError::InvalidDecimal(text.to_string());
    let trimmed = text.trim();

    let (negative, digits) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, trimmed.strip_prefix('+').unwrap_or(trimmed)),
    };

    let (whole, fraction) = match digits.split_once('.') {
        Some((whole, fraction)) => (whole, fraction),
        None => (digits, ""),
    };

    if whole.is_empty() && fraction.is_empty() {
        return Err(invalid());
    }
    if fraction.len() > decimals as usize {
        return Err(invalid());
    }

    let ten = I256::new(10);
    let mut value = I256::ZERO;
    for c in whole.chars().chain(fraction.chars()) {
        let digit = c.to_digit(10).ok_or_else(invalid)?;
        value = safe_add(safe_mul(value, ten)?, I256::from(digit))?;
    }

    let padding = decimals - fraction.len() as u32;
    value = safe_mul(value, safe_pow10(padding)?)?;

    Ok(if negative { -value } else { value })
}

/// Format a fixed-point integer with `decimals` digits, trimming trailing zeros
pub fn format_decimal(value: I256, decimals: u32) -> String {
    let magnitude = value.unsigned_abs();
    let scale = ethnum::U256::from(10u8).pow(decimals);
    let whole = magnitude / scale;
    let fraction = magnitude % scale;

    let sign = if value.is_negative() { "-" } else { "" };
    if fraction == ethnum::U256::ZERO {
        return format!("{}{}", sign, whole);
    }

    let digits = fraction.to_string();
    let padded = format!("{}{}", "0".repeat(decimals as usize - digits.len()), digits);
    format!("{}{}.{}", sign, whole, padded.trim_end_matches('0'))
}

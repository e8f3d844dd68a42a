//! Amount normalization.
//!
//! Turns a lookup payload into one comparable decimal amount:
//!
//! - If the payload has token transfers, the FIRST one wins: its integer
//!   `value` is divided by `10^decimals`. The native value is ignored.
//! - Otherwise the native `value` is the amount, as-is.
//!
//! All arithmetic is done on `rust_decimal::Decimal` (28 significant digits).
//! Token values are scaled by moving the decimal point in the text before
//! parsing, so raw amounts wider than the 96-bit mantissa (common for
//! 18-decimal tokens) still scale exactly.

use std::str::FromStr;

use rust_decimal::Decimal;

use crate::api::types::{AmountParseError, RawTransferRecord};

/// Digits beyond this many fractional places cannot affect a `Decimal`.
const MAX_FRACTION_DIGITS: usize = 30;

/// Produce the comparable amount for a payload.
pub fn normalize(record: &RawTransferRecord) -> Result<Decimal, AmountParseError> {
    match record.token_transfers().first() {
        Some(transfer) => normalize_token(&transfer.value, &transfer.decimals),
        None => parse_decimal(&record.value).ok_or_else(|| AmountParseError::new("value", &record.value)),
    }
}

/// `value / 10^decimals` for a token transfer.
pub fn normalize_token(value: &str, decimals: &str) -> Result<Decimal, AmountParseError> {
    let decimals: u32 = decimals
        .parse()
        .map_err(|_| AmountParseError::new("token decimals", decimals))?;

    if let Some(shifted) = shift_point_left(value, decimals) {
        if let Ok(amount) = Decimal::from_str(&shifted) {
            return Ok(amount);
        }
    }

    // Scientific notation and other forms `Decimal` reads directly.
    let amount = parse_decimal(value).ok_or_else(|| AmountParseError::new("token value", value))?;
    Ok(scale_down(amount, decimals))
}

/// Parse decimal text, accepting plain (`"0.25"`) and scientific (`"2.5e-1"`)
/// notation.
pub fn parse_decimal(text: &str) -> Option<Decimal> {
    if text.is_empty() {
        return None;
    }
    Decimal::from_str(text)
        .or_else(|_| Decimal::from_scientific(text))
        .ok()
}

/// Divide by ten `decimals` times. Stops early once the value rounds to zero.
fn scale_down(mut amount: Decimal, decimals: u32) -> Decimal {
    for _ in 0..decimals {
        if amount.is_zero() {
            break;
        }
        amount /= Decimal::TEN;
    }
    amount
}

/// Rewrite plain decimal text with its point moved `places` to the left.
///
/// `("123000", 3)` becomes `"123.000"`, `("5", 2)` becomes `"0.05"`.
/// Returns `None` when the text is not `[sign]digits[.digits]`.
fn shift_point_left(text: &str, places: u32) -> Option<String> {
    let (negative, unsigned) = match text.as_bytes().first()? {
        b'-' => (true, &text[1..]),
        b'+' => (false, &text[1..]),
        _ => (false, text),
    };

    let (int_part, frac_part) = match unsigned.split_once('.') {
        Some((int_part, frac_part)) => (int_part, frac_part),
        None => (unsigned, ""),
    };
    if int_part.is_empty() && frac_part.is_empty() {
        return None;
    }
    if !int_part.bytes().chain(frac_part.bytes()).all(|b| b.is_ascii_digit()) {
        return None;
    }

    let int_part = int_part.trim_start_matches('0');
    let places = places as usize;

    let (new_int, leading_zeros, moved) = if places <= int_part.len() {
        let split = int_part.len() - places;
        (&int_part[..split], 0, &int_part[split..])
    } else {
        ("", places - int_part.len(), int_part)
    };

    if leading_zeros > MAX_FRACTION_DIGITS {
        return Some("0".to_string());
    }

    let mut fraction = String::with_capacity(leading_zeros + moved.len() + frac_part.len());
    fraction.extend(std::iter::repeat('0').take(leading_zeros));
    fraction.push_str(moved);
    fraction.push_str(frac_part);
    fraction.truncate(MAX_FRACTION_DIGITS);

    let mut shifted = String::with_capacity(new_int.len() + fraction.len() + 3);
    if negative {
        shifted.push('-');
    }
    shifted.push_str(if new_int.is_empty() { "0" } else { new_int });
    if !fraction.is_empty() {
        shifted.push('.');
        shifted.push_str(&fraction);
    }
    Some(shifted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::TokenTransfer;

    fn dec(text: &str) -> Decimal {
        Decimal::from_str(text).unwrap()
    }

    fn transfer(value: &str, decimals: &str) -> TokenTransfer {
        TokenTransfer {
            value: value.to_string(),
            decimals: decimals.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_decimal_scaling() {
        assert_eq!(normalize_token("123000", "3").unwrap(), dec("123"));
        assert_eq!(normalize_token("5", "0").unwrap(), dec("5"));
        assert_eq!(normalize_token("5", "2").unwrap(), dec("0.05"));
        assert_eq!(normalize_token("1500000000000000000", "18").unwrap(), dec("1.5"));
    }

    #[test]
    fn test_wide_token_values_scale_exactly() {
        // 123456789012.345678901234567891 tokens at 18 decimals: wider than 28 digits raw.
        let amount = normalize_token("123456789012345678901234567891", "18").unwrap();
        let expected = dec("123456789012.3456789012345678");
        assert!((amount - expected).abs() < Decimal::new(1, 15));
    }

    #[test]
    fn test_token_value_with_fraction_and_exponent() {
        assert_eq!(normalize_token("1.5", "1").unwrap(), dec("0.15"));
        assert_eq!(normalize_token("1e3", "3").unwrap(), dec("1"));
    }

    #[test]
    fn test_tiny_amounts_round_to_zero() {
        assert_eq!(normalize_token("1", "40").unwrap(), Decimal::ZERO);
        assert_eq!(normalize_token("7", "4000000000").unwrap(), Decimal::ZERO);
    }

    #[test]
    fn test_token_transfer_takes_precedence() {
        let record = RawTransferRecord {
            value: "999".to_string(),
            token_transfers: Some(vec![transfer("250000", "4"), transfer("1", "0")]),
            ..Default::default()
        };
        assert_eq!(normalize(&record).unwrap(), dec("25"));
    }

    #[test]
    fn test_native_value_without_transfers() {
        let record = RawTransferRecord {
            value: "0.00012345".to_string(),
            token_transfers: Some(Vec::new()),
            ..Default::default()
        };
        assert_eq!(normalize(&record).unwrap(), dec("0.00012345"));

        let record = RawTransferRecord {
            value: "42".to_string(),
            token_transfers: None,
            ..Default::default()
        };
        assert_eq!(normalize(&record).unwrap(), dec("42"));
    }

    #[test]
    fn test_malformed_amounts() {
        let err = normalize_token("abc", "18").unwrap_err();
        assert_eq!(err, AmountParseError::new("token value", "abc"));

        let err = normalize_token("100", "-1").unwrap_err();
        assert_eq!(err.field, "token decimals");

        let err = normalize_token("100", "six").unwrap_err();
        assert_eq!(err.raw, "six");

        let record = RawTransferRecord::default();
        assert_eq!(normalize(&record).unwrap_err().field, "value");
    }

    #[test]
    fn test_integer_part_beyond_decimal_range_is_rejected() {
        // 30 integer digits do not fit the 96-bit mantissa; no approximation is made.
        let err = normalize_token("123456789012345678901234567890", "0").unwrap_err();
        assert_eq!(err, AmountParseError::new("token value", "123456789012345678901234567890"));

        let record = RawTransferRecord {
            value: "123456789012345678901234567890".to_string(),
            ..Default::default()
        };
        assert_eq!(normalize(&record).unwrap_err().field, "value");

        // The same digits scaled below the limit still convert.
        assert!(normalize_token("123456789012345678901234567890", "4").is_ok());
    }

    #[test]
    fn test_shift_point_left() {
        assert_eq!(shift_point_left("123000", 3).as_deref(), Some("123.000"));
        assert_eq!(shift_point_left("-5", 2).as_deref(), Some("-0.05"));
        assert_eq!(shift_point_left("0042", 0).as_deref(), Some("42"));
        assert_eq!(shift_point_left(".5", 1).as_deref(), Some("0.05"));
        assert_eq!(shift_point_left("1e5", 1), None);
        assert_eq!(shift_point_left("-", 1), None);
        assert_eq!(shift_point_left("", 1), None);
    }
}

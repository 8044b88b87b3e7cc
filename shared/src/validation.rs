//! Input normalization for irrigation observations
//!
//! Malformed input is never rejected. Each numeric field is parsed and
//! clamped here, once, before the advisory formula runs.

use crate::irrigation::FieldValue;

/// Moisture assumed when none (or garbage) is supplied
pub const DEFAULT_MOISTURE_PERCENT: f64 = 50.0;

/// Area assumed when none (or a non-positive one) is supplied
pub const DEFAULT_AREA_HECTARES: f64 = 1.0;

pub const MIN_MOISTURE_PERCENT: f64 = 0.0;
pub const MAX_MOISTURE_PERCENT: f64 = 100.0;

// ============================================================================
// Numeric parsing
// ============================================================================

/// Read a raw field as a number, the way a browser's `Number(value)` does.
///
/// Strings are trimmed first. An empty string reads as 0. `0x`/`0o`/`0b`
/// integer literals are accepted without a sign, and the only spelled-out
/// infinity is `Infinity` (optionally signed). Anything else that is not a
/// plain decimal literal, including `inf` and `NaN`, yields `None`.
pub fn parse_number(value: &FieldValue) -> Option<f64> {
    let n = match value {
        FieldValue::Number(n) => *n,
        FieldValue::Text(s) => parse_numeric_text(s)?,
        FieldValue::Other(_) => return None,
    };

    if n.is_nan() {
        None
    } else {
        Some(n)
    }
}

fn parse_numeric_text(s: &str) -> Option<f64> {
    let trimmed = s.trim();
    match trimmed {
        "" => return Some(0.0),
        "Infinity" | "+Infinity" => return Some(f64::INFINITY),
        "-Infinity" => return Some(f64::NEG_INFINITY),
        _ => {}
    }

    let radix = match trimmed.get(..2) {
        Some("0x" | "0X") => Some(16),
        Some("0o" | "0O") => Some(8),
        Some("0b" | "0B") => Some(2),
        _ => None,
    };
    if let Some(radix) = radix {
        return parse_radix_integer(&trimmed[2..], radix);
    }

    // f64::from_str also takes "inf", "nan", "infinity" in any case
    let is_decimal_literal = trimmed
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '.' | 'e' | 'E' | '+' | '-'));
    if !is_decimal_literal {
        return None;
    }
    trimmed.parse::<f64>().ok()
}

fn parse_radix_integer(digits: &str, radix: u32) -> Option<f64> {
    if digits.is_empty() {
        return None;
    }
    digits.chars().try_fold(0.0_f64, |acc, c| {
        c.to_digit(radix).map(|d| acc * f64::from(radix) + f64::from(d))
    })
}

// ============================================================================
// Field normalization
// ============================================================================

/// Soil moisture clamped to [0, 100]; unreadable input becomes 50
pub fn normalize_moisture(value: Option<&FieldValue>) -> f64 {
    value
        .and_then(parse_number)
        .map(|n| n.clamp(MIN_MOISTURE_PERCENT, MAX_MOISTURE_PERCENT))
        .unwrap_or(DEFAULT_MOISTURE_PERCENT)
}

/// Field area in hectares; unreadable, infinite, or non-positive input becomes 1
pub fn normalize_area(value: Option<&FieldValue>) -> f64 {
    match value.and_then(parse_number) {
        Some(n) if n.is_finite() && n > 0.0 => n,
        _ => DEFAULT_AREA_HECTARES,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> FieldValue {
        FieldValue::Text(s.to_string())
    }

    #[test]
    fn test_parse_number_accepts_numeric_strings() {
        assert_eq!(parse_number(&text("42")), Some(42.0));
        assert_eq!(parse_number(&text("  12.5 ")), Some(12.5));
        assert_eq!(parse_number(&text("-3")), Some(-3.0));
        assert_eq!(parse_number(&FieldValue::Number(7.0)), Some(7.0));
    }

    #[test]
    fn test_parse_number_rejects_garbage() {
        assert_eq!(parse_number(&text("abc")), None);
        assert_eq!(parse_number(&text("NaN")), None);
        assert_eq!(parse_number(&text("12abc")), None);
        assert_eq!(parse_number(&text("1_000")), None);
        assert_eq!(parse_number(&text(".")), None);
        assert_eq!(parse_number(&text("0x")), None);
        assert_eq!(parse_number(&text("-0x1A")), None);
        assert_eq!(parse_number(&FieldValue::Other(serde_json::Value::Bool(true))), None);
    }

    #[test]
    fn test_parse_number_rejects_rust_only_infinity_spellings() {
        for spelling in ["inf", "-inf", "+inf", "INF", "infinity", "INFINITY", "-infinity", "nan"] {
            assert_eq!(parse_number(&text(spelling)), None, "{spelling}");
        }
    }

    #[test]
    fn test_parse_number_follows_browser_literals() {
        assert_eq!(parse_number(&text("")), Some(0.0));
        assert_eq!(parse_number(&text("   ")), Some(0.0));
        assert_eq!(parse_number(&text("0x1A")), Some(26.0));
        assert_eq!(parse_number(&text("0X1a")), Some(26.0));
        assert_eq!(parse_number(&text("0o17")), Some(15.0));
        assert_eq!(parse_number(&text("0b101")), Some(5.0));
        assert_eq!(parse_number(&text("1e2")), Some(100.0));
        assert_eq!(parse_number(&text(".5")), Some(0.5));
        assert_eq!(parse_number(&text("+7")), Some(7.0));
        assert_eq!(parse_number(&text(" Infinity ")), Some(f64::INFINITY));
        assert_eq!(parse_number(&text("-Infinity")), Some(f64::NEG_INFINITY));
    }

    #[test]
    fn test_moisture_defaults_to_midpoint() {
        assert_eq!(normalize_moisture(None), 50.0);
        assert_eq!(normalize_moisture(Some(&text("abc"))), 50.0);
        assert_eq!(normalize_moisture(Some(&text("inf"))), 50.0);
        assert_eq!(normalize_moisture(Some(&text("INFINITY"))), 50.0);
        assert_eq!(normalize_moisture(Some(&text("-inf"))), 50.0);
    }

    #[test]
    fn test_empty_moisture_reads_as_zero() {
        assert_eq!(normalize_moisture(Some(&text(""))), 0.0);
        assert_eq!(normalize_moisture(Some(&text("  "))), 0.0);
    }

    #[test]
    fn test_moisture_is_clamped() {
        assert_eq!(normalize_moisture(Some(&FieldValue::Number(-20.0))), 0.0);
        assert_eq!(normalize_moisture(Some(&FieldValue::Number(140.0))), 100.0);
        assert_eq!(normalize_moisture(Some(&text("Infinity"))), 100.0);
        assert_eq!(normalize_moisture(Some(&text("-Infinity"))), 0.0);
        assert_eq!(normalize_moisture(Some(&text("0x1A"))), 26.0);
        assert_eq!(normalize_moisture(Some(&text("65"))), 65.0);
    }

    #[test]
    fn test_area_defaults() {
        assert_eq!(normalize_area(None), 1.0);
        assert_eq!(normalize_area(Some(&text("abc"))), 1.0);
        assert_eq!(normalize_area(Some(&text(""))), 1.0);
        assert_eq!(normalize_area(Some(&text("inf"))), 1.0);
        assert_eq!(normalize_area(Some(&FieldValue::Number(0.0))), 1.0);
        assert_eq!(normalize_area(Some(&FieldValue::Number(-5.0))), 1.0);
        assert_eq!(normalize_area(Some(&FieldValue::Number(f64::INFINITY))), 1.0);
    }

    #[test]
    fn test_area_passes_positive_values_through() {
        assert_eq!(normalize_area(Some(&text("2.5"))), 2.5);
        assert_eq!(normalize_area(Some(&FieldValue::Number(0.1))), 0.1);
        assert_eq!(normalize_area(Some(&text("0x2"))), 2.0);
    }
}

// Utility helpers for parsing and basic statistics.
//
// This module centralizes all the "dirty" property/number handling so the
// rest of the code can assume clean, typed values.
use num_format::{Locale, ToFormattedString};
use serde_json::Value;

/// Parse a string-like value into `f64` while being forgiving about
/// formatting issues that are common in spreadsheet exports (commas, spaces).
///
/// - Accepts `Option<&str>` so callers can pass through optional fields.
/// - Trims whitespace.
/// - Rejects values that contain alphabetic characters.
/// - Strips thousands separators like `","` before parsing.
/// - Returns `None` for anything that cannot be safely parsed.
pub fn parse_f64_safe(s: Option<&str>) -> Option<f64> {
    let s = s?.trim();
    if s.is_empty() {
        return None;
    }
    if s.chars().any(|c| c.is_ascii_alphabetic()) {
        return None;
    }
    let s = s.replace(',', "");
    s.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Read a JSON property as a number. Numbers pass through, strings go
/// through [`parse_f64_safe`], everything else is `None`.
pub fn value_as_f64(v: Option<&Value>) -> Option<f64> {
    match v? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => parse_f64_safe(Some(s)),
        _ => None,
    }
}

/// Population figure for summation: missing or unparseable counts as 0.
pub fn population_or_zero(v: Option<&Value>) -> f64 {
    value_as_f64(v).unwrap_or(0.0)
}

/// Loose truthiness for flag properties: `1`, `"1"`, `true` (and `"true"`).
pub fn value_is_flag_set(v: Option<&Value>) -> bool {
    match v {
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64() == Some(1.0),
        Some(Value::String(s)) => matches!(s.trim(), "1" | "true" | "TRUE" | "True"),
        _ => false,
    }
}

pub fn average(v: &[f64]) -> f64 {
    // Standard arithmetic mean; returns 0 for an empty slice to avoid NaNs.
    if v.is_empty() {
        return 0.0;
    }
    let sum: f64 = v.iter().copied().sum();
    sum / v.len() as f64
}

pub fn format_number(n: f64, decimals: usize) -> String {
    // Format a floating-point value with:
    // - a fixed number of decimal places, and
    // - locale-aware thousands separators (e.g., `1,234,567.89`).
    let neg = n.is_sign_negative() && n != 0.0;
    let abs_n = n.abs();
    let s = format!("{:.*}", decimals, abs_n);
    let mut parts = s.split('.');
    let int_part = parts.next().unwrap_or("0");
    let frac_part = parts.next();
    let int_val: i64 = int_part.parse().unwrap_or(0);
    let mut res = int_val.to_formatted_string(&Locale::en);
    if let Some(frac) = frac_part {
        if decimals > 0 {
            res.push('.');
            res.push_str(frac);
        }
    }
    if neg && res.chars().any(|c| c.is_ascii_digit() && c != '0') {
        format!("-{}", res)
    } else {
        res
    }
}

/// Delta with an explicit sign for change columns: `+1,200`, `-300`, `0`.
pub fn format_signed(n: f64, decimals: usize) -> String {
    let body = format_number(n, decimals);
    if n > 0.0 && body.chars().any(|c| c.is_ascii_digit() && c != '0') {
        format!("+{}", body)
    } else {
        body
    }
}

pub fn format_int<T>(n: T) -> String
where
    T: ToFormattedString,
{
    // Thin wrapper around `num-format` for counts in console messages
    // (e.g., `1,204 features loaded`).
    n.to_formatted_string(&Locale::en)
}

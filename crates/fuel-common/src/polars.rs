//! Cell-level conversions over Polars `AnyValue`.

use polars::prelude::AnyValue;

use crate::dates::date_from_days;

/// Renders a cell as text. Null is empty, floats drop trailing zeros and
/// dates print as `YYYY-MM-DD`.
///
/// ```
/// use polars::prelude::AnyValue;
/// use fuel_common::any_to_string;
///
/// assert_eq!(any_to_string(AnyValue::Null), "");
/// assert_eq!(any_to_string(AnyValue::Int32(42)), "42");
/// assert_eq!(any_to_string(AnyValue::String("SP")), "SP");
/// ```
pub fn any_to_string(value: AnyValue<'_>) -> String {
    if let Some(int) = integer(&value) {
        return int.to_string();
    }
    match value {
        AnyValue::Null => String::new(),
        AnyValue::Float32(v) => format_numeric(f64::from(v)),
        AnyValue::Float64(v) => format_numeric(v),
        AnyValue::String(s) => s.to_string(),
        AnyValue::StringOwned(s) => s.to_string(),
        AnyValue::Boolean(b) => b.to_string(),
        AnyValue::Date(days) => date_from_days(days)
            .map(|date| date.format("%Y-%m-%d").to_string())
            .unwrap_or_default(),
        other => other.to_string(),
    }
}

/// Shortest decimal rendering of `v`: `10.0` prints as `10`, `1.50` as `1.5`.
///
/// ```
/// use fuel_common::format_numeric;
///
/// assert_eq!(format_numeric(10.0), "10");
/// assert_eq!(format_numeric(1.50), "1.5");
/// ```
pub fn format_numeric(v: f64) -> String {
    let rendered = format!("{v}");
    if !rendered.contains('.') {
        return rendered;
    }
    match rendered.trim_end_matches('0').trim_end_matches('.') {
        "" | "-" => "0".to_string(),
        trimmed => trimmed.to_string(),
    }
}

/// True for nulls and float NaN.
pub fn is_missing(value: &AnyValue<'_>) -> bool {
    match value {
        AnyValue::Null => true,
        AnyValue::Float32(v) => v.is_nan(),
        AnyValue::Float64(v) => v.is_nan(),
        _ => false,
    }
}

/// Numeric value of a cell. Strings are parsed; NaN counts as missing.
pub fn any_to_f64(value: AnyValue<'_>) -> Option<f64> {
    if let Some(int) = integer(&value) {
        return Some(int as f64);
    }
    let parsed = match value {
        AnyValue::Float32(v) => Some(f64::from(v)),
        AnyValue::Float64(v) => Some(v),
        AnyValue::String(s) => parse_f64(s),
        AnyValue::StringOwned(s) => parse_f64(&s),
        _ => None,
    };
    parsed.filter(|v| !v.is_nan())
}

/// Integer value of an integer cell or an integer string. Floats are not
/// truncated.
pub fn any_to_i64(value: AnyValue<'_>) -> Option<i64> {
    if let Some(int) = integer(&value) {
        return Some(int);
    }
    match value {
        AnyValue::String(s) => s.trim().parse().ok(),
        AnyValue::StringOwned(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Trimmed parse; empty and malformed strings are `None`.
pub fn parse_f64(value: &str) -> Option<f64> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok()
}

fn integer(value: &AnyValue<'_>) -> Option<i64> {
    match *value {
        AnyValue::Int8(v) => Some(i64::from(v)),
        AnyValue::Int16(v) => Some(i64::from(v)),
        AnyValue::Int32(v) => Some(i64::from(v)),
        AnyValue::Int64(v) => Some(v),
        AnyValue::UInt8(v) => Some(i64::from(v)),
        AnyValue::UInt16(v) => Some(i64::from(v)),
        AnyValue::UInt32(v) => Some(i64::from(v)),
        AnyValue::UInt64(v) => i64::try_from(v).ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_any_to_string_null() {
        assert_eq!(any_to_string(AnyValue::Null), "");
    }

    #[test]
    fn test_any_to_string_floats() {
        assert_eq!(any_to_string(AnyValue::Float64(4.5)), "4.5");
        assert_eq!(any_to_string(AnyValue::Float64(4.0)), "4");
    }

    #[test]
    fn test_any_to_string_date() {
        assert_eq!(any_to_string(AnyValue::Date(0)), "1970-01-01");
        assert_eq!(any_to_string(AnyValue::Date(19052)), "2022-03-01");
    }

    #[test]
    fn test_format_numeric_keeps_integer_zeros() {
        assert_eq!(format_numeric(10.0), "10");
        assert_eq!(format_numeric(2020.0), "2020");
        assert_eq!(format_numeric(0.0), "0");
        assert_eq!(format_numeric(-0.5), "-0.5");
    }

    #[test]
    fn test_is_missing() {
        assert!(is_missing(&AnyValue::Null));
        assert!(is_missing(&AnyValue::Float64(f64::NAN)));
        assert!(!is_missing(&AnyValue::Float64(0.0)));
        assert!(!is_missing(&AnyValue::String("")));
    }

    #[test]
    fn test_any_to_f64() {
        assert_eq!(any_to_f64(AnyValue::Null), None);
        assert_eq!(any_to_f64(AnyValue::Int32(42)), Some(42.0));
        assert_eq!(any_to_f64(AnyValue::String(" 4.25 ")), Some(4.25));
        assert_eq!(any_to_f64(AnyValue::String("abc")), None);
        assert_eq!(any_to_f64(AnyValue::Float64(f64::NAN)), None);
    }

    #[test]
    fn test_any_to_i64() {
        assert_eq!(any_to_i64(AnyValue::Int32(3)), Some(3));
        assert_eq!(any_to_i64(AnyValue::String("2022")), Some(2022));
        assert_eq!(any_to_i64(AnyValue::Float64(3.9)), None);
    }
}

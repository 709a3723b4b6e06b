//! Raw value classification.
//!
//! The profiler and scoring engine both work from the observed type of a
//! value rather than its JSON representation: numeric strings count as
//! numbers and ISO-dated strings count as dates.

use chrono::NaiveDate;
use serde_json::Value;

use recmap_model::ValueType;

/// Classifies a single raw value.
///
/// String classification rules:
/// - starts with `YYYY-MM-DD` and that prefix is a real calendar date -> date
/// - non-empty and numeric-parseable -> number
/// - anything else -> string
pub fn detect_value_type(value: &Value) -> ValueType {
    match value {
        Value::Null => ValueType::Null,
        Value::Bool(_) => ValueType::Boolean,
        Value::Number(_) => ValueType::Number,
        Value::Array(_) => ValueType::Array,
        Value::Object(_) => ValueType::Object,
        Value::String(s) => detect_string_type(s),
    }
}

fn detect_string_type(raw: &str) -> ValueType {
    let trimmed = raw.trim();
    if has_iso_date_prefix(trimmed) {
        return ValueType::Date;
    }
    if !trimmed.is_empty() && parse_number(trimmed).is_some() {
        return ValueType::Number;
    }
    ValueType::String
}

/// True when the string starts with `\d{4}-\d{2}-\d{2}` and that prefix is
/// a valid calendar date.
pub fn has_iso_date_prefix(value: &str) -> bool {
    let bytes = value.as_bytes();
    if bytes.len() < 10 {
        return false;
    }
    let shape_ok = bytes[..4].iter().all(u8::is_ascii_digit)
        && bytes[4] == b'-'
        && bytes[5].is_ascii_digit()
        && bytes[6].is_ascii_digit()
        && bytes[7] == b'-'
        && bytes[8].is_ascii_digit()
        && bytes[9].is_ascii_digit();
    shape_ok && NaiveDate::parse_from_str(&value[..10], "%Y-%m-%d").is_ok()
}

/// Strict numeric parse: finite f64, no leading words (`inf`, `nan`).
pub fn parse_number(value: &str) -> Option<f64> {
    let trimmed = value.trim();
    let first = trimmed.bytes().next()?;
    if !(first.is_ascii_digit() || first == b'-' || first == b'+' || first == b'.') {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Emptiness rule shared by the transform engine and profiler: null or the
/// empty string. Zero, `false`, empty arrays, and empty objects are values.
pub fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn detects_json_native_types() {
        assert_eq!(detect_value_type(&json!(null)), ValueType::Null);
        assert_eq!(detect_value_type(&json!(true)), ValueType::Boolean);
        assert_eq!(detect_value_type(&json!(3.5)), ValueType::Number);
        assert_eq!(detect_value_type(&json!([1])), ValueType::Array);
        assert_eq!(detect_value_type(&json!({"a": 1})), ValueType::Object);
    }

    #[test]
    fn detects_string_shapes() {
        assert_eq!(detect_value_type(&json!("hello")), ValueType::String);
        assert_eq!(detect_value_type(&json!("12.5")), ValueType::Number);
        assert_eq!(detect_value_type(&json!("-3")), ValueType::Number);
        assert_eq!(detect_value_type(&json!("2024-01-15")), ValueType::Date);
        assert_eq!(
            detect_value_type(&json!("2024-01-15T10:30:00Z")),
            ValueType::Date
        );
        // Well-shaped but not a real date
        assert_eq!(detect_value_type(&json!("2024-13-40")), ValueType::String);
        // Rust would happily parse these as floats; we must not
        assert_eq!(detect_value_type(&json!("inf")), ValueType::String);
        assert_eq!(detect_value_type(&json!("nan")), ValueType::String);
    }

    #[test]
    fn emptiness_covers_null_and_blank_string_only() {
        assert!(is_empty_value(&json!(null)));
        assert!(is_empty_value(&json!("")));
        assert!(!is_empty_value(&json!(" ")));
        assert!(!is_empty_value(&json!(0)));
        assert!(!is_empty_value(&json!(false)));
        assert!(!is_empty_value(&json!([])));
    }
}

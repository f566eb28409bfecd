use std::sync::OnceLock;

use regex::Regex;
use serde_json::Value;

/// Outcome of reading raw numeric input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumericInput {
    Integer(i64),
    /// The field was cleared.
    Empty,
    /// Not a number; callers leave the answer untouched.
    Rejected,
}

fn integer_prefix() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^\s*([+-]?\d+)").expect("integer prefix pattern is valid"))
}

/// Parses the leading integer of `raw`, ignoring leading whitespace and any
/// trailing characters: `"12abc"` reads as 12, `"abc"` does not parse.
pub fn parse_integer(raw: &str) -> Option<i64> {
    let captures = integer_prefix().captures(raw)?;
    captures.get(1)?.as_str().parse().ok()
}

pub fn classify_numeric(raw: &str) -> NumericInput {
    if raw.is_empty() {
        return NumericInput::Empty;
    }
    match parse_integer(raw) {
        Some(value) => NumericInput::Integer(value),
        None => NumericInput::Rejected,
    }
}

/// Default for a numeric question, when the configured value reads as an integer.
pub fn numeric_default(value: &Value) -> Option<i64> {
    match value {
        Value::Number(number) => parse_integer(&number.to_string()),
        Value::String(text) => parse_integer(text),
        _ => None,
    }
}

/// Default for a text question. Empty strings and zero are not defaults.
pub fn text_default(value: &Value) -> Option<String> {
    match value {
        Value::String(text) if !text.is_empty() => Some(text.clone()),
        Value::Number(number) if number.as_f64() != Some(0.0) => Some(number.to_string()),
        Value::Bool(true) => Some("true".to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn integer_prefix_is_read() {
        assert_eq!(parse_integer("12"), Some(12));
        assert_eq!(parse_integer("12abc"), Some(12));
        assert_eq!(parse_integer("  -3"), Some(-3));
        assert_eq!(parse_integer("+4"), Some(4));
        assert_eq!(parse_integer("3.9"), Some(3));
        assert_eq!(parse_integer("abc"), None);
        assert_eq!(parse_integer("-"), None);
    }

    #[test]
    fn classify_separates_empty_from_rejected() {
        assert_eq!(classify_numeric("12"), NumericInput::Integer(12));
        assert_eq!(classify_numeric(""), NumericInput::Empty);
        assert_eq!(classify_numeric("abc"), NumericInput::Rejected);
        assert_eq!(classify_numeric(" "), NumericInput::Rejected);
    }

    #[test]
    fn defaults_follow_value_shape() {
        assert_eq!(numeric_default(&json!(0)), Some(0));
        assert_eq!(numeric_default(&json!("42")), Some(42));
        assert_eq!(numeric_default(&json!("n/a")), None);
        assert_eq!(numeric_default(&json!(true)), None);
        assert_eq!(text_default(&json!("hello")), Some("hello".to_string()));
        assert_eq!(text_default(&json!("")), None);
        assert_eq!(text_default(&json!(0)), None);
    }
}

use serde_json::Value;

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum CoercionSource {
    Number,
    Text,
    // `null` or an absent key.
    Missing,
    Invalid,
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Coerced {
    pub value: f64,
    pub source: CoercionSource,
}

impl Coerced {
    pub fn used_fallback(&self) -> bool {
        matches!(
            self.source,
            CoercionSource::Missing | CoercionSource::Invalid
        )
    }
}

pub fn to_number(value: &Value, fallback: f64) -> f64 {
    coerce_value(value, fallback).value
}

pub fn coerce_value(value: &Value, fallback: f64) -> Coerced {
    match value {
        Value::Number(n) => match n.as_f64() {
            Some(v) if v.is_finite() => Coerced {
                value: v,
                source: CoercionSource::Number,
            },
            _ => invalid(fallback),
        },
        Value::String(s) => coerce_text(s, fallback),
        Value::Null => Coerced {
            value: finite_or(fallback, 0.0),
            source: CoercionSource::Missing,
        },
        Value::Bool(_) | Value::Array(_) | Value::Object(_) => invalid(fallback),
    }
}

// Parses the longest leading decimal literal, ignoring leading whitespace
// and any trailing garbage: `"12 mins"` is 12.
pub fn coerce_text(text: &str, fallback: f64) -> Coerced {
    let trimmed = text.trim_start();
    let Some(literal) = numeric_prefix(trimmed) else {
        return invalid(fallback);
    };
    match literal.parse::<f64>() {
        Ok(v) if v.is_finite() => Coerced {
            value: v,
            source: CoercionSource::Text,
        },
        _ => invalid(fallback),
    }
}

pub fn finite_or(value: f64, fallback: f64) -> f64 {
    if value.is_finite() {
        value
    } else if fallback.is_finite() {
        fallback
    } else {
        0.0
    }
}

fn invalid(fallback: f64) -> Coerced {
    Coerced {
        value: finite_or(fallback, 0.0),
        source: CoercionSource::Invalid,
    }
}

fn numeric_prefix(text: &str) -> Option<&str> {
    let bytes = text.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end += 1;
    }

    let int_start = end;
    while bytes.get(end).is_some_and(u8::is_ascii_digit) {
        end += 1;
    }
    let mut digits = end - int_start;

    if bytes.get(end) == Some(&b'.') {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while bytes.get(frac_end).is_some_and(u8::is_ascii_digit) {
            frac_end += 1;
        }
        if digits > 0 || frac_end > frac_start {
            digits += frac_end - frac_start;
            end = frac_end;
        }
    }

    if digits == 0 {
        return None;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+' | b'-')) {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while bytes.get(exp_end).is_some_and(u8::is_ascii_digit) {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }

    Some(&text[..end])
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::{any, prop_assert, prop_assert_eq, proptest};
    use serde_json::json;

    #[test]
    fn finite_numbers_pass_through_unchanged() {
        let coerced = coerce_value(&json!(42.5), 0.0);
        assert_eq!(coerced.value, 42.5);
        assert_eq!(coerced.source, CoercionSource::Number);
        assert!(!coerced.used_fallback());
    }

    #[test]
    fn numeric_strings_parse() {
        assert_eq!(to_number(&json!("35"), 0.0), 35.0);
        assert_eq!(to_number(&json!("  -2.5"), 0.0), -2.5);
        assert_eq!(to_number(&json!(".5"), 0.0), 0.5);
        assert_eq!(to_number(&json!("7."), 0.0), 7.0);
        assert_eq!(to_number(&json!("1e3"), 0.0), 1000.0);
        assert_eq!(to_number(&json!("+4"), 0.0), 4.0);
        assert_eq!(coerce_text("12", 0.0).source, CoercionSource::Text);
    }

    #[test]
    fn string_parsing_keeps_leading_numeric_prefix() {
        assert_eq!(to_number(&json!("12 mins"), 0.0), 12.0);
        assert_eq!(to_number(&json!("3.75abc"), 0.0), 3.75);
        assert_eq!(to_number(&json!("2e"), 0.0), 2.0);
        assert_eq!(to_number(&json!("2e+"), 0.0), 2.0);
        assert_eq!(to_number(&json!("1.2.3"), 0.0), 1.2);
    }

    #[test]
    fn unparseable_text_uses_fallback() {
        for text in ["", "   ", "abc", "-", ".", "e5", "$250", "NaN", "Infinity", "-inf"] {
            let coerced = coerce_text(text, 0.0);
            assert_eq!(coerced.value, 0.0, "text {text:?}");
            assert_eq!(coerced.source, CoercionSource::Invalid, "text {text:?}");
        }
    }

    #[test]
    fn overflowing_text_uses_fallback() {
        let coerced = coerce_text("1e400", 9.0);
        assert_eq!(coerced.value, 9.0);
        assert_eq!(coerced.source, CoercionSource::Invalid);
    }

    #[test]
    fn overflowing_json_number_uses_fallback() {
        let value: Value = serde_json::from_str("1e400").expect("kept as a JSON number");
        let coerced = coerce_value(&value, 0.0);
        assert_eq!(coerced.value, 0.0);
        assert_eq!(coerced.source, CoercionSource::Invalid);
    }

    #[test]
    fn non_numeric_json_types_use_fallback() {
        assert_eq!(coerce_value(&json!(true), 0.0).source, CoercionSource::Invalid);
        assert_eq!(coerce_value(&json!([1]), 0.0).source, CoercionSource::Invalid);
        assert_eq!(coerce_value(&json!({"v": 1}), 0.0).source, CoercionSource::Invalid);
        assert_eq!(to_number(&json!(false), 3.0), 3.0);
    }

    #[test]
    fn null_is_missing_not_invalid() {
        let coerced = coerce_value(&Value::Null, 0.0);
        assert_eq!(coerced.value, 0.0);
        assert_eq!(coerced.source, CoercionSource::Missing);
        assert!(coerced.used_fallback());
    }

    #[test]
    fn non_finite_fallback_collapses_to_zero() {
        assert_eq!(finite_or(f64::NAN, f64::INFINITY), 0.0);
        assert_eq!(coerce_text("x", f64::NAN).value, 0.0);
        assert_eq!(finite_or(f64::NEG_INFINITY, 5.0), 5.0);
        assert_eq!(finite_or(-1.5, 5.0), -1.5);
    }

    proptest! {
        #![proptest_config(proptest::test_runner::Config::with_cases(64))]

        #[test]
        fn prop_coercion_is_always_finite(text in ".*", fallback in any::<f64>()) {
            let coerced = coerce_text(&text, fallback);
            prop_assert!(coerced.value.is_finite());
        }

        #[test]
        fn prop_formatted_finite_numbers_round_trip(v in -1.0e12f64..1.0e12) {
            let coerced = coerce_text(&v.to_string(), 0.0);
            prop_assert_eq!(coerced.value, v);
            prop_assert_eq!(coerced.source, CoercionSource::Text);
        }
    }
}

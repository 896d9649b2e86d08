//! Lenient readers for loosely-typed upstream JSON.
//!
//! The catalog and provider APIs are not consistent about types (ids arrive as
//! numbers or strings, optional strings arrive as `null`), so every model reads
//! its fields through these helpers instead of strict serde derives.

use serde_json::Value;

/// Coerce a JSON value to a finite number.
///
/// Numbers pass through, strings are parsed after trimming (blank is zero),
/// booleans become 1/0 and `null` is zero. Arrays, objects, unparseable strings
/// and non-finite results give `None`.
pub fn coerce_number(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                0.0
            } else {
                trimmed.parse::<f64>().ok()?
            }
        }
        Value::Bool(b) => {
            if *b {
                1.0
            } else {
                0.0
            }
        }
        Value::Null => 0.0,
        Value::Array(_) | Value::Object(_) => return None,
    };
    n.is_finite().then_some(n)
}

/// Truthiness of a JSON value: `false`, `null`, zero, NaN and `""` are false.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0 && !f.is_nan()).unwrap_or(false),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// The string content of `value` if it is a string with non-whitespace content
pub fn non_blank_str(value: Option<&Value>) -> Option<&str> {
    value
        .and_then(Value::as_str)
        .filter(|s| !s.trim().is_empty())
}

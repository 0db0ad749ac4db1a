//! Primitive value checks

use super::error::ValidationError;
use crate::resolve::PrimitiveType;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::RwLock;

static DATETIME_OFFSET_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]{4}-[0-1][0-9]-[0-3][0-9]T[0-2][0-9]:[0-5][0-9]").unwrap());

static GUID_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}$")
        .unwrap()
});

/// `Validation.Pattern` expressions compiled so far, keyed by pattern text
static PATTERN_CACHE: Lazy<RwLock<HashMap<String, Regex>>> =
    Lazy::new(|| RwLock::new(HashMap::new()));

static DURATION_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^-?P(\d+D)?(T(\d+H)?(\d+M)?(\d+(\.\d+)?S)?)?$").unwrap()
});

/// Name of a JSON value's kind, for mismatch messages
pub fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn mismatch(path: &str, expected: &str, value: &Value) -> ValidationError {
    ValidationError::TypeMismatch {
        path: path.to_string(),
        expected: expected.to_string(),
        found: json_kind(value).to_string(),
    }
}

fn is_integral(value: &Value) -> bool {
    value.is_i64()
        || value.is_u64()
        || value
            .as_f64()
            .is_some_and(|f| f.is_finite() && f.fract() == 0.0)
}

fn is_duration(s: &str) -> bool {
    DURATION_REGEX.is_match(s) && !s.ends_with('P') && !s.ends_with('T')
}

/// Check a value against a primitive type. `null` is accepted for every
/// supported primitive.
///
/// `pattern` is the raw `Validation.Pattern` annotation of the property, if
/// any; it applies to `Edm.String` values only.
pub fn check_primitive(
    primitive: &PrimitiveType,
    value: &Value,
    pattern: Option<&str>,
    path: &str,
) -> Result<(), ValidationError> {
    let unsupported = || ValidationError::UnsupportedPrimitive {
        path: path.to_string(),
        primitive: primitive.to_string(),
    };
    if let PrimitiveType::Other(_) = primitive {
        return Err(unsupported());
    }
    if value.is_null() {
        return Ok(());
    }

    let format_error = |s: &str| ValidationError::Format {
        path: path.to_string(),
        format: primitive.to_string(),
        value: s.to_string(),
    };

    match primitive {
        PrimitiveType::Boolean => {
            if !value.is_boolean() {
                return Err(mismatch(path, "a boolean", value));
            }
        }
        PrimitiveType::Int64 => {
            if !value.is_number() {
                return Err(mismatch(path, "a number", value));
            }
            if !is_integral(value) {
                return Err(mismatch(path, "an integer", value));
            }
        }
        PrimitiveType::Decimal | PrimitiveType::Double => {
            if !value.is_number() {
                return Err(mismatch(path, "a number", value));
            }
        }
        PrimitiveType::String => {
            let s = value.as_str().ok_or_else(|| mismatch(path, "a string", value))?;
            if let Some(raw) = pattern {
                check_pattern(raw, s, path)?;
            }
        }
        PrimitiveType::DateTimeOffset => {
            let s = value.as_str().ok_or_else(|| mismatch(path, "a string", value))?;
            if !DATETIME_OFFSET_REGEX.is_match(s) {
                return Err(format_error(s));
            }
        }
        PrimitiveType::Guid => {
            let s = value.as_str().ok_or_else(|| mismatch(path, "a string", value))?;
            if !GUID_REGEX.is_match(s) {
                return Err(format_error(s));
            }
        }
        PrimitiveType::Duration => {
            let s = value.as_str().ok_or_else(|| mismatch(path, "a string", value))?;
            if !is_duration(s) {
                return Err(format_error(s));
            }
        }
        PrimitiveType::Other(_) => return Err(unsupported()),
    }
    Ok(())
}

/// Match a string against a `Validation.Pattern` value. A leading `/` is
/// stripped; the match is unanchored unless the pattern anchors itself.
fn check_pattern(raw: &str, value: &str, path: &str) -> Result<(), ValidationError> {
    let pattern = raw.strip_prefix('/').unwrap_or(raw);
    let regex = compiled_pattern(pattern).map_err(|e| ValidationError::InvalidPattern {
        path: path.to_string(),
        pattern: raw.to_string(),
        reason: e.to_string(),
    })?;
    if regex.is_match(value) {
        Ok(())
    } else {
        Err(ValidationError::Format {
            path: path.to_string(),
            format: format!("pattern {}", raw),
            value: value.to_string(),
        })
    }
}

fn compiled_pattern(pattern: &str) -> Result<Regex, regex::Error> {
    if let Some(cached) = PATTERN_CACHE
        .read()
        .ok()
        .and_then(|cache| cache.get(pattern).cloned())
    {
        return Ok(cached);
    }
    let regex = Regex::new(pattern)?;
    if let Ok(mut cache) = PATTERN_CACHE.write() {
        cache.insert(pattern.to_string(), regex.clone());
    }
    Ok(regex)
}

//! Built-in transforms for common field conversions
//!
//! Every function here is a pure value-to-value mapping usable as a
//! bridge `transformId`. Inputs of the wrong type fail the transform,
//! which under the whole-record policy fails the record being
//! translated, never the batch.
//!
//! Copyright (c) 2025 Graphbridge Team
//! Licensed under the Apache-2.0 license

use super::TransformError;
use crate::fieldpath::value_kind;
use chrono::DateTime;
use regex::Regex;
use serde_json::Value;
use std::sync::OnceLock;
use url::Url;

fn expect_str<'a>(name: &str, value: &'a Value) -> Result<&'a str, TransformError> {
    value.as_str().ok_or_else(|| {
        TransformError::failed(name, format!("expected a string, found {}", value_kind(value)))
    })
}

/// Lowercase a string
pub fn lowercase(value: &Value) -> Result<Value, TransformError> {
    Ok(Value::String(expect_str("lowercase", value)?.to_lowercase()))
}

/// Uppercase a string
pub fn uppercase(value: &Value) -> Result<Value, TransformError> {
    Ok(Value::String(expect_str("uppercase", value)?.to_uppercase()))
}

/// Strip leading and trailing whitespace from a string
pub fn trim(value: &Value) -> Result<Value, TransformError> {
    Ok(Value::String(expect_str("trim", value)?.trim().to_string()))
}

fn slug_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new("[^a-z0-9]+").expect("valid slug pattern"))
}

/// Turn a string into a lowercase, hyphen-separated slug
pub fn slugify(value: &Value) -> Result<Value, TransformError> {
    let text = expect_str("slugify", value)?;
    let slug = slug_pattern()
        .replace_all(&text.to_lowercase(), "-")
        .trim_matches('-')
        .to_string();
    Ok(Value::String(slug))
}

/// Render a scalar as a string
pub fn to_string(value: &Value) -> Result<Value, TransformError> {
    let text = match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        other => {
            return Err(TransformError::failed(
                "to_string",
                format!("cannot stringify {}", value_kind(other)),
            ))
        }
    };
    Ok(Value::String(text))
}

/// Parse a value as a number
///
/// Strings are parsed (integers stay integral), booleans map to 1 and 0,
/// numbers pass through.
pub fn to_number(value: &Value) -> Result<Value, TransformError> {
    match value {
        Value::Number(_) => Ok(value.clone()),
        Value::Bool(b) => Ok(Value::from(if *b { 1 } else { 0 })),
        Value::String(s) => {
            let trimmed = s.trim();
            if let Ok(integer) = trimmed.parse::<i64>() {
                return Ok(Value::from(integer));
            }
            trimmed
                .parse::<f64>()
                .ok()
                .and_then(serde_json::Number::from_f64)
                .map(Value::Number)
                .ok_or_else(|| {
                    TransformError::failed("to_number", format!("'{}' is not a number", s))
                })
        }
        other => Err(TransformError::failed(
            "to_number",
            format!("expected a number or numeric string, found {}", value_kind(other)),
        )),
    }
}

/// Round a number to the nearest integer
pub fn round(value: &Value) -> Result<Value, TransformError> {
    let number = value.as_f64().ok_or_else(|| {
        TransformError::failed("round", format!("expected a number, found {}", value_kind(value)))
    })?;

    let rounded = number.round();
    if rounded.is_finite() && rounded >= i64::MIN as f64 && rounded <= i64::MAX as f64 {
        Ok(Value::from(rounded as i64))
    } else {
        serde_json::Number::from_f64(rounded)
            .map(Value::Number)
            .ok_or_else(|| TransformError::failed("round", format!("{} cannot be rounded", number)))
    }
}

/// Parse and re-serialize a URL into its canonical form
pub fn normalize_url(value: &Value) -> Result<Value, TransformError> {
    let raw = expect_str("normalize_url", value)?;
    let url = Url::parse(raw).map_err(|e| {
        TransformError::failed("normalize_url", format!("'{}' is not a valid URL: {}", raw, e))
    })?;
    Ok(Value::String(url.to_string()))
}

/// Extract the host component of a URL
pub fn url_host(value: &Value) -> Result<Value, TransformError> {
    let raw = expect_str("url_host", value)?;
    let url = Url::parse(raw).map_err(|e| {
        TransformError::failed("url_host", format!("'{}' is not a valid URL: {}", raw, e))
    })?;
    url.host_str()
        .map(|host| Value::String(host.to_string()))
        .ok_or_else(|| TransformError::failed("url_host", format!("'{}' has no host", raw)))
}

/// Convert whole epoch seconds to an RFC 3339 timestamp
pub fn epoch_to_rfc3339(value: &Value) -> Result<Value, TransformError> {
    let seconds = value.as_i64().ok_or_else(|| {
        TransformError::failed(
            "epoch_to_rfc3339",
            format!("expected whole epoch seconds, found {}", value_kind(value)),
        )
    })?;

    let timestamp = DateTime::from_timestamp(seconds, 0).ok_or_else(|| {
        TransformError::failed(
            "epoch_to_rfc3339",
            format!("epoch {} is out of range", seconds),
        )
    })?;

    Ok(Value::String(timestamp.to_rfc3339()))
}

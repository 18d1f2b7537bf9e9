//! Typed extraction from the tool parameter bag
//!
//! Each declared parameter type has one extractor. Wrong shapes fail
//! `INVALID_PARAMETERS` immediately, with the offending value echoed in the
//! error details, instead of surfacing as a type failure further down.

use serde_json::{Map, Value};

use crate::error::{McpError, Result};

fn offending(params: &Map<String, Value>, name: &str) -> Value {
    params.get(name).cloned().unwrap_or(Value::Null)
}

/// Required integer strictly greater than zero.
///
/// Booleans, floats, strings and non-positive values all fail; JSON has no
/// integer type of its own, so only numbers with an exact integer
/// representation are accepted.
pub fn require_positive_int(params: &Map<String, Value>, name: &str) -> Result<i64> {
    match params.get(name).and_then(Value::as_i64) {
        Some(value) if value > 0 => Ok(value),
        _ => Err(
            McpError::invalid_parameters(format!("{name} must be a positive integer"))
                .with_detail(name, offending(params, name)),
        ),
    }
}

/// Required non-empty string
pub fn require_non_empty_string(params: &Map<String, Value>, name: &str) -> Result<String> {
    match params.get(name) {
        Some(Value::String(s)) if !s.is_empty() => Ok(s.clone()),
        _ => Err(
            McpError::invalid_parameters(format!("{name} must be a non-empty string"))
                .with_detail(name, offending(params, name)),
        ),
    }
}

/// Optional array of strings. Absent (or explicit null) is `None`; anything
/// else must be an array whose elements are all strings.
pub fn optional_string_list(params: &Map<String, Value>, name: &str) -> Result<Option<Vec<String>>> {
    match params.get(name) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Array(items)) => {
            let mut out = Vec::with_capacity(items.len());
            for item in items {
                match item {
                    Value::String(s) => out.push(s.clone()),
                    other => {
                        return Err(McpError::invalid_parameters(format!(
                            "{name} must be an array of strings"
                        ))
                        .with_detail(name, other.clone()))
                    }
                }
            }
            Ok(Some(out))
        }
        Some(other) => Err(
            McpError::invalid_parameters(format!("{name} must be an array of strings"))
                .with_detail(name, other.clone()),
        ),
    }
}

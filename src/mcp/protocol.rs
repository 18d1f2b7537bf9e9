//! Request/response envelope codec
//!
//! One envelope in, one envelope out. An inbound envelope names a tool, a
//! parameter bag, and an optional correlation id; the outbound envelope is
//! either `status: "success"` or `status: "error"` and always echoes the
//! correlation id (as `null` when absent). Parameter-level validation is not
//! done here; that belongs to the tool handlers.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::{ErrorCode, McpError, Result};

/// A parsed, shape-validated inbound request
#[derive(Debug, Clone)]
pub struct McpRequest {
    /// Tool to invoke
    pub tool: String,
    /// Parameter bag, defaulted to empty when absent
    pub parameters: Map<String, Value>,
    /// Caller-supplied correlation id, echoed back verbatim
    pub request_id: Option<String>,
}

/// Parse an inbound payload into a normalized request.
///
/// Fails with `INVALID_REQUEST` if the payload is not a non-empty JSON object
/// or the `tool` field is missing or empty. Everything else is deferred to
/// the handler for the named tool.
pub fn parse_request(payload: &Value) -> Result<McpRequest> {
    let obj = payload
        .as_object()
        .ok_or_else(|| McpError::invalid_request("Request body must be a JSON object"))?;

    if obj.is_empty() {
        return Err(McpError::invalid_request("Empty request"));
    }

    let tool = match obj.get("tool") {
        Some(Value::String(name)) if !name.is_empty() => name.clone(),
        _ => {
            return Err(McpError::invalid_request("Missing tool name")
                .with_detail("required_field", Value::String("tool".to_string())))
        }
    };

    let parameters = match obj.get("parameters") {
        None | Some(Value::Null) => Map::new(),
        Some(Value::Object(params)) => params.clone(),
        Some(other) => {
            return Err(McpError::invalid_request("Parameters must be an object")
                .with_detail("parameters", other.clone()))
        }
    };

    let request_id = match obj.get("request_id") {
        None | Some(Value::Null) => None,
        Some(Value::String(id)) => Some(id.clone()),
        Some(other) => {
            return Err(McpError::invalid_request("Request id must be a string")
                .with_detail("request_id", other.clone()))
        }
    };

    Ok(McpRequest {
        tool,
        parameters,
        request_id,
    })
}

/// Error body nested inside the error envelope
#[derive(Debug, Clone, Serialize)]
pub struct ErrorBody {
    pub code: ErrorCode,
    pub message: String,
    pub details: BTreeMap<String, Value>,
}

impl From<McpError> for ErrorBody {
    fn from(err: McpError) -> Self {
        Self {
            code: err.code,
            message: err.message,
            details: err.details,
        }
    }
}

/// Outbound envelope, discriminated by `status`
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum McpResponse {
    Success {
        data: Value,
        request_id: Option<String>,
    },
    Error {
        error: ErrorBody,
        request_id: Option<String>,
    },
}

impl McpResponse {
    /// Wrap a tool result in the success envelope
    pub fn success(data: Value, request_id: Option<String>) -> Self {
        McpResponse::Success { data, request_id }
    }

    /// Wrap a classified error in the error envelope
    pub fn error(err: McpError, request_id: Option<String>) -> Self {
        McpResponse::Error {
            error: err.into(),
            request_id,
        }
    }

    /// Universal fallback for failures that never got classified.
    ///
    /// Guarantees the outbound envelope is well formed even for unanticipated
    /// failures; the description is run through the marker classifier, so
    /// anything not recognizably a storage failure becomes `INTERNAL_ERROR`.
    pub fn from_failure(description: &str, request_id: Option<String>) -> Self {
        Self::error(McpError::classify_failure(description), request_id)
    }

    /// HTTP status this envelope should travel with
    pub fn http_status(&self) -> u16 {
        match self {
            McpResponse::Success { .. } => 200,
            McpResponse::Error { error, .. } => error.code.http_status(),
        }
    }
}

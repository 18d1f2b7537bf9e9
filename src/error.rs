//! Error taxonomy for the MCP layer
//!
//! Every failure that crosses the dispatch boundary is classified into one of
//! the six closed codes below; nothing leaves the codec unwrapped.

use std::collections::BTreeMap;

use serde::Serialize;
use thiserror::Error;

/// Result type alias for Freightdesk operations
pub type Result<T> = std::result::Result<T, McpError>;

/// Marker substrings used to classify untyped failures as storage errors.
///
/// Checked against the lowered failure description. Typed storage errors never
/// reach this path; it exists only for failures that arrive as plain text.
pub const STORAGE_ERROR_MARKERS: &[&str] = &["database", "db", "sql"];

/// Closed set of error codes exposed on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Malformed envelope (empty payload, missing tool)
    InvalidRequest,
    /// Tool-specific parameter validation failed
    InvalidParameters,
    /// Requested tool name is not in the registry
    ToolNotFound,
    /// Lookup key did not resolve to a record
    RecordNotFound,
    /// Underlying storage operation failed
    DatabaseError,
    /// Any other unexpected failure
    InternalError,
}

impl ErrorCode {
    /// Wire representation of the code
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCode::InvalidRequest => "INVALID_REQUEST",
            ErrorCode::InvalidParameters => "INVALID_PARAMETERS",
            ErrorCode::ToolNotFound => "TOOL_NOT_FOUND",
            ErrorCode::RecordNotFound => "RECORD_NOT_FOUND",
            ErrorCode::DatabaseError => "DATABASE_ERROR",
            ErrorCode::InternalError => "INTERNAL_ERROR",
        }
    }

    /// HTTP status for this code. Fixed mapping, not overridable per error.
    pub fn http_status(self) -> u16 {
        match self {
            ErrorCode::InvalidRequest | ErrorCode::InvalidParameters => 400,
            ErrorCode::ToolNotFound | ErrorCode::RecordNotFound => 404,
            ErrorCode::DatabaseError | ErrorCode::InternalError => 500,
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Structured error carried through dispatch and formatted into the envelope
#[derive(Debug, Clone, Error)]
#[error("{code}: {message}")]
pub struct McpError {
    /// Classified error code
    pub code: ErrorCode,
    /// Human-readable message
    pub message: String,
    /// Additive context (offending parameter, lookup key), never required
    /// to interpret the code
    pub details: BTreeMap<String, serde_json::Value>,
}

impl McpError {
    /// Create an error with no details
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: BTreeMap::new(),
        }
    }

    /// Attach a detail entry
    pub fn with_detail(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.details.insert(key.into(), value);
        self
    }

    /// HTTP status derived from the code
    pub fn http_status(&self) -> u16 {
        self.code.http_status()
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidRequest, message)
    }

    pub fn invalid_parameters(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidParameters, message)
    }

    pub fn tool_not_found(tool_name: &str) -> Self {
        Self::new(
            ErrorCode::ToolNotFound,
            format!("Tool not found: {tool_name}"),
        )
        .with_detail("tool_name", serde_json::json!(tool_name))
    }

    /// Not-found error keyed by the lookup parameter (`customer_id` or
    /// `customer_name`), echoing the value in both message and details.
    pub fn record_not_found(param_name: &str, value: serde_json::Value) -> Self {
        let label = param_name.replace('_', " ");
        Self::new(
            ErrorCode::RecordNotFound,
            format!("Customer not found: {label}={value}"),
        )
        .with_detail(param_name, value)
    }

    pub fn database(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::DatabaseError, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }

    /// Classify a failure that arrived without a code.
    ///
    /// Descriptions mentioning one of [`STORAGE_ERROR_MARKERS`] become
    /// `DATABASE_ERROR`; everything else is `INTERNAL_ERROR`. Best effort,
    /// used only at the outermost boundary.
    pub fn classify_failure(description: &str) -> Self {
        let lowered = description.to_lowercase();
        if STORAGE_ERROR_MARKERS.iter().any(|m| lowered.contains(m)) {
            Self::database(format!("Customer store operation failed: {description}"))
        } else {
            Self::internal(description.to_string())
        }
    }
}

impl From<rusqlite::Error> for McpError {
    fn from(err: rusqlite::Error) -> Self {
        Self::database(format!("Database error: {err}"))
    }
}

impl From<serde_json::Error> for McpError {
    fn from(err: serde_json::Error) -> Self {
        Self::internal(format!("Serialization error: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_is_fixed_per_code() {
        assert_eq!(ErrorCode::InvalidRequest.http_status(), 400);
        assert_eq!(ErrorCode::InvalidParameters.http_status(), 400);
        assert_eq!(ErrorCode::ToolNotFound.http_status(), 404);
        assert_eq!(ErrorCode::RecordNotFound.http_status(), 404);
        assert_eq!(ErrorCode::DatabaseError.http_status(), 500);
        assert_eq!(ErrorCode::InternalError.http_status(), 500);
    }

    #[test]
    fn record_not_found_echoes_key() {
        let err = McpError::record_not_found("customer_id", serde_json::json!(42));
        assert_eq!(err.code, ErrorCode::RecordNotFound);
        assert_eq!(err.details.get("customer_id"), Some(&serde_json::json!(42)));
        assert!(err.message.contains("customer id"));
        assert!(err.message.contains("42"));
    }

    #[test]
    fn classify_failure_sniffs_storage_markers() {
        let err = McpError::classify_failure("SQL logic error near SELECT");
        assert_eq!(err.code, ErrorCode::DatabaseError);

        let err = McpError::classify_failure("connection reset by peer");
        assert_eq!(err.code, ErrorCode::InternalError);
        assert_eq!(err.message, "connection reset by peer");
    }

    #[test]
    fn rusqlite_errors_map_to_database_error() {
        let err: McpError = rusqlite::Error::InvalidQuery.into();
        assert_eq!(err.code, ErrorCode::DatabaseError);
    }
}

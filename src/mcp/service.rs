//! Tool dispatch and the built-in tool handlers
//!
//! Routing is an exact string match over a fixed set of tools. Handlers are
//! stateless: validate parameters, run at most one store lookup, project the
//! result. Already-classified errors propagate unchanged; only storage-layer
//! failures get classified here (as `DATABASE_ERROR`, via the typed
//! conversion in `error.rs`).

use std::sync::Arc;

use serde_json::{json, Map, Value};

use crate::error::{McpError, Result};
use crate::mcp::params;
use crate::mcp::registry::ServiceMetadata;
use crate::storage::{queries, Storage};
use crate::types::{Customer, DEFAULT_QUERY_FIELDS};

/// Dispatcher over the built-in tools, holding the shared read-only registry
/// and the customer store.
#[derive(Clone)]
pub struct McpService {
    storage: Storage,
    metadata: Arc<ServiceMetadata>,
}

impl McpService {
    pub fn new(storage: Storage, metadata: Arc<ServiceMetadata>) -> Self {
        Self { storage, metadata }
    }

    pub fn metadata(&self) -> &ServiceMetadata {
        &self.metadata
    }

    pub fn storage(&self) -> &Storage {
        &self.storage
    }

    /// Route a parsed request to its handler.
    ///
    /// Unknown tool names fail `TOOL_NOT_FOUND`; handler results and handler
    /// errors pass through unchanged.
    pub fn dispatch(&self, tool: &str, parameters: &Map<String, Value>) -> Result<Value> {
        match tool {
            "query" => self.query_by_id(parameters),
            "query_by_name" => self.query_by_name(parameters),
            "list_tools" => self.list_tools(),
            other => Err(McpError::tool_not_found(other)),
        }
    }

    /// `query`: look up a customer by positive integer id and project fields
    fn query_by_id(&self, parameters: &Map<String, Value>) -> Result<Value> {
        let customer_id = params::require_positive_int(parameters, "customer_id")?;
        let fields = params::optional_string_list(parameters, "fields")?;

        let customer = self
            .storage
            .with_connection(|conn| queries::get_customer(conn, customer_id))?
            .ok_or_else(|| McpError::record_not_found("customer_id", json!(customer_id)))?;

        Ok(json!({ "customer": project(&customer, fields.as_deref()) }))
    }

    /// `query_by_name`: look up a customer by exact name and project fields
    fn query_by_name(&self, parameters: &Map<String, Value>) -> Result<Value> {
        let customer_name = params::require_non_empty_string(parameters, "customer_name")?;
        let fields = params::optional_string_list(parameters, "fields")?;

        let customer = self
            .storage
            .with_connection(|conn| queries::get_customer_by_name(conn, &customer_name))?
            .ok_or_else(|| McpError::record_not_found("customer_name", json!(customer_name)))?;

        Ok(json!({ "customer": project(&customer, fields.as_deref()) }))
    }

    /// `list_tools`: name/description pairs from the registry
    fn list_tools(&self) -> Result<Value> {
        Ok(json!({ "tools": self.metadata.tool_summaries() }))
    }
}

/// Apply the caller's field selection, falling back to the fixed default set.
fn project(customer: &Customer, fields: Option<&[String]>) -> Map<String, Value> {
    match fields {
        Some(fields) => customer.project(fields),
        None => {
            let default: Vec<String> = DEFAULT_QUERY_FIELDS
                .iter()
                .map(|f| f.to_string())
                .collect();
            customer.project(&default)
        }
    }
}

//! Immutable tool registry and service metadata
//!
//! The registry is built once at startup and handed around behind an `Arc`;
//! nothing adds, removes, or mutates a tool after that, so metadata responses
//! are stable for the lifetime of the process.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::{json, Value};

use crate::error::{McpError, Result};
use crate::types::DEFAULT_QUERY_FIELDS;

/// Service name reported in the metadata descriptor
pub const SERVICE_NAME: &str = "Freightdesk MCP Service";

/// Declared schema for a single tool parameter
#[derive(Debug, Clone, Serialize)]
pub struct ParameterSpec {
    #[serde(rename = "type")]
    pub param_type: String,
    pub description: String,
    pub required: bool,
    pub default: Value,
}

impl ParameterSpec {
    fn required(param_type: &str, description: &str) -> Self {
        Self {
            param_type: param_type.to_string(),
            description: description.to_string(),
            required: true,
            default: Value::Null,
        }
    }

    fn optional(param_type: &str, description: &str, default: Value) -> Self {
        Self {
            param_type: param_type.to_string(),
            description: description.to_string(),
            required: false,
            default,
        }
    }
}

/// Full descriptor for one tool: name, description, parameter and return
/// schemas
#[derive(Debug, Clone, Serialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub parameters: BTreeMap<String, ParameterSpec>,
    pub returns: Value,
}

/// Summary view of a tool, as returned by `list_tools`. The full schema is
/// available only through `tool_schema`.
#[derive(Debug, Clone, Serialize)]
pub struct ToolSummary {
    pub name: String,
    pub description: String,
}

/// Service descriptor: constructed once, read-only thereafter
#[derive(Debug, Clone, Serialize)]
pub struct ServiceMetadata {
    pub name: String,
    pub version: String,
    pub description: String,
    pub tools: Vec<ToolDefinition>,
    pub capabilities: Vec<String>,
}

fn customer_returns_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "customer": {
                "type": "object",
                "properties": {
                    "id": {"type": "integer"},
                    "name": {"type": "string"},
                    "city": {"type": "string"},
                    "industry": {"type": "string"},
                    "cargo_type": {"type": "string"},
                    "size": {"type": "string"}
                }
            }
        }
    })
}

fn fields_parameter() -> ParameterSpec {
    ParameterSpec::optional(
        "array",
        "Field names to include in the result",
        json!(DEFAULT_QUERY_FIELDS),
    )
}

impl ServiceMetadata {
    /// Build the registry with its fixed set of built-in tools.
    pub fn new() -> Self {
        let query = ToolDefinition {
            name: "query".to_string(),
            description: "Look up a customer by id".to_string(),
            parameters: BTreeMap::from([
                (
                    "customer_id".to_string(),
                    ParameterSpec::required("integer", "Customer id"),
                ),
                ("fields".to_string(), fields_parameter()),
            ]),
            returns: customer_returns_schema(),
        };

        let query_by_name = ToolDefinition {
            name: "query_by_name".to_string(),
            description: "Look up a customer by name".to_string(),
            parameters: BTreeMap::from([
                (
                    "customer_name".to_string(),
                    ParameterSpec::required("string", "Customer name"),
                ),
                ("fields".to_string(), fields_parameter()),
            ]),
            returns: customer_returns_schema(),
        };

        let list_tools = ToolDefinition {
            name: "list_tools".to_string(),
            description: "List the available tools".to_string(),
            parameters: BTreeMap::new(),
            returns: json!({
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {
                        "name": {"type": "string"},
                        "description": {"type": "string"}
                    }
                }
            }),
        };

        Self {
            name: SERVICE_NAME.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            description: "Freight customer directory with query tools over MCP".to_string(),
            tools: vec![query, query_by_name, list_tools],
            capabilities: vec![
                "customer_query".to_string(),
                "customer_management".to_string(),
            ],
        }
    }

    /// Full service descriptor as a plain value.
    ///
    /// Serialization of a static descriptor should not fail; if it somehow
    /// does, that is an `INTERNAL_ERROR`.
    pub fn descriptor(&self) -> Result<Value> {
        serde_json::to_value(self)
            .map_err(|e| McpError::internal(format!("Failed to serialize service metadata: {e}")))
    }

    /// Look up one tool's full schema by name. Linear scan; the registry is
    /// three entries long.
    pub fn tool_schema(&self, tool_name: &str) -> Result<Value> {
        for tool in &self.tools {
            if tool.name == tool_name {
                return serde_json::to_value(tool).map_err(|e| {
                    McpError::internal(format!("Failed to serialize tool schema: {e}"))
                });
            }
        }
        Err(McpError::tool_not_found(tool_name))
    }

    /// Ordered `{name, description}` summaries for every registered tool
    pub fn tool_summaries(&self) -> Vec<ToolSummary> {
        self.tools
            .iter()
            .map(|tool| ToolSummary {
                name: tool.name.clone(),
                description: tool.description.clone(),
            })
            .collect()
    }
}

impl Default for ServiceMetadata {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    #[test]
    fn descriptor_lists_all_tools() {
        let metadata = ServiceMetadata::new();
        let value = metadata.descriptor().unwrap();
        let tools = value["tools"].as_array().unwrap();
        assert_eq!(tools.len(), 3);
        assert_eq!(tools[0]["name"], "query");
        assert_eq!(tools[1]["name"], "query_by_name");
        assert_eq!(tools[2]["name"], "list_tools");
        assert_eq!(value["name"], SERVICE_NAME);
    }

    #[test]
    fn tool_schema_returns_full_definition() {
        let metadata = ServiceMetadata::new();
        let schema = metadata.tool_schema("query").unwrap();
        assert_eq!(schema["parameters"]["customer_id"]["type"], "integer");
        assert_eq!(schema["parameters"]["customer_id"]["required"], true);
        assert_eq!(
            schema["parameters"]["fields"]["default"],
            serde_json::json!(["name", "city", "industry"])
        );
    }

    #[test]
    fn tool_schema_unknown_name_fails() {
        let metadata = ServiceMetadata::new();
        let err = metadata.tool_schema("nonexistent").unwrap_err();
        assert_eq!(err.code, ErrorCode::ToolNotFound);
        assert_eq!(err.http_status(), 404);
    }

    #[test]
    fn summaries_omit_schemas_and_stay_stable() {
        let metadata = ServiceMetadata::new();
        let first = metadata.tool_summaries();
        let second = metadata.tool_summaries();
        assert_eq!(first.len(), second.len());
        for (a, b) in first.iter().zip(second.iter()) {
            assert_eq!(a.name, b.name);
        }
        let wire = serde_json::to_value(&first).unwrap();
        assert!(wire[0].get("parameters").is_none());
    }
}

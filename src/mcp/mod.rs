//! MCP tool-invocation layer
//!
//! A single envelope names a tool, carries a parameter bag and a correlation
//! id; dispatch routes it to a built-in handler and the codec shapes the
//! outcome. The registry is immutable after startup and backs the metadata
//! endpoints.

pub mod params;
pub mod protocol;
pub mod registry;
pub mod service;

pub use protocol::{parse_request, McpRequest, McpResponse};
pub use registry::{ServiceMetadata, ToolDefinition, ToolSummary};
pub use service::McpService;

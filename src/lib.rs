//! Freightdesk - freight customer directory
//!
//! Customer records in SQLite, queryable over a small MCP tool-invocation
//! protocol, with ordinary CRUD endpoints for managing the records.

pub mod error;
pub mod mcp;
pub mod server;
pub mod storage;
pub mod types;

pub use error::{ErrorCode, McpError, Result};
pub use mcp::{McpService, ServiceMetadata};
pub use storage::Storage;
pub use types::*;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

//! Storage engine for the customer store
//!
//! SQLite in WAL mode with a versioned schema; all access goes through
//! scoped connection acquisitions.

mod connection;
mod migrations;
pub mod queries;

pub use connection::Storage;
pub use migrations::SCHEMA_VERSION;

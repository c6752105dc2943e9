//! MCP tool implementations.
//!
//! This module contains the database tool handlers:
//! - `connect`: probe connectivity and report the table list
//! - `schema`: list tables, whole-database and per-table schema views
//! - `query`: run read-only SQL

pub mod connect;
pub mod query;
pub mod schema;

pub use connect::{ConnectOutput, ConnectToolHandler};
pub use query::{QueryInput, QueryToolHandler};
pub use schema::SchemaToolHandler;

//! Data models for the schema MCP server.
//!
//! This module re-exports all model types used throughout the application.

pub mod query;
pub mod schema;

// Re-export commonly used types
pub use query::{
    ColumnMetadata, DEFAULT_QUERY_TIMEOUT_SECS, DEFAULT_ROW_LIMIT, MAX_QUERY_TIMEOUT_SECS,
    MAX_ROW_LIMIT, QueryResult,
};
pub use schema::{ColumnDescriptor, DatabaseSchema, ForeignKeyDescriptor, TableSchema};

//! Schema MCP Server Library
//!
//! This library provides MCP (Model Context Protocol) tools and resources
//! for AI assistants to introspect a PostgreSQL schema and run read-only
//! SQL queries against it.

pub mod config;
pub mod db;
pub mod error;
pub mod mcp;
pub mod models;
pub mod resource;
pub mod tools;
pub mod transport;

pub use config::Config;
pub use error::GatewayError;
pub use mcp::SchemaService;

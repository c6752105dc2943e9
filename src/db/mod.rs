//! Database access layer.
//!
//! This module provides database access functionality:
//! - Connection gateway (pool lifecycle, probe)
//! - Catalog reading against information_schema
//! - Schema assembly (per-table and whole-database views)
//! - Read-only query mediation
//! - Row-to-JSON type mappings

pub mod assemble;
pub mod catalog;
pub mod executor;
pub mod gateway;
pub mod types;

pub use assemble::SchemaAssembler;
pub use catalog::CatalogReader;
pub use executor::ReadOnlyExecutor;
pub use gateway::ConnectionGateway;

//! Schema introspection tools.

use crate::db::{CatalogReader, ConnectionGateway, SchemaAssembler};
use crate::error::GatewayResult;
use crate::models::{DatabaseSchema, TableSchema};
use std::sync::Arc;
use tracing::info;

/// Handler for the schema tools (list_tables, get_database_schema) and the
/// per-table schema resource.
pub struct SchemaToolHandler {
    gateway: Arc<ConnectionGateway>,
}

impl SchemaToolHandler {
    /// Create a new schema tool handler.
    pub fn new(gateway: Arc<ConnectionGateway>) -> Self {
        Self { gateway }
    }

    /// List all tables in the public catalog.
    pub async fn list_tables(&self) -> GatewayResult<Vec<String>> {
        let tables = CatalogReader::list_tables(self.gateway.pool()).await?;
        info!(count = tables.len(), "Listed tables");
        Ok(tables)
    }

    /// Get the whole-database schema.
    pub async fn get_database_schema(&self) -> GatewayResult<DatabaseSchema> {
        let schema = SchemaAssembler::describe_database(self.gateway.pool()).await?;
        info!(tables = schema.tables.len(), "Assembled database schema");
        Ok(schema)
    }

    /// Get the full schema of one table.
    pub async fn describe_table(&self, table: &str) -> GatewayResult<TableSchema> {
        let schema = SchemaAssembler::describe_table(self.gateway.pool(), table).await?;
        info!(
            table = table,
            columns = schema.columns.len(),
            "Described table"
        );
        Ok(schema)
    }
}

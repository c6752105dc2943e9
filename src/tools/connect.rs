//! Connectivity probe tool.

use crate::db::{CatalogReader, ConnectionGateway};
use crate::error::GatewayResult;
use serde::Serialize;
use std::sync::Arc;
use tracing::info;

/// Output of the connect_database tool.
#[derive(Debug, Serialize)]
pub struct ConnectOutput {
    pub success: bool,
    /// Tables visible through the connection at probe time.
    pub tables: Vec<String>,
}

/// Handler for the connect_database tool.
pub struct ConnectToolHandler {
    gateway: Arc<ConnectionGateway>,
}

impl ConnectToolHandler {
    /// Create a new connect tool handler.
    pub fn new(gateway: Arc<ConnectionGateway>) -> Self {
        Self { gateway }
    }

    /// Probe the database and report the current table list.
    pub async fn connect(&self) -> GatewayResult<ConnectOutput> {
        self.gateway.probe().await?;
        let tables = CatalogReader::list_tables(self.gateway.pool()).await?;

        info!(tables = tables.len(), "Database probe succeeded");
        Ok(ConnectOutput {
            success: true,
            tables,
        })
    }
}

//! Read-only query tool.
//!
//! Runs caller SQL through the read-only mediator. The statement text is
//! not inspected here; the read-only transaction is the write guard.

use crate::db::{ConnectionGateway, ReadOnlyExecutor};
use crate::error::{GatewayError, GatewayResult};
use crate::models::QueryResult;
use schemars::JsonSchema;
use serde::Deserialize;
use std::sync::Arc;
use tracing::info;

/// Input for the query tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct QueryInput {
    /// SQL statement to execute. Runs in a read-only transaction that is
    /// always rolled back; statements attempting writes fail at the
    /// database layer.
    pub sql: String,
}

/// Handler for query execution.
pub struct QueryToolHandler {
    gateway: Arc<ConnectionGateway>,
    executor: ReadOnlyExecutor,
}

impl QueryToolHandler {
    /// Create a new query tool handler.
    pub fn new(gateway: Arc<ConnectionGateway>) -> Self {
        Self {
            gateway,
            executor: ReadOnlyExecutor::new(),
        }
    }

    /// Create a new query tool handler with custom executor settings.
    pub fn with_executor(gateway: Arc<ConnectionGateway>, executor: ReadOnlyExecutor) -> Self {
        Self { gateway, executor }
    }

    /// Handle the query tool call.
    pub async fn query(&self, input: QueryInput) -> GatewayResult<QueryResult> {
        if input.sql.trim().is_empty() {
            return Err(GatewayError::invalid_argument(
                "sql must be a non-empty string",
            ));
        }

        let result = self
            .executor
            .run_read_only(self.gateway.pool(), &input.sql)
            .await?;

        info!(
            row_count = result.row_count(),
            truncated = result.truncated,
            execution_time_ms = result.execution_time_ms,
            "Query executed"
        );
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_input_deserialization() {
        let json = r#"{"sql": "SELECT count(*) FROM users"}"#;
        let input: QueryInput = serde_json::from_str(json).unwrap();
        assert_eq!(input.sql, "SELECT count(*) FROM users");
    }

    #[test]
    fn test_query_input_requires_sql() {
        let result: Result<QueryInput, _> = serde_json::from_str(r#"{}"#);
        assert!(result.is_err());
    }
}

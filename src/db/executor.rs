//! Read-only query mediation.
//!
//! Caller-supplied SQL runs verbatim inside a transaction forced into
//! read-only mode, and the transaction always ends in a rollback: on
//! success, on failure and on timeout. The database engine is the sole
//! write guard; no statement parsing or type validation happens here.
//!
//! Row limits are enforced by streaming - only `limit + 1` rows are ever
//! fetched - and every execution runs under a deadline.

use crate::db::types::RowToJson;
use crate::error::{GatewayError, GatewayResult};
use crate::models::{DEFAULT_QUERY_TIMEOUT_SECS, DEFAULT_ROW_LIMIT, MAX_ROW_LIMIT, QueryResult};
use futures_util::StreamExt;
use sqlx::postgres::PgRow;
use sqlx::{Executor, PgPool, Postgres, Transaction};
use std::time::{Duration, Instant};
use tokio::time::timeout;
use tracing::{debug, warn};

/// First statement of every mediated transaction.
const SET_READ_ONLY: &str = "SET TRANSACTION READ ONLY";

/// Executes arbitrary SQL under the read-only/rollback discipline.
pub struct ReadOnlyExecutor {
    query_timeout: Duration,
    row_limit: u32,
}

impl ReadOnlyExecutor {
    /// Create an executor with default settings.
    pub fn new() -> Self {
        Self {
            query_timeout: Duration::from_secs(DEFAULT_QUERY_TIMEOUT_SECS as u64),
            row_limit: DEFAULT_ROW_LIMIT,
        }
    }

    /// Create an executor with custom settings.
    pub fn with_defaults(timeout_secs: u64, row_limit: u32) -> Self {
        Self {
            query_timeout: Duration::from_secs(timeout_secs),
            row_limit: row_limit.clamp(1, MAX_ROW_LIMIT),
        }
    }

    /// Run `sql` inside a read-only transaction and roll it back.
    ///
    /// The rollback executes on every path. When the statement itself
    /// fails, the rollback still runs before the failure is surfaced, so
    /// nothing a caller submits can ever commit.
    pub async fn run_read_only(&self, pool: &PgPool, sql: &str) -> GatewayResult<QueryResult> {
        let start = Instant::now();

        debug!(sql = %sql, limit = self.row_limit, "Executing read-only query");

        let mut tx = pool.begin().await?;
        let outcome = self.fetch_rows(&mut tx, sql).await;

        // Unconditional rollback. A rollback failure is logged but the
        // query outcome wins - there is nothing useful a caller can do
        // with a rollback error on an already-doomed transaction.
        if let Err(e) = tx.rollback().await {
            warn!(error = %e, "Rollback failed after read-only query");
        }

        let rows = outcome?;
        self.process_rows(rows, start)
    }

    async fn fetch_rows(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        sql: &str,
    ) -> GatewayResult<Vec<PgRow>> {
        // Must precede any query in the transaction.
        (&mut **tx).execute(SET_READ_ONLY).await?;

        // Fetch one row past the limit so truncation is detectable without
        // draining an unbounded result set.
        let fetch_limit = self.row_limit as usize + 1;
        let rows_future = {
            let stream = (&mut **tx).fetch(sql);
            stream.take(fetch_limit).collect::<Vec<_>>()
        };

        match timeout(self.query_timeout, rows_future).await {
            Ok(results) => collect_rows(results),
            Err(_) => Err(GatewayError::timeout(
                "query execution",
                self.query_timeout.as_secs() as u32,
            )),
        }
    }

    /// Convert fetched rows into a QueryResult, applying the row cap.
    fn process_rows(&self, rows: Vec<PgRow>, start: Instant) -> GatewayResult<QueryResult> {
        let execution_time_ms = start.elapsed().as_millis() as u64;

        if rows.is_empty() {
            return Ok(QueryResult::empty(execution_time_ms));
        }

        let columns = rows[0].get_column_metadata();
        let total_rows = rows.len();
        let truncated = total_rows > self.row_limit as usize;
        let rows_to_take = (self.row_limit as usize).min(total_rows);

        let json_rows: Vec<serde_json::Map<String, serde_json::Value>> = rows
            .iter()
            .take(rows_to_take)
            .map(|r| r.to_json_map())
            .collect();

        if truncated {
            warn!(
                limit = self.row_limit,
                "Query result truncated at row limit"
            );
        }

        Ok(QueryResult {
            columns,
            rows: json_rows,
            truncated,
            execution_time_ms,
        })
    }
}

impl Default for ReadOnlyExecutor {
    fn default() -> Self {
        Self::new()
    }
}

fn collect_rows(results: Vec<Result<PgRow, sqlx::Error>>) -> GatewayResult<Vec<PgRow>> {
    let mut rows = Vec::with_capacity(results.len());
    for result in results {
        rows.push(result.map_err(GatewayError::from)?);
    }
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_executor_defaults() {
        let executor = ReadOnlyExecutor::new();
        assert_eq!(
            executor.query_timeout,
            Duration::from_secs(DEFAULT_QUERY_TIMEOUT_SECS as u64)
        );
        assert_eq!(executor.row_limit, DEFAULT_ROW_LIMIT);
    }

    #[test]
    fn test_executor_custom_settings() {
        let executor = ReadOnlyExecutor::with_defaults(60, 500);
        assert_eq!(executor.query_timeout, Duration::from_secs(60));
        assert_eq!(executor.row_limit, 500);
    }

    #[test]
    fn test_executor_limit_capped() {
        let executor = ReadOnlyExecutor::with_defaults(30, 99999);
        assert_eq!(executor.row_limit, MAX_ROW_LIMIT);
    }

    #[test]
    fn test_executor_limit_floor() {
        let executor = ReadOnlyExecutor::with_defaults(30, 0);
        assert_eq!(executor.row_limit, 1);
    }
}

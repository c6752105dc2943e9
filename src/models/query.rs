//! Query-related data models.

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// Default row limit for query results.
pub const DEFAULT_ROW_LIMIT: u32 = 100;

/// Maximum allowed row limit.
pub const MAX_ROW_LIMIT: u32 = 10000;

/// Default query timeout in seconds.
pub const DEFAULT_QUERY_TIMEOUT_SECS: u32 = 30;

/// Maximum query timeout in seconds.
pub const MAX_QUERY_TIMEOUT_SECS: u32 = 300;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnMetadata {
    pub name: String,
    /// Database-specific type (e.g., "INT8", "VARCHAR")
    pub type_name: String,
    pub nullable: bool,
}

impl ColumnMetadata {
    /// Create new column metadata.
    pub fn new(name: impl Into<String>, type_name: impl Into<String>, nullable: bool) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
            nullable,
        }
    }
}

/// The rows produced by one read-only statement. Width and typing are
/// entirely determined by the caller's SQL text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryResult {
    pub columns: Vec<ColumnMetadata>,
    pub rows: Vec<serde_json::Map<String, JsonValue>>,
    pub truncated: bool,
    pub execution_time_ms: u64,
}

impl QueryResult {
    /// Create an empty result.
    pub fn empty(execution_time_ms: u64) -> Self {
        Self {
            columns: Vec::new(),
            rows: Vec::new(),
            truncated: false,
            execution_time_ms,
        }
    }

    /// Get the number of rows in the result.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_result_empty() {
        let result = QueryResult::empty(10);
        assert_eq!(result.row_count(), 0);
        assert!(!result.truncated);
    }

    #[test]
    fn test_column_metadata() {
        let meta = ColumnMetadata::new("id", "INT8", false);
        assert_eq!(meta.name, "id");
        assert!(!meta.nullable);
    }
}

//! Error types for the schema MCP server.
//!
//! All fallible paths use `GatewayError`, defined with `thiserror`. Variants
//! follow the failure surfaces of the server: connection/pool problems,
//! catalog query failures, malformed resource addresses, bad tool arguments,
//! and caller SQL that the database rejects.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("Connection failed: {message}")]
    Connection { message: String, suggestion: String },

    #[error("Catalog query failed for '{object}': {message}")]
    Catalog { message: String, object: String },

    #[error("Invalid resource address '{uri}': {reason}")]
    InvalidAddress { uri: String, reason: String },

    #[error("Invalid argument: {message}")]
    InvalidArgument { message: String },

    #[error("Query failed: {message}")]
    Query {
        message: String,
        /// e.g., "42601" for a syntax error
        sql_state: Option<String>,
    },

    #[error("Timeout: {operation} exceeded {elapsed_secs}s")]
    Timeout {
        operation: String,
        elapsed_secs: u32,
    },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl GatewayError {
    /// Create a connection error with a helpful suggestion.
    pub fn connection(message: impl Into<String>, suggestion: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
            suggestion: suggestion.into(),
        }
    }

    /// Create a catalog query error for a named catalog object.
    pub fn catalog(message: impl Into<String>, object: impl Into<String>) -> Self {
        Self::Catalog {
            message: message.into(),
            object: object.into(),
        }
    }

    /// Create an invalid resource address error.
    pub fn invalid_address(uri: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidAddress {
            uri: uri.into(),
            reason: reason.into(),
        }
    }

    /// Create an invalid argument error.
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    /// Create a query execution error with optional SQL state.
    pub fn query(message: impl Into<String>, sql_state: Option<String>) -> Self {
        Self::Query {
            message: message.into(),
            sql_state,
        }
    }

    /// Create a timeout error.
    pub fn timeout(operation: impl Into<String>, elapsed_secs: u32) -> Self {
        Self::Timeout {
            operation: operation.into(),
            elapsed_secs,
        }
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Classify a sqlx failure from a catalog query. Connection-class
    /// failures keep their variant; everything else is attributed to the
    /// catalog object being read.
    pub fn from_catalog(object: impl Into<String>, err: sqlx::Error) -> Self {
        match Self::from(err) {
            e @ (Self::Connection { .. } | Self::Timeout { .. }) => e,
            e => Self::catalog(e.to_string(), object),
        }
    }

    /// Get the suggestion for this error, if available.
    pub fn suggestion(&self) -> Option<&str> {
        match self {
            Self::Connection { suggestion, .. } => Some(suggestion),
            _ => None,
        }
    }

    /// Check if this error is retryable.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Connection { .. } | Self::Timeout { .. })
    }
}

/// Convert sqlx errors to GatewayError.
impl From<sqlx::Error> for GatewayError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Configuration(msg) => GatewayError::connection(
                msg.to_string(),
                "Check the connection string format and credentials",
            ),
            sqlx::Error::Database(db_err) => {
                let code = db_err.code().map(|c| c.to_string());
                GatewayError::query(db_err.message(), code)
            }
            sqlx::Error::PoolTimedOut => GatewayError::timeout("connection pool acquire", 30),
            sqlx::Error::PoolClosed => {
                GatewayError::connection("Connection pool is closed", "Restart the server")
            }
            sqlx::Error::Io(io_err) => GatewayError::connection(
                format!("I/O error: {}", io_err),
                "Check network connectivity and database server status",
            ),
            sqlx::Error::Tls(tls_err) => GatewayError::connection(
                format!("TLS error: {}", tls_err),
                "Verify TLS configuration and certificates",
            ),
            sqlx::Error::Protocol(msg) => GatewayError::connection(
                format!("Protocol error: {}", msg),
                "Check database server compatibility",
            ),
            sqlx::Error::RowNotFound => GatewayError::query("No rows returned", None),
            sqlx::Error::ColumnNotFound(col) => {
                GatewayError::internal(format!("Column not found: {}", col))
            }
            sqlx::Error::ColumnIndexOutOfBounds { index, len } => GatewayError::internal(format!(
                "Column index {} out of bounds (len: {})",
                index, len
            )),
            sqlx::Error::ColumnDecode { index, source } => {
                GatewayError::internal(format!("Failed to decode column {}: {}", index, source))
            }
            sqlx::Error::Decode(source) => {
                GatewayError::internal(format!("Decode error: {}", source))
            }
            sqlx::Error::WorkerCrashed => GatewayError::internal("Database worker crashed"),
            _ => GatewayError::internal(format!("Unknown database error: {}", err)),
        }
    }
}

/// Result type alias for gateway operations.
pub type GatewayResult<T> = Result<T, GatewayError>;

/// Build suggestion data as JSON value.
fn suggestion_data(suggestion: Option<&str>) -> Option<serde_json::Value> {
    suggestion.map(|s| serde_json::json!({ "suggestion": s }))
}

/// Convert GatewayError to MCP ErrorData for protocol-level faults.
///
/// Tool-call failures never take this path; the dispatch layer converts them
/// into `isError` tool results instead. This mapping applies to resource
/// reads and transport-level failures.
impl From<GatewayError> for rmcp::ErrorData {
    fn from(err: GatewayError) -> Self {
        match &err {
            GatewayError::InvalidAddress { .. } => {
                rmcp::ErrorData::invalid_params(err.to_string(), None)
            }
            GatewayError::InvalidArgument { .. } => {
                rmcp::ErrorData::invalid_params(err.to_string(), None)
            }
            GatewayError::Query { message, sql_state } => {
                let msg = match sql_state {
                    Some(code) => format!("{} (SQLSTATE: {})", message, code),
                    None => message.clone(),
                };
                rmcp::ErrorData::invalid_params(msg, None)
            }
            GatewayError::Connection { suggestion, .. } => {
                rmcp::ErrorData::internal_error(err.to_string(), suggestion_data(Some(suggestion)))
            }
            GatewayError::Timeout { .. } => rmcp::ErrorData::internal_error(
                err.to_string(),
                suggestion_data(Some(
                    "Consider increasing the timeout or narrowing the operation",
                )),
            ),
            GatewayError::Catalog { .. } | GatewayError::Internal { .. } => {
                rmcp::ErrorData::internal_error(err.to_string(), suggestion_data(err.suggestion()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = GatewayError::connection("Failed to connect", "Check credentials");
        assert!(err.to_string().contains("Connection failed"));
    }

    #[test]
    fn test_catalog_error_names_object() {
        let err = GatewayError::catalog("relation missing", "users");
        assert!(err.to_string().contains("users"));
    }

    #[test]
    fn test_error_retryable() {
        assert!(GatewayError::timeout("query", 30).is_retryable());
        assert!(GatewayError::connection("err", "sugg").is_retryable());
        assert!(!GatewayError::invalid_argument("missing sql").is_retryable());
    }

    #[test]
    fn test_invalid_address_maps_to_invalid_params() {
        let err = GatewayError::invalid_address("postgres://h/t/wrong", "bad trailing segment");
        let mcp_err: rmcp::ErrorData = err.into();
        // invalid_params uses -32602
        assert_eq!(mcp_err.code.0, -32602);
    }

    #[test]
    fn test_query_error_includes_sql_state() {
        let err = GatewayError::query("syntax error", Some("42601".to_string()));
        let mcp_err: rmcp::ErrorData = err.into();
        assert!(mcp_err.message.contains("42601"));
    }

    #[test]
    fn test_connection_maps_to_internal_error() {
        let err = GatewayError::connection("failed", "try again");
        let mcp_err: rmcp::ErrorData = err.into();
        // internal_error uses -32603
        assert_eq!(mcp_err.code.0, -32603);
    }

    #[test]
    fn test_connection_error_includes_suggestion_in_data() {
        let err = GatewayError::connection("failed", "try reconnecting");
        let mcp_err: rmcp::ErrorData = err.into();
        let data = mcp_err.data.unwrap();
        assert_eq!(data["suggestion"], "try reconnecting");
    }

    #[test]
    fn test_from_catalog_preserves_connection_errors() {
        let err = GatewayError::from_catalog("users", sqlx::Error::PoolTimedOut);
        assert!(matches!(err, GatewayError::Timeout { .. }));
    }

    #[test]
    fn test_from_catalog_wraps_other_errors() {
        let err = GatewayError::from_catalog("users", sqlx::Error::RowNotFound);
        assert!(matches!(err, GatewayError::Catalog { .. }));
    }
}

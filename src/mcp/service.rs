//! MCP service implementation using rmcp.
//!
//! `SchemaService` exposes the four database tools via the rmcp tool router
//! and serves per-table schema documents as MCP resources. Tool failures are
//! reported as tool results with the `isError` flag set - a tool call always
//! produces a response, never a protocol fault. Resource reads are stricter:
//! a malformed address is a protocol-level error.

use crate::db::{CatalogReader, ConnectionGateway, ReadOnlyExecutor};
use crate::error::GatewayError;
use crate::models::DEFAULT_ROW_LIMIT;
use crate::resource::AddressScheme;
use crate::tools::{ConnectToolHandler, QueryInput, QueryToolHandler, SchemaToolHandler};
use rmcp::{
    ErrorData as McpError, RoleServer, ServerHandler,
    handler::server::tool::ToolRouter,
    handler::server::wrapper::Parameters,
    model::{
        AnnotateAble, CallToolResult, Content, Implementation, ListResourcesResult,
        PaginatedRequestParam, ProtocolVersion, RawResource, ReadResourceRequestParam,
        ReadResourceResult, ResourceContents, ServerCapabilities, ServerInfo,
    },
    service::RequestContext,
    tool, tool_handler, tool_router,
};
use serde::Serialize;
use std::sync::Arc;

const RESOURCE_MIME_TYPE: &str = "application/json";

#[derive(Clone)]
pub struct SchemaService {
    /// Shared connection gateway for all database operations
    gateway: Arc<ConnectionGateway>,
    /// Resource address scheme derived from the redacted connection URL
    addresses: AddressScheme,
    /// Query deadline applied by the read-only mediator
    query_timeout_secs: u64,
    /// Tool router for MCP tool dispatch (auto-generated)
    tool_router: ToolRouter<Self>,
}

impl SchemaService {
    /// Create a new SchemaService instance.
    pub fn new(
        gateway: Arc<ConnectionGateway>,
        addresses: AddressScheme,
        query_timeout_secs: u64,
    ) -> Self {
        Self {
            gateway,
            addresses,
            query_timeout_secs,
            tool_router: Self::tool_router(),
        }
    }

    /// Serialize a value into a successful JSON text content block.
    fn json_block<T: Serialize>(value: &T) -> Result<CallToolResult, McpError> {
        let text = serde_json::to_string_pretty(value)
            .map_err(|e| McpError::internal_error(format!("Serialization failed: {e}"), None))?;
        Ok(CallToolResult::success(vec![Content::text(text)]))
    }

    /// Convert a handler failure into an isError tool result.
    fn error_block(err: GatewayError) -> CallToolResult {
        CallToolResult::error(vec![Content::text(err.to_string())])
    }
}

#[tool_router]
impl SchemaService {
    #[tool(
        description = "Probe connectivity to the configured database.\nReturns the current table list on success."
    )]
    async fn connect_database(&self) -> Result<CallToolResult, McpError> {
        let handler = ConnectToolHandler::new(self.gateway.clone());
        match handler.connect().await {
            Ok(output) => Self::json_block(&output),
            Err(e) => Ok(Self::error_block(e)),
        }
    }

    #[tool(description = "List all tables in the database.\nReturns a JSON array of table names.")]
    async fn list_tables(&self) -> Result<CallToolResult, McpError> {
        let handler = SchemaToolHandler::new(self.gateway.clone());
        match handler.list_tables().await {
            Ok(tables) => Self::json_block(&tables),
            Err(e) => Ok(Self::error_block(e)),
        }
    }

    #[tool(
        description = "Get the complete database schema.\nReturns every table with its columns; read a table's schema resource for primary and foreign keys."
    )]
    async fn get_database_schema(&self) -> Result<CallToolResult, McpError> {
        let handler = SchemaToolHandler::new(self.gateway.clone());
        match handler.get_database_schema().await {
            Ok(schema) => Self::json_block(&schema),
            Err(e) => Ok(Self::error_block(e)),
        }
    }

    #[tool(
        description = "Run a read-only SQL query.\nThe statement executes in a read-only transaction that is always rolled back, so no change can persist.\nReturns a JSON array of result rows."
    )]
    async fn query(
        &self,
        Parameters(input): Parameters<QueryInput>,
    ) -> Result<CallToolResult, McpError> {
        let executor = ReadOnlyExecutor::with_defaults(self.query_timeout_secs, DEFAULT_ROW_LIMIT);
        let handler = QueryToolHandler::with_executor(self.gateway.clone(), executor);
        match handler.query(input).await {
            Ok(result) => Self::json_block(&result.rows),
            Err(e) => Ok(Self::error_block(e)),
        }
    }
}

#[tool_handler]
impl ServerHandler for SchemaService {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2025_03_26,
            capabilities: ServerCapabilities::builder()
                .enable_tools()
                .enable_resources()
                .build(),
            server_info: Implementation {
                name: "schema-mcp-server".to_owned(),
                title: Some("Schema MCP Server".to_owned()),
                version: env!("CARGO_PKG_VERSION").to_owned(),
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "Database schema introspection and read-only querying.\n\
                \n\
                ## Workflow\n\
                1. Call `connect_database` to verify connectivity and see the table list\n\
                2. Call `list_tables` or `get_database_schema` to explore the catalog\n\
                3. Read a table's schema resource (`.../<table>/schema`) for its\n\
                   columns, primary keys and foreign keys\n\
                4. Use `query` for read-only SQL - every statement runs in a\n\
                   read-only transaction and is rolled back, so writes never persist\n\
                \n\
                ## Example queries\n\
                - SELECT * FROM table_name LIMIT 10\n\
                - SELECT count(*) FROM table_name"
                    .to_string(),
            ),
        }
    }

    async fn list_resources(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListResourcesResult, McpError> {
        let tables = CatalogReader::list_tables(self.gateway.pool()).await?;

        let resources = tables
            .iter()
            .map(|table| {
                let uri = self.addresses.build(table)?;
                let mut raw = RawResource::new(uri.as_str(), table.clone());
                raw.mime_type = Some(RESOURCE_MIME_TYPE.to_string());
                Ok(raw.no_annotation())
            })
            .collect::<Result<Vec<_>, GatewayError>>()?;

        Ok(ListResourcesResult {
            meta: None,
            resources,
            next_cursor: None,
        })
    }

    async fn read_resource(
        &self,
        request: ReadResourceRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<ReadResourceResult, McpError> {
        let (table, _tag) = AddressScheme::parse(&request.uri)?;

        let handler = SchemaToolHandler::new(self.gateway.clone());
        let schema = handler.describe_table(&table).await?;
        let body = serde_json::to_string_pretty(&schema)
            .map_err(|e| McpError::internal_error(format!("Serialization failed: {e}"), None))?;

        let mut contents = ResourceContents::text(body, request.uri);
        if let ResourceContents::TextResourceContents { mime_type, .. } = &mut contents {
            *mime_type = Some(RESOURCE_MIME_TYPE.to_string());
        }

        Ok(ReadResourceResult {
            contents: vec![contents],
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_block_sets_is_error() {
        let result = SchemaService::error_block(GatewayError::invalid_argument("missing sql"));
        assert_eq!(result.is_error, Some(true));
    }

    #[test]
    fn test_json_block_round_trips() {
        let result = SchemaService::json_block(&vec!["users", "orders"]).unwrap();
        assert_ne!(result.is_error, Some(true));
    }
}

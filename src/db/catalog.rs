//! Catalog reading.
//!
//! Parameterized queries against `information_schema` that normalize raw
//! catalog rows into typed records. A table name that matches nothing is not
//! an error here: the queries simply return no rows. Only genuine execution
//! failures surface as errors.

use crate::error::{GatewayError, GatewayResult};
use crate::models::{ColumnDescriptor, ForeignKeyDescriptor};
use sqlx::{PgPool, Row};
use tracing::debug;

mod queries {
    pub const LIST_TABLES: &str = r#"
        SELECT table_name
        FROM information_schema.tables
        WHERE table_schema = 'public'
        AND table_type = 'BASE TABLE'
        "#;

    // Filtered by table name only. Same-named tables in other schemas fold
    // into the result; see DESIGN.md for the qualification trade-off.
    pub const READ_COLUMNS: &str = r#"
        SELECT
            column_name,
            data_type,
            is_nullable,
            column_default
        FROM information_schema.columns
        WHERE table_name = $1
        ORDER BY ordinal_position
        "#;

    pub const READ_PRIMARY_KEYS: &str = r#"
        SELECT kcu.column_name
        FROM information_schema.table_constraints tc
        JOIN information_schema.key_column_usage kcu
            ON tc.constraint_name = kcu.constraint_name
        WHERE tc.table_name = $1
        AND tc.constraint_type = 'PRIMARY KEY'
        "#;

    pub const READ_FOREIGN_KEYS: &str = r#"
        SELECT
            tc.constraint_name,
            kcu.column_name,
            ccu.table_name AS referred_table,
            ccu.column_name AS referred_column
        FROM information_schema.table_constraints tc
        JOIN information_schema.key_column_usage kcu
            ON tc.constraint_name = kcu.constraint_name
        JOIN information_schema.constraint_column_usage ccu
            ON ccu.constraint_name = tc.constraint_name
        WHERE tc.table_name = $1
        AND tc.constraint_type = 'FOREIGN KEY'
        "#;
}

/// Catalog reader over the public schema.
pub struct CatalogReader;

impl CatalogReader {
    /// List the names of all base tables in the public schema.
    ///
    /// Ordering is catalog-determined; no sort is imposed.
    pub async fn list_tables(pool: &PgPool) -> GatewayResult<Vec<String>> {
        let rows = sqlx::query(queries::LIST_TABLES)
            .fetch_all(pool)
            .await
            .map_err(|e| GatewayError::from_catalog("information_schema.tables", e))?;

        let tables = rows
            .iter()
            .map(|row| row.get::<String, _>("table_name"))
            .collect::<Vec<_>>();

        debug!(count = tables.len(), "Listed tables");
        Ok(tables)
    }

    /// Read the columns of a table in catalog order.
    pub async fn read_columns(pool: &PgPool, table: &str) -> GatewayResult<Vec<ColumnDescriptor>> {
        let rows = sqlx::query(queries::READ_COLUMNS)
            .bind(table)
            .fetch_all(pool)
            .await
            .map_err(|e| GatewayError::from_catalog(table, e))?;

        Ok(rows
            .iter()
            .map(|row| {
                let name: String = row.get("column_name");
                let data_type: String = row.get("data_type");
                let nullable: String = row.get("is_nullable");
                let default: Option<String> = row.try_get("column_default").ok().flatten();

                let mut col = ColumnDescriptor::new(name, data_type, nullable == "YES");
                if let Some(def) = default {
                    col = col.with_default(def);
                }
                col
            })
            .collect())
    }

    /// Read the primary-key column names of a table.
    pub async fn read_primary_keys(pool: &PgPool, table: &str) -> GatewayResult<Vec<String>> {
        let rows = sqlx::query(queries::READ_PRIMARY_KEYS)
            .bind(table)
            .fetch_all(pool)
            .await
            .map_err(|e| GatewayError::from_catalog(table, e))?;

        Ok(rows
            .iter()
            .map(|row| row.get::<String, _>("column_name"))
            .collect())
    }

    /// Read the foreign keys of a table, one descriptor per constrained
    /// column as the constraint catalog reports them.
    pub async fn read_foreign_keys(
        pool: &PgPool,
        table: &str,
    ) -> GatewayResult<Vec<ForeignKeyDescriptor>> {
        let rows = sqlx::query(queries::READ_FOREIGN_KEYS)
            .bind(table)
            .fetch_all(pool)
            .await
            .map_err(|e| GatewayError::from_catalog(table, e))?;

        Ok(rows
            .iter()
            .map(|row| {
                let name: String = row.get("constraint_name");
                let column: String = row.get("column_name");
                let referred_table: String = row.get("referred_table");
                let referred_column: String = row.get("referred_column");
                ForeignKeyDescriptor::new(name, column, referred_table, referred_column)
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_tables_query_targets_public_schema() {
        assert!(queries::LIST_TABLES.contains("table_schema = 'public'"));
        assert!(!queries::LIST_TABLES.contains("ORDER BY"));
    }

    #[test]
    fn test_column_query_orders_by_ordinal_position() {
        assert!(queries::READ_COLUMNS.contains("ORDER BY ordinal_position"));
    }

    #[test]
    fn test_constraint_queries_filter_by_type() {
        assert!(queries::READ_PRIMARY_KEYS.contains("'PRIMARY KEY'"));
        assert!(queries::READ_FOREIGN_KEYS.contains("'FOREIGN KEY'"));
    }
}

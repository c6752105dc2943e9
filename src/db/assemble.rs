//! Schema assembly.
//!
//! Composes catalog reader output into the per-table and whole-database
//! representations. Everything here is transient: built fresh from live
//! catalog state per request, discarded after serialization.

use crate::db::catalog::CatalogReader;
use crate::error::GatewayResult;
use crate::models::{DatabaseSchema, TableSchema};
use sqlx::PgPool;
use tracing::debug;

/// Assembles schema views from catalog reads.
pub struct SchemaAssembler;

impl SchemaAssembler {
    /// Describe one table: columns, primary keys and foreign keys.
    ///
    /// A name that matches no table yields a schema with empty columns, keys
    /// and foreign keys; the catalog does not distinguish an unknown table
    /// from a table with no columns.
    pub async fn describe_table(pool: &PgPool, table: &str) -> GatewayResult<TableSchema> {
        let (columns, primary_keys, foreign_keys) = tokio::try_join!(
            CatalogReader::read_columns(pool, table),
            CatalogReader::read_primary_keys(pool, table),
            CatalogReader::read_foreign_keys(pool, table),
        )?;

        debug!(
            table = table,
            columns = columns.len(),
            primary_keys = primary_keys.len(),
            foreign_keys = foreign_keys.len(),
            "Described table"
        );

        Ok(TableSchema {
            name: table.to_string(),
            columns,
            primary_keys,
            foreign_keys,
        })
    }

    /// Describe the whole database.
    ///
    /// The aggregate view carries columns only; primary and foreign keys are
    /// reported by `describe_table`. Views and indexes are reserved
    /// collections and stay empty.
    pub async fn describe_database(pool: &PgPool) -> GatewayResult<DatabaseSchema> {
        let tables = CatalogReader::list_tables(pool).await?;

        let mut db = DatabaseSchema::new();
        for table in tables {
            let columns = CatalogReader::read_columns(pool, &table).await?;
            db.insert_table(TableSchema {
                name: table,
                columns,
                primary_keys: Vec::new(),
                foreign_keys: Vec::new(),
            });
        }

        debug!(tables = db.tables.len(), "Described database");
        Ok(db)
    }
}

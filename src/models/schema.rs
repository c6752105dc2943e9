//! Schema-related data models.
//!
//! These types carry the structured representation of catalog state and
//! define the wire format clients see. Field names are stable: renaming any
//! serialized field is a breaking protocol change.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A single column as reported by the catalog.
///
/// The type string is the catalog-reported name, not normalized. The default
/// is the raw catalog expression text (e.g. `nextval('users_id_seq'::regclass)`),
/// never evaluated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnDescriptor {
    pub name: String,
    #[serde(rename = "type")]
    pub data_type: String,
    pub nullable: bool,
    pub default: Option<String>,
}

impl ColumnDescriptor {
    /// Create a new column descriptor.
    pub fn new(name: impl Into<String>, data_type: impl Into<String>, nullable: bool) -> Self {
        Self {
            name: name.into(),
            data_type: data_type.into(),
            nullable,
            default: None,
        }
    }

    /// Set the raw default expression.
    pub fn with_default(mut self, default: impl Into<String>) -> Self {
        self.default = Some(default.into());
        self
    }
}

/// A foreign key constraint on a table.
///
/// One descriptor per catalog row: composite keys surface as multiple
/// descriptors with single-element column lists. The referred table is
/// reported as-is from the catalog without checking it exists in the
/// current result set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForeignKeyDescriptor {
    pub name: String,
    pub constrained_columns: Vec<String>,
    pub referred_table: String,
    pub referred_columns: Vec<String>,
}

impl ForeignKeyDescriptor {
    /// Create a foreign key descriptor for a single constrained column.
    pub fn new(
        name: impl Into<String>,
        column: impl Into<String>,
        referred_table: impl Into<String>,
        referred_column: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            constrained_columns: vec![column.into()],
            referred_table: referred_table.into(),
            referred_columns: vec![referred_column.into()],
        }
    }
}

/// The full description of one table: ordered columns (catalog column
/// order), primary-key column names, and foreign keys.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableSchema {
    pub name: String,
    pub columns: Vec<ColumnDescriptor>,
    pub primary_keys: Vec<String>,
    pub foreign_keys: Vec<ForeignKeyDescriptor>,
}

impl TableSchema {
    /// Create an empty table schema.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            columns: Vec::new(),
            primary_keys: Vec::new(),
            foreign_keys: Vec::new(),
        }
    }

    /// Add a column.
    pub fn with_column(mut self, column: ColumnDescriptor) -> Self {
        self.columns.push(column);
        self
    }

    /// Set the primary key column names.
    pub fn with_primary_keys(mut self, columns: Vec<String>) -> Self {
        self.primary_keys = columns;
        self
    }

    /// Add a foreign key.
    pub fn with_foreign_key(mut self, fk: ForeignKeyDescriptor) -> Self {
        self.foreign_keys.push(fk);
        self
    }

    /// Check the structural invariant: every primary-key name and every
    /// foreign-key constrained column must name an existing column.
    pub fn is_consistent(&self) -> bool {
        let known = |name: &str| self.columns.iter().any(|c| c.name == name);
        self.primary_keys.iter().all(|pk| known(pk))
            && self
                .foreign_keys
                .iter()
                .flat_map(|fk| fk.constrained_columns.iter())
                .all(|c| known(c))
    }
}

/// The whole-database schema: a map of table name to schema, plus views and
/// indexes collections that are reserved and currently always empty.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DatabaseSchema {
    pub tables: BTreeMap<String, TableSchema>,
    pub views: Vec<String>,
    pub indexes: BTreeMap<String, serde_json::Value>,
}

impl DatabaseSchema {
    /// Create an empty database schema.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a table schema, keyed by table name.
    pub fn insert_table(&mut self, schema: TableSchema) {
        self.tables.insert(schema.name.clone(), schema);
    }

    /// Get the table names in this schema.
    pub fn table_names(&self) -> Vec<&str> {
        self.tables.keys().map(String::as_str).collect()
    }
}

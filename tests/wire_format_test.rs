//! Integration tests for the schema wire format.
//!
//! Clients depend on these exact field names; the assertions here pin them.

use schema_mcp_server::models::{
    ColumnDescriptor, DatabaseSchema, ForeignKeyDescriptor, TableSchema,
};
use serde_json::json;

/// Build the schema of the canonical users table:
/// `users(id int primary key, name text not null, email text)`.
fn users_schema() -> TableSchema {
    TableSchema::new("users")
        .with_column(ColumnDescriptor::new("id", "integer", false))
        .with_column(ColumnDescriptor::new("name", "text", false))
        .with_column(ColumnDescriptor::new("email", "text", true))
        .with_primary_keys(vec!["id".to_string()])
}

/// Build the schema of the canonical orders table:
/// `orders(id int primary key, user_id int references users(id))`.
fn orders_schema() -> TableSchema {
    TableSchema::new("orders")
        .with_column(ColumnDescriptor::new("id", "integer", false))
        .with_column(ColumnDescriptor::new("user_id", "integer", true))
        .with_primary_keys(vec!["id".to_string()])
        .with_foreign_key(ForeignKeyDescriptor::new(
            "orders_user_id_fkey",
            "user_id",
            "users",
            "id",
        ))
}

#[test]
fn test_users_table_wire_shape() {
    let schema = users_schema();
    assert!(schema.is_consistent());

    let value = serde_json::to_value(&schema).unwrap();
    assert_eq!(value["name"], "users");

    let columns: Vec<&str> = value["columns"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["name"].as_str().unwrap())
        .collect();
    assert_eq!(columns, vec!["id", "name", "email"]);

    assert_eq!(value["primary_keys"], json!(["id"]));
    assert_eq!(value["foreign_keys"], json!([]));
}

#[test]
fn test_orders_table_foreign_key_wire_shape() {
    let schema = orders_schema();
    assert!(schema.is_consistent());

    let value = serde_json::to_value(&schema).unwrap();
    let fk = &value["foreign_keys"][0];
    assert_eq!(fk["name"], "orders_user_id_fkey");
    assert_eq!(fk["constrained_columns"], json!(["user_id"]));
    assert_eq!(fk["referred_table"], "users");
    assert_eq!(fk["referred_columns"], json!(["id"]));
}

#[test]
fn test_column_wire_fields() {
    let col = ColumnDescriptor::new("email", "character varying", true)
        .with_default("'none'::character varying");
    let value = serde_json::to_value(&col).unwrap();

    // The serialized field is `type`, the catalog-reported name untouched
    assert_eq!(value["type"], "character varying");
    assert_eq!(value["nullable"], true);
    assert_eq!(value["default"], "'none'::character varying");
    assert!(value.get("data_type").is_none());
}

#[test]
fn test_database_schema_envelope_shape() {
    let mut db = DatabaseSchema::new();

    // The aggregate view reports columns only
    let mut users = users_schema();
    users.primary_keys.clear();
    db.insert_table(users);
    let mut orders = orders_schema();
    orders.primary_keys.clear();
    orders.foreign_keys.clear();
    db.insert_table(orders);

    let value = serde_json::to_value(&db).unwrap();
    assert!(value["tables"]["users"].is_object());
    assert!(value["tables"]["orders"].is_object());
    assert_eq!(value["tables"]["users"]["primary_keys"], json!([]));
    assert_eq!(value["tables"]["orders"]["foreign_keys"], json!([]));
    assert_eq!(value["views"], json!([]));
    assert_eq!(value["indexes"], json!({}));
}

#[test]
fn test_table_names_match_table_keys() {
    let mut db = DatabaseSchema::new();
    db.insert_table(users_schema());
    db.insert_table(orders_schema());

    let value = serde_json::to_value(&db).unwrap();
    let keys: Vec<&str> = value["tables"]
        .as_object()
        .unwrap()
        .keys()
        .map(String::as_str)
        .collect();
    let mut names = db.table_names();
    names.sort_unstable();
    assert_eq!(keys, names);
}

#[test]
fn test_wire_shape_deserializes_back() {
    let schema = orders_schema();
    let text = serde_json::to_string(&schema).unwrap();
    let parsed: TableSchema = serde_json::from_str(&text).unwrap();
    assert_eq!(parsed, schema);
}

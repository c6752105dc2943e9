//! PostgreSQL type mappings.
//!
//! Converts result rows into JSON maps. Conversion is a two-phase approach:
//! `TypeCategory` classifies the column's reported type, then a decoder
//! extracts the value. Values the decoders cannot represent become JSON
//! null rather than failing the whole row.

use crate::models::ColumnMetadata;
use serde_json::Value as JsonValue;
use sqlx::postgres::{PgRow, PgTypeInfo, PgValueRef};
use sqlx::{Column, Decode, Row, Type, TypeInfo};

/// Logical category for column types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeCategory {
    Integer,
    Float,
    Decimal,
    Boolean,
    Binary,
    Json,
    Uuid,
    Timestamp,
    Date,
    Time,
    Unknown,
}

/// Classify a PostgreSQL type name into a logical category.
pub fn categorize_type(type_name: &str) -> TypeCategory {
    let lower = type_name.to_lowercase();

    if lower.contains("numeric") || lower.contains("decimal") {
        return TypeCategory::Decimal;
    }

    if lower.contains("int") || lower.contains("serial") {
        return TypeCategory::Integer;
    }

    if lower == "bool" || lower == "boolean" {
        return TypeCategory::Boolean;
    }

    if lower.contains("float")
        || lower.contains("double")
        || lower == "real"
        || lower == "float4"
        || lower == "float8"
    {
        return TypeCategory::Float;
    }

    if lower == "json" || lower == "jsonb" {
        return TypeCategory::Json;
    }

    if lower == "uuid" {
        return TypeCategory::Uuid;
    }

    if lower == "bytea" {
        return TypeCategory::Binary;
    }

    if lower.starts_with("timestamp") {
        return TypeCategory::Timestamp;
    }

    if lower == "date" {
        return TypeCategory::Date;
    }

    if lower == "time" || lower == "timetz" {
        return TypeCategory::Time;
    }

    // varchar, text, char, interval, enums, etc. decode as text
    TypeCategory::Unknown
}

/// Wrapper for raw NUMERIC/DECIMAL values as strings, preserving the exact
/// database representation instead of rounding through a float.
#[derive(Debug)]
pub struct RawDecimal(pub String);

impl Type<sqlx::Postgres> for RawDecimal {
    fn type_info() -> PgTypeInfo {
        <String as Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &PgTypeInfo) -> bool {
        let name = ty.name().to_lowercase();
        name.contains("numeric") || name.contains("decimal")
    }
}

impl<'r> Decode<'r, sqlx::Postgres> for RawDecimal {
    fn decode(value: PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s = <&str as Decode<sqlx::Postgres>>::decode(value)?;
        Ok(RawDecimal(s.to_string()))
    }
}

/// Decode binary data to JSON: UTF-8 text when possible, base64 otherwise.
pub fn decode_binary_value(bytes: &[u8]) -> JsonValue {
    use base64::{Engine as _, engine::general_purpose::STANDARD};

    match std::str::from_utf8(bytes) {
        Ok(s) => JsonValue::String(s.to_string()),
        Err(_) => JsonValue::String(STANDARD.encode(bytes)),
    }
}

/// Conversion of result rows to JSON maps.
pub trait RowToJson {
    fn to_json_map(&self) -> serde_json::Map<String, JsonValue>;
    fn get_column_metadata(&self) -> Vec<ColumnMetadata>;
}

impl RowToJson for PgRow {
    fn to_json_map(&self) -> serde_json::Map<String, JsonValue> {
        self.columns()
            .iter()
            .enumerate()
            .map(|(idx, col)| {
                let category = categorize_type(col.type_info().name());
                let value = decode_column(self, idx, category);
                (col.name().to_string(), value)
            })
            .collect()
    }

    fn get_column_metadata(&self) -> Vec<ColumnMetadata> {
        self.columns()
            .iter()
            .map(|col| {
                ColumnMetadata::new(
                    col.name(),
                    col.type_info().name(),
                    !col.type_info().is_null(),
                )
            })
            .collect()
    }
}

fn decode_column(row: &PgRow, idx: usize, category: TypeCategory) -> JsonValue {
    match category {
        TypeCategory::Decimal => decode_decimal(row, idx),
        TypeCategory::Integer => decode_integer(row, idx),
        TypeCategory::Boolean => decode_boolean(row, idx),
        TypeCategory::Float => decode_float(row, idx),
        TypeCategory::Binary => decode_binary_col(row, idx),
        TypeCategory::Json => decode_json(row, idx),
        TypeCategory::Uuid => decode_uuid(row, idx),
        TypeCategory::Timestamp => decode_timestamp(row, idx),
        TypeCategory::Date => decode_date(row, idx),
        TypeCategory::Time => decode_time(row, idx),
        TypeCategory::Unknown => decode_text(row, idx),
    }
}

fn decode_decimal(row: &PgRow, idx: usize) -> JsonValue {
    match row.try_get::<Option<RawDecimal>, _>(idx) {
        Ok(Some(v)) => JsonValue::String(v.0),
        Ok(None) => JsonValue::Null,
        Err(e) => {
            tracing::error!("Failed to decode NUMERIC: {:?}", e);
            JsonValue::Null
        }
    }
}

fn decode_integer(row: &PgRow, idx: usize) -> JsonValue {
    if let Ok(None) = row.try_get::<Option<i64>, _>(idx) {
        return JsonValue::Null;
    }
    if let Ok(Some(v)) = row.try_get::<Option<i16>, _>(idx) {
        return JsonValue::Number(v.into());
    }
    if let Ok(Some(v)) = row.try_get::<Option<i32>, _>(idx) {
        return JsonValue::Number(v.into());
    }
    if let Ok(Some(v)) = row.try_get::<Option<i64>, _>(idx) {
        return JsonValue::Number(v.into());
    }
    JsonValue::Null
}

fn decode_boolean(row: &PgRow, idx: usize) -> JsonValue {
    row.try_get::<Option<bool>, _>(idx)
        .ok()
        .flatten()
        .map(JsonValue::Bool)
        .unwrap_or(JsonValue::Null)
}

fn decode_float(row: &PgRow, idx: usize) -> JsonValue {
    if let Ok(Some(v)) = row.try_get::<Option<f64>, _>(idx) {
        return serde_json::Number::from_f64(v)
            .map(JsonValue::Number)
            .unwrap_or_else(|| JsonValue::String(v.to_string()));
    }
    if let Ok(Some(v)) = row.try_get::<Option<f32>, _>(idx) {
        return serde_json::Number::from_f64(v as f64)
            .map(JsonValue::Number)
            .unwrap_or_else(|| JsonValue::String(v.to_string()));
    }
    JsonValue::Null
}

fn decode_binary_col(row: &PgRow, idx: usize) -> JsonValue {
    row.try_get::<Option<Vec<u8>>, _>(idx)
        .ok()
        .flatten()
        .map(|v| decode_binary_value(&v))
        .unwrap_or(JsonValue::Null)
}

fn decode_json(row: &PgRow, idx: usize) -> JsonValue {
    row.try_get::<Option<serde_json::Value>, _>(idx)
        .ok()
        .flatten()
        .unwrap_or(JsonValue::Null)
}

fn decode_uuid(row: &PgRow, idx: usize) -> JsonValue {
    row.try_get::<Option<uuid::Uuid>, _>(idx)
        .ok()
        .flatten()
        .map(|v| JsonValue::String(v.to_string()))
        .unwrap_or(JsonValue::Null)
}

fn decode_timestamp(row: &PgRow, idx: usize) -> JsonValue {
    if let Ok(Some(v)) = row.try_get::<Option<chrono::DateTime<chrono::Utc>>, _>(idx) {
        return JsonValue::String(v.to_rfc3339());
    }
    if let Ok(Some(v)) = row.try_get::<Option<chrono::NaiveDateTime>, _>(idx) {
        return JsonValue::String(v.to_string());
    }
    JsonValue::Null
}

fn decode_date(row: &PgRow, idx: usize) -> JsonValue {
    row.try_get::<Option<chrono::NaiveDate>, _>(idx)
        .ok()
        .flatten()
        .map(|v| JsonValue::String(v.to_string()))
        .unwrap_or(JsonValue::Null)
}

fn decode_time(row: &PgRow, idx: usize) -> JsonValue {
    row.try_get::<Option<chrono::NaiveTime>, _>(idx)
        .ok()
        .flatten()
        .map(|v| JsonValue::String(v.to_string()))
        .unwrap_or(JsonValue::Null)
}

fn decode_text(row: &PgRow, idx: usize) -> JsonValue {
    row.try_get::<Option<String>, _>(idx)
        .ok()
        .flatten()
        .map(JsonValue::String)
        .unwrap_or(JsonValue::Null)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_categorize_type_integer() {
        assert_eq!(categorize_type("INT4"), TypeCategory::Integer);
        assert_eq!(categorize_type("INT8"), TypeCategory::Integer);
        assert_eq!(categorize_type("bigint"), TypeCategory::Integer);
        assert_eq!(categorize_type("serial"), TypeCategory::Integer);
    }

    #[test]
    fn test_categorize_type_decimal() {
        assert_eq!(categorize_type("NUMERIC"), TypeCategory::Decimal);
        assert_eq!(categorize_type("numeric(10,2)"), TypeCategory::Decimal);
    }

    #[test]
    fn test_categorize_type_temporal() {
        assert_eq!(categorize_type("timestamp"), TypeCategory::Timestamp);
        assert_eq!(categorize_type("TIMESTAMPTZ"), TypeCategory::Timestamp);
        assert_eq!(categorize_type("date"), TypeCategory::Date);
        assert_eq!(categorize_type("timetz"), TypeCategory::Time);
    }

    #[test]
    fn test_categorize_type_json_and_uuid() {
        assert_eq!(categorize_type("json"), TypeCategory::Json);
        assert_eq!(categorize_type("JSONB"), TypeCategory::Json);
        assert_eq!(categorize_type("uuid"), TypeCategory::Uuid);
    }

    #[test]
    fn test_categorize_type_fallback() {
        assert_eq!(categorize_type("VARCHAR"), TypeCategory::Unknown);
        assert_eq!(categorize_type("interval"), TypeCategory::Unknown);
    }

    #[test]
    fn test_decode_binary_value_with_valid_utf8() {
        let result = decode_binary_value(b"hello world");
        assert_eq!(result, JsonValue::String("hello world".to_string()));
    }

    #[test]
    fn test_decode_binary_value_with_invalid_utf8() {
        let bytes: &[u8] = &[0xFF, 0xFE, 0x00, 0x01];
        let result = decode_binary_value(bytes);
        assert_eq!(result, JsonValue::String("//4AAQ==".to_string()));
    }
}

//! Resource addressing for table schemas.
//!
//! Every table is exposed as a read-only resource addressed by a URI derived
//! from the connection target: the redacted base URL (password removed,
//! query stripped) with the table name and the literal `schema` segment
//! appended, e.g. `postgres://user@host:5432/mydb/users/schema`.
//!
//! Parsing is the exact inverse of building. The trailing segment is the
//! only structural validation; table-name segments pass through unchecked.

use crate::error::{GatewayError, GatewayResult};
use url::Url;

/// The fixed trailing path segment of every table-schema address.
pub const SCHEMA_SEGMENT: &str = "schema";

/// Builds table-schema resource addresses from a fixed base URL.
///
/// The base must be credential-safe (see `DatabaseConfig::redacted_url`);
/// addresses are shown to protocol clients verbatim.
#[derive(Debug, Clone)]
pub struct AddressScheme {
    base: Url,
}

impl AddressScheme {
    /// Create an address scheme over the given base URL.
    pub fn new(base: Url) -> Self {
        Self { base }
    }

    /// The base URL addresses are derived from.
    pub fn base(&self) -> &Url {
        &self.base
    }

    /// Derive the resource URI for a table's schema.
    pub fn build(&self, table: &str) -> GatewayResult<Url> {
        let mut uri = self.base.clone();
        uri.path_segments_mut()
            .map_err(|_| {
                GatewayError::internal(format!("base URL '{}' cannot carry a path", self.base))
            })?
            .pop_if_empty()
            .extend(&[table, SCHEMA_SEGMENT]);
        Ok(uri)
    }

    /// Split a resource URI back into `(table_name, path_tag)`.
    ///
    /// Fails with an invalid-address error when the trailing segment is not
    /// the literal `schema`.
    pub fn parse(uri: &str) -> GatewayResult<(String, String)> {
        let url = Url::parse(uri)
            .map_err(|e| GatewayError::invalid_address(uri, format!("not a valid URI: {e}")))?;

        let mut segments: Vec<&str> = url
            .path_segments()
            .map(|s| s.collect())
            .unwrap_or_default();

        let tag = segments
            .pop()
            .filter(|s| !s.is_empty())
            .ok_or_else(|| GatewayError::invalid_address(uri, "missing path segments"))?;
        let table = segments
            .pop()
            .ok_or_else(|| GatewayError::invalid_address(uri, "missing table segment"))?;

        if tag != SCHEMA_SEGMENT {
            return Err(GatewayError::invalid_address(
                uri,
                format!(
                    "expected trailing '{}' segment, found '{}'",
                    SCHEMA_SEGMENT, tag
                ),
            ));
        }

        Ok((table.to_string(), tag.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scheme() -> AddressScheme {
        AddressScheme::new(Url::parse("postgres://alice@db.internal:5432/shop").unwrap())
    }

    #[test]
    fn test_build_address() {
        let uri = scheme().build("users").unwrap();
        assert_eq!(
            uri.as_str(),
            "postgres://alice@db.internal:5432/shop/users/schema"
        );
    }

    #[test]
    fn test_build_address_base_without_database() {
        let scheme = AddressScheme::new(Url::parse("postgres://db.internal:5432/").unwrap());
        let uri = scheme.build("users").unwrap();
        assert_eq!(uri.as_str(), "postgres://db.internal:5432/users/schema");
    }

    #[test]
    fn test_parse_address() {
        let (table, tag) =
            AddressScheme::parse("postgres://alice@db.internal:5432/shop/orders/schema").unwrap();
        assert_eq!(table, "orders");
        assert_eq!(tag, SCHEMA_SEGMENT);
    }

    #[test]
    fn test_round_trip() {
        let scheme = scheme();
        for table in ["users", "orders", "order_items", "a"] {
            let uri = scheme.build(table).unwrap();
            let (parsed, tag) = AddressScheme::parse(uri.as_str()).unwrap();
            assert_eq!(parsed, table);
            assert_eq!(tag, SCHEMA_SEGMENT);
        }
    }

    #[test]
    fn test_parse_rejects_wrong_trailing_segment() {
        let err =
            AddressScheme::parse("postgres://alice@db.internal:5432/shop/users/data").unwrap_err();
        assert!(matches!(err, GatewayError::InvalidAddress { .. }));
    }

    #[test]
    fn test_parse_rejects_missing_segments() {
        let err = AddressScheme::parse("postgres://db.internal:5432/").unwrap_err();
        assert!(matches!(err, GatewayError::InvalidAddress { .. }));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        let err = AddressScheme::parse("not a uri at all").unwrap_err();
        assert!(matches!(err, GatewayError::InvalidAddress { .. }));
    }

    #[test]
    fn test_parse_passes_table_segment_through_unchecked() {
        // Only the trailing tag is validated; odd table segments survive.
        let (table, _) =
            AddressScheme::parse("postgres://db.internal/shop/123-weird/schema").unwrap();
        assert_eq!(table, "123-weird");
    }
}

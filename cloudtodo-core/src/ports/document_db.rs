//! Document database port
//!
//! A schema-flexible store addressed by collection + id, with field-level
//! partial updates and field-equality queries.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde_json::{Map, Value as JsonValue};

use crate::domain::result::Result;

/// A value to write into a document field
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// A literal JSON value
    Value(JsonValue),
    /// Resolved by the database to its own clock at write time
    ServerTimestamp,
}

impl From<JsonValue> for FieldValue {
    fn from(value: JsonValue) -> Self {
        FieldValue::Value(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Value(JsonValue::String(value.to_string()))
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Value(JsonValue::String(value))
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Value(JsonValue::Bool(value))
    }
}

/// Fields of a write, keyed by field name
pub type Fields = BTreeMap<String, FieldValue>;

/// Resolve write fields against a server timestamp
///
/// Timestamps are stored as RFC 3339 UTC strings with microsecond precision.
pub fn resolve_fields(fields: Fields, now: DateTime<Utc>) -> Map<String, JsonValue> {
    fields
        .into_iter()
        .map(|(name, value)| {
            let resolved = match value {
                FieldValue::Value(v) => v,
                FieldValue::ServerTimestamp => JsonValue::String(format_timestamp(now)),
            };
            (name, resolved)
        })
        .collect()
}

/// Format a timestamp the way documents store it
pub fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(chrono::SecondsFormat::Micros, true)
}

/// A stored document
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub id: String,
    pub fields: Map<String, JsonValue>,
}

impl Document {
    pub fn new(id: impl Into<String>, fields: Map<String, JsonValue>) -> Self {
        Self {
            id: id.into(),
            fields,
        }
    }

    /// Get a string field, if present and a string
    pub fn get_str(&self, field: &str) -> Option<&str> {
        self.fields.get(field).and_then(|v| v.as_str())
    }

    /// Whether `field` holds exactly `value`
    pub fn field_equals(&self, field: &str, value: &JsonValue) -> bool {
        self.fields.get(field) == Some(value)
    }
}

/// Document database abstraction
///
/// Every call blocks until the database has answered. Failures of the
/// underlying store surface as [`crate::Error::Storage`].
pub trait DocumentDatabase: Send + Sync {
    /// Backend name (e.g., "duckdb", "memory")
    fn name(&self) -> &str;

    /// Insert a new document and return its freshly assigned id
    fn insert(&self, collection: &str, fields: Fields) -> Result<String>;

    /// Fetch a document by id
    fn get_by_id(&self, collection: &str, id: &str) -> Result<Option<Document>>;

    /// All documents whose `field` equals `value`, in storage order
    fn query_by_field(
        &self,
        collection: &str,
        field: &str,
        value: &JsonValue,
    ) -> Result<Vec<Document>>;

    /// Merge `fields` into an existing document
    ///
    /// Fields not named are left untouched. Fails with
    /// [`crate::Error::NotFound`] when the document does not exist.
    fn update_fields(&self, collection: &str, id: &str, fields: Fields) -> Result<()>;

    /// Delete a document; deleting an absent id is not an error
    fn delete_by_id(&self, collection: &str, id: &str) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn test_resolve_server_timestamp() {
        let now = Utc.with_ymd_and_hms(2024, 5, 1, 12, 30, 0).unwrap();
        let mut fields = Fields::new();
        fields.insert("title".to_string(), "Write report".into());
        fields.insert("timestamp".to_string(), FieldValue::ServerTimestamp);

        let resolved = resolve_fields(fields, now);
        assert_eq!(resolved["title"], json!("Write report"));
        assert_eq!(resolved["timestamp"], json!("2024-05-01T12:30:00.000000Z"));
    }

    #[test]
    fn test_field_equals_is_type_strict() {
        let mut fields = Map::new();
        fields.insert("completed".to_string(), json!(false));
        let doc = Document::new("d1", fields);

        assert!(doc.field_equals("completed", &json!(false)));
        assert!(!doc.field_equals("completed", &json!("false")));
        assert!(!doc.field_equals("missing", &json!(false)));
    }
}

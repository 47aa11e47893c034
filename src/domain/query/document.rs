//! Schemaless document values exchanged with the backing store.

use serde::Serialize;
use serde_json::{Map, Value};

use super::QueryError;

/// A JSON object as stored by the document store.
pub type Document = Map<String, Value>;

/// Key under which the primary key is exposed in returned records.
pub const ID_FIELD: &str = "id";
pub const CREATED_AT_FIELD: &str = "created_at";
pub const UPDATED_AT_FIELD: &str = "updated_at";

/// A document body together with its key in the collection.
///
/// The key is not part of the stored body; [`StoredDocument::into_record`]
/// produces the relational-style row that callers see.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredDocument {
    pub id: String,
    pub data: Document,
}

impl StoredDocument {
    pub fn new(id: impl Into<String>, data: Document) -> Self {
        Self {
            id: id.into(),
            data,
        }
    }

    /// Body with `id` inserted, as returned by the query surface.
    pub fn into_record(self) -> Document {
        let mut record = self.data;
        record.insert(ID_FIELD.to_string(), Value::String(self.id));
        record
    }
}

/// Shallow merge: every top-level key of `patch` replaces the one in `base`.
///
/// Nested values are never merged field by field; a list or object in the
/// patch overwrites the stored one wholesale.
pub fn merge_fields(base: &mut Document, patch: &Document) {
    for (key, value) in patch {
        base.insert(key.clone(), value.clone());
    }
}

/// Serializes a caller payload into a document.
///
/// # Errors
///
/// Returns an `INVALID_PAYLOAD` error when the payload does not serialize
/// to a JSON object.
pub fn to_document<T: Serialize + ?Sized>(payload: &T) -> Result<Document, QueryError> {
    match serde_json::to_value(payload) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(other) => Err(QueryError::invalid_payload(format!(
            "payload must be a JSON object, got {}",
            json_kind(&other)
        ))),
        Err(e) => Err(QueryError::invalid_payload(e.to_string())),
    }
}

/// Text form of a scalar JSON value, used to compare filter values.
pub fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

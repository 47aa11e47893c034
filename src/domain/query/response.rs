//! The uniform `{data, error}` result shape of the query surface.
//!
//! Every adapter operation resolves to a [`QueryResponse`] instead of
//! panicking or returning early, so callers check one error field no matter
//! which backend produced the failure.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::domain::foundation::ValidationError;

use super::Document;

/// Error codes surfaced by the query adapter.
///
/// Codes that have a relational counterpart reuse it so callers written
/// against a relational client can keep matching on them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QueryErrorCode {
    /// Secondary or primary lookup matched nothing.
    #[serde(rename = "PGRST116")]
    NotFound,

    /// Table, column, operator, filter or bucket outside the supported subset.
    #[serde(rename = "NOT_IMPLEMENTED")]
    NotImplemented,

    /// Insert with a key that already exists.
    #[serde(rename = "23505")]
    Conflict,

    /// Payload is not an object or fails typed validation.
    #[serde(rename = "INVALID_PAYLOAD")]
    InvalidPayload,

    /// Upload exceeds the configured limit.
    #[serde(rename = "PAYLOAD_TOO_LARGE")]
    PayloadTooLarge,

    /// Opaque failure from the backing store or blob storage.
    #[serde(rename = "BACKEND_ERROR")]
    Backend,
}

impl QueryErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            QueryErrorCode::NotFound => "PGRST116",
            QueryErrorCode::NotImplemented => "NOT_IMPLEMENTED",
            QueryErrorCode::Conflict => "23505",
            QueryErrorCode::InvalidPayload => "INVALID_PAYLOAD",
            QueryErrorCode::PayloadTooLarge => "PAYLOAD_TOO_LARGE",
            QueryErrorCode::Backend => "BACKEND_ERROR",
        }
    }
}

impl fmt::Display for QueryErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error half of a [`QueryResponse`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[error("[{code}] {message}")]
pub struct QueryError {
    pub code: QueryErrorCode,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl QueryError {
    pub fn new(code: QueryErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(QueryErrorCode::NotFound, message)
    }

    pub fn not_implemented(what: impl fmt::Display) -> Self {
        Self::new(
            QueryErrorCode::NotImplemented,
            format!("not implemented: {what}"),
        )
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(QueryErrorCode::Conflict, message)
    }

    pub fn invalid_payload(message: impl Into<String>) -> Self {
        Self::new(QueryErrorCode::InvalidPayload, message)
    }

    pub fn payload_too_large(size_bytes: u64, max_bytes: u64) -> Self {
        Self::new(
            QueryErrorCode::PayloadTooLarge,
            format!("payload of {size_bytes} bytes exceeds limit of {max_bytes} bytes"),
        )
    }

    pub fn backend(message: impl Into<String>) -> Self {
        Self::new(QueryErrorCode::Backend, message)
    }

    /// Adds free-form details to the error.
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn is_not_found(&self) -> bool {
        self.code == QueryErrorCode::NotFound
    }

    pub fn is_not_implemented(&self) -> bool {
        self.code == QueryErrorCode::NotImplemented
    }
}

impl From<ValidationError> for QueryError {
    fn from(err: ValidationError) -> Self {
        QueryError::invalid_payload(err.to_string()).with_details(err.field().to_string())
    }
}

/// Result envelope of every adapter operation.
///
/// Exactly one of three states holds:
/// - `data: Some, error: None` - success with a value
/// - `data: None, error: None` - success with nothing to return
/// - `data: None, error: Some` - failure
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryResponse<T> {
    pub data: Option<T>,
    pub error: Option<QueryError>,
}

impl<T> QueryResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            data: Some(data),
            error: None,
        }
    }

    pub fn empty() -> Self {
        Self {
            data: None,
            error: None,
        }
    }

    pub fn failed(error: QueryError) -> Self {
        Self {
            data: None,
            error: Some(error),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }

    /// Converts the envelope into a `Result` for `?`-style callers.
    pub fn into_result(self) -> Result<Option<T>, QueryError> {
        match self.error {
            Some(error) => Err(error),
            None => Ok(self.data),
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> QueryResponse<U> {
        QueryResponse {
            data: self.data.map(f),
            error: self.error,
        }
    }
}

impl<T> From<Result<Option<T>, QueryError>> for QueryResponse<T> {
    fn from(result: Result<Option<T>, QueryError>) -> Self {
        match result {
            Ok(Some(data)) => QueryResponse::ok(data),
            Ok(None) => QueryResponse::empty(),
            Err(error) => QueryResponse::failed(error),
        }
    }
}

impl QueryResponse<Document> {
    /// Decodes the returned record into a typed value.
    ///
    /// A record that does not fit `T` turns into an `INVALID_PAYLOAD` error.
    pub fn decode<T: DeserializeOwned>(self) -> QueryResponse<T> {
        let result = self.into_result().and_then(|data| {
            data.map(|record| {
                serde_json::from_value(serde_json::Value::Object(record))
                    .map_err(|e| QueryError::invalid_payload(format!("cannot decode record: {e}")))
            })
            .transpose()
        });
        result.into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn not_found_serializes_with_relational_code() {
        let err = QueryError::not_found("no rows");
        let value = serde_json::to_value(&err).unwrap();
        assert_eq!(value, json!({"code": "PGRST116", "message": "no rows"}));
    }

    #[test]
    fn response_shape_serializes_nulls() {
        let response: QueryResponse<Document> = QueryResponse::empty();
        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value, json!({"data": null, "error": null}));
    }

    #[test]
    fn into_result_splits_error() {
        let failed: QueryResponse<u8> = QueryResponse::failed(QueryError::not_implemented("x"));
        assert!(failed.into_result().unwrap_err().is_not_implemented());

        let empty: QueryResponse<u8> = QueryResponse::empty();
        assert_eq!(empty.into_result().unwrap(), None);
    }

    #[test]
    fn validation_error_becomes_invalid_payload() {
        let err: QueryError = ValidationError::empty_field("author").into();
        assert_eq!(err.code, QueryErrorCode::InvalidPayload);
        assert_eq!(err.details.as_deref(), Some("author"));
    }

    #[test]
    fn decode_maps_shape_mismatch_to_invalid_payload() {
        #[derive(Debug, serde::Deserialize)]
        struct Named {
            #[allow(dead_code)]
            name: String,
        }

        let record = json!({"name": 5}).as_object().cloned().unwrap();
        let decoded = QueryResponse::ok(record).decode::<Named>();
        assert_eq!(
            decoded.error.map(|e| e.code),
            Some(QueryErrorCode::InvalidPayload)
        );
    }

    #[test]
    fn display_includes_code() {
        let err = QueryError::conflict("duplicate key");
        assert_eq!(err.to_string(), "[23505] duplicate key");
    }
}

//! Document Store Port - Interface for the document-oriented backing store.
//!
//! The query adapter translates relational-style calls into these
//! operations. Collections hold JSON object documents keyed by id; the id is
//! not part of the stored body.

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tokio::sync::broadcast;

use crate::domain::foundation::Timestamp;
use crate::domain::query::{Document, StoredDocument, UPDATED_AT_FIELD};

/// Port for document reads, writes and change notifications.
///
/// # Contract
///
/// Implementations must:
/// - Return field query matches ordered by document id
/// - Apply `merge` as a shallow top-level merge
/// - Broadcast one [`DocumentChange`] per successful write
///
/// No operation is transactional across calls; callers needing
/// read-then-write must accept that another writer may interleave.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Fetches one document by id.
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, StoreError>;

    /// Documents whose top-level `field` equals `value`, ordered by id.
    ///
    /// `limit` caps the number of returned matches when set.
    async fn find_by_field(
        &self,
        collection: &str,
        field: &str,
        value: &Value,
        limit: Option<usize>,
    ) -> Result<Vec<StoredDocument>, StoreError>;

    /// Writes a new document.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::AlreadyExists` if the id is taken.
    async fn create(&self, collection: &str, id: &str, data: Document) -> Result<(), StoreError>;

    /// Merges top-level fields into an existing document.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the document does not exist.
    async fn merge(&self, collection: &str, id: &str, fields: Document) -> Result<(), StoreError>;

    /// Subscribes to every change committed after this call returns.
    fn changes(&self) -> broadcast::Receiver<DocumentChange>;
}

/// Kind of committed write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeKind {
    Created,
    Updated,
}

/// Snapshot notification for one committed write.
///
/// Carries the full document after the write; prior state is not kept.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentChange {
    pub collection: String,
    pub id: String,
    pub kind: ChangeKind,
    pub data: Document,
    pub committed_at: Timestamp,
}

impl DocumentChange {
    /// `committed_at` is the document's own `updated_at` stamp when it has
    /// one, so listeners see the same time the row carries.
    pub fn new(
        collection: impl Into<String>,
        id: impl Into<String>,
        kind: ChangeKind,
        data: Document,
    ) -> Self {
        let committed_at = data
            .get(UPDATED_AT_FIELD)
            .and_then(Value::as_str)
            .and_then(Timestamp::parse_rfc3339)
            .unwrap_or_else(Timestamp::now);
        Self {
            collection: collection.into(),
            id: id.into(),
            kind,
            data,
            committed_at,
        }
    }
}

/// Errors that can occur during document store operations.
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    #[error("Document not found: {collection}/{id}")]
    NotFound { collection: String, id: String },

    #[error("Document already exists: {collection}/{id}")]
    AlreadyExists { collection: String, id: String },

    #[error("Invalid document key: {key}")]
    InvalidKey { key: String },

    #[error("Failed to serialize document: {0}")]
    Serialization(String),

    #[error("IO error: {0}")]
    Io(String),

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

impl StoreError {
    pub fn not_found(collection: &str, id: &str) -> Self {
        Self::NotFound {
            collection: collection.to_string(),
            id: id.to_string(),
        }
    }

    pub fn already_exists(collection: &str, id: &str) -> Self {
        Self::AlreadyExists {
            collection: collection.to_string(),
            id: id.to_string(),
        }
    }

    pub fn invalid_key(key: impl Into<String>) -> Self {
        Self::InvalidKey { key: key.into() }
    }
}

impl From<std::io::Error> for StoreError {
    fn from(err: std::io::Error) -> Self {
        StoreError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Serialization(err.to_string())
    }
}

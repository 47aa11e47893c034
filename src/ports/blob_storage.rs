//! Blob Storage Port - Interface for uploaded files.
//!
//! Objects are addressed by bucket plus a relative [`ObjectPath`]. Public
//! URLs are derived, not stored.

use async_trait::async_trait;
use bytes::Bytes;
use serde::Serialize;
use thiserror::Error;

use crate::domain::foundation::Timestamp;
use crate::domain::storage::{Bucket, ObjectPath};

/// Port for blob upload, download, removal and URL derivation.
#[async_trait]
pub trait BlobStorage: Send + Sync {
    /// Stores an object.
    ///
    /// # Errors
    ///
    /// Returns `BlobError::AlreadyExists` when the object exists and `upsert`
    /// is false.
    async fn upload(
        &self,
        bucket: Bucket,
        path: &ObjectPath,
        content: Bytes,
        content_type: &str,
        upsert: bool,
    ) -> Result<StoredObject, BlobError>;

    /// Reads an object back.
    async fn download(&self, bucket: Bucket, path: &ObjectPath) -> Result<Bytes, BlobError>;

    /// Removes objects; missing ones are skipped.
    ///
    /// Returns the paths that were actually removed.
    async fn remove(
        &self,
        bucket: Bucket,
        paths: &[ObjectPath],
    ) -> Result<Vec<ObjectPath>, BlobError>;

    /// Public URL of an object. Does not check existence.
    fn public_url(&self, bucket: Bucket, path: &ObjectPath) -> String;
}

/// Metadata of a stored object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoredObject {
    pub bucket: Bucket,
    pub path: ObjectPath,
    pub size_bytes: u64,
    pub content_type: String,
    /// Hex SHA-256 of the content.
    pub etag: String,
    pub uploaded_at: Timestamp,
}

/// Builds a public URL under a base, trimming duplicate slashes.
pub fn join_public_url(base: &str, bucket: Bucket, path: &ObjectPath) -> String {
    format!("{}/{}/{}", base.trim_end_matches('/'), bucket, path)
}

/// Errors that can occur during blob operations.
#[derive(Debug, Clone, Error)]
pub enum BlobError {
    #[error("Object not found: {bucket}/{path}")]
    NotFound { bucket: Bucket, path: String },

    #[error("Object already exists: {bucket}/{path}")]
    AlreadyExists { bucket: Bucket, path: String },

    #[error("IO error: {0}")]
    Io(String),

    #[error("Blob storage unavailable: {0}")]
    Unavailable(String),
}

impl BlobError {
    pub fn not_found(bucket: Bucket, path: &ObjectPath) -> Self {
        Self::NotFound {
            bucket,
            path: path.to_string(),
        }
    }

    pub fn already_exists(bucket: Bucket, path: &ObjectPath) -> Self {
        Self::AlreadyExists {
            bucket,
            path: path.to_string(),
        }
    }
}

impl From<std::io::Error> for BlobError {
    fn from(err: std::io::Error) -> Self {
        BlobError::Io(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn public_url_joins_without_double_slash() {
        let path = ObjectPath::parse("u1/a.png").unwrap();
        assert_eq!(
            join_public_url("https://cdn.example.com/public/", Bucket::Media, &path),
            "https://cdn.example.com/public/media/u1/a.png"
        );
    }

    #[test]
    fn blob_storage_is_object_safe() {
        fn check<T: BlobStorage + ?Sized>() {}
        check::<dyn BlobStorage>();
    }
}

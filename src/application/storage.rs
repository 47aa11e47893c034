//! `storage().from(bucket)` - uploads, public URLs and removal.
//!
//! A thin pass-through to the blob storage port, namespaced by bucket.
//! Bucket names and object paths are checked here so a bad one resolves to
//! an error response rather than reaching the backend.

use bytes::Bytes;
use tracing::debug;

use crate::domain::query::{QueryError, QueryResponse};
use crate::domain::storage::{Bucket, ObjectPath};
use crate::ports::{BlobError, StoredObject};

use super::client::CompatClient;

/// Storage surface of the client.
#[derive(Debug, Clone)]
pub struct StorageApi {
    client: CompatClient,
}

impl StorageApi {
    pub(crate) fn new(client: CompatClient) -> Self {
        Self { client }
    }

    /// Selects a bucket. Unknown names fail when an operation runs.
    pub fn from(&self, bucket: &str) -> BucketApi {
        BucketApi {
            client: self.client.clone(),
            bucket: Bucket::parse(bucket)
                .ok_or_else(|| QueryError::not_implemented(format!("bucket '{bucket}'"))),
        }
    }
}

/// Upload options.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileOptions {
    /// MIME type; guessed from the path's extension when absent.
    pub content_type: Option<String>,
    /// Overwrite an existing object instead of failing.
    pub upsert: bool,
}

impl FileOptions {
    pub fn upsert() -> Self {
        Self {
            upsert: true,
            ..Self::default()
        }
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }
}

/// Operations on one bucket.
#[derive(Debug, Clone)]
pub struct BucketApi {
    client: CompatClient,
    bucket: Result<Bucket, QueryError>,
}

impl BucketApi {
    /// Stores `content` at `path`.
    pub async fn upload(
        &self,
        path: &str,
        content: impl Into<Bytes>,
        options: FileOptions,
    ) -> QueryResponse<StoredObject> {
        self.try_upload(path, content.into(), options)
            .await
            .map(Some)
            .into()
    }

    async fn try_upload(
        &self,
        path: &str,
        content: Bytes,
        options: FileOptions,
    ) -> Result<StoredObject, QueryError> {
        let bucket = self.bucket.clone()?;
        let path = ObjectPath::parse(path)?;

        let size = content.len() as u64;
        let max = self.client.limits().max_upload_bytes;
        if size > max {
            return Err(QueryError::payload_too_large(size, max));
        }

        let content_type = options.content_type.unwrap_or_else(|| {
            mime_guess::from_path(path.as_str())
                .first_or_octet_stream()
                .essence_str()
                .to_string()
        });

        debug!(bucket = %bucket, path = %path, size, content_type = %content_type, "upload");
        self.client
            .blobs()
            .upload(bucket, &path, content, &content_type, options.upsert)
            .await
            .map_err(blob_error)
    }

    /// Public URL of an object. Existence is not checked.
    pub fn get_public_url(&self, path: &str) -> QueryResponse<String> {
        let result = self.bucket.clone().and_then(|bucket| {
            let path = ObjectPath::parse(path)?;
            Ok(Some(self.client.blobs().public_url(bucket, &path)))
        });
        result.into()
    }

    /// Removes objects; missing ones are skipped. Returns the removed paths.
    pub async fn remove<S: AsRef<str>>(&self, paths: &[S]) -> QueryResponse<Vec<ObjectPath>> {
        self.try_remove(paths).await.map(Some).into()
    }

    async fn try_remove<S: AsRef<str>>(&self, paths: &[S]) -> Result<Vec<ObjectPath>, QueryError> {
        let bucket = self.bucket.clone()?;
        let paths = paths
            .iter()
            .map(|p| ObjectPath::parse(p.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;

        debug!(bucket = %bucket, count = paths.len(), "remove");
        self.client
            .blobs()
            .remove(bucket, &paths)
            .await
            .map_err(blob_error)
    }
}

fn blob_error(err: BlobError) -> QueryError {
    match err {
        BlobError::NotFound { bucket, path } => {
            QueryError::not_found(format!("object '{bucket}/{path}' not found"))
        }
        BlobError::AlreadyExists { bucket, path } => {
            QueryError::conflict(format!("object '{bucket}/{path}' already exists"))
        }
        other => QueryError::backend(other.to_string()),
    }
}

//! Local Filesystem Blob Storage Adapter
//!
//! Stores objects under a root directory:
//!
//! ```text
//! {root}/
//! ├── avatars/
//! │   └── {owner}/{millis}-{name}
//! └── media/
//!     └── {owner}/{millis}-{name}
//! ```
//!
//! Object paths are validated on construction, so joining their segments
//! under the bucket directory cannot escape the root. Writes use a temp
//! file and an atomic rename.

use async_trait::async_trait;
use bytes::Bytes;
use std::path::PathBuf;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::debug;

use super::compute_etag;
use crate::domain::foundation::Timestamp;
use crate::domain::storage::{Bucket, ObjectPath};
use crate::ports::{join_public_url, BlobError, BlobStorage, StoredObject};

/// Blob storage on the local filesystem.
#[derive(Debug, Clone)]
pub struct LocalBlobStorage {
    root: PathBuf,
    public_base_url: String,
}

impl LocalBlobStorage {
    /// Creates a storage rooted at `root`, serving public URLs under
    /// `public_base_url`.
    pub fn new(root: impl Into<PathBuf>, public_base_url: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            public_base_url: public_base_url.into(),
        }
    }

    /// Returns the full file path for an object.
    fn object_path(&self, bucket: Bucket, path: &ObjectPath) -> PathBuf {
        let mut full = self.root.join(bucket.name());
        for segment in path.segments() {
            full.push(segment);
        }
        full
    }

    /// Returns the temporary file path for atomic writes.
    fn temp_path(file: &std::path::Path) -> PathBuf {
        let mut name = file
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        file.with_file_name(name)
    }
}

#[async_trait]
impl BlobStorage for LocalBlobStorage {
    async fn upload(
        &self,
        bucket: Bucket,
        path: &ObjectPath,
        content: Bytes,
        content_type: &str,
        upsert: bool,
    ) -> Result<StoredObject, BlobError> {
        let final_path = self.object_path(bucket, path);
        if !upsert && fs::try_exists(&final_path).await? {
            return Err(BlobError::already_exists(bucket, path));
        }
        if let Some(dir) = final_path.parent() {
            fs::create_dir_all(dir).await?;
        }

        let temp_path = Self::temp_path(&final_path);
        let mut file = fs::File::create(&temp_path).await?;
        file.write_all(&content).await?;
        file.sync_all().await?;
        drop(file);
        fs::rename(&temp_path, &final_path).await?;

        debug!(bucket = %bucket, path = %path, size = content.len(), "Stored object");
        Ok(StoredObject {
            bucket,
            path: path.clone(),
            size_bytes: content.len() as u64,
            content_type: content_type.to_string(),
            etag: compute_etag(&content),
            uploaded_at: Timestamp::now(),
        })
    }

    async fn download(&self, bucket: Bucket, path: &ObjectPath) -> Result<Bytes, BlobError> {
        match fs::read(self.object_path(bucket, path)).await {
            Ok(content) => Ok(Bytes::from(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(BlobError::not_found(bucket, path))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn remove(
        &self,
        bucket: Bucket,
        paths: &[ObjectPath],
    ) -> Result<Vec<ObjectPath>, BlobError> {
        let mut removed = Vec::with_capacity(paths.len());
        for path in paths {
            match fs::remove_file(self.object_path(bucket, path)).await {
                Ok(()) => removed.push(path.clone()),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => return Err(e.into()),
            }
        }
        Ok(removed)
    }

    fn public_url(&self, bucket: Bucket, path: &ObjectPath) -> String {
        join_public_url(&self.public_base_url, bucket, path)
    }
}

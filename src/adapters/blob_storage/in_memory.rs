//! In-Memory Blob Storage Adapter
//!
//! Keeps uploaded objects in memory. Useful for testing and development.

use async_trait::async_trait;
use bytes::Bytes;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use super::compute_etag;
use crate::domain::foundation::Timestamp;
use crate::domain::storage::{Bucket, ObjectPath};
use crate::ports::{join_public_url, BlobError, BlobStorage, StoredObject};

#[derive(Debug, Clone)]
struct Entry {
    content: Bytes,
    meta: StoredObject,
}

/// In-memory storage for uploaded objects
#[derive(Debug, Clone)]
pub struct InMemoryBlobStorage {
    objects: Arc<RwLock<HashMap<(Bucket, ObjectPath), Entry>>>,
    public_base_url: String,
}

impl InMemoryBlobStorage {
    pub fn new(public_base_url: impl Into<String>) -> Self {
        Self {
            objects: Arc::new(RwLock::new(HashMap::new())),
            public_base_url: public_base_url.into(),
        }
    }

    /// Number of objects in a bucket.
    pub async fn object_count(&self, bucket: Bucket) -> usize {
        self.objects
            .read()
            .await
            .keys()
            .filter(|(b, _)| *b == bucket)
            .count()
    }

    /// Metadata of a stored object, if present.
    pub async fn metadata(&self, bucket: Bucket, path: &ObjectPath) -> Option<StoredObject> {
        self.objects
            .read()
            .await
            .get(&(bucket, path.clone()))
            .map(|entry| entry.meta.clone())
    }
}

#[async_trait]
impl BlobStorage for InMemoryBlobStorage {
    async fn upload(
        &self,
        bucket: Bucket,
        path: &ObjectPath,
        content: Bytes,
        content_type: &str,
        upsert: bool,
    ) -> Result<StoredObject, BlobError> {
        let key = (bucket, path.clone());
        let mut objects = self.objects.write().await;
        if !upsert && objects.contains_key(&key) {
            return Err(BlobError::already_exists(bucket, path));
        }

        let meta = StoredObject {
            bucket,
            path: path.clone(),
            size_bytes: content.len() as u64,
            content_type: content_type.to_string(),
            etag: compute_etag(&content),
            uploaded_at: Timestamp::now(),
        };
        objects.insert(
            key,
            Entry {
                content,
                meta: meta.clone(),
            },
        );
        Ok(meta)
    }

    async fn download(&self, bucket: Bucket, path: &ObjectPath) -> Result<Bytes, BlobError> {
        self.objects
            .read()
            .await
            .get(&(bucket, path.clone()))
            .map(|entry| entry.content.clone())
            .ok_or_else(|| BlobError::not_found(bucket, path))
    }

    async fn remove(
        &self,
        bucket: Bucket,
        paths: &[ObjectPath],
    ) -> Result<Vec<ObjectPath>, BlobError> {
        let mut objects = self.objects.write().await;
        Ok(paths
            .iter()
            .filter(|path| objects.remove(&(bucket, (*path).clone())).is_some())
            .cloned()
            .collect())
    }

    fn public_url(&self, bucket: Bucket, path: &ObjectPath) -> String {
        join_public_url(&self.public_base_url, bucket, path)
    }
}

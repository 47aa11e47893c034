//! File-based Document Store Adapter
//!
//! Stores each document as a pretty-printed JSON file:
//!
//! ```text
//! {root}/
//! └── profiles/
//!     ├── 0b6d....json
//!     └── 7f21....json
//! ```
//!
//! Writes go to `{id}.json.tmp` first and are renamed into place, so a
//! crash never leaves a half-written document behind. Writes within one
//! process are serialized; reads are not.

use async_trait::async_trait;
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tokio::sync::{broadcast, Mutex};

use super::in_memory::DEFAULT_CHANGE_CAPACITY;
use crate::domain::query::{merge_fields, Document, Filter, StoredDocument};
use crate::ports::{ChangeKind, DocumentChange, DocumentStore, StoreError};

const EXTENSION: &str = "json";

/// Document store persisting one JSON file per document.
#[derive(Debug, Clone)]
pub struct FileDocumentStore {
    root: PathBuf,
    write_lock: Arc<Mutex<()>>,
    changes: broadcast::Sender<DocumentChange>,
}

impl FileDocumentStore {
    /// Creates a store rooted at `root`. Directories are created lazily.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self::with_capacity(root, DEFAULT_CHANGE_CAPACITY)
    }

    pub fn with_capacity(root: impl Into<PathBuf>, capacity: usize) -> Self {
        let (changes, _) = broadcast::channel(capacity.max(1));
        Self {
            root: root.into(),
            write_lock: Arc::new(Mutex::new(())),
            changes,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn collection_dir(&self, collection: &str) -> Result<PathBuf, StoreError> {
        validate_key(collection)?;
        Ok(self.root.join(collection))
    }

    fn document_path(&self, collection: &str, id: &str) -> Result<PathBuf, StoreError> {
        validate_key(id)?;
        Ok(self
            .collection_dir(collection)?
            .join(format!("{id}.{EXTENSION}")))
    }

    async fn read_document(path: &Path) -> Result<Option<Document>, StoreError> {
        let raw = match fs::read(path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        match serde_json::from_slice::<Value>(&raw)? {
            Value::Object(doc) => Ok(Some(doc)),
            _ => Err(StoreError::Serialization(format!(
                "{} does not hold a JSON object",
                path.display()
            ))),
        }
    }

    async fn write_document(path: &Path, doc: &Document) -> Result<(), StoreError> {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir).await?;
        }
        let body = serde_json::to_vec_pretty(doc)?;
        let temp_path = path.with_extension(format!("{EXTENSION}.tmp"));

        let mut file = fs::File::create(&temp_path).await?;
        file.write_all(&body).await?;
        file.sync_all().await?;
        drop(file);

        fs::rename(&temp_path, path).await?;
        Ok(())
    }

    fn publish(&self, collection: &str, id: &str, kind: ChangeKind, data: Document) {
        let _ = self
            .changes
            .send(DocumentChange::new(collection, id, kind, data));
    }
}

/// Collection names and ids become path segments, so they are restricted
/// to a conservative character set.
fn validate_key(key: &str) -> Result<(), StoreError> {
    let valid = !key.is_empty()
        && !key.starts_with('.')
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));
    if valid {
        Ok(())
    } else {
        Err(StoreError::invalid_key(key))
    }
}

#[async_trait]
impl DocumentStore for FileDocumentStore {
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, StoreError> {
        let path = self.document_path(collection, id)?;
        Self::read_document(&path).await
    }

    async fn find_by_field(
        &self,
        collection: &str,
        field: &str,
        value: &Value,
        limit: Option<usize>,
    ) -> Result<Vec<StoredDocument>, StoreError> {
        let dir = self.collection_dir(collection)?;
        let mut entries = match fs::read_dir(&dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut ids = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let name = entry.file_name();
            let Some(name) = name.to_str() else {
                continue;
            };
            // Temp files end in ".tmp" and are skipped here.
            if let Some(id) = name.strip_suffix(&format!(".{EXTENSION}")) {
                ids.push(id.to_string());
            }
        }
        ids.sort();

        let filter = Filter::eq(field, value.clone());
        let limit = limit.unwrap_or(usize::MAX);
        let mut matches = Vec::new();
        for id in ids {
            if matches.len() >= limit {
                break;
            }
            let path = dir.join(format!("{id}.{EXTENSION}"));
            // A document removed between listing and reading is skipped.
            if let Some(data) = Self::read_document(&path).await? {
                if filter.matches(&data) {
                    matches.push(StoredDocument::new(id, data));
                }
            }
        }
        Ok(matches)
    }

    async fn create(&self, collection: &str, id: &str, data: Document) -> Result<(), StoreError> {
        let path = self.document_path(collection, id)?;
        {
            let _guard = self.write_lock.lock().await;
            if fs::try_exists(&path).await? {
                return Err(StoreError::already_exists(collection, id));
            }
            Self::write_document(&path, &data).await?;
        }
        self.publish(collection, id, ChangeKind::Created, data);
        Ok(())
    }

    async fn merge(&self, collection: &str, id: &str, fields: Document) -> Result<(), StoreError> {
        let path = self.document_path(collection, id)?;
        let merged = {
            let _guard = self.write_lock.lock().await;
            let mut existing = Self::read_document(&path)
                .await?
                .ok_or_else(|| StoreError::not_found(collection, id))?;
            merge_fields(&mut existing, &fields);
            Self::write_document(&path, &existing).await?;
            existing
        };
        self.publish(collection, id, ChangeKind::Updated, merged);
        Ok(())
    }

    fn changes(&self) -> broadcast::Receiver<DocumentChange> {
        self.changes.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    // ───────────────────────────────────────────────────────────────
    // Test helpers
    // ───────────────────────────────────────────────────────────────

    fn doc(value: Value) -> Document {
        value.as_object().cloned().unwrap()
    }

    fn create_store() -> (FileDocumentStore, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let store = FileDocumentStore::new(temp_dir.path());
        (store, temp_dir)
    }

    // ───────────────────────────────────────────────────────────────
    // Write tests
    // ───────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn create_writes_json_file() {
        let (store, temp) = create_store();
        store
            .create("profiles", "p1", doc(json!({"name": "Studio"})))
            .await
            .unwrap();

        let path = temp.path().join("profiles").join("p1.json");
        assert!(path.exists());
        assert!(!temp.path().join("profiles").join("p1.json.tmp").exists());
    }

    #[tokio::test]
    async fn create_rejects_duplicate_id() {
        let (store, _temp) = create_store();
        store.create("profiles", "p1", Document::new()).await.unwrap();
        let err = store
            .create("profiles", "p1", Document::new())
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::AlreadyExists { .. }));
    }

    #[tokio::test]
    async fn merge_persists_shallow_merge() {
        let (store, temp) = create_store();
        store
            .create("profiles", "p1", doc(json!({"a": 1, "b": [1, 2]})))
            .await
            .unwrap();
        store
            .merge("profiles", "p1", doc(json!({"b": [3]})))
            .await
            .unwrap();

        let reopened = FileDocumentStore::new(temp.path());
        let fetched = reopened.get("profiles", "p1").await.unwrap().unwrap();
        assert_eq!(fetched, doc(json!({"a": 1, "b": [3]})));
    }

    #[tokio::test]
    async fn committed_writes_are_broadcast_in_order() {
        let (store, _temp) = create_store();
        let mut rx = store.changes();

        store
            .create("profiles", "p1", doc(json!({"name": "Old", "category": "salon"})))
            .await
            .unwrap();
        store
            .merge("profiles", "p1", doc(json!({"name": "New"})))
            .await
            .unwrap();

        let created = rx.try_recv().unwrap();
        assert_eq!(created.kind, ChangeKind::Created);
        assert_eq!((created.collection.as_str(), created.id.as_str()), ("profiles", "p1"));
        assert_eq!(created.data["name"], "Old");

        let updated = rx.try_recv().unwrap();
        assert_eq!(updated.kind, ChangeKind::Updated);
        assert_eq!(updated.data, doc(json!({"name": "New", "category": "salon"})));
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn failed_merge_publishes_nothing() {
        let (store, _temp) = create_store();
        let mut rx = store.changes();

        assert!(store.merge("profiles", "p9", Document::new()).await.is_err());
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn merge_missing_is_not_found() {
        let (store, _temp) = create_store();
        let err = store
            .merge("profiles", "nope", Document::new())
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound { .. }));
    }

    // ───────────────────────────────────────────────────────────────
    // Read tests
    // ───────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn get_missing_returns_none() {
        let (store, _temp) = create_store();
        assert!(store.get("profiles", "p1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn find_by_field_scans_in_id_order() {
        let (store, _temp) = create_store();
        for id in ["b", "a", "c"] {
            store
                .create("profiles", id, doc(json!({"handle": "same"})))
                .await
                .unwrap();
        }

        let found = store
            .find_by_field("profiles", "handle", &json!("same"), Some(2))
            .await
            .unwrap();
        let ids: Vec<_> = found.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[tokio::test]
    async fn find_by_field_on_missing_collection_is_empty() {
        let (store, _temp) = create_store();
        let found = store
            .find_by_field("profiles", "handle", &json!("x"), None)
            .await
            .unwrap();
        assert!(found.is_empty());
    }

    #[tokio::test]
    async fn path_like_keys_are_rejected() {
        let (store, _temp) = create_store();
        for key in ["../escape", "a/b", "", ".hidden"] {
            let err = store.get("profiles", key).await.unwrap_err();
            assert!(matches!(err, StoreError::InvalidKey { .. }), "{key}");
        }
    }
}

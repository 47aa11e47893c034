//! In-Memory Document Store Adapter
//!
//! Keeps collections in memory, ordered by document id.
//! Useful for testing and development.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tokio::sync::{broadcast, RwLock};

use crate::domain::query::{merge_fields, Document, Filter, StoredDocument};
use crate::ports::{ChangeKind, DocumentChange, DocumentStore, StoreError};

/// Default capacity of the change feed.
pub const DEFAULT_CHANGE_CAPACITY: usize = 256;

type Collections = HashMap<String, BTreeMap<String, Document>>;

/// In-memory document store with a broadcast change feed.
#[derive(Debug, Clone)]
pub struct InMemoryDocumentStore {
    collections: Arc<RwLock<Collections>>,
    changes: broadcast::Sender<DocumentChange>,
}

impl InMemoryDocumentStore {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CHANGE_CAPACITY)
    }

    /// Creates a store whose change feed buffers `capacity` changes per
    /// subscriber before lagging.
    pub fn with_capacity(capacity: usize) -> Self {
        let (changes, _) = broadcast::channel(capacity.max(1));
        Self {
            collections: Arc::new(RwLock::new(HashMap::new())),
            changes,
        }
    }

    /// Number of documents in a collection.
    pub async fn count(&self, collection: &str) -> usize {
        self.collections
            .read()
            .await
            .get(collection)
            .map_or(0, BTreeMap::len)
    }

    fn publish(&self, collection: &str, id: &str, kind: ChangeKind, data: Document) {
        // No receivers is not an error; the change simply has no audience.
        let _ = self
            .changes
            .send(DocumentChange::new(collection, id, kind, data));
    }
}

impl Default for InMemoryDocumentStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, StoreError> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(collection)
            .and_then(|docs| docs.get(id))
            .cloned())
    }

    async fn find_by_field(
        &self,
        collection: &str,
        field: &str,
        value: &Value,
        limit: Option<usize>,
    ) -> Result<Vec<StoredDocument>, StoreError> {
        let filter = Filter::eq(field, value.clone());
        let collections = self.collections.read().await;
        let Some(docs) = collections.get(collection) else {
            return Ok(Vec::new());
        };

        Ok(docs
            .iter()
            .filter(|(_, data)| filter.matches(data))
            .take(limit.unwrap_or(usize::MAX))
            .map(|(id, data)| StoredDocument::new(id.clone(), data.clone()))
            .collect())
    }

    async fn create(&self, collection: &str, id: &str, data: Document) -> Result<(), StoreError> {
        {
            let mut collections = self.collections.write().await;
            let docs = collections.entry(collection.to_string()).or_default();
            if docs.contains_key(id) {
                return Err(StoreError::already_exists(collection, id));
            }
            docs.insert(id.to_string(), data.clone());
        }
        self.publish(collection, id, ChangeKind::Created, data);
        Ok(())
    }

    async fn merge(&self, collection: &str, id: &str, fields: Document) -> Result<(), StoreError> {
        let merged = {
            let mut collections = self.collections.write().await;
            let existing = collections
                .get_mut(collection)
                .and_then(|docs| docs.get_mut(id))
                .ok_or_else(|| StoreError::not_found(collection, id))?;
            merge_fields(existing, &fields);
            existing.clone()
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

    fn doc(value: Value) -> Document {
        value.as_object().cloned().unwrap()
    }

    #[tokio::test]
    async fn create_then_get() {
        let store = InMemoryDocumentStore::new();
        store
            .create("profiles", "p1", doc(json!({"name": "Studio"})))
            .await
            .unwrap();

        let fetched = store.get("profiles", "p1").await.unwrap().unwrap();
        assert_eq!(fetched.get("name"), Some(&json!("Studio")));
        assert!(store.get("profiles", "p2").await.unwrap().is_none());
        assert!(store.get("other", "p1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn create_rejects_duplicate_id() {
        let store = InMemoryDocumentStore::new();
        store.create("profiles", "p1", Document::new()).await.unwrap();

        let err = store
            .create("profiles", "p1", Document::new())
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::AlreadyExists { .. }));
    }

    #[tokio::test]
    async fn merge_is_shallow_and_requires_existing() {
        let store = InMemoryDocumentStore::new();
        store
            .create("profiles", "p1", doc(json!({"a": 1, "nested": {"x": 1, "y": 2}})))
            .await
            .unwrap();

        store
            .merge("profiles", "p1", doc(json!({"nested": {"x": 9}})))
            .await
            .unwrap();
        let fetched = store.get("profiles", "p1").await.unwrap().unwrap();
        assert_eq!(fetched.get("a"), Some(&json!(1)));
        assert_eq!(fetched.get("nested"), Some(&json!({"x": 9})));

        let err = store
            .merge("profiles", "missing", Document::new())
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound { .. }));
    }

    #[tokio::test]
    async fn find_by_field_orders_by_id_and_limits() {
        let store = InMemoryDocumentStore::new();
        for id in ["c", "a", "b"] {
            store
                .create("profiles", id, doc(json!({"user_id": "u1"})))
                .await
                .unwrap();
        }
        store
            .create("profiles", "d", doc(json!({"user_id": "u2"})))
            .await
            .unwrap();

        let all = store
            .find_by_field("profiles", "user_id", &json!("u1"), None)
            .await
            .unwrap();
        let ids: Vec<_> = all.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);

        let limited = store
            .find_by_field("profiles", "user_id", &json!("u1"), Some(2))
            .await
            .unwrap();
        assert_eq!(limited.len(), 2);
    }

    #[tokio::test]
    async fn writes_are_broadcast() {
        let store = InMemoryDocumentStore::new();
        let mut rx = store.changes();

        store
            .create("profiles", "p1", doc(json!({"a": 1})))
            .await
            .unwrap();
        store
            .merge("profiles", "p1", doc(json!({"b": 2})))
            .await
            .unwrap();

        let created = rx.recv().await.unwrap();
        assert_eq!(created.kind, ChangeKind::Created);
        assert_eq!(created.id, "p1");

        let updated = rx.recv().await.unwrap();
        assert_eq!(updated.kind, ChangeKind::Updated);
        assert_eq!(updated.data, doc(json!({"a": 1, "b": 2})));
    }

    #[tokio::test]
    async fn clones_share_state() {
        let store = InMemoryDocumentStore::new();
        let clone = store.clone();
        store.create("profiles", "p1", Document::new()).await.unwrap();
        assert_eq!(clone.count("profiles").await, 1);
    }
}

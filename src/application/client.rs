//! The compatibility client.
//!
//! Entry point of the relational-style surface: `from(table)` for queries,
//! `storage()` for blobs, `channel(name)` for realtime changes. Cloning is
//! cheap; clones share the backing ports and the write clock.

use std::sync::Arc;

use crate::domain::foundation::{MonotonicClock, Timestamp};
use crate::ports::{BlobStorage, DocumentStore};

use super::query::TableQuery;
use super::realtime::Channel;
use super::storage::StorageApi;

/// Default upload limit: 10 MiB.
pub const DEFAULT_MAX_UPLOAD_BYTES: u64 = 10 * 1024 * 1024;

/// Limits enforced by the client before reaching a backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClientLimits {
    pub max_upload_bytes: u64,
}

impl Default for ClientLimits {
    fn default() -> Self {
        Self {
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}

/// Relational-style facade over a document store and a blob storage.
///
/// # Example
///
/// ```ignore
/// let client = CompatClient::new(Arc::new(store), Arc::new(blobs));
///
/// let profile = client
///     .from("profiles")
///     .select("*")
///     .eq("user_id", user_id.as_str())
///     .maybe_single()
///     .await;
/// ```
#[derive(Clone)]
pub struct CompatClient {
    store: Arc<dyn DocumentStore>,
    blobs: Arc<dyn BlobStorage>,
    clock: Arc<MonotonicClock>,
    limits: ClientLimits,
}

impl CompatClient {
    pub fn new(store: Arc<dyn DocumentStore>, blobs: Arc<dyn BlobStorage>) -> Self {
        Self {
            store,
            blobs,
            clock: Arc::new(MonotonicClock::new()),
            limits: ClientLimits::default(),
        }
    }

    pub fn with_limits(mut self, limits: ClientLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Starts a query against a table.
    ///
    /// Unknown tables are not rejected here; the query resolves to a
    /// not-implemented error when executed.
    pub fn from(&self, table: &str) -> TableQuery {
        TableQuery::new(self.clone(), table)
    }

    /// The storage surface.
    pub fn storage(&self) -> StorageApi {
        StorageApi::new(self.clone())
    }

    /// Starts building a realtime channel.
    pub fn channel(&self, name: &str) -> Channel {
        Channel::new(self.clone(), name)
    }

    /// Next write stamp. Strictly increasing across all clones.
    pub fn now(&self) -> Timestamp {
        self.clock.now()
    }

    pub fn limits(&self) -> ClientLimits {
        self.limits
    }

    pub(crate) fn store(&self) -> &dyn DocumentStore {
        self.store.as_ref()
    }

    pub(crate) fn blobs(&self) -> &dyn BlobStorage {
        self.blobs.as_ref()
    }
}

impl std::fmt::Debug for CompatClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompatClient")
            .field("limits", &self.limits)
            .finish_non_exhaustive()
    }
}

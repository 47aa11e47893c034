//! `channel(name).on_postgres_changes(spec, callback).subscribe()`.
//!
//! A channel collects listeners, then subscribes once to the store's change
//! feed. One spawned task per channel filters committed changes against
//! every listener and hands matching ones to its callback reshaped as a
//! [`ChangeEnvelope`].
//!
//! ```text
//! DocumentStore::changes() ──► channel task ──► listener 1 (table)
//!                                           └─► listener 2 (id=eq.p1)
//! ```
//!
//! Only changes committed after `subscribe()` returns are delivered; there
//! is no initial snapshot. The task ends when the subscription is dropped
//! or unsubscribed, or when the store closes its feed.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::domain::foundation::Timestamp;
use crate::domain::query::{
    plan_listener, Document, Filter, ListenerPlan, QueryError, QueryResponse, StoredDocument,
    Table,
};
use crate::ports::{ChangeKind, DocumentChange};

use super::client::CompatClient;

/// Schema name accepted in change specs.
pub const PUBLIC_SCHEMA: &str = "public";

/// Event kind a listener asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChangeEvent {
    #[serde(rename = "INSERT")]
    Insert,
    #[serde(rename = "UPDATE")]
    Update,
    #[serde(rename = "*")]
    All,
}

impl ChangeEvent {
    fn accepts(&self, kind: ChangeKind) -> bool {
        matches!(
            (self, kind),
            (ChangeEvent::All, _)
                | (ChangeEvent::Insert, ChangeKind::Created)
                | (ChangeEvent::Update, ChangeKind::Updated)
        )
    }
}

impl From<ChangeKind> for ChangeEvent {
    fn from(kind: ChangeKind) -> Self {
        match kind {
            ChangeKind::Created => ChangeEvent::Insert,
            ChangeKind::Updated => ChangeEvent::Update,
        }
    }
}

impl fmt::Display for ChangeEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ChangeEvent::Insert => "INSERT",
            ChangeEvent::Update => "UPDATE",
            ChangeEvent::All => "*",
        };
        f.write_str(s)
    }
}

/// Listener filter, typed or in the `column=eq.value` text form.
#[derive(Debug, Clone, PartialEq)]
pub enum ChangeFilter {
    Typed(Filter),
    Expr(String),
}

impl ChangeFilter {
    fn resolve(&self) -> Result<Filter, QueryError> {
        match self {
            ChangeFilter::Typed(filter) => Ok(filter.clone()),
            ChangeFilter::Expr(expr) => Filter::parse(expr),
        }
    }
}

/// What a listener wants to hear about.
#[derive(Debug, Clone, PartialEq)]
pub struct ChangeSpec {
    pub event: ChangeEvent,
    pub schema: String,
    pub table: String,
    pub filter: Option<ChangeFilter>,
}

impl ChangeSpec {
    pub fn new(event: ChangeEvent, table: &str) -> Self {
        Self {
            event,
            schema: PUBLIC_SCHEMA.to_string(),
            table: table.to_string(),
            filter: None,
        }
    }

    pub fn filter(mut self, filter: Filter) -> Self {
        self.filter = Some(ChangeFilter::Typed(filter));
        self
    }

    /// Filter in the `column=eq.value` form. Checked at subscribe time.
    pub fn filter_expr(mut self, expr: &str) -> Self {
        self.filter = Some(ChangeFilter::Expr(expr.to_string()));
        self
    }
}

/// Notification handed to a listener's callback.
///
/// `old` is never populated; the change feed carries only the state after
/// the write.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChangeEnvelope {
    pub event_type: ChangeEvent,
    pub schema: String,
    pub table: String,
    pub new: Document,
    pub old: Option<Document>,
    pub commit_timestamp: Timestamp,
}

type Callback = Arc<dyn Fn(ChangeEnvelope) + Send + Sync>;

struct Listener {
    spec: ChangeSpec,
    callback: Callback,
}

/// A listener whose table and filter have been planned.
struct ActiveListener {
    event: ChangeEvent,
    table: Table,
    plan: ListenerPlan,
    callback: Callback,
}

impl ActiveListener {
    fn accepts(&self, change: &DocumentChange) -> bool {
        change.collection == self.table.collection()
            && self.event.accepts(change.kind)
            && self.plan.matches(&change.id, &change.data)
    }

    fn envelope(&self, change: &DocumentChange) -> ChangeEnvelope {
        ChangeEnvelope {
            event_type: change.kind.into(),
            schema: PUBLIC_SCHEMA.to_string(),
            table: self.table.name().to_string(),
            new: StoredDocument::new(change.id.clone(), change.data.clone()).into_record(),
            old: None,
            commit_timestamp: change.committed_at,
        }
    }
}

/// Realtime channel under construction.
pub struct Channel {
    client: CompatClient,
    name: String,
    listeners: Vec<Listener>,
}

impl Channel {
    pub(crate) fn new(client: CompatClient, name: &str) -> Self {
        Self {
            client,
            name: name.to_string(),
            listeners: Vec::new(),
        }
    }

    /// Registers a callback for changes matching `spec`.
    pub fn on_postgres_changes<F>(mut self, spec: ChangeSpec, callback: F) -> Self
    where
        F: Fn(ChangeEnvelope) + Send + Sync + 'static,
    {
        self.listeners.push(Listener {
            spec,
            callback: Arc::new(callback),
        });
        self
    }

    /// Starts delivering changes.
    ///
    /// Fails with not-implemented when any listener names an unknown
    /// schema, table, column or filter operator; nothing is subscribed then.
    pub fn subscribe(self) -> QueryResponse<RealtimeSubscription> {
        self.try_subscribe().map(Some).into()
    }

    fn try_subscribe(self) -> Result<RealtimeSubscription, QueryError> {
        let listeners = self
            .listeners
            .into_iter()
            .map(|listener| {
                let spec = listener.spec;
                if spec.schema != PUBLIC_SCHEMA {
                    return Err(QueryError::not_implemented(format!("schema '{}'", spec.schema)));
                }
                let filter = spec.filter.as_ref().map(ChangeFilter::resolve).transpose()?;
                let (table, plan) = plan_listener(&spec.table, filter.as_ref())?;
                Ok(ActiveListener {
                    event: spec.event,
                    table,
                    plan,
                    callback: listener.callback,
                })
            })
            .collect::<Result<Vec<_>, QueryError>>()?;

        // Subscribe before spawning so nothing committed after this call
        // returns can be missed.
        let mut changes = self.client.store().changes();
        let channel = self.name.clone();
        debug!(channel = %channel, listeners = listeners.len(), "Realtime channel subscribed");

        let task = tokio::spawn(async move {
            loop {
                match changes.recv().await {
                    Ok(change) => {
                        for listener in listeners.iter().filter(|l| l.accepts(&change)) {
                            (listener.callback)(listener.envelope(&change));
                        }
                    }
                    Err(RecvError::Lagged(skipped)) => {
                        warn!(channel = %channel, skipped, "Realtime channel lagged; changes dropped");
                    }
                    Err(RecvError::Closed) => {
                        debug!(channel = %channel, "Change feed closed");
                        break;
                    }
                }
            }
        });

        Ok(RealtimeSubscription {
            channel: self.name,
            task,
        })
    }
}

impl fmt::Debug for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Channel")
            .field("name", &self.name)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

/// Handle of a running channel. Dropping it stops delivery.
#[derive(Debug)]
pub struct RealtimeSubscription {
    channel: String,
    task: JoinHandle<()>,
}

impl RealtimeSubscription {
    pub fn channel(&self) -> &str {
        &self.channel
    }

    pub fn is_active(&self) -> bool {
        !self.task.is_finished()
    }

    /// Stops delivery. Callbacks may still be running for a change that
    /// was already being dispatched.
    pub fn unsubscribe(self) {
        debug!(channel = %self.channel, "Realtime channel unsubscribed");
    }
}

impl Drop for RealtimeSubscription {
    fn drop(&mut self) {
        self.task.abort();
    }
}

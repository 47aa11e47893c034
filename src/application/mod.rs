//! Application layer - The compatibility client and its consumers.
//!
//! `CompatClient` exposes the relational-style query surface over the
//! document store ports. Handlers and `ProfileSession` build on top of it;
//! `AppContext` wires the whole graph from configuration.

pub mod client;
pub mod context;
pub mod handlers;
pub mod query;
pub mod realtime;
pub mod session;
pub mod storage;

pub use client::{ClientLimits, CompatClient, DEFAULT_MAX_UPLOAD_BYTES};
pub use context::AppContext;
pub use query::{InsertQuery, SelectQuery, TableQuery, UpdateQuery};
pub use realtime::{
    ChangeEnvelope, ChangeEvent, ChangeFilter, ChangeSpec, Channel, RealtimeSubscription,
    PUBLIC_SCHEMA,
};
pub use session::ProfileSession;
pub use storage::{BucketApi, FileOptions, StorageApi};

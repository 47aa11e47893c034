//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the query adapter to concrete backends:
//! - `document_store` - In-memory and file-backed document stores
//! - `blob_storage` - In-memory and local-filesystem object storage
//! - `payment` - Mock checkout and billing portal gateway

pub mod blob_storage;
pub mod document_store;
pub mod payment;

pub use blob_storage::{InMemoryBlobStorage, LocalBlobStorage};
pub use document_store::{FileDocumentStore, InMemoryDocumentStore};
pub use payment::{GatewayCall, MockPaymentGateway};

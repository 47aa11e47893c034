//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the query adapter and the outside world. Adapters implement these ports.
//!
//! - `DocumentStore` - Document-oriented backing store with change feed
//! - `BlobStorage` - Uploaded files, addressed by bucket and path
//! - `PaymentGateway` - Checkout and billing portal redirects

mod blob_storage;
mod document_store;
mod payment_gateway;

pub use blob_storage::{join_public_url, BlobError, BlobStorage, StoredObject};
pub use document_store::{ChangeKind, DocumentChange, DocumentStore, StoreError};
pub use payment_gateway::{
    CheckoutRequest, CheckoutSession, PaymentError, PaymentErrorCode, PaymentGateway, Plan,
    PortalSession,
};

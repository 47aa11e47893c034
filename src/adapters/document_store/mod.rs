//! Document Store Adapters
//!
//! Implementations of the DocumentStore port.
//!
//! ## Available Adapters
//!
//! - **InMemoryDocumentStore** - Collections in memory (testing/development)
//! - **FileDocumentStore** - One JSON file per document on disk

mod file;
mod in_memory;

pub use file::FileDocumentStore;
pub use in_memory::{InMemoryDocumentStore, DEFAULT_CHANGE_CAPACITY};

//! Foundation module - Shared domain primitives.
//!
//! Contains identifiers, timestamps and validation errors that form the
//! vocabulary shared by the profile model and the query adapter.

mod errors;
mod ids;
mod timestamp;

pub use errors::ValidationError;
pub use ids::{ProfileId, UserId};
pub use timestamp::{MonotonicClock, Timestamp};

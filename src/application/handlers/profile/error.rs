//! Errors of the profile handlers.

use thiserror::Error;

use crate::domain::foundation::ValidationError;
use crate::domain::query::QueryError;
use crate::ports::PaymentError;

/// Failure of an onboarding or dashboard operation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProfileError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid handle: {0}")]
    InvalidHandle(ValidationError),

    #[error("Handle '{0}' is already taken")]
    HandleTaken(String),

    #[error("Handle is already set to '{current}' and cannot change")]
    HandleImmutable { current: String },

    #[error("Profile cannot be published: {0}")]
    NotPublishable(String),

    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("Query failed: {0}")]
    Query(#[from] QueryError),

    #[error("Payment failed: {0}")]
    Payment(#[from] PaymentError),
}

impl ProfileError {
    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound(what.into())
    }

    pub fn not_publishable(reason: impl Into<String>) -> Self {
        Self::NotPublishable(reason.into())
    }
}

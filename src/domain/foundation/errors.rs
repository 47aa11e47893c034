//! Validation errors raised by profile fields, handles and object paths.

use thiserror::Error;

/// A field value that cannot be stored.
///
/// Carries the field name so callers can point the editor at the input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Field '{field}' cannot be empty")]
    EmptyField { field: String },

    #[error("Field '{field}' must be between {min} and {max}, got {actual}")]
    OutOfRange {
        field: String,
        min: i64,
        max: i64,
        actual: i64,
    },

    #[error("Field '{field}' has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

impl ValidationError {
    pub fn empty_field(field: impl Into<String>) -> Self {
        ValidationError::EmptyField { field: field.into() }
    }

    pub fn out_of_range(field: impl Into<String>, min: i64, max: i64, actual: i64) -> Self {
        ValidationError::OutOfRange {
            field: field.into(),
            min,
            max,
            actual,
        }
    }

    pub fn invalid_format(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ValidationError::InvalidFormat {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Name of the offending field.
    pub fn field(&self) -> &str {
        match self {
            ValidationError::EmptyField { field }
            | ValidationError::OutOfRange { field, .. }
            | ValidationError::InvalidFormat { field, .. } => field,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_handle_names_the_field() {
        let err = ValidationError::empty_field("handle");
        assert_eq!(err.to_string(), "Field 'handle' cannot be empty");
    }

    #[test]
    fn rating_out_of_range_reports_bounds() {
        let err = ValidationError::out_of_range("rating", 1, 5, 9);
        assert_eq!(
            err.to_string(),
            "Field 'rating' must be between 1 and 5, got 9"
        );
    }

    #[test]
    fn bad_email_keeps_reason_and_field() {
        let err = ValidationError::invalid_format("contact_email", "missing @ symbol");
        assert_eq!(
            err.to_string(),
            "Field 'contact_email' has invalid format: missing @ symbol"
        );
        assert_eq!(err.field(), "contact_email");
    }
}

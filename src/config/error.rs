//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Required configuration missing: {0}")]
    MissingRequired(&'static str),

    #[error("Change channel capacity must be between 1 and {max}")]
    InvalidChannelCapacity { max: usize },

    #[error("Max upload size must be between 1 byte and {max} bytes")]
    InvalidUploadLimit { max: u64 },

    #[error("Invalid URL for {field}: {value}")]
    InvalidUrl { field: &'static str, value: String },

    #[error("{field} must use HTTPS in production")]
    MustBeHttps { field: &'static str },

    #[error("Invalid log filter directive: {0}")]
    InvalidLogLevel(String),
}

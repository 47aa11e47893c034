//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment variables
//! using the `config` and `dotenvy` crates. Configuration is loaded with the
//! `BOOKPAGE` prefix and nested values use double underscores as separators.
//! Every section has defaults, so an empty environment yields an in-memory setup.
//!
//! # Example
//!
//! ```no_run
//! use bookpage::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Documents stored in {:?}", config.store.backend);
//! ```

mod error;
mod payment;
mod storage;
mod store;
mod telemetry;

pub use error::{ConfigError, ValidationError};
pub use payment::{Environment, PaymentConfig};
pub use storage::{StorageBackend, StorageConfig, MAX_UPLOAD_LIMIT};
pub use store::{StoreBackend, StoreConfig, MAX_CHANGE_CHANNEL_CAPACITY};
pub use telemetry::TelemetryConfig;

use serde::Deserialize;

/// Root application configuration
///
/// Load using [`AppConfig::load()`] which reads from environment variables.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Document store backing the profile table
    pub store: StoreConfig,

    /// Blob storage backing the avatar and media buckets
    pub storage: StorageConfig,

    /// Checkout and billing portal
    pub payment: PaymentConfig,

    /// Log filter and format
    pub telemetry: TelemetryConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `BOOKPAGE` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `BOOKPAGE__STORE__BACKEND=file` -> `store.backend = file`
    /// - `BOOKPAGE__STORAGE__MAX_UPLOAD_BYTES=1048576` -> `storage.max_upload_bytes`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into expected types.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("BOOKPAGE")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` for the first invalid section.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.store.validate()?;
        self.storage.validate()?;
        self.payment.validate()?;
        self.telemetry.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::Mutex;

    // Env vars are process-global
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    const VARS: &[&str] = &[
        "BOOKPAGE__STORE__BACKEND",
        "BOOKPAGE__STORE__DATA_DIR",
        "BOOKPAGE__STORE__CHANGE_CHANNEL_CAPACITY",
        "BOOKPAGE__STORAGE__MAX_UPLOAD_BYTES",
        "BOOKPAGE__PAYMENT__ENVIRONMENT",
        "BOOKPAGE__TELEMETRY__JSON",
    ];

    fn clear_env() {
        for var in VARS {
            env::remove_var(var);
        }
    }

    #[test]
    fn test_empty_environment_loads_defaults() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        let result = AppConfig::load();

        assert!(result.is_ok(), "Failed to load config: {:?}", result.err());
        let config = result.unwrap();
        assert_eq!(config.store.backend, StoreBackend::Memory);
        assert_eq!(config.storage.backend, StorageBackend::Memory);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_nested_values() {
        let _guard = ENV_MUTEX.lock().unwrap();
        env::set_var("BOOKPAGE__STORE__BACKEND", "file");
        env::set_var("BOOKPAGE__STORE__DATA_DIR", "/tmp/bookpage");
        env::set_var("BOOKPAGE__STORE__CHANGE_CHANNEL_CAPACITY", "1024");
        env::set_var("BOOKPAGE__STORAGE__MAX_UPLOAD_BYTES", "1048576");
        env::set_var("BOOKPAGE__TELEMETRY__JSON", "true");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.store.backend, StoreBackend::File);
        assert_eq!(config.store.data_dir.to_str(), Some("/tmp/bookpage"));
        assert_eq!(config.store.change_channel_capacity, 1024);
        assert_eq!(config.storage.max_upload_bytes, 1_048_576);
        assert!(config.telemetry.json);
    }

    #[test]
    fn test_production_payment_requires_key() {
        let _guard = ENV_MUTEX.lock().unwrap();
        env::set_var("BOOKPAGE__PAYMENT__ENVIRONMENT", "production");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert!(config.payment.is_production());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_unknown_backend_fails_to_load() {
        let _guard = ENV_MUTEX.lock().unwrap();
        env::set_var("BOOKPAGE__STORE__BACKEND", "postgres");
        let result = AppConfig::load();
        clear_env();

        assert!(matches!(result, Err(ConfigError::LoadError(_))));
    }
}

//! Document store configuration

use serde::Deserialize;
use std::path::PathBuf;

use super::error::ValidationError;

/// Upper bound for the change broadcast buffer.
pub const MAX_CHANGE_CHANNEL_CAPACITY: usize = 65_536;

/// Which document store backs the profile table
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    #[default]
    Memory,
    File,
}

/// Document store configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub backend: StoreBackend,

    /// Root directory for the file backend
    pub data_dir: PathBuf,

    /// Buffered change notifications per subscriber
    pub change_channel_capacity: usize,
}

impl StoreConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.change_channel_capacity == 0
            || self.change_channel_capacity > MAX_CHANGE_CHANNEL_CAPACITY
        {
            return Err(ValidationError::InvalidChannelCapacity {
                max: MAX_CHANGE_CHANNEL_CAPACITY,
            });
        }
        if self.backend == StoreBackend::File && self.data_dir.as_os_str().is_empty() {
            return Err(ValidationError::MissingRequired("STORE__DATA_DIR"));
        }
        Ok(())
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::Memory,
            data_dir: PathBuf::from("data/documents"),
            change_channel_capacity: 256,
        }
    }
}

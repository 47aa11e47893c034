//! Blob storage configuration

use serde::Deserialize;
use std::path::PathBuf;

use super::error::ValidationError;

/// Hard ceiling for a single upload.
pub const MAX_UPLOAD_LIMIT: u64 = 50 * 1024 * 1024;

/// Which blob storage backs the buckets
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    Memory,
    Local,
}

/// Blob storage configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub backend: StorageBackend,

    /// Root directory for the local backend
    pub root_dir: PathBuf,

    /// Prefix of every public object URL
    pub public_base_url: String,

    pub max_upload_bytes: u64,
}

impl StorageConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !is_http_url(&self.public_base_url) {
            return Err(ValidationError::InvalidUrl {
                field: "STORAGE__PUBLIC_BASE_URL",
                value: self.public_base_url.clone(),
            });
        }
        if self.max_upload_bytes == 0 || self.max_upload_bytes > MAX_UPLOAD_LIMIT {
            return Err(ValidationError::InvalidUploadLimit {
                max: MAX_UPLOAD_LIMIT,
            });
        }
        if self.backend == StorageBackend::Local && self.root_dir.as_os_str().is_empty() {
            return Err(ValidationError::MissingRequired("STORAGE__ROOT_DIR"));
        }
        Ok(())
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::Memory,
            root_dir: PathBuf::from("data/blobs"),
            public_base_url: "http://localhost:8080/storage/v1/object/public".to_string(),
            max_upload_bytes: 10 * 1024 * 1024,
        }
    }
}

pub(crate) fn is_http_url(value: &str) -> bool {
    let rest = value
        .strip_prefix("https://")
        .or_else(|| value.strip_prefix("http://"));
    matches!(rest, Some(host) if !host.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(StorageConfig::default().validate().is_ok());
    }

    #[test]
    fn rejects_non_http_base_url() {
        for url in ["", "ftp://files", "https://"] {
            let config = StorageConfig {
                public_base_url: url.to_string(),
                ..Default::default()
            };
            assert!(
                matches!(config.validate(), Err(ValidationError::InvalidUrl { .. })),
                "{url}"
            );
        }
    }

    #[test]
    fn upload_limit_bounds() {
        let config = StorageConfig {
            max_upload_bytes: MAX_UPLOAD_LIMIT + 1,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = StorageConfig {
            max_upload_bytes: MAX_UPLOAD_LIMIT,
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }
}

//! AppContext - Wires adapters and the compatibility client from config.
//!
//! The context is an explicit value handed to consumers. Nothing here is
//! global; two contexts built from the same config share no state.

use std::sync::Arc;

use crate::adapters::{
    FileDocumentStore, InMemoryBlobStorage, InMemoryDocumentStore, LocalBlobStorage,
    MockPaymentGateway,
};
use crate::config::{AppConfig, ConfigError, StorageBackend, StoreBackend};
use crate::ports::{BlobStorage, DocumentStore, PaymentGateway};

use super::client::{ClientLimits, CompatClient};
use super::handlers::profile::{
    ClaimHandleHandler, EnsureProfileHandler, OpenBillingPortalHandler, PublishProfileHandler,
    RemoveMediaItemHandler, SaveOnboardingStepHandler, SaveTestimonialsHandler,
    StartCheckoutHandler,
};

/// Everything a consumer needs to talk to the backend.
#[derive(Clone)]
pub struct AppContext {
    pub client: CompatClient,
    pub payments: Arc<dyn PaymentGateway>,
}

impl AppContext {
    /// Validates `config` and builds the selected adapters.
    pub fn from_config(config: &AppConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let capacity = config.store.change_channel_capacity;
        let store: Arc<dyn DocumentStore> = match config.store.backend {
            StoreBackend::Memory => Arc::new(InMemoryDocumentStore::with_capacity(capacity)),
            StoreBackend::File => Arc::new(FileDocumentStore::with_capacity(
                config.store.data_dir.clone(),
                capacity,
            )),
        };

        let public_base_url = config.storage.public_base_url.clone();
        let blobs: Arc<dyn BlobStorage> = match config.storage.backend {
            StorageBackend::Memory => Arc::new(InMemoryBlobStorage::new(public_base_url)),
            StorageBackend::Local => Arc::new(LocalBlobStorage::new(
                config.storage.root_dir.clone(),
                public_base_url,
            )),
        };

        let client = CompatClient::new(store, blobs).with_limits(ClientLimits {
            max_upload_bytes: config.storage.max_upload_bytes,
        });

        let payments: Arc<dyn PaymentGateway> = Arc::new(MockPaymentGateway::new(
            config.payment.checkout_base_url.clone(),
            config.payment.portal_base_url.clone(),
        ));

        tracing::info!(
            store = ?config.store.backend,
            storage = ?config.storage.backend,
            "Application context ready"
        );
        Ok(Self { client, payments })
    }

    /// Context over fresh in-memory adapters.
    pub fn in_memory() -> Self {
        let defaults = AppConfig::default();
        Self {
            client: CompatClient::new(
                Arc::new(InMemoryDocumentStore::new()),
                Arc::new(InMemoryBlobStorage::new(defaults.storage.public_base_url)),
            ),
            payments: Arc::new(MockPaymentGateway::new(
                defaults.payment.checkout_base_url,
                defaults.payment.portal_base_url,
            )),
        }
    }

    pub fn ensure_profile(&self) -> EnsureProfileHandler {
        EnsureProfileHandler::new(self.client.clone())
    }

    pub fn claim_handle(&self) -> ClaimHandleHandler {
        ClaimHandleHandler::new(self.client.clone())
    }

    pub fn save_onboarding_step(&self) -> SaveOnboardingStepHandler {
        SaveOnboardingStepHandler::new(self.client.clone())
    }

    pub fn save_testimonials(&self) -> SaveTestimonialsHandler {
        SaveTestimonialsHandler::new(self.client.clone())
    }

    pub fn remove_media_item(&self) -> RemoveMediaItemHandler {
        RemoveMediaItemHandler::new(self.client.clone())
    }

    pub fn publish_profile(&self) -> PublishProfileHandler {
        PublishProfileHandler::new(self.client.clone())
    }

    pub fn start_checkout(&self) -> StartCheckoutHandler {
        StartCheckoutHandler::new(self.client.clone(), Arc::clone(&self.payments))
    }

    pub fn open_billing_portal(&self) -> OpenBillingPortalHandler {
        OpenBillingPortalHandler::new(self.client.clone(), Arc::clone(&self.payments))
    }
}

impl std::fmt::Debug for AppContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppContext")
            .field("client", &self.client)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::profile::EnsureProfileCommand;
    use crate::config::{StorageConfig, StoreConfig};
    use crate::domain::foundation::UserId;

    #[test]
    fn invalid_config_is_rejected() {
        let mut config = AppConfig::default();
        config.store.change_channel_capacity = 0;
        assert!(matches!(
            AppContext::from_config(&config),
            Err(ConfigError::ValidationFailed(_))
        ));
    }

    #[tokio::test]
    async fn file_backed_context_persists_profiles() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig {
            store: StoreConfig {
                backend: StoreBackend::File,
                data_dir: dir.path().join("docs"),
                ..Default::default()
            },
            storage: StorageConfig {
                backend: StorageBackend::Local,
                root_dir: dir.path().join("blobs"),
                ..Default::default()
            },
            ..Default::default()
        };
        let user_id = UserId::new("u1").unwrap();

        let first = AppContext::from_config(&config).unwrap();
        let created = first
            .ensure_profile()
            .handle(EnsureProfileCommand {
                user_id: user_id.clone(),
            })
            .await
            .unwrap();
        assert!(created.created);

        let second = AppContext::from_config(&config).unwrap();
        let found = second
            .ensure_profile()
            .handle(EnsureProfileCommand { user_id })
            .await
            .unwrap();
        assert!(!found.created);
        assert_eq!(found.profile.id, created.profile.id);
    }

    #[test]
    fn upload_limit_comes_from_config() {
        let mut config = AppConfig::default();
        config.storage.max_upload_bytes = 4;
        let context = AppContext::from_config(&config).unwrap();

        assert_eq!(context.client.limits().max_upload_bytes, 4);
    }
}

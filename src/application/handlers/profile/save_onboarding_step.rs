//! SaveOnboardingStepHandler - Persists one wizard step.

use crate::application::client::CompatClient;
use crate::application::session::{fetch_profile, write_profile};
use crate::domain::foundation::ProfileId;
use crate::domain::profile::{OnboardingStep, Profile, ProfilePatch};

use super::ProfileError;

/// Command to save the fields of a completed step.
#[derive(Debug, Clone)]
pub struct SaveOnboardingStepCommand {
    pub profile_id: ProfileId,
    pub step: OnboardingStep,
    pub patch: ProfilePatch,
}

/// Result of a saved step.
#[derive(Debug, Clone)]
pub struct SaveOnboardingStepResult {
    pub profile: Profile,
}

/// Handler for the "next" button of each wizard step.
pub struct SaveOnboardingStepHandler {
    client: CompatClient,
}

impl SaveOnboardingStepHandler {
    pub fn new(client: CompatClient) -> Self {
        Self { client }
    }

    pub async fn handle(
        &self,
        cmd: SaveOnboardingStepCommand,
    ) -> Result<SaveOnboardingStepResult, ProfileError> {
        // 1. Validate the step's fields
        cmd.patch.validate()?;

        // 2. Progress only moves forward; revisiting an earlier step keeps it
        let current = fetch_profile(&self.client, &cmd.profile_id).await?;
        let mut patch = cmd.patch;
        patch.onboarding_step = Some(current.onboarding_step.max(cmd.step.number()));

        // 3. One write for fields and progress
        let profile = write_profile(&self.client, &cmd.profile_id, &patch).await?;

        tracing::debug!(
            profile_id = %cmd.profile_id,
            step = cmd.step.number(),
            progress = profile.onboarding_step,
            "Onboarding step saved"
        );
        Ok(SaveOnboardingStepResult { profile })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::{InMemoryBlobStorage, InMemoryDocumentStore};
    use crate::domain::profile::{BannerConfig, BookingConfig, BookingMode};
    use serde_json::json;
    use std::sync::Arc;

    async fn setup() -> SaveOnboardingStepHandler {
        let client = CompatClient::new(
            Arc::new(InMemoryDocumentStore::new()),
            Arc::new(InMemoryBlobStorage::new("http://localhost")),
        );
        client
            .from("profiles")
            .insert(&json!({"id": "p1", "user_id": "u1", "onboarding_step": 0}))
            .await;
        SaveOnboardingStepHandler::new(client)
    }

    fn pid() -> ProfileId {
        ProfileId::new("p1").unwrap()
    }

    #[tokio::test]
    async fn saves_fields_and_advances_progress() {
        let handler = setup().await;

        let result = handler
            .handle(SaveOnboardingStepCommand {
                profile_id: pid(),
                step: OnboardingStep::Branding,
                patch: ProfilePatch {
                    name: Some("Bella".into()),
                    banner: Some(BannerConfig {
                        image_url: None,
                        tagline: Some("Cuts & color".into()),
                        overlay_opacity: Some(0.4),
                    }),
                    ..Default::default()
                },
            })
            .await
            .unwrap();

        assert_eq!(result.profile.name.as_deref(), Some("Bella"));
        assert_eq!(result.profile.onboarding_step, 2);
    }

    #[tokio::test]
    async fn revisiting_earlier_step_keeps_progress() {
        let handler = setup().await;
        handler
            .handle(SaveOnboardingStepCommand {
                profile_id: pid(),
                step: OnboardingStep::Footer,
                patch: ProfilePatch::default(),
            })
            .await
            .unwrap();

        let result = handler
            .handle(SaveOnboardingStepCommand {
                profile_id: pid(),
                step: OnboardingStep::Handle,
                patch: ProfilePatch::default(),
            })
            .await
            .unwrap();
        assert_eq!(result.profile.onboarding_step, OnboardingStep::Footer.number());
    }

    #[tokio::test]
    async fn invalid_patch_is_rejected() {
        let handler = setup().await;

        let err = handler
            .handle(SaveOnboardingStepCommand {
                profile_id: pid(),
                step: OnboardingStep::Booking,
                patch: ProfilePatch {
                    booking: Some(BookingConfig {
                        mode: BookingMode::ExternalLink,
                        external_url: None,
                        slot_minutes: Some(30),
                        requires_approval: false,
                    }),
                    ..Default::default()
                },
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ProfileError::Validation(_)));
    }
}

//! PublishProfileHandler - Makes a booking page public behind the paywall.

use serde_json::json;

use crate::application::client::CompatClient;
use crate::application::session::{fetch_profile, write_profile};
use crate::domain::foundation::ProfileId;
use crate::domain::profile::{Profile, ProfileStatus};

use super::ProfileError;

/// Command to publish a profile.
#[derive(Debug, Clone)]
pub struct PublishProfileCommand {
    pub profile_id: ProfileId,
}

/// Result of publishing.
#[derive(Debug, Clone)]
pub struct PublishProfileResult {
    pub profile: Profile,
    /// False when the profile was already published.
    pub changed: bool,
}

/// Handler for the final onboarding step and the dashboard publish toggle.
pub struct PublishProfileHandler {
    client: CompatClient,
}

impl PublishProfileHandler {
    pub fn new(client: CompatClient) -> Self {
        Self { client }
    }

    pub async fn handle(
        &self,
        cmd: PublishProfileCommand,
    ) -> Result<PublishProfileResult, ProfileError> {
        let profile = fetch_profile(&self.client, &cmd.profile_id).await?;

        if profile.handle.is_none() {
            return Err(ProfileError::not_publishable("no handle claimed"));
        }
        if !profile.subscription_status.grants_access() {
            return Err(ProfileError::not_publishable(format!(
                "subscription is {:?}",
                profile.subscription_status
            )));
        }
        if profile.is_published() {
            return Ok(PublishProfileResult {
                profile,
                changed: false,
            });
        }

        let profile = write_profile(
            &self.client,
            &cmd.profile_id,
            &json!({ "status": ProfileStatus::Published }),
        )
        .await?;

        tracing::info!(profile_id = %cmd.profile_id, "Profile published");
        Ok(PublishProfileResult {
            profile,
            changed: true,
        })
    }
}

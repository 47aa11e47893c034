//! EnsureProfileHandler - Lazily creates the owner's draft profile.

use serde_json::json;

use crate::application::client::CompatClient;
use crate::application::session::find_profile_by_user;
use crate::domain::foundation::UserId;
use crate::domain::profile::{Profile, ProfileStatus, SubscriptionStatus};

use super::ProfileError;

/// Command to fetch or create the profile of a user.
#[derive(Debug, Clone)]
pub struct EnsureProfileCommand {
    pub user_id: UserId,
}

/// Result of ensuring a profile.
#[derive(Debug, Clone)]
pub struct EnsureProfileResult {
    pub profile: Profile,
    /// True when this call inserted the draft.
    pub created: bool,
}

/// Handler for first entry into the onboarding wizard.
pub struct EnsureProfileHandler {
    client: CompatClient,
}

impl EnsureProfileHandler {
    pub fn new(client: CompatClient) -> Self {
        Self { client }
    }

    pub async fn handle(
        &self,
        cmd: EnsureProfileCommand,
    ) -> Result<EnsureProfileResult, ProfileError> {
        // 1. Existing profile wins
        if let Some(profile) = find_profile_by_user(&self.client, &cmd.user_id).await? {
            return Ok(EnsureProfileResult {
                profile,
                created: false,
            });
        }

        // 2. Insert a draft
        let draft = json!({
            "user_id": cmd.user_id,
            "status": ProfileStatus::Draft,
            "subscription_status": SubscriptionStatus::Inactive,
            "onboarding_step": 0,
            "media": [],
            "social_links": [],
            "testimonials": [],
        });
        let profile = self
            .client
            .from("profiles")
            .insert(&draft)
            .select("*")
            .single()
            .await
            .decode::<Profile>()
            .into_result()?
            .ok_or_else(|| ProfileError::not_found("inserted profile"))?;

        tracing::info!(user_id = %cmd.user_id, profile_id = %profile.id, "Created draft profile");
        Ok(EnsureProfileResult {
            profile,
            created: true,
        })
    }
}

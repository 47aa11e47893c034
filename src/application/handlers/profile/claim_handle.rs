//! ClaimHandleHandler - Assigns the public handle of a profile.
//!
//! The store does not enforce handle uniqueness, so this handler checks for
//! an owner before writing. Two claims racing for the same handle can both
//! pass the check; the lookup then returns the lower profile id.

use serde_json::json;

use crate::application::client::CompatClient;
use crate::application::session::{fetch_profile, write_profile};
use crate::domain::foundation::ProfileId;
use crate::domain::profile::{Handle, Profile};
use crate::domain::query::Column;

use super::ProfileError;

/// Command to claim a handle.
#[derive(Debug, Clone)]
pub struct ClaimHandleCommand {
    pub profile_id: ProfileId,
    /// Raw user input; trimmed and lowercased before validation.
    pub handle: String,
}

/// Result of a handle claim.
#[derive(Debug, Clone)]
pub struct ClaimHandleResult {
    pub profile: Profile,
    pub handle: Handle,
}

/// Handler for the handle step of onboarding.
pub struct ClaimHandleHandler {
    client: CompatClient,
}

impl ClaimHandleHandler {
    pub fn new(client: CompatClient) -> Self {
        Self { client }
    }

    pub async fn handle(&self, cmd: ClaimHandleCommand) -> Result<ClaimHandleResult, ProfileError> {
        // 1. Validate
        let handle = Handle::parse(&cmd.handle).map_err(ProfileError::InvalidHandle)?;

        // 2. Load profile and check immutability
        let profile = fetch_profile(&self.client, &cmd.profile_id).await?;
        match &profile.handle {
            Some(current) if current == &handle => {
                return Ok(ClaimHandleResult { profile, handle });
            }
            Some(current) => {
                return Err(ProfileError::HandleImmutable {
                    current: current.to_string(),
                });
            }
            None => {}
        }

        // 3. Check availability
        let owner = self
            .client
            .from("profiles")
            .select("id")
            .eq(Column::Handle.name(), handle.as_str())
            .maybe_single()
            .await
            .into_result()?;
        if owner.is_some() {
            return Err(ProfileError::HandleTaken(handle.to_string()));
        }

        // 4. Write by primary key
        let profile = write_profile(
            &self.client,
            &cmd.profile_id,
            &json!({ "handle": handle }),
        )
        .await?;

        tracing::info!(profile_id = %cmd.profile_id, handle = %handle, "Handle claimed");
        Ok(ClaimHandleResult { profile, handle })
    }
}

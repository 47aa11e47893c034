//! Profile session - resolve the owner's profile once, then write by id.
//!
//! Updates addressed by `user_id` go through a read-then-write on the query
//! surface and can lose a concurrent change. A session resolves
//! `user_id -> ProfileId` when opened and routes every later read and write
//! through the primary key, which merges in a single store call.

use serde::Serialize;

use crate::domain::foundation::{ProfileId, UserId};
use crate::domain::profile::{Profile, ProfilePatch};
use crate::domain::query::Column;

use super::client::CompatClient;
use super::handlers::profile::ProfileError;

/// An owner's handle on their profile.
#[derive(Debug, Clone)]
pub struct ProfileSession {
    client: CompatClient,
    user_id: UserId,
    profile_id: ProfileId,
}

impl ProfileSession {
    /// Resolves the owner's profile.
    ///
    /// # Errors
    ///
    /// `ProfileError::NotFound` when the user has no profile yet.
    pub async fn open(client: CompatClient, user_id: UserId) -> Result<Self, ProfileError> {
        let profile = find_profile_by_user(&client, &user_id)
            .await?
            .ok_or_else(|| ProfileError::not_found(format!("profile for user '{user_id}'")))?;
        Ok(Self::for_profile(client, &profile))
    }

    /// Session over an already loaded profile.
    pub fn for_profile(client: CompatClient, profile: &Profile) -> Self {
        Self {
            client,
            user_id: profile.user_id.clone(),
            profile_id: profile.id.clone(),
        }
    }

    pub fn profile_id(&self) -> &ProfileId {
        &self.profile_id
    }

    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    pub fn client(&self) -> &CompatClient {
        &self.client
    }

    /// Current state of the profile.
    pub async fn load(&self) -> Result<Profile, ProfileError> {
        fetch_profile(&self.client, &self.profile_id).await
    }

    /// Validates and applies a patch; returns the stored result.
    pub async fn update(&self, patch: &ProfilePatch) -> Result<Profile, ProfileError> {
        patch.validate()?;
        write_profile(&self.client, &self.profile_id, patch).await
    }
}

/// Loads a profile by primary key.
pub(crate) async fn fetch_profile(
    client: &CompatClient,
    id: &ProfileId,
) -> Result<Profile, ProfileError> {
    client
        .from("profiles")
        .select("*")
        .eq(Column::Id.name(), id.as_str())
        .maybe_single()
        .await
        .decode::<Profile>()
        .into_result()?
        .ok_or_else(|| ProfileError::not_found(format!("profile '{id}'")))
}

/// Looks up the profile owned by a user.
pub(crate) async fn find_profile_by_user(
    client: &CompatClient,
    user_id: &UserId,
) -> Result<Option<Profile>, ProfileError> {
    Ok(client
        .from("profiles")
        .select("*")
        .eq(Column::UserId.name(), user_id.as_str())
        .maybe_single()
        .await
        .decode::<Profile>()
        .into_result()?)
}

/// Merges `fields` into a profile by primary key.
pub(crate) async fn write_profile<T: Serialize + ?Sized>(
    client: &CompatClient,
    id: &ProfileId,
    fields: &T,
) -> Result<Profile, ProfileError> {
    client
        .from("profiles")
        .update(fields)
        .eq(Column::Id.name(), id.as_str())
        .execute()
        .await
        .decode::<Profile>()
        .into_result()?
        .ok_or_else(|| ProfileError::not_found(format!("profile '{id}'")))
}

//! RemoveMediaItemHandler - Splices one gallery item out of the profile.

use serde_json::json;

use crate::application::client::CompatClient;
use crate::application::session::{fetch_profile, write_profile};
use crate::domain::foundation::ProfileId;
use crate::domain::profile::{MediaItem, Profile};
use crate::domain::storage::Bucket;

use super::ProfileError;

/// Command to remove a media item.
#[derive(Debug, Clone)]
pub struct RemoveMediaItemCommand {
    pub profile_id: ProfileId,
    pub media_id: String,
}

/// Result of removing a media item.
#[derive(Debug, Clone)]
pub struct RemoveMediaItemResult {
    pub profile: Profile,
    pub removed: MediaItem,
    /// Whether the uploaded file was deleted as well.
    pub blob_removed: bool,
}

/// Handler for the delete button of the gallery editor.
pub struct RemoveMediaItemHandler {
    client: CompatClient,
}

impl RemoveMediaItemHandler {
    pub fn new(client: CompatClient) -> Self {
        Self { client }
    }

    pub async fn handle(
        &self,
        cmd: RemoveMediaItemCommand,
    ) -> Result<RemoveMediaItemResult, ProfileError> {
        // 1. Splice the item out of the current list
        let profile = fetch_profile(&self.client, &cmd.profile_id).await?;
        let mut media = profile.media;
        let index = media
            .iter()
            .position(|item| item.id == cmd.media_id)
            .ok_or_else(|| ProfileError::not_found(format!("media item '{}'", cmd.media_id)))?;
        let removed = media.remove(index);

        // 2. Resave the whole field
        let profile = write_profile(&self.client, &cmd.profile_id, &json!({ "media": media })).await?;

        // 3. Best-effort blob cleanup; the profile no longer references it
        let blob_removed = match &removed.storage_path {
            Some(path) => {
                let response = self
                    .client
                    .storage()
                    .from(Bucket::Media.name())
                    .remove(&[path.as_str()])
                    .await;
                match response.into_result() {
                    Ok(paths) => paths.is_some_and(|p| !p.is_empty()),
                    Err(e) => {
                        tracing::warn!(
                            profile_id = %cmd.profile_id,
                            path = %path,
                            error = %e,
                            "Failed to remove media blob"
                        );
                        false
                    }
                }
            }
            None => false,
        };

        Ok(RemoveMediaItemResult {
            profile,
            removed,
            blob_removed,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::{InMemoryBlobStorage, InMemoryDocumentStore};
    use crate::application::storage::FileOptions;
    use std::sync::Arc;

    async fn setup() -> (RemoveMediaItemHandler, InMemoryBlobStorage) {
        let blobs = InMemoryBlobStorage::new("https://files.test");
        let client = CompatClient::new(Arc::new(InMemoryDocumentStore::new()), Arc::new(blobs.clone()));
        client
            .storage()
            .from("media")
            .upload("u1/1-a.png", vec![1u8], FileOptions::default())
            .await;
        client
            .from("profiles")
            .insert(&json!({
                "id": "p1",
                "user_id": "u1",
                "media": [
                    {"id": "m1", "kind": "image", "url": "https://files.test/media/u1/1-a.png", "storage_path": "u1/1-a.png"},
                    {"id": "m2", "kind": "video", "url": "https://video.test/v"},
                    {"id": "m3", "kind": "image", "url": "https://img.test/c.png", "storage_path": "u1/missing.png"}
                ]
            }))
            .await;
        (RemoveMediaItemHandler::new(client), blobs)
    }

    fn cmd(media_id: &str) -> RemoveMediaItemCommand {
        RemoveMediaItemCommand {
            profile_id: ProfileId::new("p1").unwrap(),
            media_id: media_id.into(),
        }
    }

    #[tokio::test]
    async fn removes_item_and_blob() {
        let (handler, blobs) = setup().await;

        let result = handler.handle(cmd("m1")).await.unwrap();

        let ids: Vec<_> = result.profile.media.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, vec!["m2", "m3"]);
        assert_eq!(result.removed.id, "m1");
        assert!(result.blob_removed);
        assert_eq!(blobs.object_count(Bucket::Media).await, 0);
    }

    #[tokio::test]
    async fn external_item_has_no_blob() {
        let (handler, blobs) = setup().await;

        let result = handler.handle(cmd("m2")).await.unwrap();

        assert!(!result.blob_removed);
        assert_eq!(result.profile.media.len(), 2);
        assert_eq!(blobs.object_count(Bucket::Media).await, 1);
    }

    #[tokio::test]
    async fn missing_blob_does_not_fail_removal() {
        let (handler, _blobs) = setup().await;

        let result = handler.handle(cmd("m3")).await.unwrap();
        assert!(!result.blob_removed);
        assert!(result.profile.media_item("m3").is_none());
    }

    #[tokio::test]
    async fn unknown_item_is_not_found() {
        let (handler, _blobs) = setup().await;
        let err = handler.handle(cmd("nope")).await.unwrap_err();
        assert!(matches!(err, ProfileError::NotFound(_)));
    }
}

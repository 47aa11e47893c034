//! SaveTestimonialsHandler - Uploads testimonial photos and saves the list.
//!
//! Photos are uploaded one after another, each awaited before the next
//! starts. The whole testimonial list (and the about section, when given)
//! is then written in a single update, so a reader never sees a list that
//! points at photos still being uploaded.

use bytes::Bytes;
use serde::Serialize;

use crate::application::client::CompatClient;
use crate::application::session::write_profile;
use crate::application::storage::FileOptions;
use crate::domain::foundation::{ProfileId, UserId};
use crate::domain::profile::{AboutSection, Profile, Testimonial};
use crate::domain::query::QueryError;
use crate::domain::storage::{Bucket, ObjectPath};

use super::ProfileError;

/// A photo selected in the editor but not uploaded yet.
#[derive(Debug, Clone)]
pub struct PendingImage {
    pub filename: String,
    pub content: Bytes,
}

/// One row of the testimonial editor.
#[derive(Debug, Clone)]
pub struct TestimonialDraft {
    pub testimonial: Testimonial,
    /// Replaces `testimonial.image_url` once uploaded.
    pub image: Option<PendingImage>,
}

/// Command to save the testimonial section.
#[derive(Debug, Clone)]
pub struct SaveTestimonialsCommand {
    pub profile_id: ProfileId,
    /// Uploader; namespaces the object paths.
    pub user_id: UserId,
    pub testimonials: Vec<TestimonialDraft>,
    pub about: Option<AboutSection>,
}

/// Result of saving testimonials.
#[derive(Debug, Clone)]
pub struct SaveTestimonialsResult {
    pub profile: Profile,
    pub uploaded: Vec<ObjectPath>,
}

#[derive(Serialize)]
struct TestimonialsUpdate<'a> {
    testimonials: &'a [Testimonial],
    #[serde(skip_serializing_if = "Option::is_none")]
    about: Option<&'a AboutSection>,
}

/// Handler for the testimonials step and dashboard section.
pub struct SaveTestimonialsHandler {
    client: CompatClient,
}

impl SaveTestimonialsHandler {
    pub fn new(client: CompatClient) -> Self {
        Self { client }
    }

    pub async fn handle(
        &self,
        cmd: SaveTestimonialsCommand,
    ) -> Result<SaveTestimonialsResult, ProfileError> {
        // 1. Validate everything before touching storage
        for draft in &cmd.testimonials {
            draft.testimonial.validate()?;
        }

        // 2. Upload pending photos sequentially
        let bucket = self.client.storage().from(Bucket::Media.name());
        let mut testimonials = Vec::with_capacity(cmd.testimonials.len());
        let mut uploaded = Vec::new();
        for draft in cmd.testimonials {
            let mut testimonial = draft.testimonial;
            if let Some(image) = draft.image {
                let path = ObjectPath::for_upload(&cmd.user_id, &image.filename, self.client.now());
                let stored = bucket
                    .upload(path.as_str(), image.content, FileOptions::default())
                    .await
                    .into_result()?
                    .ok_or_else(|| QueryError::backend("upload returned no object"))?;
                let url = bucket
                    .get_public_url(stored.path.as_str())
                    .into_result()?
                    .ok_or_else(|| QueryError::backend("no public url for upload"))?;

                testimonial.image_url = Some(url);
                uploaded.push(stored.path);
            }
            testimonials.push(testimonial);
        }

        // 3. One write for the whole section
        let update = TestimonialsUpdate {
            testimonials: &testimonials,
            about: cmd.about.as_ref(),
        };
        let profile = write_profile(&self.client, &cmd.profile_id, &update).await?;

        tracing::debug!(
            profile_id = %cmd.profile_id,
            testimonials = testimonials.len(),
            uploads = uploaded.len(),
            "Testimonials saved"
        );
        Ok(SaveTestimonialsResult { profile, uploaded })
    }
}

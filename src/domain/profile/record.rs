//! The profile record and its typed partial update.

use serde::{Deserialize, Deserializer, Serialize};

use crate::domain::foundation::{ProfileId, Timestamp, UserId, ValidationError};
use crate::domain::query::{to_document, Document, QueryError};

use super::content::{
    validate_media, AboutSection, BannerConfig, BookingConfig, FooterPolicy, MediaItem,
    SocialLink, Testimonial,
};
use super::Handle;

/// Publication state of the booking page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProfileStatus {
    #[default]
    Draft,
    Published,
}

/// Paywall state mirrored from the payment provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionStatus {
    #[default]
    Inactive,
    Trialing,
    Active,
    PastDue,
    Canceled,
}

impl SubscriptionStatus {
    /// Whether the subscription currently allows a published page.
    pub fn grants_access(&self) -> bool {
        matches!(
            self,
            SubscriptionStatus::Trialing | SubscriptionStatus::Active | SubscriptionStatus::PastDue
        )
    }
}

/// Wizard steps, in order. The stored counter is the highest completed step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum OnboardingStep {
    Handle = 1,
    Branding = 2,
    Media = 3,
    About = 4,
    Footer = 5,
    Booking = 6,
    Subscription = 7,
}

impl OnboardingStep {
    pub const COUNT: u8 = 7;

    pub fn number(self) -> u8 {
        self as u8
    }
}

/// One booking page's worth of state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub id: ProfileId,
    pub user_id: UserId,
    #[serde(default)]
    pub handle: Option<Handle>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub banner: Option<BannerConfig>,
    #[serde(default)]
    pub about: Option<AboutSection>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub media: Vec<MediaItem>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub social_links: Vec<SocialLink>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub testimonials: Vec<Testimonial>,
    #[serde(default)]
    pub footer: Option<FooterPolicy>,
    #[serde(default)]
    pub booking: Option<BookingConfig>,
    #[serde(default)]
    pub status: ProfileStatus,
    #[serde(default)]
    pub subscription_status: SubscriptionStatus,
    #[serde(default)]
    pub onboarding_step: u8,
    #[serde(default)]
    pub created_at: Option<Timestamp>,
    #[serde(default)]
    pub updated_at: Option<Timestamp>,
    /// Keys this model does not know about, kept verbatim.
    #[serde(flatten)]
    pub extra: Document,
}

impl Profile {
    pub fn is_published(&self) -> bool {
        self.status == ProfileStatus::Published
    }

    pub fn media_item(&self, media_id: &str) -> Option<&MediaItem> {
        self.media.iter().find(|m| m.id == media_id)
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Fields a wizard step or dashboard section may write in one save.
///
/// `None` leaves the stored field untouched. The handle is deliberately
/// absent: it is only written by the claim flow.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ProfilePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub banner: Option<BannerConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub about: Option<AboutSection>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub media: Option<Vec<MediaItem>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub social_links: Option<Vec<SocialLink>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub testimonials: Option<Vec<Testimonial>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub footer: Option<FooterPolicy>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub booking: Option<BookingConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<ProfileStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subscription_status: Option<SubscriptionStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub onboarding_step: Option<u8>,
}

impl ProfilePatch {
    pub fn is_empty(&self) -> bool {
        self == &ProfilePatch::default()
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(banner) = &self.banner {
            banner.validate()?;
        }
        if let Some(media) = &self.media {
            validate_media(media)?;
        }
        for link in self.social_links.iter().flatten() {
            link.validate()?;
        }
        for testimonial in self.testimonials.iter().flatten() {
            testimonial.validate()?;
        }
        if let Some(footer) = &self.footer {
            footer.validate()?;
        }
        if let Some(booking) = &self.booking {
            booking.validate()?;
        }
        if let Some(step) = self.onboarding_step {
            if step > OnboardingStep::COUNT {
                return Err(ValidationError::out_of_range(
                    "onboarding_step",
                    0,
                    OnboardingStep::COUNT as i64,
                    step as i64,
                ));
            }
        }
        Ok(())
    }

    pub fn to_document(&self) -> Result<Document, QueryError> {
        to_document(self)
    }
}

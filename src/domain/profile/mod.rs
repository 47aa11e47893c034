//! Profile module - the per-user booking page document.
//!
//! - `Profile` - decoded record with typed nested content
//! - `ProfilePatch` - typed partial update for one save
//! - `Handle` - validated public slug
//! - `validate_profile_fields` - boundary check for raw payloads

mod content;
mod fields;
mod handle;
mod record;

pub use content::{
    validate_media, AboutSection, BannerConfig, BookingConfig, BookingMode, BusinessHours,
    FooterPolicy, MediaItem, MediaKind, SocialLink, SocialPlatform, Testimonial, Weekday,
};
pub use fields::validate_profile_fields;
pub use handle::Handle;
pub use record::{OnboardingStep, Profile, ProfilePatch, ProfileStatus, SubscriptionStatus};

//! Profile handlers.
//!
//! Command handlers for the onboarding wizard and dashboard editor. They
//! talk to storage only through the compatibility client.
//!
//! ## Onboarding
//! - Creating the draft profile on first entry
//! - Claiming the public handle
//! - Saving each wizard step
//!
//! ## Dashboard
//! - Saving testimonials with their photos
//! - Removing gallery items
//! - Publishing behind the paywall
//! - Checkout and billing portal redirects

mod billing;
mod claim_handle;
mod ensure_profile;
mod error;
mod publish_profile;
mod remove_media_item;
mod save_onboarding_step;
mod save_testimonials;

pub use billing::{
    OpenBillingPortalCommand, OpenBillingPortalHandler, StartCheckoutCommand, StartCheckoutHandler,
};
pub use claim_handle::{ClaimHandleCommand, ClaimHandleHandler, ClaimHandleResult};
pub use ensure_profile::{EnsureProfileCommand, EnsureProfileHandler, EnsureProfileResult};
pub use error::ProfileError;
pub use publish_profile::{PublishProfileCommand, PublishProfileHandler, PublishProfileResult};
pub use remove_media_item::{RemoveMediaItemCommand, RemoveMediaItemHandler, RemoveMediaItemResult};
pub use save_onboarding_step::{
    SaveOnboardingStepCommand, SaveOnboardingStepHandler, SaveOnboardingStepResult,
};
pub use save_testimonials::{
    PendingImage, SaveTestimonialsCommand, SaveTestimonialsHandler, SaveTestimonialsResult,
    TestimonialDraft,
};

//! Application handlers.
//!
//! Command handlers that orchestrate profile edits through the query adapter.

pub mod profile;

pub use profile::{
    ClaimHandleCommand, ClaimHandleHandler, ClaimHandleResult, EnsureProfileCommand,
    EnsureProfileHandler, EnsureProfileResult, OpenBillingPortalCommand, OpenBillingPortalHandler,
    PendingImage, ProfileError, PublishProfileCommand, PublishProfileHandler,
    PublishProfileResult, RemoveMediaItemCommand, RemoveMediaItemHandler, RemoveMediaItemResult,
    SaveOnboardingStepCommand, SaveOnboardingStepHandler, SaveOnboardingStepResult,
    SaveTestimonialsCommand, SaveTestimonialsHandler, SaveTestimonialsResult,
    StartCheckoutCommand, StartCheckoutHandler, TestimonialDraft,
};

//! Boundary validation of raw profile payloads.
//!
//! The query surface accepts arbitrary JSON objects. Before a write reaches
//! storage every known key is decoded into its typed structure, so a
//! malformed nested shape is rejected instead of silently persisted.
//! Unknown keys pass through untouched.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::domain::foundation::ValidationError;
use crate::domain::query::Document;

use super::content::{
    validate_media, AboutSection, BannerConfig, BookingConfig, FooterPolicy, MediaItem,
    SocialLink, Testimonial,
};
use super::{Handle, OnboardingStep, ProfileStatus, SubscriptionStatus};

/// Validates every recognized key of a profile write payload.
pub fn validate_profile_fields(fields: &Document) -> Result<(), ValidationError> {
    for (key, value) in fields {
        match key.as_str() {
            "user_id" => match value {
                Value::String(s) if !s.is_empty() => {}
                _ => return Err(ValidationError::empty_field("user_id")),
            },
            "handle" => {
                if !value.is_null() {
                    decode::<Handle>(key, value)?;
                }
            }
            "banner" => {
                if let Some(banner) = decode_optional::<BannerConfig>(key, value)? {
                    banner.validate()?;
                }
            }
            "about" => {
                decode_optional::<AboutSection>(key, value)?;
            }
            "media" => validate_media(&decode::<Vec<MediaItem>>(key, value)?)?,
            "social_links" => {
                for link in decode::<Vec<SocialLink>>(key, value)? {
                    link.validate()?;
                }
            }
            "testimonials" => {
                for testimonial in decode::<Vec<Testimonial>>(key, value)? {
                    testimonial.validate()?;
                }
            }
            "footer" => {
                if let Some(footer) = decode_optional::<FooterPolicy>(key, value)? {
                    footer.validate()?;
                }
            }
            "booking" => {
                if let Some(booking) = decode_optional::<BookingConfig>(key, value)? {
                    booking.validate()?;
                }
            }
            "status" => {
                decode::<ProfileStatus>(key, value)?;
            }
            "subscription_status" => {
                decode::<SubscriptionStatus>(key, value)?;
            }
            "onboarding_step" => {
                let step = value
                    .as_u64()
                    .ok_or_else(|| ValidationError::invalid_format(key, "expected a step number"))?;
                if step > OnboardingStep::COUNT as u64 {
                    return Err(ValidationError::out_of_range(
                        key,
                        0,
                        OnboardingStep::COUNT as i64,
                        step as i64,
                    ));
                }
            }
            _ => {}
        }
    }
    Ok(())
}

fn decode<T: DeserializeOwned>(key: &str, value: &Value) -> Result<T, ValidationError> {
    serde_json::from_value(value.clone())
        .map_err(|e| ValidationError::invalid_format(key, e.to_string()))
}

fn decode_optional<T: DeserializeOwned>(
    key: &str,
    value: &Value,
) -> Result<Option<T>, ValidationError> {
    if value.is_null() {
        return Ok(None);
    }
    decode(key, value).map(Some)
}

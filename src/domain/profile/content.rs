//! Nested content of a profile.
//!
//! These are not independent entities: each list or block lives inside the
//! profile document and is rewritten wholesale on every save.

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::domain::foundation::ValidationError;

/// Hero banner shown at the top of the booking page.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct BannerConfig {
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub tagline: Option<String>,
    #[serde(default)]
    pub overlay_opacity: Option<f32>,
}

impl BannerConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(opacity) = self.overlay_opacity {
            if !(0.0..=1.0).contains(&opacity) {
                return Err(ValidationError::invalid_format(
                    "banner.overlay_opacity",
                    "must be between 0.0 and 1.0",
                ));
            }
        }
        Ok(())
    }
}

/// "About" block; saved together with testimonials.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AboutSection {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaKind {
    Image,
    Video,
}

/// Gallery entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaItem {
    pub id: String,
    pub kind: MediaKind,
    pub url: String,
    /// Object path inside the `media` bucket, when uploaded by us.
    #[serde(default)]
    pub storage_path: Option<String>,
    #[serde(default)]
    pub caption: Option<String>,
}

impl MediaItem {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.id.trim().is_empty() {
            return Err(ValidationError::empty_field("media.id"));
        }
        if self.url.trim().is_empty() {
            return Err(ValidationError::empty_field("media.url"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SocialPlatform {
    Instagram,
    Facebook,
    Tiktok,
    Youtube,
    Linkedin,
    X,
    Website,
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocialLink {
    pub platform: SocialPlatform,
    pub url: String,
}

impl SocialLink {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !(self.url.starts_with("https://") || self.url.starts_with("http://")) {
            return Err(ValidationError::invalid_format(
                "social_links.url",
                "must start with http:// or https://",
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Testimonial {
    pub id: String,
    pub author: String,
    pub quote: String,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub rating: Option<u8>,
    #[serde(default)]
    pub image_url: Option<String>,
}

impl Testimonial {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.author.trim().is_empty() {
            return Err(ValidationError::empty_field("testimonials.author"));
        }
        if self.quote.trim().is_empty() {
            return Err(ValidationError::empty_field("testimonials.quote"));
        }
        if let Some(rating) = self.rating {
            if !(1..=5).contains(&rating) {
                return Err(ValidationError::out_of_range(
                    "testimonials.rating",
                    1,
                    5,
                    rating as i64,
                ));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

/// Opening hours for one weekday, `HH:MM` 24h clock.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusinessHours {
    pub day: Weekday,
    #[serde(default)]
    pub closed: bool,
    #[serde(default)]
    pub open: Option<String>,
    #[serde(default)]
    pub close: Option<String>,
}

impl BusinessHours {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.closed {
            return Ok(());
        }
        let open = parse_clock("footer.hours.open", self.open.as_deref())?;
        let close = parse_clock("footer.hours.close", self.close.as_deref())?;
        if open >= close {
            return Err(ValidationError::invalid_format(
                "footer.hours",
                "opening time must be before closing time",
            ));
        }
        Ok(())
    }
}

fn parse_clock(field: &str, value: Option<&str>) -> Result<NaiveTime, ValidationError> {
    let value = value.ok_or_else(|| ValidationError::empty_field(field))?;
    NaiveTime::parse_from_str(value, "%H:%M")
        .map_err(|_| ValidationError::invalid_format(field, "expected HH:MM"))
}

/// Footer and policy block.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FooterPolicy {
    #[serde(default)]
    pub cancellation_policy: Option<String>,
    #[serde(default)]
    pub privacy_policy: Option<String>,
    #[serde(default)]
    pub terms: Option<String>,
    #[serde(default)]
    pub contact_email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub hours: Vec<BusinessHours>,
}

impl FooterPolicy {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(email) = &self.contact_email {
            if !email.contains('@') {
                return Err(ValidationError::invalid_format(
                    "footer.contact_email",
                    "missing @ symbol",
                ));
            }
        }
        let mut seen = HashSet::new();
        for hours in &self.hours {
            if !seen.insert(hours.day) {
                return Err(ValidationError::invalid_format(
                    "footer.hours",
                    format!("{:?} listed more than once", hours.day),
                ));
            }
            hours.validate()?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingMode {
    #[default]
    Internal,
    ExternalLink,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BookingConfig {
    #[serde(default)]
    pub mode: BookingMode,
    #[serde(default)]
    pub external_url: Option<String>,
    #[serde(default)]
    pub slot_minutes: Option<u16>,
    #[serde(default)]
    pub requires_approval: bool,
}

impl BookingConfig {
    pub const MIN_SLOT_MINUTES: u16 = 5;
    pub const MAX_SLOT_MINUTES: u16 = 480;

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.mode == BookingMode::ExternalLink
            && self.external_url.as_deref().map_or(true, |u| u.trim().is_empty())
        {
            return Err(ValidationError::empty_field("booking.external_url"));
        }
        if let Some(slot) = self.slot_minutes {
            if !(Self::MIN_SLOT_MINUTES..=Self::MAX_SLOT_MINUTES).contains(&slot) {
                return Err(ValidationError::out_of_range(
                    "booking.slot_minutes",
                    Self::MIN_SLOT_MINUTES as i64,
                    Self::MAX_SLOT_MINUTES as i64,
                    slot as i64,
                ));
            }
        }
        Ok(())
    }
}

/// Validates a media list, including id uniqueness.
pub fn validate_media(items: &[MediaItem]) -> Result<(), ValidationError> {
    let mut ids = HashSet::new();
    for item in items {
        item.validate()?;
        if !ids.insert(item.id.as_str()) {
            return Err(ValidationError::invalid_format(
                "media.id",
                format!("duplicate id '{}'", item.id),
            ));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hours(day: Weekday, open: &str, close: &str) -> BusinessHours {
        BusinessHours {
            day,
            closed: false,
            open: Some(open.into()),
            close: Some(close.into()),
        }
    }

    #[test]
    fn business_hours_require_ordered_times() {
        assert!(hours(Weekday::Monday, "09:00", "17:30").validate().is_ok());
        assert!(hours(Weekday::Monday, "17:00", "09:00").validate().is_err());
        assert!(hours(Weekday::Monday, "9am", "17:00").validate().is_err());

        let closed = BusinessHours {
            day: Weekday::Sunday,
            closed: true,
            open: None,
            close: None,
        };
        assert!(closed.validate().is_ok());
    }

    #[test]
    fn footer_rejects_duplicate_days_and_bad_email() {
        let footer = FooterPolicy {
            hours: vec![
                hours(Weekday::Friday, "09:00", "12:00"),
                hours(Weekday::Friday, "13:00", "18:00"),
            ],
            ..Default::default()
        };
        assert!(footer.validate().is_err());

        let footer = FooterPolicy {
            contact_email: Some("hello.example.com".into()),
            ..Default::default()
        };
        assert!(footer.validate().is_err());
    }

    #[test]
    fn testimonial_rating_bounds() {
        let mut t = Testimonial {
            id: "t1".into(),
            author: "Ana".into(),
            quote: "Great cut".into(),
            role: None,
            rating: Some(5),
            image_url: None,
        };
        assert!(t.validate().is_ok());
        t.rating = Some(0);
        assert!(t.validate().is_err());
    }

    #[test]
    fn external_booking_needs_url() {
        let booking = BookingConfig {
            mode: BookingMode::ExternalLink,
            ..Default::default()
        };
        assert!(booking.validate().is_err());

        let booking = BookingConfig {
            slot_minutes: Some(2),
            ..Default::default()
        };
        assert!(booking.validate().is_err());
    }

    #[test]
    fn media_ids_must_be_unique() {
        let item = MediaItem {
            id: "m1".into(),
            kind: MediaKind::Image,
            url: "https://cdn/x.png".into(),
            storage_path: None,
            caption: None,
        };
        assert!(validate_media(&[item.clone()]).is_ok());
        assert!(validate_media(&[item.clone(), item]).is_err());
    }

    #[test]
    fn social_link_requires_http_scheme() {
        let link = SocialLink {
            platform: SocialPlatform::Instagram,
            url: "instagram.com/studio".into(),
        };
        assert!(link.validate().is_err());
    }
}

//! Public handle value object.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

use crate::domain::foundation::ValidationError;

/// Handles that would collide with application routes.
static RESERVED_HANDLES: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "admin", "api", "app", "auth", "billing", "book", "dashboard", "help", "login",
        "logout", "onboarding", "settings", "signup", "static", "support", "www",
    ]
    .into_iter()
    .collect()
});

/// Globally unique public slug of a booking page.
///
/// Always lowercase ASCII letters, digits and single hyphens, never starting
/// or ending with a hyphen.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Handle(String);

impl Handle {
    pub const MIN_LEN: usize = 3;
    pub const MAX_LEN: usize = 30;

    /// Normalizes (trim + lowercase) and validates a handle.
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        let handle = raw.trim().to_ascii_lowercase();

        if handle.is_empty() {
            return Err(ValidationError::empty_field("handle"));
        }
        let len = handle.chars().count();
        if !(Self::MIN_LEN..=Self::MAX_LEN).contains(&len) {
            return Err(ValidationError::out_of_range(
                "handle",
                Self::MIN_LEN as i64,
                Self::MAX_LEN as i64,
                len as i64,
            ));
        }
        if !handle
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
        {
            return Err(ValidationError::invalid_format(
                "handle",
                "only letters, digits and hyphens are allowed",
            ));
        }
        if handle.starts_with('-') || handle.ends_with('-') || handle.contains("--") {
            return Err(ValidationError::invalid_format(
                "handle",
                "hyphens must separate words",
            ));
        }
        if RESERVED_HANDLES.contains(handle.as_str()) {
            return Err(ValidationError::invalid_format("handle", "handle is reserved"));
        }
        Ok(Self(handle))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Handle {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        let handle = Handle::parse(&value)?;
        if handle.0 != value {
            return Err(ValidationError::invalid_format(
                "handle",
                "stored handles must already be normalized",
            ));
        }
        Ok(handle)
    }
}

impl From<Handle> for String {
    fn from(handle: Handle) -> Self {
        handle.0
    }
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

//! Buckets and object paths for uploaded files.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::{Timestamp, UserId, ValidationError};

use super::sanitize_filename;

/// Blob buckets the storage surface translates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Bucket {
    /// Profile pictures and logos.
    Avatars,
    /// Gallery items, banners and testimonial photos.
    Media,
}

impl Bucket {
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "avatars" => Some(Bucket::Avatars),
            "media" => Some(Bucket::Media),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Bucket::Avatars => "avatars",
            Bucket::Media => "media",
        }
    }
}

impl fmt::Display for Bucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Relative key of an object inside its bucket, e.g. `u1/1700000000000000-logo.png`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ObjectPath(String);

impl ObjectPath {
    /// Builds the namespaced path for a fresh upload by `owner`.
    ///
    /// The prefix is the upload stamp in microseconds, so successive stamps
    /// of one `MonotonicClock` never share a key.
    pub fn for_upload(owner: &UserId, filename: &str, at: Timestamp) -> Self {
        let owner = sanitize_filename(owner.as_str());
        Self(format!(
            "{owner}/{}-{}",
            at.as_unix_micros(),
            sanitize_filename(filename)
        ))
    }

    /// Validates a caller-supplied path.
    ///
    /// Rejects empty segments, `.`/`..` segments, backslashes and absolute
    /// paths so a key can never escape its bucket.
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        if raw.is_empty() {
            return Err(ValidationError::empty_field("path"));
        }
        if raw.starts_with('/') || raw.contains('\\') {
            return Err(ValidationError::invalid_format(
                "path",
                "must be relative and use '/' separators",
            ));
        }
        if raw
            .split('/')
            .any(|segment| segment.is_empty() || segment == "." || segment == "..")
        {
            return Err(ValidationError::invalid_format(
                "path",
                "contains an empty or relative segment",
            ));
        }
        Ok(Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Path segments, outermost first.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split('/')
    }
}

impl TryFrom<String> for ObjectPath {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        ObjectPath::parse(&value)
    }
}

impl From<ObjectPath> for String {
    fn from(path: ObjectPath) -> Self {
        path.0
    }
}

impl fmt::Display for ObjectPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::MonotonicClock;

    #[test]
    fn upload_path_is_namespaced_by_owner() {
        let owner = UserId::new("user-42").unwrap();
        let at = Timestamp::from_unix_millis(1_700_000_000_000).unwrap();
        let path = ObjectPath::for_upload(&owner, "Mon Logo.PNG", at);
        assert_eq!(path.as_str(), "user-42/1700000000000000-Mon-Logo.png");
        assert!(ObjectPath::parse(path.as_str()).is_ok());
    }

    #[test]
    fn same_filename_one_microsecond_apart_gets_distinct_keys() {
        let owner = UserId::new("u1").unwrap();
        let clock = MonotonicClock::new();
        let first = ObjectPath::for_upload(&owner, "image.jpg", clock.now());
        let second = ObjectPath::for_upload(&owner, "image.jpg", clock.now());
        assert_ne!(first, second);
    }

    #[test]
    fn owner_with_unsafe_chars_is_sanitized() {
        let owner = UserId::new("auth0|abc").unwrap();
        let at = Timestamp::from_unix_millis(1).unwrap();
        let path = ObjectPath::for_upload(&owner, "a.png", at);
        assert_eq!(path.segments().next(), Some("auth0abc"));
    }

    #[test]
    fn parse_rejects_escaping_paths() {
        for raw in ["", "/abs.png", "a//b.png", "../x.png", "a/./b", "a\\b.png", "a/"] {
            assert!(ObjectPath::parse(raw).is_err(), "{raw} should be rejected");
        }
    }

    #[test]
    fn buckets_resolve() {
        assert_eq!(Bucket::parse("avatars"), Some(Bucket::Avatars));
        assert_eq!(Bucket::parse("media"), Some(Bucket::Media));
        assert_eq!(Bucket::parse("private"), None);
    }
}

//! Filename sanitization for object keys.
//!
//! Uploaded filenames come from user devices and routinely carry spaces,
//! accents and symbols that object stores reject or mangle in URLs. The
//! sanitized form only ever contains `[A-Za-z0-9._-]`.

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Fallback base name when nothing survives sanitization.
pub const FALLBACK_BASE: &str = "file";

/// Longest base name kept, in characters.
pub const MAX_BASE_LEN: usize = 100;

/// Sanitizes a filename, keeping its extension in lowercase.
///
/// The extension is the text after the last `.` unless that dot opens the
/// name (`.env` has no extension).
pub fn sanitize_filename(name: &str) -> String {
    let name = name.trim();
    let (base, extension) = match name.rfind('.') {
        Some(idx) if idx > 0 => (&name[..idx], Some(&name[idx + 1..])),
        _ => (name, None),
    };

    let mut base = sanitize_part(base);
    if base.chars().count() > MAX_BASE_LEN {
        base = base.chars().take(MAX_BASE_LEN).collect();
        base = base.trim_end_matches(['-', '.']).to_string();
    }
    if base.is_empty() {
        base = FALLBACK_BASE.to_string();
    }

    let extension = extension
        .map(|ext| {
            strip_marks(ext)
                .chars()
                .filter(char::is_ascii_alphanumeric)
                .collect::<String>()
                .to_ascii_lowercase()
        })
        .filter(|ext| !ext.is_empty());

    match extension {
        Some(ext) => format!("{base}.{ext}"),
        None => base,
    }
}

fn strip_marks(text: &str) -> String {
    text.nfd().filter(|c| !is_combining_mark(*c)).collect()
}

fn sanitize_part(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in strip_marks(text).chars() {
        let mapped = if c.is_whitespace() {
            '-'
        } else if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
            c
        } else {
            continue;
        };
        if mapped == '-' && out.ends_with('-') {
            continue;
        }
        out.push(mapped);
    }
    out.trim_matches(['-', '.']).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn strips_diacritics_and_spaces() {
        assert_eq!(sanitize_filename("Café Crème.JPG"), "Cafe-Creme.jpg");
        assert_eq!(sanitize_filename("  my   photo (1).png "), "my-photo-1.png");
    }

    #[test]
    fn drops_unsafe_symbols() {
        assert_eq!(sanitize_filename("a/b\\c?*<>|\".jpeg"), "abc.jpeg");
        assert_eq!(sanitize_filename("señor#1@home.Gif"), "senor1home.gif");
    }

    #[test]
    fn never_produces_empty_base() {
        assert_eq!(sanitize_filename("###.png"), "file.png");
        assert_eq!(sanitize_filename(""), "file");
        assert_eq!(sanitize_filename("   "), "file");
        assert_eq!(sanitize_filename("日本語.PDF"), "file.pdf");
    }

    #[test]
    fn leading_dot_is_not_an_extension() {
        assert_eq!(sanitize_filename(".env"), "env");
        assert_eq!(sanitize_filename("archive.tar.GZ"), "archive.tar.gz");
    }

    #[test]
    fn truncates_long_names() {
        let long = format!("{}.png", "x".repeat(300));
        let sanitized = sanitize_filename(&long);
        assert_eq!(sanitized.len(), MAX_BASE_LEN + 4);
    }

    proptest! {
        #[test]
        fn output_is_always_safe(name in "\\PC{0,60}") {
            let sanitized = sanitize_filename(&name);
            prop_assert!(!sanitized.is_empty());
            prop_assert!(sanitized
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-')));
        }

        #[test]
        fn extension_is_kept_lowercase(
            base in "[ a-zA-Zàéîõüç#&!()0-9]{0,20}",
            ext in "[a-zA-Z0-9]{1,5}",
        ) {
            let sanitized = sanitize_filename(&format!("x{base}.{ext}"));
            let expected_suffix = format!(".{}", ext.to_ascii_lowercase());
            prop_assert!(sanitized.ends_with(&expected_suffix));
            let stem = &sanitized[..sanitized.len() - expected_suffix.len()];
            prop_assert!(!stem.is_empty());
        }
    }
}

//! Storage naming - buckets, object paths and filename sanitization.

mod filename;
mod object_path;

pub use filename::{sanitize_filename, FALLBACK_BASE, MAX_BASE_LEN};
pub use object_path::{Bucket, ObjectPath};

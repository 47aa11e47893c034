//! Blob Storage Adapters
//!
//! Implementations of the BlobStorage port.
//!
//! ## Available Adapters
//!
//! - **InMemoryBlobStorage** - Objects in memory (testing/development)
//! - **LocalBlobStorage** - Objects as files under `{root}/{bucket}/{path}`

mod in_memory;
mod local_file;

pub use in_memory::InMemoryBlobStorage;
pub use local_file::LocalBlobStorage;

use sha2::{Digest, Sha256};

/// Computes the SHA-256 etag of an object's content.
pub(crate) fn compute_etag(content: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content);
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn etag_is_hex_sha256() {
        let etag = compute_etag(b"hello");
        assert_eq!(etag.len(), 64);
        assert_eq!(
            etag,
            "2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824"
        );
    }
}

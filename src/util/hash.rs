//! Hashing utilities for generated identifiers.

use sha2::{Digest, Sha256};

/// Number of hex characters kept by [`short_hash`].
pub const SHORT_HASH_LEN: usize = 16;

/// Compute SHA256 hash of a byte slice.
pub fn sha256_bytes(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}

/// Compute SHA256 hash of a string.
pub fn sha256_str(s: &str) -> String {
    sha256_bytes(s.as_bytes())
}

/// First 16 hex characters of the SHA256 of a string.
pub fn short_hash(s: &str) -> String {
    let mut full = sha256_str(s);
    full.truncate(SHORT_HASH_LEN);
    full
}

//! SHA-256 checksum utilities
//!
//! Downloaded artifacts are logged with a checksum in the canonical
//! `sha256:<hex>` format so two runs can be compared from their logs.

use sha2::{Digest, Sha256};

/// Prefix for all checksums produced by this module
const PREFIX: &str = "sha256:";

/// Compute the SHA-256 checksum of raw bytes.
pub fn compute_checksum(content: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content);
    format!("{}{:x}", PREFIX, hasher.finalize())
}

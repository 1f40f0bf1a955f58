//! # Hashing
//!
//! The single digest primitive the ledger is built on: SHA-256, hex-encoded.
//!
//! The chain treats the hash function as a black box — deterministic bytes
//! in, fixed-length digest out. SHA-256 is the boring, universally-understood
//! choice, and for an integrity chain boring is exactly what you want: every
//! tool on earth can independently recompute these digests.
//!
//! Digests circulate through the rest of the crate as lowercase hex strings
//! rather than raw arrays because they also live inside serialized block
//! records, where a printable representation keeps the on-disk format
//! human-inspectable.

use sha2::{Digest, Sha256};

/// Compute the SHA-256 digest of the input data.
///
/// Returns the raw 32-byte digest. Use [`sha256_hex`] when the digest is
/// headed into a block record or a log line.
pub fn sha256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(data);
    let result = hasher.finalize();
    let mut output = [0u8; 32];
    output.copy_from_slice(&result);
    output
}

/// Compute the SHA-256 digest and return it as a 64-character lowercase
/// hex string.
///
/// This is the form every block field stores and every validation step
/// compares. Hex is canonical here: same input, same string, always.
pub fn sha256_hex(data: &[u8]) -> String {
    hex::encode(sha256(data))
}

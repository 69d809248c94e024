//! # Keccak-256
//!
//! The pre-standard Keccak padding (`0x01`), not FIPS-202 SHA3-256. This is
//! the hash the off-chain allowlist builder and commitment tooling use, so
//! everything that crosses that boundary goes through here.

use fairmint_core::Hash32;
use sha3::{Digest, Keccak256};

/// Keccak-256 of a byte string.
pub fn keccak256(data: &[u8]) -> Hash32 {
    let mut bytes = [0u8; 32];
    bytes.copy_from_slice(&Keccak256::digest(data));
    Hash32(bytes)
}

/// Keccak-256 of the concatenation of `parts` (packed encoding).
pub fn keccak256_concat(parts: &[&[u8]]) -> Hash32 {
    let mut hasher = Keccak256::new();
    for part in parts {
        hasher.update(part);
    }
    let mut bytes = [0u8; 32];
    bytes.copy_from_slice(&hasher.finalize());
    Hash32(bytes)
}

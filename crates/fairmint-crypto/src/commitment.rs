//! # Commit-Reveal Hashing
//!
//! A committer publishes `keccak256(secret)`, the same value
//! `ethers.keccak256(toUtf8Bytes(secret))` produces off-chain. At reveal time the secret is
//! checked against the commitment and mixed with host entropy that did not
//! exist when the commitment was made:
//!
//! `seed = keccak256(secret || entropy)`
//!
//! Neither party alone controls the seed: the committer fixed the secret
//! before the entropy existed, and the entropy source never saw the secret.

use fairmint_core::Hash32;
use subtle::ConstantTimeEq;

use crate::keccak::{keccak256, keccak256_concat};

/// The commitment a committer publishes for `secret`.
pub fn commitment_hash(secret: &[u8]) -> Hash32 {
    keccak256(secret)
}

/// Whether `secret` opens `commitment`. Constant-time in the hash bytes.
pub fn verify_commitment(secret: &[u8], commitment: &Hash32) -> bool {
    bool::from(commitment_hash(secret).as_bytes().ct_eq(commitment.as_bytes()))
}

/// Final randomness seed from the opened secret and reveal-time entropy.
pub fn derive_seed(secret: &[u8], entropy: &Hash32) -> Hash32 {
    keccak256_concat(&[secret, entropy.as_bytes()])
}

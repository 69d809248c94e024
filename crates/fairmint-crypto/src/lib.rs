//! # fairmint-crypto — Cryptographic Primitives
//!
//! - **Keccak-256** for everything shared with off-chain tooling: allowlist
//!   leaves and nodes, commitments, seeds.
//! - **SHA-256** for the internal permutation stream.
//! - **Merkle allowlist proofs** using the sorted-pair convention: leaf
//!   construction, proof folding, verification, and a reference tree builder
//!   matching the off-chain builder for fixtures and tooling.
//! - **Commit-reveal hashing**: commitment of a secret and seed derivation
//!   from the secret plus host entropy.
//! - **Seeded permutation** of `[0, n)` used for metadata assignment.
//!
//! ## Crate Policy
//!
//! - Depends only on `fairmint-core` internally.
//! - No mocking of hashing in tests; allowlist and commitment vectors are
//!   fixed known answers produced outside this crate.
//! - Equality checks on secrets and roots go through `subtle`.

pub mod commitment;
pub mod error;
pub mod keccak;
pub mod merkle;
pub mod sha256;
pub mod shuffle;

pub use commitment::{commitment_hash, derive_seed, verify_commitment};
pub use error::MerkleError;
pub use keccak::{keccak256, keccak256_concat};
pub use merkle::{leaf_hash, node_hash, process_proof, verify_proof, MerkleTree};
pub use sha256::{sha256, sha256_concat};
pub use shuffle::{permutation, SeedStream};

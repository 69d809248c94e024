//! # Sorted-Pair Merkle Allowlist Proofs
//!
//! The allowlist is never stored; only its root is. A claimant proves
//! membership with an ordered list of sibling hashes.
//!
//! ## Wire Format
//!
//! Must match the off-chain builder byte for byte. That builder is
//! merkletreejs over keccak256 with `sortPairs: true`, fed leaves from
//! `solidityPackedKeccak256(["address", "uint256"], [claimant, index])`:
//!
//! - Leaf: `keccak256(claimant[20] || index as 32-byte big-endian)`.
//! - Node: `keccak256(min(a, b) || max(a, b))`, bytewise ordering.
//!
//! Because pairs are sorted before hashing, a proof carries no left/right
//! flags and the verifier folds it without knowing the leaf's position.
//! The builder promotes an unpaired trailing node to the next layer
//! unchanged.

use fairmint_core::{AccountId, Hash32};
use subtle::ConstantTimeEq;

use crate::error::MerkleError;
use crate::keccak::keccak256_concat;

/// Width of the big-endian index field in a leaf.
pub const INDEX_WIDTH: usize = 32;

/// Compute the allowlist leaf for `claimant` at `index`.
pub fn leaf_hash(claimant: &AccountId, index: u64) -> Hash32 {
    let mut index_word = [0u8; INDEX_WIDTH];
    index_word[INDEX_WIDTH - 8..].copy_from_slice(&index.to_be_bytes());
    keccak256_concat(&[claimant.as_bytes(), &index_word])
}

/// Combine two nodes with the sorted-pair rule.
pub fn node_hash(a: &Hash32, b: &Hash32) -> Hash32 {
    if a <= b {
        keccak256_concat(&[a.as_bytes(), b.as_bytes()])
    } else {
        keccak256_concat(&[b.as_bytes(), a.as_bytes()])
    }
}

/// Fold `proof` into `leaf`, returning the implied root.
pub fn process_proof(leaf: Hash32, proof: &[Hash32]) -> Hash32 {
    proof
        .iter()
        .fold(leaf, |computed, sibling| node_hash(&computed, sibling))
}

/// Whether `proof` links `leaf` to `root`.
pub fn verify_proof(proof: &[Hash32], root: &Hash32, leaf: Hash32) -> bool {
    let computed = process_proof(leaf, proof);
    bool::from(computed.as_bytes().ct_eq(root.as_bytes()))
}

// ---------------------------------------------------------------------------
// Reference builder
// ---------------------------------------------------------------------------

/// In-memory tree following the off-chain builder's conventions.
///
/// The engine only verifies; this type exists so fixtures and operator
/// tooling can produce roots and proofs that the engine accepts.
#[derive(Debug, Clone)]
pub struct MerkleTree {
    /// `layers[0]` are the leaves, the last layer holds the root alone.
    layers: Vec<Vec<Hash32>>,
}

impl MerkleTree {
    /// Build from precomputed leaf hashes, in order.
    pub fn from_leaves(leaves: Vec<Hash32>) -> Result<Self, MerkleError> {
        if leaves.is_empty() {
            return Err(MerkleError::EmptyTree);
        }
        let mut layers = vec![leaves];
        while layers.last().map_or(0, Vec::len) > 1 {
            let current = &layers[layers.len() - 1];
            let next: Vec<Hash32> = current
                .chunks(2)
                .map(|pair| match pair {
                    [a, b] => node_hash(a, b),
                    // unpaired trailing node
                    _ => pair[0],
                })
                .collect();
            layers.push(next);
        }
        Ok(Self { layers })
    }

    /// Build an allowlist where `accounts[i]` is assigned index
    /// `start_index + i`.
    pub fn from_allowlist(accounts: &[AccountId], start_index: u64) -> Result<Self, MerkleError> {
        let leaves = accounts
            .iter()
            .zip(start_index..)
            .map(|(account, index)| leaf_hash(account, index))
            .collect();
        Self::from_leaves(leaves)
    }

    /// The tree root.
    pub fn root(&self) -> Hash32 {
        // from_leaves guarantees a non-empty final layer.
        self.layers
            .last()
            .and_then(|layer| layer.first())
            .copied()
            .unwrap_or_default()
    }

    /// Number of leaves.
    pub fn len(&self) -> usize {
        self.layers[0].len()
    }

    /// Always false; empty trees cannot be built.
    pub fn is_empty(&self) -> bool {
        self.layers[0].is_empty()
    }

    /// The leaf layer.
    pub fn leaves(&self) -> &[Hash32] {
        &self.layers[0]
    }

    /// Sibling path for the leaf at `position`, bottom-up.
    pub fn proof(&self, position: usize) -> Result<Vec<Hash32>, MerkleError> {
        if position >= self.len() {
            return Err(MerkleError::LeafOutOfRange {
                position,
                len: self.len(),
            });
        }
        let mut path = Vec::new();
        let mut pos = position;
        for layer in &self.layers[..self.layers.len() - 1] {
            let sibling = pos ^ 1;
            if let Some(h) = layer.get(sibling) {
                path.push(*h);
            }
            pos /= 2;
        }
        Ok(path)
    }
}

//! # Merkle Builder Errors

use thiserror::Error;

/// Errors from building trees or proofs with [`MerkleTree`](crate::MerkleTree).
///
/// Verification never errors; it answers yes or no.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MerkleError {
    /// A tree needs at least one leaf.
    #[error("cannot build a merkle tree from zero leaves")]
    EmptyTree,

    /// Requested proof for a leaf position that does not exist.
    #[error("leaf position {position} out of range for tree of {len} leaves")]
    LeafOutOfRange {
        /// Requested position.
        position: usize,
        /// Number of leaves in the tree.
        len: usize,
    },
}

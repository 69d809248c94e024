//! # Commit-Reveal Coordinator
//!
//! Nested sub-machine owned by the engine:
//!
//! ```text
//! NoCommitment ──commit(hash)──▶ Committed ──reveal(secret)──▶ Revealed
//! ```
//!
//! `reveal` is accepted only once `reveal_delay` blocks have passed since the
//! commitment, so the secret is fixed before the reveal-time entropy exists.
//! Anyone holding the secret may reveal it.
//!
//! A commitment that is never revealed has no expiry; the sub-machine stays
//! in `Committed` until someone opens it.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use fairmint_core::{AccountId, BlockHeight, Hash32, TokenId};
use fairmint_crypto::{derive_seed, permutation, verify_commitment};

/// Phase of the sub-machine, without payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RevealPhase {
    /// Waiting for a commitment.
    NoCommitment,
    /// A commitment is outstanding.
    Committed,
    /// Seed finalized. Terminal.
    Revealed,
}

impl std::fmt::Display for RevealPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::NoCommitment => "NO_COMMITMENT",
            Self::Committed => "COMMITTED",
            Self::Revealed => "REVEALED",
        };
        f.write_str(s)
    }
}

/// An outstanding or consumed commitment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Commitment {
    /// `keccak256(secret)`.
    pub hash: Hash32,
    /// Height at which it was recorded.
    pub height: BlockHeight,
    /// Who submitted it.
    pub committer: AccountId,
}

/// Errors from the commit-reveal sub-machine.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RevealError {
    /// A commitment already exists.
    #[error("a commitment is already outstanding (committed at {height})")]
    AlreadyCommitted {
        /// Height of the existing commitment.
        height: BlockHeight,
    },

    /// Reveal without a commitment.
    #[error("no commitment to reveal")]
    NotCommitted,

    /// The seed is already final.
    #[error("seed already revealed")]
    AlreadyRevealed,

    /// The secret does not hash to the commitment.
    #[error("revealed secret does not match commitment {expected}")]
    CommitMismatch {
        /// The stored commitment hash.
        expected: Hash32,
    },

    /// Minimum delay not yet elapsed.
    #[error("reveal too early: allowed from {ready_at}, current height {current}")]
    RevealTooEarly {
        /// First height at which reveal is accepted.
        ready_at: BlockHeight,
        /// Height of the attempt.
        current: BlockHeight,
    },
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
enum RevealStage {
    #[default]
    NoCommitment,
    Committed(Commitment),
    Revealed {
        commitment: Commitment,
        seed: Hash32,
        slots: Vec<u32>,
    },
}

/// The commit-reveal sub-machine and the metadata table it produces.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RevealCoordinator {
    reveal_delay: u64,
    stage: RevealStage,
}

impl RevealCoordinator {
    /// A coordinator with no commitment, requiring `reveal_delay` blocks
    /// between commit and reveal.
    pub fn new(reveal_delay: u64) -> Self {
        Self {
            reveal_delay,
            stage: RevealStage::NoCommitment,
        }
    }

    /// Current phase.
    pub fn phase(&self) -> RevealPhase {
        match self.stage {
            RevealStage::NoCommitment => RevealPhase::NoCommitment,
            RevealStage::Committed(_) => RevealPhase::Committed,
            RevealStage::Revealed { .. } => RevealPhase::Revealed,
        }
    }

    /// Configured delay in blocks.
    pub fn reveal_delay(&self) -> u64 {
        self.reveal_delay
    }

    /// The outstanding or consumed commitment, if any.
    pub fn commitment(&self) -> Option<&Commitment> {
        match &self.stage {
            RevealStage::NoCommitment => None,
            RevealStage::Committed(c) => Some(c),
            RevealStage::Revealed { commitment, .. } => Some(commitment),
        }
    }

    /// The final seed, once revealed.
    pub fn seed(&self) -> Option<Hash32> {
        match &self.stage {
            RevealStage::Revealed { seed, .. } => Some(*seed),
            _ => None,
        }
    }

    /// Metadata slot assigned to `token`, once revealed.
    pub fn metadata_slot(&self, token: TokenId) -> Option<u32> {
        match &self.stage {
            RevealStage::Revealed { slots, .. } => usize::try_from(token.value())
                .ok()
                .and_then(|i| slots.get(i))
                .copied(),
            _ => None,
        }
    }

    /// Record a commitment. Fails if one already exists or the seed is final.
    pub fn commit(
        &mut self,
        hash: Hash32,
        committer: AccountId,
        height: BlockHeight,
    ) -> Result<(), RevealError> {
        match &self.stage {
            RevealStage::NoCommitment => {}
            RevealStage::Committed(c) => {
                return Err(RevealError::AlreadyCommitted { height: c.height })
            }
            RevealStage::Revealed { .. } => return Err(RevealError::AlreadyRevealed),
        }
        self.stage = RevealStage::Committed(Commitment {
            hash,
            height,
            committer,
        });
        Ok(())
    }

    /// Open the commitment with `secret` at `height`, mixing in `entropy`,
    /// and build the slot table over `[0, supply)`.
    ///
    /// Returns the final seed. Nothing changes on failure.
    pub fn reveal(
        &mut self,
        secret: &[u8],
        height: BlockHeight,
        entropy: &Hash32,
        supply: u32,
    ) -> Result<Hash32, RevealError> {
        let commitment = match &self.stage {
            RevealStage::NoCommitment => return Err(RevealError::NotCommitted),
            RevealStage::Revealed { .. } => return Err(RevealError::AlreadyRevealed),
            RevealStage::Committed(c) => c,
        };
        if !verify_commitment(secret, &commitment.hash) {
            return Err(RevealError::CommitMismatch {
                expected: commitment.hash,
            });
        }
        let ready_at = commitment.height.saturating_add(self.reveal_delay);
        if height < ready_at {
            return Err(RevealError::RevealTooEarly {
                ready_at,
                current: height,
            });
        }

        let seed = derive_seed(secret, entropy);
        let slots = permutation(seed, supply);
        let commitment = commitment.clone();
        self.stage = RevealStage::Revealed {
            commitment,
            seed,
            slots,
        };
        Ok(seed)
    }
}

//! # Allowlist Verification
//!
//! A presale claim is `(claimant, index, proof)`. It is valid when the proof
//! folds `leaf_hash(claimant, index)` up to the configured root and `index`
//! has not been spent. The proof binds the claimant, so a proof lifted from
//! someone else's transaction is useless to a different caller.
//!
//! Checking and marking are split so the minter can run every other
//! precondition (payment, supply) between them and still stay atomic.

use fairmint_core::{AccountId, Hash32};
use fairmint_crypto::{leaf_hash, verify_proof};

use crate::claims::{ClaimRegistry, ClaimStrategy, ClaimTracker};
use crate::error::EngineError;

/// Merkle root plus spent-index bookkeeping.
#[derive(Debug, Clone, Default)]
pub struct AllowlistVerifier {
    root: Option<Hash32>,
    claims: ClaimRegistry,
}

impl AllowlistVerifier {
    /// No root, no claims, flag table active.
    pub fn new() -> Self {
        Self::default()
    }

    /// Configured root, if any.
    pub fn root(&self) -> Option<Hash32> {
        self.root
    }

    /// Replace the root. Spent indices stay spent.
    pub fn set_root(&mut self, root: Hash32) {
        self.root = Some(root);
    }

    /// Claim bookkeeping.
    pub fn claims(&self) -> &ClaimRegistry {
        &self.claims
    }

    /// Flip the active claim strategy.
    pub fn toggle_strategy(&mut self) -> ClaimStrategy {
        self.claims.toggle()
    }

    /// Whether `index` has been spent under either strategy.
    pub fn is_claimed(&self, index: u64) -> bool {
        self.claims.is_claimed(index)
    }

    /// Validate a claim without spending it.
    ///
    /// # Errors
    ///
    /// [`EngineError::ProofInvalid`] when no root is set or the proof does not
    /// reach it; [`EngineError::AlreadyClaimed`] when `index` is spent.
    pub fn check(
        &self,
        claimant: &AccountId,
        index: u64,
        proof: &[Hash32],
    ) -> Result<(), EngineError> {
        let root = self.root.ok_or(EngineError::ProofInvalid { index })?;
        if !verify_proof(proof, &root, leaf_hash(claimant, index)) {
            return Err(EngineError::ProofInvalid { index });
        }
        if self.claims.is_claimed(index) {
            return Err(EngineError::AlreadyClaimed { index });
        }
        Ok(())
    }

    /// Spend `index` in the active store. Call only after [`check`](Self::check).
    pub fn mark(&mut self, index: u64) {
        self.claims.mark_claimed(index);
        tracing::debug!(index, strategy = %self.claims.active(), "allowlist index claimed");
    }

    /// [`check`](Self::check) then [`mark`](Self::mark).
    pub fn verify_and_claim(
        &mut self,
        claimant: &AccountId,
        index: u64,
        proof: &[Hash32],
    ) -> Result<(), EngineError> {
        self.check(claimant, index, proof)?;
        self.mark(index);
        Ok(())
    }
}

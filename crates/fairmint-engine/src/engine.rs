//! # Sale Engine
//!
//! [`SaleEngine`] owns the sale phase, allowlist, commit-reveal coordinator
//! and payment ledger, plus the two collaborators ([`TokenRegistry`] and
//! [`Host`]). This module holds construction, owner administration,
//! commit-reveal, payments and reads. The mint paths live in
//! [`minter`](crate::minter).
//!
//! ## Ownership
//!
//! Owner-gated operations take the caller identity explicitly and fail with
//! [`EngineError::Unauthorized`] for anyone else. There is no implicit
//! "current caller".

use std::collections::BTreeMap;

use fairmint_core::{AccountId, Amount, Hash32, SaleConfig, TokenId};
use fairmint_ledger::{Contributor, PaymentLedger};
use fairmint_state::{
    Commitment, RevealCoordinator, RevealPhase, SaleState, SaleStateMachine, TransitionCause,
    TransitionRecord,
};

use crate::allowlist::AllowlistVerifier;
use crate::claims::ClaimStrategy;
use crate::error::EngineError;
use crate::host::{Host, ManualHost};
use crate::registry::{InMemoryRegistry, TokenRegistry};

/// Suffix served for every token before reveal.
pub const HIDDEN_METADATA: &str = "hidden";

/// The sale engine.
#[derive(Debug)]
pub struct SaleEngine<R: TokenRegistry = InMemoryRegistry, H: Host = ManualHost> {
    pub(crate) owner: AccountId,
    pub(crate) config: SaleConfig,
    pub(crate) state: SaleStateMachine,
    pub(crate) allowlist: AllowlistVerifier,
    pub(crate) reveal: RevealCoordinator,
    pub(crate) ledger: PaymentLedger,
    pub(crate) base_uri: String,
    pub(crate) public_minted: BTreeMap<AccountId, u64>,
    pub(crate) registry: R,
    pub(crate) host: H,
}

impl<R: TokenRegistry, H: Host> SaleEngine<R, H> {
    /// Build a paused engine owned by `owner`.
    ///
    /// # Errors
    ///
    /// [`EngineError::Config`] when `config` fails validation.
    pub fn new(
        config: SaleConfig,
        owner: AccountId,
        registry: R,
        host: H,
    ) -> Result<Self, EngineError> {
        config.validate()?;
        tracing::info!(
            %owner,
            max_supply = config.max_supply,
            max_per_tx = config.max_per_tx,
            max_per_wallet = config.max_per_wallet,
            reveal_delay = config.reveal_delay,
            "sale engine created"
        );
        Ok(Self {
            owner,
            reveal: RevealCoordinator::new(config.reveal_delay),
            config,
            state: SaleStateMachine::new(),
            allowlist: AllowlistVerifier::new(),
            ledger: PaymentLedger::new(),
            base_uri: String::new(),
            public_minted: BTreeMap::new(),
            registry,
            host,
        })
    }

    pub(crate) fn ensure_owner(&self, caller: &AccountId, operation: &str) -> Result<(), EngineError> {
        if *caller != self.owner {
            tracing::warn!(%caller, operation, "rejected non-owner call");
            return Err(EngineError::Unauthorized { caller: *caller });
        }
        Ok(())
    }

    pub(crate) fn transition(&mut self, to: SaleState, cause: TransitionCause) {
        let from = self.state.current();
        let height = self.host.block_height();
        self.state.set(to, height, cause);
        tracing::info!(%from, %to, %height, ?cause, "sale state changed");
    }

    // ── Owner administration ─────────────────────────────────────────

    /// Set the sale phase to any value.
    pub fn change_state(&mut self, caller: AccountId, new_state: SaleState) -> Result<(), EngineError> {
        self.ensure_owner(&caller, "change_state")?;
        self.transition(new_state, TransitionCause::Administrative);
        Ok(())
    }

    /// Install or replace the allowlist root.
    pub fn set_merkle_root(&mut self, caller: AccountId, root: Hash32) -> Result<(), EngineError> {
        self.ensure_owner(&caller, "set_merkle_root")?;
        self.allowlist.set_root(root);
        tracing::info!(%root, "allowlist root set");
        Ok(())
    }

    /// Set the prefix of every token URI.
    pub fn set_base_metadata_uri(
        &mut self,
        caller: AccountId,
        uri: impl Into<String>,
    ) -> Result<(), EngineError> {
        self.ensure_owner(&caller, "set_base_metadata_uri")?;
        self.base_uri = uri.into();
        tracing::info!(uri = %self.base_uri, "base metadata uri set");
        Ok(())
    }

    /// Swap the claim strategy receiving new marks. Returns the new one.
    pub fn toggle_bitmap_usage(&mut self, caller: AccountId) -> Result<ClaimStrategy, EngineError> {
        self.ensure_owner(&caller, "toggle_bitmap_usage")?;
        let active = self.allowlist.toggle_strategy();
        tracing::info!(%active, "claim strategy switched");
        Ok(active)
    }

    /// Register a proceeds recipient.
    pub fn add_contributor(
        &mut self,
        caller: AccountId,
        account: AccountId,
        share: u8,
    ) -> Result<(), EngineError> {
        self.ensure_owner(&caller, "add_contributor")?;
        self.ledger.add_contributor(account, share)?;
        tracing::info!(%account, share, total = self.ledger.total_shares(), "contributor added");
        Ok(())
    }

    /// Hand ownership to `new_owner`.
    pub fn transfer_ownership(
        &mut self,
        caller: AccountId,
        new_owner: AccountId,
    ) -> Result<(), EngineError> {
        self.ensure_owner(&caller, "transfer_ownership")?;
        tracing::info!(from = %self.owner, to = %new_owner, "ownership transferred");
        self.owner = new_owner;
        Ok(())
    }

    // ── Commit-reveal ────────────────────────────────────────────────

    /// Record `keccak256(secret)` once the sale has sold out.
    ///
    /// # Errors
    ///
    /// [`EngineError::State`] outside SoldOut; [`EngineError::Reveal`] with
    /// `AlreadyCommitted` or `AlreadyRevealed`.
    pub fn commit(&mut self, caller: AccountId, hash: Hash32) -> Result<(), EngineError> {
        self.state.require(SaleState::SoldOut)?;
        let height = self.host.block_height();
        self.reveal.commit(hash, caller, height)?;
        tracing::info!(%caller, %hash, %height, "reveal commitment recorded");
        Ok(())
    }

    /// Open the commitment and assign metadata slots.
    ///
    /// Returns the final seed.
    ///
    /// # Errors
    ///
    /// [`EngineError::Reveal`] with `NotCommitted`, `AlreadyRevealed`,
    /// `CommitMismatch` or `RevealTooEarly`. Nothing changes on failure.
    pub fn reveal(&mut self, secret: &[u8]) -> Result<Hash32, EngineError> {
        let supply = u32::try_from(self.config.max_supply).map_err(|_| {
            EngineError::ArithmeticOverflow {
                operation: "reveal",
            }
        })?;
        let height = self.host.block_height();
        let entropy = self.host.recent_entropy();
        let seed = match self.reveal.reveal(secret, height, &entropy, supply) {
            Ok(seed) => seed,
            Err(err) => {
                tracing::warn!(%height, error = %err, "reveal rejected");
                return Err(err.into());
            }
        };
        tracing::info!(%seed, %height, supply, "metadata revealed");
        self.transition(SaleState::Revealed, TransitionCause::Revealed);
        Ok(seed)
    }

    // ── Payments ─────────────────────────────────────────────────────

    /// Credit unallocated proceeds to contributors. Returns the amount credited.
    pub fn release_payments(&mut self) -> Result<Amount, EngineError> {
        let released = self.ledger.release()?;
        tracing::info!(
            %released,
            unallocated = %self.ledger.unallocated(),
            "payments released"
        );
        Ok(released)
    }

    /// Pay out the caller's pending balance through the host.
    pub fn withdraw(&mut self, caller: AccountId) -> Result<Amount, EngineError> {
        match self.ledger.withdraw(&caller, &mut self.host) {
            Ok(amount) => {
                tracing::info!(%caller, %amount, "withdrawal paid");
                Ok(amount)
            }
            Err(err) => {
                tracing::warn!(%caller, error = %err, "withdrawal failed");
                Err(err.into())
            }
        }
    }

    // ── Reads ────────────────────────────────────────────────────────

    pub fn owner(&self) -> AccountId {
        self.owner
    }

    pub fn config(&self) -> &SaleConfig {
        &self.config
    }

    pub fn current_state(&self) -> SaleState {
        self.state.current()
    }

    /// Every phase change so far, oldest first.
    pub fn transition_log(&self) -> &[TransitionRecord] {
        self.state.transition_log()
    }

    pub fn total_supply(&self) -> u64 {
        self.registry.total_supply()
    }

    pub fn owner_of(&self, token: TokenId) -> Option<AccountId> {
        self.registry.owner_of(token)
    }

    /// Public mints made by `account` (presale mints excluded).
    pub fn minted_by(&self, account: &AccountId) -> u64 {
        self.public_minted.get(account).copied().unwrap_or(0)
    }

    pub fn merkle_root(&self) -> Option<Hash32> {
        self.allowlist.root()
    }

    pub fn is_claimed(&self, index: u64) -> bool {
        self.allowlist.is_claimed(index)
    }

    pub fn active_claim_strategy(&self) -> ClaimStrategy {
        self.allowlist.claims().active()
    }

    pub fn allowlist(&self) -> &AllowlistVerifier {
        &self.allowlist
    }

    pub fn pending_withdrawals(&self, account: &AccountId) -> Amount {
        self.ledger.pending(account)
    }

    pub fn contributors(&self) -> &[Contributor] {
        self.ledger.contributors()
    }

    pub fn ledger(&self) -> &PaymentLedger {
        &self.ledger
    }

    pub fn reveal_phase(&self) -> RevealPhase {
        self.reveal.phase()
    }

    pub fn is_revealed(&self) -> bool {
        self.reveal.phase() == RevealPhase::Revealed
    }

    pub fn commitment(&self) -> Option<&Commitment> {
        self.reveal.commitment()
    }

    pub fn reveal_seed(&self) -> Option<Hash32> {
        self.reveal.seed()
    }

    /// Revealed metadata slot of `token`; `None` before reveal.
    pub fn metadata_slot(&self, token: TokenId) -> Option<u32> {
        self.reveal.metadata_slot(token)
    }

    pub fn base_metadata_uri(&self) -> &str {
        &self.base_uri
    }

    /// `"{base}hidden"` before reveal, `"{base}{slot}"` after.
    ///
    /// # Errors
    ///
    /// [`EngineError::UnknownToken`] for an id not yet minted.
    pub fn token_uri(&self, token: TokenId) -> Result<String, EngineError> {
        if self.registry.owner_of(token).is_none() {
            return Err(EngineError::UnknownToken { token_id: token });
        }
        Ok(match self.reveal.metadata_slot(token) {
            Some(slot) => format!("{}{slot}", self.base_uri),
            None => format!("{}{HIDDEN_METADATA}", self.base_uri),
        })
    }

    pub fn registry(&self) -> &R {
        &self.registry
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    /// Mutable host access, for advancing height or injecting failures.
    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fairmint_crypto::commitment_hash;
    use fairmint_state::RevealError;

    const OWNER: AccountId = AccountId([0x0A; 20]);
    const STRANGER: AccountId = AccountId([0x0B; 20]);

    fn engine(max_supply: u64) -> SaleEngine {
        let config = SaleConfig {
            max_supply,
            reveal_delay: 3,
            ..SaleConfig::default()
        };
        SaleEngine::new(config, OWNER, InMemoryRegistry::new(), ManualHost::new()).unwrap()
    }

    #[test]
    fn starts_paused_and_owned() {
        let e = engine(10);
        assert_eq!(e.current_state(), SaleState::Paused);
        assert_eq!(e.owner(), OWNER);
        assert_eq!(e.total_supply(), 0);
        assert!(e.transition_log().is_empty());
        assert_eq!(e.active_claim_strategy(), ClaimStrategy::FlagTable);
    }

    #[test]
    fn invalid_config_rejected() {
        let config = SaleConfig {
            max_supply: 0,
            ..SaleConfig::default()
        };
        let err = SaleEngine::new(config, OWNER, InMemoryRegistry::new(), ManualHost::new())
            .unwrap_err();
        assert!(matches!(err, EngineError::Config(_)));
    }

    #[test]
    fn oversized_supply_rejected_before_reveal_can_allocate() {
        let config = SaleConfig {
            max_supply: u64::from(u32::MAX),
            ..SaleConfig::default()
        };
        let err = SaleEngine::new(config, OWNER, InMemoryRegistry::new(), ManualHost::new())
            .unwrap_err();
        assert!(matches!(
            err,
            EngineError::Config(fairmint_core::ConfigError::Invalid {
                field: "max_supply",
                ..
            })
        ));
    }

    #[test]
    fn owner_gates() {
        let mut e = engine(10);
        assert!(matches!(
            e.change_state(STRANGER, SaleState::PublicSaleActive),
            Err(EngineError::Unauthorized { caller }) if caller == STRANGER
        ));
        assert!(e.set_merkle_root(STRANGER, Hash32([1; 32])).is_err());
        assert!(e.set_base_metadata_uri(STRANGER, "ipfs://x/").is_err());
        assert!(e.toggle_bitmap_usage(STRANGER).is_err());
        assert!(e.add_contributor(STRANGER, STRANGER, 100).is_err());
        assert!(e.transfer_ownership(STRANGER, STRANGER).is_err());

        assert_eq!(e.current_state(), SaleState::Paused);
        assert_eq!(e.merkle_root(), None);
        assert_eq!(e.base_metadata_uri(), "");
        assert_eq!(e.active_claim_strategy(), ClaimStrategy::FlagTable);
        assert!(e.contributors().is_empty());
        assert_eq!(e.owner(), OWNER);
    }

    #[test]
    fn ownership_moves() {
        let mut e = engine(10);
        e.transfer_ownership(OWNER, STRANGER).unwrap();
        assert!(e.change_state(OWNER, SaleState::PresaleActive).is_err());
        e.change_state(STRANGER, SaleState::PresaleActive).unwrap();
        assert_eq!(e.current_state(), SaleState::PresaleActive);
    }

    #[test]
    fn change_state_is_logged_with_height() {
        let mut e = engine(10);
        e.host_mut().set_height(42);
        e.change_state(OWNER, SaleState::Revealed).unwrap();
        let log = e.transition_log();
        assert_eq!(log.len(), 1);
        assert_eq!(log[0].from, SaleState::Paused);
        assert_eq!(log[0].to, SaleState::Revealed);
        assert_eq!(log[0].height.value(), 42);
        assert_eq!(log[0].cause, TransitionCause::Administrative);
    }

    #[test]
    fn commit_requires_sold_out() {
        let mut e = engine(10);
        assert!(matches!(
            e.commit(STRANGER, commitment_hash(b"s")),
            Err(EngineError::State(_))
        ));
        e.change_state(OWNER, SaleState::SoldOut).unwrap();
        e.commit(STRANGER, commitment_hash(b"s")).unwrap();
        assert_eq!(e.reveal_phase(), RevealPhase::Committed);
        assert_eq!(e.commitment().map(|c| c.committer), Some(STRANGER));
    }

    #[test]
    fn reveal_sets_state_and_seed() {
        let mut e = engine(10);
        e.change_state(OWNER, SaleState::SoldOut).unwrap();
        e.commit(OWNER, commitment_hash(b"s")).unwrap();
        assert!(matches!(
            e.reveal(b"s"),
            Err(EngineError::Reveal(RevealError::RevealTooEarly { .. }))
        ));
        assert_eq!(e.current_state(), SaleState::SoldOut);

        e.host_mut().advance(3);
        let seed = e.reveal(b"s").unwrap();
        assert!(e.is_revealed());
        assert_eq!(e.reveal_seed(), Some(seed));
        assert_eq!(e.current_state(), SaleState::Revealed);
        assert_eq!(
            e.transition_log().last().map(|r| r.cause),
            Some(TransitionCause::Revealed)
        );
    }

    #[test]
    fn token_uri_rejects_unminted() {
        let e = engine(10);
        assert!(matches!(
            e.token_uri(TokenId(0)),
            Err(EngineError::UnknownToken { token_id: TokenId(0) })
        ));
    }

    #[test]
    fn release_without_shares_fails() {
        let mut e = engine(10);
        assert!(matches!(e.release_payments(), Err(EngineError::Ledger(_))));
    }

    #[test]
    fn withdraw_nothing_fails() {
        let mut e = engine(10);
        assert!(matches!(e.withdraw(STRANGER), Err(EngineError::Ledger(_))));
        assert!(e.host().transfers().is_empty());
    }
}

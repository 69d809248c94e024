//! # Host Environment
//!
//! Block height, recent-block entropy and value transfer are supplied by
//! whatever runs the engine. [`ManualHost`] is driven by hand: tests and
//! embedders advance the height, pin the entropy, and can make transfers
//! fail.

use fairmint_core::{AccountId, Amount, BlockHeight, Hash32};
use fairmint_crypto::sha256;
use fairmint_ledger::{PayoutSink, TransferError};

/// Environment the engine runs against.
pub trait Host: PayoutSink {
    /// Current block height.
    fn block_height(&self) -> BlockHeight;

    /// Hash of a recent block, mixed into the reveal seed.
    fn recent_entropy(&self) -> Hash32;
}

/// Hand-driven host.
///
/// Unless pinned with [`set_entropy`](Self::set_entropy), entropy is
/// `sha256(height as 8 big-endian bytes)`, so it changes every block.
#[derive(Debug, Clone, Default)]
pub struct ManualHost {
    height: BlockHeight,
    entropy: Option<Hash32>,
    transfers: Vec<(AccountId, Amount)>,
    reject_transfers: bool,
}

impl ManualHost {
    /// Height 0, derived entropy, transfers accepted.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start at `height`.
    pub fn at_height(height: u64) -> Self {
        Self {
            height: BlockHeight(height),
            ..Self::default()
        }
    }

    /// Move forward `blocks` blocks.
    pub fn advance(&mut self, blocks: u64) -> BlockHeight {
        self.height = self.height.saturating_add(blocks);
        self.height
    }

    /// Jump to `height`.
    pub fn set_height(&mut self, height: u64) {
        self.height = BlockHeight(height);
    }

    /// Pin the entropy value.
    pub fn set_entropy(&mut self, entropy: Hash32) {
        self.entropy = Some(entropy);
    }

    /// Make subsequent transfers fail (`true`) or succeed (`false`).
    pub fn reject_transfers(&mut self, reject: bool) {
        self.reject_transfers = reject;
    }

    /// Every delivered transfer, in order.
    pub fn transfers(&self) -> &[(AccountId, Amount)] {
        &self.transfers
    }

    /// Total delivered to `account`, `None` if the sum overflows.
    pub fn received_by(&self, account: &AccountId) -> Option<Amount> {
        self.transfers
            .iter()
            .filter(|(to, _)| to == account)
            .try_fold(Amount::ZERO, |acc, (_, a)| acc.checked_add(*a))
    }
}

impl PayoutSink for ManualHost {
    fn transfer(&mut self, to: &AccountId, amount: Amount) -> Result<(), TransferError> {
        if self.reject_transfers {
            return Err(TransferError::new(format!("recipient {to} rejected value")));
        }
        self.transfers.push((*to, amount));
        Ok(())
    }
}

impl Host for ManualHost {
    fn block_height(&self) -> BlockHeight {
        self.height
    }

    fn recent_entropy(&self) -> Hash32 {
        self.entropy
            .unwrap_or_else(|| sha256(&self.height.value().to_be_bytes()))
    }
}

//! # Engine Error Types
//!
//! The caller-facing error taxonomy. Lower-crate errors are wrapped with
//! `#[from]` so a caller matches one enum. Every variant is recoverable: the
//! failed operation changed nothing and the caller decides whether to retry.

use thiserror::Error;

use fairmint_core::{AccountId, Amount, ConfigError, TokenId};
use fairmint_ledger::LedgerError;
use fairmint_state::{RevealError, SaleStateError};

/// Errors returned by [`SaleEngine`](crate::SaleEngine) operations.
#[derive(Error, Debug)]
pub enum EngineError {
    /// Operation attempted outside its sale phase.
    #[error(transparent)]
    State(#[from] SaleStateError),

    /// Non-owner called an owner-gated operation.
    #[error("{caller} is not the owner")]
    Unauthorized {
        /// The rejected caller.
        caller: AccountId,
    },

    /// Merkle proof does not lead to the configured root (or no root is set).
    #[error("allowlist proof for index {index} is invalid")]
    ProofInvalid {
        /// The claimed index.
        index: u64,
    },

    /// Allowlist index already spent.
    #[error("allowlist index {index} already claimed")]
    AlreadyClaimed {
        /// The claimed index.
        index: u64,
    },

    /// Quantity outside `1..=max_per_tx` or above the wallet cap.
    #[error(
        "invalid quantity {requested}: per-transaction limit {max_per_tx}, \
         already minted {already_minted} of {max_per_wallet} per wallet"
    )]
    InvalidQuantity {
        /// Requested quantity.
        requested: u64,
        /// Configured per-transaction limit.
        max_per_tx: u64,
        /// Public mints already made by the caller.
        already_minted: u64,
        /// Configured per-wallet limit.
        max_per_wallet: u64,
    },

    /// Attached value below the price.
    #[error("insufficient payment: required {required}, attached {attached}")]
    InsufficientPayment {
        /// Price of the mint.
        required: Amount,
        /// Value attached.
        attached: Amount,
    },

    /// Attached value above the price while overpayment is rejected.
    #[error("excess payment: required {required}, attached {attached}")]
    ExcessPayment {
        /// Price of the mint.
        required: Amount,
        /// Value attached.
        attached: Amount,
    },

    /// Mint would exceed max supply.
    #[error("supply exceeded: requested {requested}, remaining {remaining}")]
    SupplyExceeded {
        /// Tokens requested.
        requested: u64,
        /// Tokens still mintable.
        remaining: u64,
    },

    /// Commit-reveal failure.
    #[error(transparent)]
    Reveal(#[from] RevealError),

    /// Payment ledger failure.
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    /// Token id never minted.
    #[error("token {token_id} does not exist")]
    UnknownToken {
        /// The requested id.
        token_id: TokenId,
    },

    /// An amount computation would overflow.
    #[error("arithmetic overflow in {operation}")]
    ArithmeticOverflow {
        /// Operation that overflowed.
        operation: &'static str,
    },

    /// Engine built from an invalid configuration.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use fairmint_state::SaleState;

    #[test]
    fn state_error_is_transparent() {
        let err: EngineError = SaleStateError::WrongState {
            required: SaleState::PresaleActive,
            actual: SaleState::Paused,
        }
        .into();
        assert!(err.to_string().contains("PRESALE_ACTIVE"));
    }

    #[test]
    fn invalid_quantity_display() {
        let err = EngineError::InvalidQuantity {
            requested: 6,
            max_per_tx: 5,
            already_minted: 0,
            max_per_wallet: 5,
        };
        let msg = err.to_string();
        assert!(msg.contains('6'));
        assert!(msg.contains("per wallet"));
    }

    #[test]
    fn reveal_error_wraps() {
        let err: EngineError = RevealError::NotCommitted.into();
        assert!(matches!(err, EngineError::Reveal(RevealError::NotCommitted)));
    }

    #[test]
    fn ledger_error_wraps() {
        let err: EngineError = LedgerError::NoFunds {
            account: AccountId::default(),
        }
        .into();
        assert!(err.to_string().contains("no funds"));
    }
}

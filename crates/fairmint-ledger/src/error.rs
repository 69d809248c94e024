//! # Ledger Error Types

use thiserror::Error;

use fairmint_core::{AccountId, Amount};

/// Failure reported by a [`PayoutSink`](crate::PayoutSink).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{reason}")]
pub struct TransferError {
    /// Why the host could not deliver the value.
    pub reason: String,
}

impl TransferError {
    /// Build from any message.
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// Errors from ledger operations. None of them leave partial changes.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    /// Contributor shares are missing, duplicated or do not add up.
    #[error("share configuration error: {reason}")]
    ShareConfiguration {
        /// What is wrong with the configuration.
        reason: String,
    },

    /// Withdraw with a zero balance.
    #[error("no funds pending for {account}")]
    NoFunds {
        /// The caller.
        account: AccountId,
    },

    /// The payout sink rejected the transfer; the balance was restored.
    #[error("transfer of {amount} to {account} failed: {source}")]
    TransferFailed {
        /// Recipient.
        account: AccountId,
        /// Amount that was not delivered.
        amount: Amount,
        /// Sink error.
        #[source]
        source: TransferError,
    },

    /// An amount computation would overflow.
    #[error("arithmetic overflow in {operation}")]
    ArithmeticOverflow {
        /// Operation that overflowed.
        operation: &'static str,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_funds_display() {
        let err = LedgerError::NoFunds {
            account: AccountId([0xAA; 20]),
        };
        assert!(err.to_string().contains("0xaaaa"));
    }

    #[test]
    fn transfer_failed_carries_source() {
        let err = LedgerError::TransferFailed {
            account: AccountId::default(),
            amount: Amount::new(5),
            source: TransferError::new("recipient rejected value"),
        };
        let msg = err.to_string();
        assert!(msg.contains("recipient rejected value"));
        assert!(std::error::Error::source(&err).is_some());
    }
}

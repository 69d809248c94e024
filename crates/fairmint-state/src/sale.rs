//! # Sale Lifecycle
//!
//! ```text
//!            change_state (owner, any → any)
//!   ┌──────────────────────────────────────────────┐
//!   ▼                                              │
//! Paused ─▶ PresaleActive ─▶ PublicSaleActive ─▶ SoldOut ─▶ Revealed
//!                 │                  │              ▲   (reveal)
//!                 └──── last mint ───┴──────────────┘
//! ```
//!
//! The owner may set any state at any time. The two automatic transitions
//! (supply exhausted, seed revealed) happen inside the operation that
//! causes them.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use fairmint_core::BlockHeight;

/// The global sale phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SaleState {
    /// Initial state. Administrative configuration only.
    #[default]
    Paused,
    /// Allowlisted claimants may mint one token each.
    PresaleActive,
    /// Anyone may mint within the per-transaction and per-wallet caps.
    PublicSaleActive,
    /// Supply exhausted; commit is open.
    SoldOut,
    /// Seed revealed and metadata assigned.
    Revealed,
}

impl SaleState {
    /// Canonical state name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Paused => "PAUSED",
            Self::PresaleActive => "PRESALE_ACTIVE",
            Self::PublicSaleActive => "PUBLIC_SALE_ACTIVE",
            Self::SoldOut => "SOLD_OUT",
            Self::Revealed => "REVEALED",
        }
    }
}

impl std::fmt::Display for SaleState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Why a transition happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransitionCause {
    /// Owner called `change_state`.
    Administrative,
    /// A mint reached max supply.
    SupplyExhausted,
    /// A reveal finalized the seed.
    Revealed,
}

/// One entry of the transition log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionRecord {
    /// State before.
    pub from: SaleState,
    /// State after.
    pub to: SaleState,
    /// Host height when it happened.
    pub height: BlockHeight,
    /// What triggered it.
    pub cause: TransitionCause,
}

/// Rejection of an operation in the wrong phase.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SaleStateError {
    /// Operation requires a different sale state.
    #[error("operation requires sale state {required}, current state is {actual}")]
    WrongState {
        /// State the operation runs in.
        required: SaleState,
        /// Current state.
        actual: SaleState,
    },
}

/// The global sale state plus its transition log.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SaleStateMachine {
    state: SaleState,
    transition_log: Vec<TransitionRecord>,
}

impl SaleStateMachine {
    /// A fresh machine in [`SaleState::Paused`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state.
    pub fn current(&self) -> SaleState {
        self.state
    }

    /// Fail unless the current state is `required`.
    pub fn require(&self, required: SaleState) -> Result<(), SaleStateError> {
        if self.state == required {
            Ok(())
        } else {
            Err(SaleStateError::WrongState {
                required,
                actual: self.state,
            })
        }
    }

    /// Set the state unconditionally and log it. Setting the current state
    /// again is still logged.
    pub fn set(&mut self, to: SaleState, height: BlockHeight, cause: TransitionCause) {
        self.transition_log.push(TransitionRecord {
            from: self.state,
            to,
            height,
            cause,
        });
        self.state = to;
    }

    /// Every transition so far, oldest first.
    pub fn transition_log(&self) -> &[TransitionRecord] {
        &self.transition_log
    }
}

//! # fairmint-state — Sale State Machines
//!
//! ## State Machines
//!
//! - **Sale** (`sale.rs`): the global lifecycle
//!   `Paused → PresaleActive → PublicSaleActive → SoldOut → Revealed`.
//!   Administrative transitions are unconditional; every other operation
//!   asks [`SaleStateMachine::require`] for the one state it runs in.
//!
//! - **Reveal** (`reveal.rs`): the nested commit-reveal sub-machine
//!   `NoCommitment → Committed → Revealed`, which owns the commitment, the
//!   final seed and the token → metadata-slot table.
//!
//! ## Design
//!
//! Both machines are plain owned values held by the engine context. State is
//! an enum, never a string; every transition is appended to a log together
//! with the block height and what caused it.

pub mod reveal;
pub mod sale;

pub use reveal::{Commitment, RevealCoordinator, RevealError, RevealPhase};
pub use sale::{SaleState, SaleStateError, SaleStateMachine, TransitionCause, TransitionRecord};

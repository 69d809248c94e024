//! # fairmint-ledger — Pull-Payment Ledger
//!
//! Accumulates sale proceeds and lets contributors withdraw their share
//! themselves.
//!
//! - [`PaymentLedger::deposit`] adds to the unallocated pool.
//! - [`PaymentLedger::release`] splits the pool by percentage share; the
//!   integer-division remainder stays in the pool for the next release.
//! - [`PaymentLedger::withdraw`] zeroes the caller's balance *then* calls the
//!   [`PayoutSink`]; a failed transfer restores the balance.
//!
//! ## Conservation
//!
//! At every point between operations:
//!
//! ```text
//! total_received  = total_allocated + unallocated
//! total_allocated = total_withdrawn + Σ pending
//! ```

pub mod error;
pub mod ledger;

pub use error::{LedgerError, TransferError};
pub use ledger::{Contributor, PaymentLedger, PayoutSink, TOTAL_SHARES};

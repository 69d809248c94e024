//! # fairmint-core — Foundational Types
//!
//! Every other crate in the workspace depends on `fairmint-core`; it depends
//! on nothing internal.
//!
//! ## Key Design Principles
//!
//! 1. **Newtype wrappers for domain primitives.** `AccountId`, `TokenId`,
//!    `Amount`, `BlockHeight`, `Hash32`. No bare integers or byte arrays
//!    crossing crate boundaries.
//!
//! 2. **Checked arithmetic for value.** `Amount` exposes only checked
//!    operations. Proceeds accounting never wraps.
//!
//! 3. **One configuration type.** `SaleConfig` carries every tunable of the
//!    sale and validates itself before an engine is built from it.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `fairmint-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod amount;
pub mod config;
pub mod digest;
pub mod error;
pub mod identity;

pub use amount::Amount;
pub use config::{OverpaymentPolicy, SaleConfig, MAX_SUPPLY_LIMIT};
pub use digest::Hash32;
pub use error::{ConfigError, CryptoError};
pub use identity::{AccountId, BlockHeight, TokenId};

//! # fairmint-engine — Fixed-Supply Sale Engine
//!
//! One owned [`SaleEngine`] value holds every piece of mutable sale state and
//! is threaded through every operation:
//!
//! - **Claims** (`claims.rs`): which allowlist indices are spent, under a
//!   per-index flag table or a packed bitmap.
//! - **Allowlist** (`allowlist.rs`): Merkle-root verification of presale
//!   claims.
//! - **Minter** (`minter.rs`): presale and public mint paths, payment
//!   settlement, automatic sell-out.
//! - **Engine** (`engine.rs`): owner administration, commit-reveal, payment
//!   release and withdrawal, read accessors.
//!
//! The token ownership ledger and the host environment are collaborators
//! behind the [`TokenRegistry`] and [`Host`] traits. [`InMemoryRegistry`] and
//! [`ManualHost`] are complete implementations for embedding and tests.
//!
//! ## Atomicity
//!
//! Every operation takes `&mut self`, checks all of its preconditions, and
//! only then mutates. A returned error means nothing changed. Value leaving
//! the engine (withdrawal) is transferred last, after the balance is zeroed.
//!
//! ## Example
//!
//! ```
//! use fairmint_core::{AccountId, Amount, SaleConfig};
//! use fairmint_engine::{InMemoryRegistry, ManualHost, SaleEngine};
//! use fairmint_state::SaleState;
//!
//! let owner = AccountId([1; 20]);
//! let buyer = AccountId([2; 20]);
//! let config = SaleConfig { max_supply: 3, ..SaleConfig::default() };
//! let price = config.public_price;
//! let mut engine =
//!     SaleEngine::new(config, owner, InMemoryRegistry::new(), ManualHost::new()).unwrap();
//!
//! engine.change_state(owner, SaleState::PublicSaleActive).unwrap();
//! let receipt = engine
//!     .public_mint(buyer, 3, price.checked_mul(3).unwrap())
//!     .unwrap();
//! assert_eq!(receipt.token_ids.len(), 3);
//! assert_eq!(engine.current_state(), SaleState::SoldOut);
//! ```

pub mod allowlist;
pub mod claims;
pub mod engine;
pub mod error;
pub mod host;
pub mod minter;
pub mod registry;

pub use allowlist::AllowlistVerifier;
pub use claims::{ClaimBitmap, ClaimRegistry, ClaimStrategy, ClaimTracker, FlagTable};
pub use engine::SaleEngine;
pub use error::EngineError;
pub use host::{Host, ManualHost};
pub use minter::MintReceipt;
pub use registry::{InMemoryRegistry, TokenRegistry};

//! Shared fixtures for engine integration tests.

#![allow(dead_code)]

use fairmint_core::{AccountId, Amount, SaleConfig};
use fairmint_crypto::MerkleTree;
use fairmint_engine::{InMemoryRegistry, ManualHost, SaleEngine};
use fairmint_state::SaleState;
use tracing_subscriber::EnvFilter;

pub const OWNER: AccountId = AccountId([0xEE; 20]);

/// Route engine logs to the test harness. `RUST_LOG` overrides the filter.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter(filter)
        .try_init();
}

pub fn account(n: u8) -> AccountId {
    AccountId([n; 20])
}

pub fn engine(config: SaleConfig) -> SaleEngine {
    init_tracing();
    SaleEngine::new(config, OWNER, InMemoryRegistry::new(), ManualHost::new())
        .expect("valid config")
}

pub fn public_price(engine: &SaleEngine, quantity: u64) -> Amount {
    engine
        .config()
        .public_price
        .checked_mul(u128::from(quantity))
        .expect("price fits")
}

/// Allowlist of `accounts` at indices starting from 0, root installed, presale open.
pub fn presale_engine(config: SaleConfig, accounts: &[AccountId]) -> (SaleEngine, MerkleTree) {
    let mut e = engine(config);
    let tree = MerkleTree::from_allowlist(accounts, 0).expect("non-empty allowlist");
    e.set_merkle_root(OWNER, tree.root()).expect("owner call");
    e.change_state(OWNER, SaleState::PresaleActive)
        .expect("owner call");
    (e, tree)
}

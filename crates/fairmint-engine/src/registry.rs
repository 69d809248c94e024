//! # Token Registry
//!
//! The ownership ledger is outside the engine. The engine needs three
//! things from it: mint the next sequential id, look an id up, and count.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use fairmint_core::{AccountId, TokenId};

/// Sequential-id token ownership ledger.
pub trait TokenRegistry {
    /// Mint the next id (starting at 0) to `owner`.
    fn mint_next(&mut self, owner: AccountId) -> TokenId;

    /// Owner of `token`, if minted.
    fn owner_of(&self, token: TokenId) -> Option<AccountId>;

    /// Tokens minted so far.
    fn total_supply(&self) -> u64;
}

/// In-memory registry.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InMemoryRegistry {
    owners: BTreeMap<TokenId, AccountId>,
}

impl InMemoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of tokens held by `account`.
    pub fn balance_of(&self, account: &AccountId) -> u64 {
        self.owners.values().filter(|o| *o == account).count() as u64
    }

    /// Ids held by `account`, ascending.
    pub fn tokens_of(&self, account: &AccountId) -> Vec<TokenId> {
        self.owners
            .iter()
            .filter(|(_, o)| *o == account)
            .map(|(id, _)| *id)
            .collect()
    }
}

impl TokenRegistry for InMemoryRegistry {
    fn mint_next(&mut self, owner: AccountId) -> TokenId {
        let id = TokenId(self.owners.len() as u64);
        self.owners.insert(id, owner);
        id
    }

    fn owner_of(&self, token: TokenId) -> Option<AccountId> {
        self.owners.get(&token).copied()
    }

    fn total_supply(&self) -> u64 {
        self.owners.len() as u64
    }
}

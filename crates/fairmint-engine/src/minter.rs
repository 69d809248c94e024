//! # Mint Paths
//!
//! Presale and public minting on [`SaleEngine`]. Both follow the same shape:
//! every check first, in a fixed order, then the mutations. The only
//! fallible mutation (the ledger deposit) runs first among them, so an error
//! return always leaves the engine untouched.
//!
//! Check order:
//!
//! | presale                  | public                        |
//! |--------------------------|-------------------------------|
//! | phase                    | phase                         |
//! | proof, then claim status | quantity and wallet cap       |
//! | payment                  | supply                        |
//! | supply                   | payment                       |

use serde::{Deserialize, Serialize};

use fairmint_core::{AccountId, Amount, Hash32, OverpaymentPolicy, TokenId};
use fairmint_state::{SaleState, TransitionCause};

use crate::engine::SaleEngine;
use crate::error::EngineError;
use crate::host::Host;
use crate::registry::TokenRegistry;

/// Outcome of a successful mint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MintReceipt {
    /// Minted ids, ascending.
    pub token_ids: Vec<TokenId>,
    /// Amount deposited into the ledger.
    pub charged: Amount,
    /// Excess the host must return to the caller. Zero under
    /// [`OverpaymentPolicy::Reject`].
    pub refund: Amount,
}

/// Split `attached` into `(charged, refund)` against `price`.
fn settle(
    policy: OverpaymentPolicy,
    price: Amount,
    attached: Amount,
) -> Result<(Amount, Amount), EngineError> {
    let excess = match attached.checked_sub(price) {
        Some(excess) => excess,
        None => {
            return Err(EngineError::InsufficientPayment {
                required: price,
                attached,
            })
        }
    };
    if excess.is_zero() {
        return Ok((price, Amount::ZERO));
    }
    match policy {
        OverpaymentPolicy::Reject => Err(EngineError::ExcessPayment {
            required: price,
            attached,
        }),
        OverpaymentPolicy::Refund => Ok((price, excess)),
    }
}

impl<R: TokenRegistry, H: Host> SaleEngine<R, H> {
    /// Mint one token against an allowlist slot.
    ///
    /// # Errors
    ///
    /// [`EngineError::State`] outside PresaleActive,
    /// [`EngineError::ProofInvalid`], [`EngineError::AlreadyClaimed`],
    /// [`EngineError::InsufficientPayment`] / [`EngineError::ExcessPayment`],
    /// [`EngineError::SupplyExceeded`].
    pub fn presale_mint(
        &mut self,
        caller: AccountId,
        proof: &[Hash32],
        index: u64,
        payment: Amount,
    ) -> Result<MintReceipt, EngineError> {
        self.state.require(SaleState::PresaleActive)?;
        if let Err(err) = self.allowlist.check(&caller, index, proof) {
            tracing::warn!(%caller, index, error = %err, "presale claim rejected");
            return Err(err);
        }
        let (charged, refund) =
            settle(self.config.overpayment, self.config.presale_price, payment)?;
        self.ensure_supply(1)?;

        self.ledger.deposit(charged)?;
        self.allowlist.mark(index);
        let token = self.registry.mint_next(caller);
        tracing::info!(%caller, index, token = %token, %charged, "presale mint");

        self.apply_sell_out();
        Ok(MintReceipt {
            token_ids: vec![token],
            charged,
            refund,
        })
    }

    /// Mint `quantity` sequential tokens at the public price.
    ///
    /// # Errors
    ///
    /// [`EngineError::State`] outside PublicSaleActive,
    /// [`EngineError::InvalidQuantity`], [`EngineError::SupplyExceeded`],
    /// [`EngineError::InsufficientPayment`] / [`EngineError::ExcessPayment`].
    pub fn public_mint(
        &mut self,
        caller: AccountId,
        quantity: u64,
        payment: Amount,
    ) -> Result<MintReceipt, EngineError> {
        self.state.require(SaleState::PublicSaleActive)?;

        let already_minted = self.minted_by(&caller);
        let wallet_total = already_minted.checked_add(quantity);
        let within_tx = (1..=self.config.max_per_tx).contains(&quantity);
        let within_wallet = wallet_total.is_some_and(|t| t <= self.config.max_per_wallet);
        if !within_tx || !within_wallet {
            return Err(EngineError::InvalidQuantity {
                requested: quantity,
                max_per_tx: self.config.max_per_tx,
                already_minted,
                max_per_wallet: self.config.max_per_wallet,
            });
        }
        self.ensure_supply(quantity)?;

        let price = self
            .config
            .public_price
            .checked_mul(u128::from(quantity))
            .ok_or(EngineError::ArithmeticOverflow {
                operation: "public_mint",
            })?;
        let (charged, refund) = settle(self.config.overpayment, price, payment)?;

        self.ledger.deposit(charged)?;
        // within_wallet guarantees the sum exists.
        self.public_minted
            .insert(caller, already_minted.saturating_add(quantity));
        let token_ids: Vec<TokenId> = (0..quantity)
            .map(|_| self.registry.mint_next(caller))
            .collect();
        tracing::info!(%caller, quantity, %charged, %refund, "public mint");

        self.apply_sell_out();
        Ok(MintReceipt {
            token_ids,
            charged,
            refund,
        })
    }

    fn ensure_supply(&self, requested: u64) -> Result<(), EngineError> {
        let remaining = self
            .config
            .max_supply
            .saturating_sub(self.registry.total_supply());
        if requested > remaining {
            return Err(EngineError::SupplyExceeded {
                requested,
                remaining,
            });
        }
        Ok(())
    }

    fn apply_sell_out(&mut self) {
        if self.registry.total_supply() >= self.config.max_supply {
            self.transition(SaleState::SoldOut, TransitionCause::SupplyExhausted);
        }
    }
}

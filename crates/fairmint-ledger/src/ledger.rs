//! # Payment Ledger
//!
//! Shares are whole percentages. Contributors are added one at a time and the
//! running total may never exceed [`TOTAL_SHARES`]; release refuses to run
//! until the total is exactly [`TOTAL_SHARES`].

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use fairmint_core::{AccountId, Amount};

use crate::error::{LedgerError, TransferError};

/// Shares must add up to this.
pub const TOTAL_SHARES: u8 = 100;

/// Delivers withdrawn value to a recipient.
///
/// Called after the recipient's balance has been zeroed. An error makes the
/// ledger restore the balance.
pub trait PayoutSink {
    /// Send `amount` to `to`.
    fn transfer(&mut self, to: &AccountId, amount: Amount) -> Result<(), TransferError>;
}

/// A stakeholder and their percentage share.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contributor {
    /// Recipient identity.
    pub account: AccountId,
    /// Whole-percent share, 1..=100.
    pub share: u8,
}

/// Proceeds accounting with pull-based withdrawal.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PaymentLedger {
    contributors: Vec<Contributor>,
    pending: BTreeMap<AccountId, Amount>,
    total_received: Amount,
    total_allocated: Amount,
    total_withdrawn: Amount,
}

impl PaymentLedger {
    /// An empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    // ── Configuration ────────────────────────────────────────────────

    /// Register a contributor.
    ///
    /// # Errors
    ///
    /// [`LedgerError::ShareConfiguration`] for a zero share, an account
    /// already registered, or a running total above 100.
    pub fn add_contributor(&mut self, account: AccountId, share: u8) -> Result<(), LedgerError> {
        if share == 0 {
            return Err(LedgerError::ShareConfiguration {
                reason: format!("share for {account} must be positive"),
            });
        }
        if self.contributors.iter().any(|c| c.account == account) {
            return Err(LedgerError::ShareConfiguration {
                reason: format!("{account} is already a contributor"),
            });
        }
        let total = u16::from(self.total_shares()) + u16::from(share);
        if total > u16::from(TOTAL_SHARES) {
            return Err(LedgerError::ShareConfiguration {
                reason: format!(
                    "adding {share} to {} would exceed {TOTAL_SHARES}",
                    self.total_shares()
                ),
            });
        }
        self.contributors.push(Contributor { account, share });
        Ok(())
    }

    /// Registered contributors in insertion order.
    pub fn contributors(&self) -> &[Contributor] {
        &self.contributors
    }

    /// Sum of registered shares (never above 100).
    pub fn total_shares(&self) -> u8 {
        self.contributors.iter().map(|c| c.share).sum()
    }

    // ── Accounting ───────────────────────────────────────────────────

    /// Add mint proceeds to the unallocated pool.
    pub fn deposit(&mut self, amount: Amount) -> Result<(), LedgerError> {
        self.total_received = self
            .total_received
            .checked_add(amount)
            .ok_or(LedgerError::ArithmeticOverflow {
                operation: "deposit",
            })?;
        Ok(())
    }

    /// Split the unallocated pool among contributors.
    ///
    /// Each contributor is credited `unallocated * share / 100`, rounded
    /// down. Returns the total credited; the remainder stays unallocated.
    ///
    /// # Errors
    ///
    /// [`LedgerError::ShareConfiguration`] unless shares total exactly 100.
    pub fn release(&mut self) -> Result<Amount, LedgerError> {
        if self.total_shares() != TOTAL_SHARES {
            return Err(LedgerError::ShareConfiguration {
                reason: format!(
                    "shares total {}, expected {TOTAL_SHARES}",
                    self.total_shares()
                ),
            });
        }
        let unallocated = self.unallocated();

        // Compute every credit before touching any balance.
        let mut credits = Vec::with_capacity(self.contributors.len());
        let mut released = Amount::ZERO;
        for c in &self.contributors {
            let credit = unallocated
                .checked_mul_div(u128::from(c.share), u128::from(TOTAL_SHARES))
                .ok_or(LedgerError::ArithmeticOverflow {
                    operation: "release",
                })?;
            let new_pending = self
                .pending(&c.account)
                .checked_add(credit)
                .ok_or(LedgerError::ArithmeticOverflow {
                    operation: "release",
                })?;
            released = released
                .checked_add(credit)
                .ok_or(LedgerError::ArithmeticOverflow {
                    operation: "release",
                })?;
            credits.push((c.account, new_pending));
        }
        let new_allocated = self
            .total_allocated
            .checked_add(released)
            .ok_or(LedgerError::ArithmeticOverflow {
                operation: "release",
            })?;

        for (account, balance) in credits {
            self.pending.insert(account, balance);
        }
        self.total_allocated = new_allocated;
        Ok(released)
    }

    /// Withdraw the caller's whole pending balance through `sink`.
    ///
    /// The balance is zeroed before `sink.transfer` runs. If the transfer
    /// fails the balance and the withdrawn total are put back, so a zeroed
    /// balance always corresponds to a delivered payout.
    ///
    /// # Errors
    ///
    /// [`LedgerError::NoFunds`] for a zero balance;
    /// [`LedgerError::TransferFailed`] if the sink rejects the transfer.
    pub fn withdraw<P: PayoutSink + ?Sized>(
        &mut self,
        account: &AccountId,
        sink: &mut P,
    ) -> Result<Amount, LedgerError> {
        let amount = self.pending(account);
        if amount.is_zero() {
            return Err(LedgerError::NoFunds { account: *account });
        }
        let withdrawn_before = self.total_withdrawn;
        let withdrawn_after =
            withdrawn_before
                .checked_add(amount)
                .ok_or(LedgerError::ArithmeticOverflow {
                    operation: "withdraw",
                })?;

        self.pending.insert(*account, Amount::ZERO);
        self.total_withdrawn = withdrawn_after;

        if let Err(source) = sink.transfer(account, amount) {
            self.pending.insert(*account, amount);
            self.total_withdrawn = withdrawn_before;
            return Err(LedgerError::TransferFailed {
                account: *account,
                amount,
                source,
            });
        }
        Ok(amount)
    }

    // ── Reads ────────────────────────────────────────────────────────

    /// Pending balance of `account` (zero if unknown).
    pub fn pending(&self, account: &AccountId) -> Amount {
        self.pending.get(account).copied().unwrap_or(Amount::ZERO)
    }

    /// Everything ever deposited.
    pub fn total_received(&self) -> Amount {
        self.total_received
    }

    /// Everything ever credited to contributors.
    pub fn total_allocated(&self) -> Amount {
        self.total_allocated
    }

    /// Everything ever paid out.
    pub fn total_withdrawn(&self) -> Amount {
        self.total_withdrawn
    }

    /// Deposited but not yet credited.
    pub fn unallocated(&self) -> Amount {
        // total_allocated never exceeds total_received.
        self.total_received
            .checked_sub(self.total_allocated)
            .unwrap_or(Amount::ZERO)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn acct(n: u8) -> AccountId {
        AccountId([n; 20])
    }

    #[derive(Default)]
    struct RecordingSink {
        sent: Vec<(AccountId, Amount)>,
        fail: bool,
    }

    impl PayoutSink for RecordingSink {
        fn transfer(&mut self, to: &AccountId, amount: Amount) -> Result<(), TransferError> {
            if self.fail {
                return Err(TransferError::new("recipient rejected value"));
            }
            self.sent.push((*to, amount));
            Ok(())
        }
    }

    fn seventy_thirty() -> PaymentLedger {
        let mut l = PaymentLedger::new();
        l.add_contributor(acct(1), 70).unwrap();
        l.add_contributor(acct(2), 30).unwrap();
        l
    }

    #[test]
    fn shares_cannot_exceed_hundred() {
        let mut l = seventy_thirty();
        let err = l.add_contributor(acct(3), 1).unwrap_err();
        assert!(matches!(err, LedgerError::ShareConfiguration { .. }));
        assert_eq!(l.contributors().len(), 2);
    }

    #[test]
    fn zero_and_duplicate_shares_rejected() {
        let mut l = PaymentLedger::new();
        assert!(l.add_contributor(acct(1), 0).is_err());
        l.add_contributor(acct(1), 10).unwrap();
        assert!(l.add_contributor(acct(1), 10).is_err());
        assert_eq!(l.total_shares(), 10);
    }

    #[test]
    fn release_requires_complete_shares() {
        let mut l = PaymentLedger::new();
        l.add_contributor(acct(1), 70).unwrap();
        l.deposit(Amount::new(100)).unwrap();
        assert!(matches!(
            l.release(),
            Err(LedgerError::ShareConfiguration { .. })
        ));
        assert_eq!(l.unallocated(), Amount::new(100));
    }

    #[test]
    fn release_splits_by_share() {
        let mut l = seventy_thirty();
        l.deposit(Amount::new(240)).unwrap();
        assert_eq!(l.release().unwrap(), Amount::new(240));
        assert_eq!(l.pending(&acct(1)), Amount::new(168));
        assert_eq!(l.pending(&acct(2)), Amount::new(72));
        assert_eq!(l.unallocated(), Amount::ZERO);
    }

    #[test]
    fn remainder_is_kept_for_next_release() {
        let mut l = PaymentLedger::new();
        l.add_contributor(acct(1), 33).unwrap();
        l.add_contributor(acct(2), 33).unwrap();
        l.add_contributor(acct(3), 34).unwrap();
        l.deposit(Amount::new(10)).unwrap();
        // 3 + 3 + 3 credited, 1 left over
        assert_eq!(l.release().unwrap(), Amount::new(9));
        assert_eq!(l.unallocated(), Amount::new(1));

        l.deposit(Amount::new(90)).unwrap();
        // pool is now 91: 30 + 30 + 30
        assert_eq!(l.release().unwrap(), Amount::new(90));
        assert_eq!(l.unallocated(), Amount::new(1));
        assert_eq!(l.pending(&acct(3)), Amount::new(33));
    }

    #[test]
    fn release_on_empty_pool_is_noop() {
        let mut l = seventy_thirty();
        assert_eq!(l.release().unwrap(), Amount::ZERO);
        assert_eq!(l.pending(&acct(1)), Amount::ZERO);
    }

    #[test]
    fn withdraw_zeroes_then_pays_exact_amount() {
        let mut l = seventy_thirty();
        l.deposit(Amount::new(1000)).unwrap();
        l.release().unwrap();
        let mut sink = RecordingSink::default();
        assert_eq!(l.withdraw(&acct(1), &mut sink).unwrap(), Amount::new(700));
        assert_eq!(l.pending(&acct(1)), Amount::ZERO);
        assert_eq!(sink.sent, vec![(acct(1), Amount::new(700))]);
        assert_eq!(l.total_withdrawn(), Amount::new(700));
    }

    #[test]
    fn second_withdraw_has_no_funds() {
        let mut l = seventy_thirty();
        l.deposit(Amount::new(1000)).unwrap();
        l.release().unwrap();
        let mut sink = RecordingSink::default();
        l.withdraw(&acct(2), &mut sink).unwrap();
        assert_eq!(
            l.withdraw(&acct(2), &mut sink),
            Err(LedgerError::NoFunds { account: acct(2) })
        );
        assert_eq!(sink.sent.len(), 1);
    }

    #[test]
    fn stranger_has_no_funds() {
        let mut l = seventy_thirty();
        let mut sink = RecordingSink::default();
        assert!(matches!(
            l.withdraw(&acct(9), &mut sink),
            Err(LedgerError::NoFunds { .. })
        ));
    }

    #[test]
    fn failed_transfer_restores_balance() {
        let mut l = seventy_thirty();
        l.deposit(Amount::new(1000)).unwrap();
        l.release().unwrap();
        let mut sink = RecordingSink {
            fail: true,
            ..Default::default()
        };
        let err = l.withdraw(&acct(1), &mut sink).unwrap_err();
        assert!(matches!(
            err,
            LedgerError::TransferFailed { amount, .. } if amount == Amount::new(700)
        ));
        assert_eq!(l.pending(&acct(1)), Amount::new(700));
        assert_eq!(l.total_withdrawn(), Amount::ZERO);

        sink.fail = false;
        assert_eq!(l.withdraw(&acct(1), &mut sink).unwrap(), Amount::new(700));
    }

    #[test]
    fn deposit_overflow_rejected() {
        let mut l = seventy_thirty();
        l.deposit(Amount::new(u128::MAX)).unwrap();
        assert!(matches!(
            l.deposit(Amount::new(1)),
            Err(LedgerError::ArithmeticOverflow { .. })
        ));
        assert_eq!(l.total_received(), Amount::new(u128::MAX));
    }

    #[test]
    fn ledger_serializes() {
        let mut l = seventy_thirty();
        l.deposit(Amount::new(10)).unwrap();
        let json = serde_json::to_string(&l).unwrap();
        let back: PaymentLedger = serde_json::from_str(&json).unwrap();
        assert_eq!(back.total_received(), Amount::new(10));
        assert_eq!(back.contributors().len(), 2);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    struct NullSink;

    impl PayoutSink for NullSink {
        fn transfer(&mut self, _: &AccountId, _: Amount) -> Result<(), TransferError> {
            Ok(())
        }
    }

    #[derive(Debug, Clone)]
    enum Op {
        Deposit(u64),
        Release,
        Withdraw(usize),
    }

    fn op() -> impl Strategy<Value = Op> {
        prop_oneof![
            (0u64..1_000_000).prop_map(Op::Deposit),
            Just(Op::Release),
            (0usize..4).prop_map(Op::Withdraw),
        ]
    }

    /// Random split of 100 into 1..=4 positive shares.
    fn shares() -> impl Strategy<Value = Vec<u8>> {
        prop::collection::btree_set(1u8..100, 0..3).prop_map(|cuts| {
            let mut points: Vec<u8> = cuts.into_iter().collect();
            points.push(100);
            let mut prev = 0;
            points
                .into_iter()
                .map(|p| {
                    let s = p - prev;
                    prev = p;
                    s
                })
                .collect()
        })
    }

    proptest! {
        /// Funds are conserved across any operation sequence.
        #[test]
        fn conservation(shares in shares(), ops in prop::collection::vec(op(), 0..40)) {
            let mut l = PaymentLedger::new();
            let accounts: Vec<AccountId> =
                (0..shares.len()).map(|i| AccountId([i as u8 + 1; 20])).collect();
            for (a, s) in accounts.iter().zip(&shares) {
                l.add_contributor(*a, *s).unwrap();
            }
            for op in ops {
                match op {
                    Op::Deposit(v) => l.deposit(Amount::new(u128::from(v))).unwrap(),
                    Op::Release => {
                        let before = l.unallocated();
                        let released = l.release().unwrap();
                        prop_assert!(released <= before);
                        // each of n floors loses less than one unit
                        prop_assert!(before.value() - released.value() < accounts.len() as u128);
                    }
                    Op::Withdraw(i) => {
                        let a = accounts[i % accounts.len()];
                        let before = l.pending(&a);
                        match l.withdraw(&a, &mut NullSink) {
                            Ok(got) => prop_assert_eq!(got, before),
                            Err(LedgerError::NoFunds { .. }) => prop_assert!(before.is_zero()),
                            Err(e) => prop_assert!(false, "unexpected error {}", e),
                        }
                        prop_assert!(l.pending(&a).is_zero());
                    }
                }
                let pending_sum: u128 = accounts.iter().map(|a| l.pending(a).value()).sum();
                prop_assert_eq!(
                    l.total_received().value(),
                    l.total_allocated().value() + l.unallocated().value()
                );
                prop_assert_eq!(
                    l.total_allocated().value(),
                    l.total_withdrawn().value() + pending_sum
                );
            }
        }

        /// One release credits exactly the released amount.
        #[test]
        fn release_credits_sum(shares in shares(), deposit in 0u64..u64::MAX) {
            let mut l = PaymentLedger::new();
            let accounts: Vec<AccountId> =
                (0..shares.len()).map(|i| AccountId([i as u8 + 1; 20])).collect();
            for (a, s) in accounts.iter().zip(&shares) {
                l.add_contributor(*a, *s).unwrap();
            }
            l.deposit(Amount::new(u128::from(deposit))).unwrap();
            let released = l.release().unwrap();
            let credited: u128 = accounts.iter().map(|a| l.pending(a).value()).sum();
            prop_assert_eq!(credited, released.value());
        }
    }
}

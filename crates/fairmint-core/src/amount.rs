//! # Amounts
//!
//! Value attached to mints and held by the payment ledger, in the host's
//! smallest unit. Serialized as a decimal string so 128-bit values survive
//! JSON and YAML intact.

use serde::{Deserialize, Serialize};

/// One whole unit (10^18 base units).
pub const UNIT: u128 = 1_000_000_000_000_000_000;

/// A non-negative amount in base units.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(try_from = "String", into = "String")]
pub struct Amount(pub u128);

impl Amount {
    /// Zero.
    pub const ZERO: Amount = Amount(0);

    /// Wrap a raw base-unit value.
    pub const fn new(value: u128) -> Self {
        Self(value)
    }

    /// The base-unit value.
    pub fn value(&self) -> u128 {
        self.0
    }

    /// Whether the amount is zero.
    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checked addition.
    pub fn checked_add(self, rhs: Amount) -> Option<Amount> {
        self.0.checked_add(rhs.0).map(Amount)
    }

    /// Checked subtraction.
    pub fn checked_sub(self, rhs: Amount) -> Option<Amount> {
        self.0.checked_sub(rhs.0).map(Amount)
    }

    /// Checked multiplication by a scalar.
    pub fn checked_mul(self, factor: u128) -> Option<Amount> {
        self.0.checked_mul(factor).map(Amount)
    }

    /// `self * numerator / denominator` with integer division, `None` on
    /// overflow or a zero denominator.
    pub fn checked_mul_div(self, numerator: u128, denominator: u128) -> Option<Amount> {
        if denominator == 0 {
            return None;
        }
        self.0
            .checked_mul(numerator)
            .map(|v| Amount(v / denominator))
    }
}

impl std::fmt::Display for Amount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Amount> for String {
    fn from(a: Amount) -> Self {
        a.0.to_string()
    }
}

impl TryFrom<String> for Amount {
    type Error = std::num::ParseIntError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.trim().replace('_', "").parse::<u128>().map(Amount)
    }
}

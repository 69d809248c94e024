//! # Sale Configuration
//!
//! Every tunable of a sale lives in [`SaleConfig`]. Missing fields take the
//! defaults of the reference deployment (10 000 tokens, 0.05 presale, 0.08
//! public, 5 per transaction and per wallet, 10-block reveal delay).
//!
//! ```yaml
//! max_supply: 10
//! public_price: "80000000000000000"
//! overpayment: refund
//! ```

use serde::{Deserialize, Serialize};

use crate::amount::{Amount, UNIT};
use crate::error::ConfigError;

/// Largest accepted `max_supply`. The revealed slot table is one `u32` per
/// token.
pub const MAX_SUPPLY_LIMIT: u64 = 1_000_000;

/// What a mint does with value attached beyond the price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverpaymentPolicy {
    /// Fail the mint with `ExcessPayment`.
    #[default]
    Reject,
    /// Accept the mint, charge the exact price and report the excess as a
    /// refund owed to the caller.
    Refund,
}

/// Parameters of one fixed-supply sale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SaleConfig {
    /// Total tokens that can ever be minted.
    pub max_supply: u64,
    /// Upper bound on `quantity` for a single public mint.
    pub max_per_tx: u64,
    /// Upper bound on public mints per wallet over the whole sale.
    pub max_per_wallet: u64,
    /// Price of the single presale token.
    pub presale_price: Amount,
    /// Price per token in the public sale.
    pub public_price: Amount,
    /// Blocks that must elapse between commit and reveal.
    pub reveal_delay: u64,
    /// Handling of attached value above the price.
    pub overpayment: OverpaymentPolicy,
}

impl Default for SaleConfig {
    fn default() -> Self {
        Self {
            max_supply: 10_000,
            max_per_tx: 5,
            max_per_wallet: 5,
            presale_price: Amount::new(UNIT / 20),
            public_price: Amount::new(UNIT * 8 / 100),
            reveal_delay: 10,
            overpayment: OverpaymentPolicy::Reject,
        }
    }
}

impl SaleConfig {
    /// Parse and validate a YAML document.
    pub fn from_yaml_str(s: &str) -> Result<Self, ConfigError> {
        let config: SaleConfig = serde_yaml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse and validate a JSON document.
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        let config: SaleConfig = serde_json::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Check internal consistency.
    ///
    /// `max_supply` is capped at [`MAX_SUPPLY_LIMIT`] because reveal builds
    /// the whole metadata permutation in memory.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_supply == 0 {
            return Err(ConfigError::Invalid {
                field: "max_supply",
                reason: "must be at least 1".to_string(),
            });
        }
        if self.max_supply > MAX_SUPPLY_LIMIT {
            return Err(ConfigError::Invalid {
                field: "max_supply",
                reason: format!("must not exceed {MAX_SUPPLY_LIMIT}"),
            });
        }
        if self.max_per_tx == 0 {
            return Err(ConfigError::Invalid {
                field: "max_per_tx",
                reason: "must be at least 1".to_string(),
            });
        }
        if self.max_per_tx > self.max_per_wallet {
            return Err(ConfigError::Invalid {
                field: "max_per_tx",
                reason: format!(
                    "{} exceeds max_per_wallet {}",
                    self.max_per_tx, self.max_per_wallet
                ),
            });
        }
        Ok(())
    }
}

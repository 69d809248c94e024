//! # Error Types
//!
//! Errors shared by every crate in the workspace. Domain crates define their
//! own enums (`RevealError`, `LedgerError`, `EngineError`) and wrap these
//! with `#[from]` where needed.

use thiserror::Error;

/// Error while decoding or validating cryptographic material.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CryptoError {
    /// Hex string had the wrong number of characters.
    #[error("expected {expected} hex chars, got {actual}")]
    HexLength {
        /// Required number of hex characters (without `0x`).
        expected: usize,
        /// Number of characters supplied.
        actual: usize,
    },

    /// Hex string contained a non-hex character.
    #[error("invalid hex at position {position}")]
    HexCharacter {
        /// Byte offset of the first offending pair.
        position: usize,
    },
}

/// Error while loading or validating a [`SaleConfig`](crate::SaleConfig).
#[derive(Error, Debug)]
pub enum ConfigError {
    /// A configuration value violates a constraint.
    #[error("invalid sale configuration: {field}: {reason}")]
    Invalid {
        /// Offending field name.
        field: &'static str,
        /// What is wrong with it.
        reason: String,
    },

    /// YAML parsing failed.
    #[error("yaml error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// JSON parsing failed.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

//! # Claim Tracking
//!
//! Two storage strategies record which allowlist indices are spent:
//!
//! - [`FlagTable`]: one entry per claimed index in a sparse map.
//! - [`ClaimBitmap`]: 64 flags per word; index `i` lives in word `i / 64`,
//!   bit `i % 64`.
//!
//! Both implement [`ClaimTracker`] and are indistinguishable to callers.
//!
//! [`ClaimRegistry`] holds both stores and a tag naming the active one.
//! Marks go to the active store only; records are never copied between
//! stores when the tag flips. The claimed check consults both stores, so an
//! index spent under one strategy stays spent after a switch.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Spent-index bookkeeping.
pub trait ClaimTracker {
    /// Whether `index` has been spent.
    fn is_claimed(&self, index: u64) -> bool;

    /// Record `index` as spent. Idempotent.
    fn mark_claimed(&mut self, index: u64);
}

/// Strategy A: sparse per-index flags.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlagTable {
    flags: BTreeMap<u64, bool>,
}

impl FlagTable {
    /// An empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of recorded indices.
    pub fn len(&self) -> usize {
        self.flags.len()
    }

    /// Whether nothing is recorded.
    pub fn is_empty(&self) -> bool {
        self.flags.is_empty()
    }
}

impl ClaimTracker for FlagTable {
    fn is_claimed(&self, index: u64) -> bool {
        self.flags.get(&index).copied().unwrap_or(false)
    }

    fn mark_claimed(&mut self, index: u64) {
        self.flags.insert(index, true);
    }
}

/// Strategy B: packed bit-vector.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimBitmap {
    words: BTreeMap<u64, u64>,
}

impl ClaimBitmap {
    /// Flags per word.
    pub const WORD_BITS: u64 = 64;

    /// An empty bitmap.
    pub fn new() -> Self {
        Self::default()
    }

    /// Split an index into `(word, bit)`.
    pub fn locate(index: u64) -> (u64, u32) {
        (index / Self::WORD_BITS, (index % Self::WORD_BITS) as u32)
    }

    /// Raw value of word `word` (zero if untouched).
    pub fn word(&self, word: u64) -> u64 {
        self.words.get(&word).copied().unwrap_or(0)
    }

    /// Number of words allocated so far.
    pub fn word_count(&self) -> usize {
        self.words.len()
    }
}

impl ClaimTracker for ClaimBitmap {
    fn is_claimed(&self, index: u64) -> bool {
        let (word, bit) = Self::locate(index);
        self.word(word) & (1u64 << bit) != 0
    }

    fn mark_claimed(&mut self, index: u64) {
        let (word, bit) = Self::locate(index);
        *self.words.entry(word).or_insert(0) |= 1u64 << bit;
    }
}

/// Tag naming the store that receives new marks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClaimStrategy {
    /// Per-index flag table.
    #[default]
    FlagTable,
    /// Packed bitmap.
    Bitmap,
}

impl ClaimStrategy {
    /// The other strategy.
    pub fn toggled(self) -> Self {
        match self {
            Self::FlagTable => Self::Bitmap,
            Self::Bitmap => Self::FlagTable,
        }
    }
}

impl std::fmt::Display for ClaimStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::FlagTable => f.write_str("flag_table"),
            Self::Bitmap => f.write_str("bitmap"),
        }
    }
}

/// Both stores plus the active-strategy tag.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClaimRegistry {
    active: ClaimStrategy,
    flags: FlagTable,
    bitmap: ClaimBitmap,
}

impl ClaimRegistry {
    /// Empty stores, flag table active.
    pub fn new() -> Self {
        Self::default()
    }

    /// The store receiving new marks.
    pub fn active(&self) -> ClaimStrategy {
        self.active
    }

    /// Switch the active store and return the new tag. No records move.
    pub fn toggle(&mut self) -> ClaimStrategy {
        self.active = self.active.toggled();
        self.active
    }

    /// Strategy A store.
    pub fn flag_table(&self) -> &FlagTable {
        &self.flags
    }

    /// Strategy B store.
    pub fn bitmap(&self) -> &ClaimBitmap {
        &self.bitmap
    }
}

impl ClaimTracker for ClaimRegistry {
    fn is_claimed(&self, index: u64) -> bool {
        self.flags.is_claimed(index) || self.bitmap.is_claimed(index)
    }

    fn mark_claimed(&mut self, index: u64) {
        match self.active {
            ClaimStrategy::FlagTable => self.flags.mark_claimed(index),
            ClaimStrategy::Bitmap => self.bitmap.mark_claimed(index),
        }
    }
}

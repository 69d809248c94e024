//! # Seeded Permutation
//!
//! Turns a reveal seed into a bijection over `[0, n)` with a Fisher–Yates
//! shuffle. Randomness comes from a SHA-256 counter stream:
//! block `k` is `SHA256(seed || k as u64 big-endian)`, read as four
//! big-endian `u64` words. Bounded draws use rejection sampling so every
//! position is equally likely.
//!
//! The output is a pure function of `(seed, n)`; anyone holding the seed can
//! recompute the assignment.

use fairmint_core::Hash32;

use crate::sha256::sha256_concat;

/// Deterministic `u64` stream keyed by a seed.
#[derive(Debug, Clone)]
pub struct SeedStream {
    seed: Hash32,
    counter: u64,
    block: [u8; 32],
    offset: usize,
}

impl SeedStream {
    /// Start a stream at block 0.
    pub fn new(seed: Hash32) -> Self {
        Self {
            seed,
            counter: 0,
            block: [0u8; 32],
            offset: 32,
        }
    }

    fn refill(&mut self) {
        self.block = sha256_concat(&[self.seed.as_bytes(), &self.counter.to_be_bytes()]).0;
        self.counter = self.counter.wrapping_add(1);
        self.offset = 0;
    }

    /// Next word of the stream.
    pub fn next_u64(&mut self) -> u64 {
        if self.offset >= 32 {
            self.refill();
        }
        let mut word = [0u8; 8];
        word.copy_from_slice(&self.block[self.offset..self.offset + 8]);
        self.offset += 8;
        u64::from_be_bytes(word)
    }

    /// Uniform draw from `[0, bound)`. `bound` of zero yields zero.
    pub fn next_below(&mut self, bound: u64) -> u64 {
        if bound <= 1 {
            return 0;
        }
        // Values below `threshold` would bias the low residues.
        let threshold = bound.wrapping_neg() % bound;
        loop {
            let r = self.next_u64();
            if r >= threshold {
                return r % bound;
            }
        }
    }
}

/// Fisher–Yates permutation of `[0, n)` keyed by `seed`.
///
/// `permutation(seed, n)[i]` is the image of `i`.
pub fn permutation(seed: Hash32, n: u32) -> Vec<u32> {
    let mut table: Vec<u32> = (0..n).collect();
    let mut stream = SeedStream::new(seed);
    for i in (1..table.len()).rev() {
        let j = stream.next_below(i as u64 + 1) as usize;
        table.swap(i, j);
    }
    table
}

//! Seeded Random Source
//!
//! Every "plausible but not real" choice in a book traces back to a [`Seed`]
//! derived from `(topic, chapter index)`. The generator is SplitMix64 so that
//! output streams are bit-for-bit reproducible on every platform and can be
//! reimplemented elsewhere from the recurrence alone.
//!
//! ```text
//! Seed::derive(topic, index)   = SHA-256(trim(topic) || 0x1F || index_be32)[0..8] as u64 BE
//! Seed::stream(label)          = SHA-256(seed_be64 || label)[0..8] as u64 BE
//!
//! SplitMix64:
//!   state = state + 0x9E3779B97F4A7C15
//!   z = (state ^ (state >> 30)) * 0xBF58476D1CE4E5B9
//!   z = (z ^ (z >> 27)) * 0x94D049BB133111EB
//!   out = z ^ (z >> 31)
//!
//! next_f64 = (out >> 11) * 2^-53            in [0, 1)
//! below(n) = min(floor(next_f64 * n), n - 1)
//! ```

use rand::{RngCore, SeedableRng};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use std::str::FromStr;

use super::errors::ValidationError;

const GOLDEN_GAMMA: u64 = 0x9E37_79B9_7F4A_7C15;
const MIX_1: u64 = 0xBF58_476D_1CE4_E5B9;
const MIX_2: u64 = 0x94D0_49BB_1331_11EB;

/// Separator between topic bytes and chapter index in the seed preimage.
const TOPIC_INDEX_SEPARATOR: u8 = 0x1F;

// ============================================================================
// Seed
// ============================================================================

/// Deterministic key controlling all pseudo-random choices for one chapter.
///
/// Serialized as its 16-digit hex form so the full 64 bits survive consumers
/// whose numbers are IEEE doubles. Integers are still accepted on input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", try_from = "SeedRepr")]
pub struct Seed(u64);

impl Seed {
    /// Wrap a raw seed value.
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Derive the seed for a chapter of a topic.
    ///
    /// Surrounding whitespace of the topic is ignored.
    pub fn derive(topic: &str, chapter_index: u32) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(topic.trim().as_bytes());
        hasher.update([TOPIC_INDEX_SEPARATOR]);
        hasher.update(chapter_index.to_be_bytes());
        Self(leading_u64(&hasher.finalize()))
    }

    /// Derive an independent sub-seed for one purpose (charts, tables, text...).
    pub fn stream(&self, label: &str) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(self.0.to_be_bytes());
        hasher.update(label.as_bytes());
        Self(leading_u64(&hasher.finalize()))
    }

    /// Raw seed value.
    pub const fn value(&self) -> u64 {
        self.0
    }

    /// Start a random stream for one purpose.
    pub fn rng(&self, label: &str) -> SeededRandom {
        SeededRandom::new(self.stream(label))
    }
}

impl fmt::Display for Seed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0.to_be_bytes()))
    }
}

impl From<u64> for Seed {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl From<Seed> for String {
    fn from(seed: Seed) -> Self {
        seed.to_string()
    }
}

impl FromStr for Seed {
    type Err = ValidationError;

    /// Parse the 16-digit hex form produced by `Display`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s.trim();
        let bytes = hex::decode(digits).map_err(|_| ValidationError::invalid_seed(s))?;
        let bytes = <[u8; 8]>::try_from(bytes.as_slice()).map_err(|_| ValidationError::invalid_seed(s))?;
        Ok(Self(u64::from_be_bytes(bytes)))
    }
}

/// Wire forms accepted for a seed.
#[derive(Deserialize)]
#[serde(untagged)]
enum SeedRepr {
    Hex(String),
    Int(u64),
}

impl TryFrom<SeedRepr> for Seed {
    type Error = ValidationError;

    fn try_from(repr: SeedRepr) -> Result<Self, Self::Error> {
        match repr {
            SeedRepr::Hex(s) => s.parse(),
            SeedRepr::Int(value) => Ok(Self(value)),
        }
    }
}

fn leading_u64(digest: &[u8]) -> u64 {
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&digest[..8]);
    u64::from_be_bytes(bytes)
}

// ============================================================================
// SeededRandom
// ============================================================================

/// SplitMix64 stream. Local to a call; never shared or global.
#[derive(Debug, Clone)]
pub struct SeededRandom {
    state: u64,
}

impl SeededRandom {
    /// Create a stream from a seed.
    pub fn new(seed: Seed) -> Self {
        Self { state: seed.0 }
    }

    /// Next raw 64-bit output.
    pub fn next_raw(&mut self) -> u64 {
        self.state = self.state.wrapping_add(GOLDEN_GAMMA);
        let mut z = self.state;
        z = (z ^ (z >> 30)).wrapping_mul(MIX_1);
        z = (z ^ (z >> 27)).wrapping_mul(MIX_2);
        z ^ (z >> 31)
    }

    /// Next value in `[0, 1)` with 53 bits of precision.
    pub fn next_f64(&mut self) -> f64 {
        (self.next_raw() >> 11) as f64 * (1.0 / (1u64 << 53) as f64)
    }

    /// Uniform index in `0..n`. Returns 0 when `n` is 0.
    pub fn below(&mut self, n: usize) -> usize {
        if n == 0 {
            return 0;
        }
        let idx = (self.next_f64() * n as f64) as usize;
        idx.min(n - 1)
    }

    /// Uniform integer in `lo..=hi`.
    pub fn int_between(&mut self, lo: i64, hi: i64) -> i64 {
        if hi <= lo {
            return lo;
        }
        let span = (hi - lo) as usize + 1;
        lo + self.below(span) as i64
    }

    /// Uniform float in `[lo, hi)`.
    pub fn float_between(&mut self, lo: f64, hi: f64) -> f64 {
        lo + (hi - lo) * self.next_f64()
    }

    /// True with probability `p`.
    pub fn chance(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }

    /// Pick one element, or `None` for an empty slice.
    pub fn pick<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        if items.is_empty() {
            return None;
        }
        items.get(self.below(items.len()))
    }

    /// Fisher-Yates shuffle, walking from the top of the slice down.
    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        for i in (1..items.len()).rev() {
            let j = self.below(i + 1);
            items.swap(i, j);
        }
    }

    /// A shuffled permutation of `0..n`.
    pub fn permutation(&mut self, n: usize) -> Vec<usize> {
        let mut order: Vec<usize> = (0..n).collect();
        self.shuffle(&mut order);
        order
    }
}

impl RngCore for SeededRandom {
    fn next_u32(&mut self) -> u32 {
        (self.next_raw() >> 32) as u32
    }

    fn next_u64(&mut self) -> u64 {
        self.next_raw()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        for chunk in dest.chunks_mut(8) {
            let bytes = self.next_raw().to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

impl SeedableRng for SeededRandom {
    type Seed = [u8; 8];

    fn from_seed(seed: Self::Seed) -> Self {
        Self {
            state: u64::from_be_bytes(seed),
        }
    }

    fn seed_from_u64(state: u64) -> Self {
        Self { state }
    }
}

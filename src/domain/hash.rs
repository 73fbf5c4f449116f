// ============================================================
// Layer 3 - Perceptual Hash Value
// ============================================================
// A 64-bit perceptual hash. Visually similar images produce
// hashes that differ in only a few bits, so similarity is the
// Hamming distance between two hashes.
//
// Bit order: the first hash bit is the most significant bit,
// so the hex form reads left to right like the bit string.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PerceptualHash(pub u64);

impl PerceptualHash {
    /// Build from 64 bits in reading order.
    pub fn from_bits(bits: impl IntoIterator<Item = bool>) -> Self {
        let value = bits
            .into_iter()
            .take(64)
            .fold(0u64, |acc, bit| (acc << 1) | u64::from(bit));
        Self(value)
    }

    /// Number of differing bits
    pub fn distance(&self, other: &PerceptualHash) -> u32 {
        (self.0 ^ other.0).count_ones()
    }

    /// The top `bits` bits, used as a bucket key. 0 bits -> key 0.
    pub fn prefix(&self, bits: u32) -> u64 {
        match bits {
            0 => 0,
            b if b >= 64 => self.0,
            b => self.0 >> (64 - b),
        }
    }
}

impl fmt::Display for PerceptualHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}

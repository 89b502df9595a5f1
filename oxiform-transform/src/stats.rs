//! Zero-bit statistics for whitening transforms.
//!
//! Counts, per byte, how many of its eight bits are zero before and after a
//! transform. A good predictor shifts mass towards the "8 zeros" bucket.

use serde::{Deserialize, Serialize};

/// Histograms of zero bits per byte, before and after a transform.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZeroBitStats {
    /// `before[k]`: input bytes with exactly `k` zero bits.
    pub before: [u64; 9],
    /// `after[k]`: output bytes with exactly `k` zero bits.
    pub after: [u64; 9],
    /// Input bytes with the top bit set.
    pub high_bit_set: u64,
    /// Number of bytes recorded.
    pub bytes: u64,
}

impl ZeroBitStats {
    /// Create empty statistics.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one input byte and the byte it was transformed into.
    #[inline]
    pub fn record(&mut self, input: u8, output: u8) {
        self.before[input.count_zeros() as usize] += 1;
        self.after[output.count_zeros() as usize] += 1;
        self.high_bit_set += u64::from(input >> 7);
        self.bytes += 1;
    }

    /// Fold another set of statistics into this one.
    pub fn merge(&mut self, other: &Self) {
        for (a, b) in self.before.iter_mut().zip(&other.before) {
            *a += b;
        }
        for (a, b) in self.after.iter_mut().zip(&other.after) {
            *a += b;
        }
        self.high_bit_set += other.high_bit_set;
        self.bytes += other.bytes;
    }

    /// Total zero bits in the input.
    pub fn zero_bits_before(&self) -> u64 {
        weighted_sum(&self.before)
    }

    /// Total zero bits in the output.
    pub fn zero_bits_after(&self) -> u64 {
        weighted_sum(&self.after)
    }

    /// Fraction of input bits that are zero (0.0 when empty).
    pub fn zero_ratio_before(&self) -> f64 {
        self.ratio(self.zero_bits_before())
    }

    /// Fraction of output bits that are zero (0.0 when empty).
    pub fn zero_ratio_after(&self) -> f64 {
        self.ratio(self.zero_bits_after())
    }

    fn ratio(&self, zeros: u64) -> f64 {
        if self.bytes == 0 {
            0.0
        } else {
            zeros as f64 / (self.bytes * 8) as f64
        }
    }
}

fn weighted_sum(histogram: &[u64; 9]) -> u64 {
    histogram
        .iter()
        .enumerate()
        .map(|(zeros, &count)| zeros as u64 * count)
        .sum()
}

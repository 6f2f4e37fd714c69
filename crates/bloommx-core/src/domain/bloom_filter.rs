//! Core Bloom filter implementation
//!
//! INVARIANTS:
//! - Bit `i` lives in word `i >> 5` at bit position `i & 31` (LSB first)
//! - No false negatives: if inserted, `contains()` MUST return true
//! - Bits are only ever set; nothing clears them once built

use bitvec::prelude::*;

use super::hash_functions::probe_positions;
use super::parameters::{calculate_fpr, calculate_optimal_parameters, word_count, WORD_BITS};
use crate::error::{DecodeError, FilterError};

/// Bloom filter for probabilistic membership testing
///
/// False positives are possible, false negatives are not. The backing store is
/// a vector of 32-bit words so that the raw words can be serialized directly
/// into an artifact.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BloomFilter {
    /// Bit array storing the filter state, `ceil(m / 32)` words long
    bits: BitVec<u32, Lsb0>,
    /// Size in bits (m)
    m: usize,
    /// Number of hash rounds (k)
    k: usize,
}

impl BloomFilter {
    /// Create an empty filter with `m` bits and `k` hash rounds
    ///
    /// # Panics
    /// Panics if `m` or `k` is zero.
    pub fn new(m: usize, k: usize) -> Self {
        assert!(m > 0, "Bloom filter needs at least one bit");
        assert!(k > 0, "Bloom filter needs at least one hash round");
        Self {
            bits: bitvec![u32, Lsb0; 0; word_count(m) * WORD_BITS],
            m,
            k,
        }
    }

    /// Create an empty filter sized for `expected_items` at `target_fpr`
    pub fn with_target_error(expected_items: usize, target_fpr: f64) -> Result<Self, FilterError> {
        let params = calculate_optimal_parameters(expected_items, target_fpr)?;
        Ok(Self::new(params.size_bits, params.hash_count))
    }

    /// Rebuild a filter from its packed words
    ///
    /// The word count must be exactly `ceil(m / 32)`.
    pub fn from_words(m: usize, k: usize, words: Vec<u32>) -> Result<Self, DecodeError> {
        if m == 0 {
            return Err(DecodeError::ZeroBits);
        }
        if k == 0 {
            return Err(DecodeError::ZeroHashCount);
        }
        let expected = word_count(m);
        if words.len() != expected {
            return Err(DecodeError::WordCountMismatch {
                m,
                expected,
                actual: words.len(),
            });
        }
        Ok(Self {
            bits: BitVec::from_vec(words),
            m,
            k,
        })
    }

    /// Insert an element into the filter
    ///
    /// After insertion, `contains(element)` is guaranteed to return true.
    pub fn insert(&mut self, element: &str) {
        for pos in probe_positions(element, self.k, self.m) {
            self.bits.set(pos, true);
        }
    }

    /// Test if an element might be in the filter
    ///
    /// Stops at the first unset probe. Returns:
    /// - `true` if the element might be in the set (could be false positive)
    /// - `false` if the element is definitely NOT in the set
    pub fn contains(&self, element: &str) -> bool {
        probe_positions(element, self.k, self.m).all(|pos| self.bits[pos])
    }

    /// OR another filter's bits into this one
    ///
    /// Build-time only: used to combine partial filters built from disjoint
    /// shards of the same item list. Both filters must share `m` and `k`.
    pub fn merge(&mut self, other: &BloomFilter) -> Result<(), FilterError> {
        if self.m != other.m || self.k != other.k {
            return Err(FilterError::ShapeMismatch {
                left_m: self.m,
                left_k: self.k,
                right_m: other.m,
                right_k: other.k,
            });
        }

        for (s, o) in self
            .bits
            .as_raw_mut_slice()
            .iter_mut()
            .zip(other.bits.as_raw_slice())
        {
            *s |= *o;
        }
        Ok(())
    }

    /// Packed words, least significant bit first
    pub fn words(&self) -> &[u32] {
        self.bits.as_raw_slice()
    }

    /// Get the number of bits set in the filter
    pub fn bits_set(&self) -> usize {
        self.bits.count_ones()
    }

    /// Fraction of the `m` bits that are set
    pub fn fill_ratio(&self) -> f64 {
        self.bits_set() as f64 / self.m as f64
    }

    /// Theoretical false positive rate after inserting `items` elements
    pub fn estimated_fpr(&self, items: usize) -> f64 {
        calculate_fpr(self.m, items, self.k)
    }

    /// Get the filter size in bits
    pub fn size_bits(&self) -> usize {
        self.m
    }

    /// Get the number of hash rounds
    pub fn hash_count(&self) -> usize {
        self.k
    }
}

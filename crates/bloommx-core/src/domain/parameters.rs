//! Optimal Bloom filter parameter calculation
//!
//! Formulas:
//! - m = ceil(-n*ln(fpr) / (ln(2)^2))  -- optimal bits, then rounded up to whole words
//! - k = round((m/n) * ln(2))          -- optimal hash rounds, at least 1
//!
//! `k` is derived from the unrounded `m`; the word rounding only adds slack.

use std::f64::consts::LN_2;

use crate::error::ConfigError;

/// Bits per storage word
pub const WORD_BITS: usize = 32;

/// Bloom filter parameters
#[derive(Clone, Debug, PartialEq)]
pub struct BloomFilterParams {
    /// Number of bits in the filter (multiple of [`WORD_BITS`])
    pub size_bits: usize,
    /// Number of hash rounds
    pub hash_count: usize,
    /// Expected false positive rate with these parameters
    pub expected_fpr: f64,
}

impl BloomFilterParams {
    /// Number of 32-bit words backing the filter
    pub fn word_count(&self) -> usize {
        word_count(self.size_bits)
    }
}

/// Number of 32-bit words needed to hold `m` bits
pub fn word_count(m: usize) -> usize {
    m.div_ceil(WORD_BITS)
}

/// Reject rates outside the open interval (0, 1)
pub fn validate_false_positive_rate(rate: f64) -> Result<(), ConfigError> {
    if rate > 0.0 && rate < 1.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidFalsePositiveRate { rate })
    }
}

/// Calculate optimal Bloom filter parameters for given constraints
///
/// # Arguments
/// * `num_elements` - Number of elements to insert (n)
/// * `target_fpr` - Target false positive rate, in (0, 1)
///
/// # Errors
/// `n = 0` cannot be sized and is rejected rather than producing a degenerate
/// filter. So is any rate outside (0, 1), including NaN.
pub fn calculate_optimal_parameters(
    num_elements: usize,
    target_fpr: f64,
) -> Result<BloomFilterParams, ConfigError> {
    if num_elements == 0 {
        return Err(ConfigError::EmptyItemSet);
    }
    validate_false_positive_rate(target_fpr)?;

    let n = num_elements as f64;
    let ln2_squared = LN_2 * LN_2;

    let raw_bits = (-n * target_fpr.ln() / ln2_squared).ceil().max(1.0);
    let hash_count = ((raw_bits / n) * LN_2).round().max(1.0) as usize;
    let size_bits = word_count(raw_bits as usize) * WORD_BITS;

    Ok(BloomFilterParams {
        size_bits,
        hash_count,
        expected_fpr: calculate_fpr(size_bits, num_elements, hash_count),
    })
}

/// Calculate the false positive rate for given parameters
///
/// Formula: FPR = (1 - e^(-kn/m))^k
pub fn calculate_fpr(m: usize, n: usize, k: usize) -> f64 {
    if m == 0 {
        return 1.0;
    }
    let exponent = -(k as f64) * (n as f64) / (m as f64);
    (1.0 - exponent.exp()).powi(k as i32)
}

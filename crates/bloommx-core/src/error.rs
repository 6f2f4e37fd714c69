//! Error types for filter construction and decoding

use thiserror::Error;

/// Errors that can occur while building or loading a filter
#[derive(Debug, Error)]
pub enum FilterError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Decode error: {0}")]
    Decode(#[from] DecodeError),

    #[error("{tier}: {count} false negatives detected")]
    FalseNegatives { tier: String, count: usize },

    #[error("{tier}: decoded artifact does not match the built filter")]
    RoundTripMismatch { tier: String },

    #[error("Cannot merge filters with different shapes: m={left_m}, k={left_k} vs m={right_m}, k={right_k}")]
    ShapeMismatch {
        left_m: usize,
        left_k: usize,
        right_m: usize,
        right_k: usize,
    },
}

/// Invalid builder input or tier configuration
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("Cannot size a filter for zero items")]
    EmptyItemSet,

    #[error("Invalid false positive rate: {rate} (must be between 0 and 1, exclusive)")]
    InvalidFalsePositiveRate { rate: f64 },

    #[error("No tiers configured")]
    NoTiers,

    #[error("Invalid tier name {0:?} (expected lowercase letters, digits or '_', starting with a letter)")]
    InvalidTierName(String),

    #[error("Duplicate tier: {0}")]
    DuplicateTier(String),

    #[error("Invalid tier spec {0:?} (expected name=rate)")]
    InvalidTierSpec(String),

    #[error("Unknown tier: {0}")]
    UnknownTier(String),
}

/// Artifact payload inconsistent with its declared parameters
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("Invalid base64 payload: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("Payload length {len} is not a multiple of 4 bytes")]
    UnalignedLength { len: usize },

    #[error("Payload holds {actual} words but m={m} requires {expected}")]
    WordCountMismatch {
        m: usize,
        expected: usize,
        actual: usize,
    },

    #[error("Filter size m must be positive")]
    ZeroBits,

    #[error("Hash count k must be positive")]
    ZeroHashCount,
}

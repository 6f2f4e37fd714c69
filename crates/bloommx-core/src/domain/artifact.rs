//! Serialized filter artifacts
//!
//! An artifact is the `{m, k, data}` triple that leaves the builder. `data` is
//! standard padded base64 of the filter words written little-endian, so it
//! always decodes to exactly `4 * ceil(m / 32)` bytes.

use std::fmt::Write as _;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde::{Deserialize, Serialize};

use super::bloom_filter::BloomFilter;
use crate::error::DecodeError;

/// Encoded filter with the parameters needed to query it
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BloomArtifact {
    /// Size in bits
    pub m: usize,
    /// Number of hash rounds
    pub k: usize,
    /// Base64 of the little-endian packed words
    pub data: String,
}

/// Provenance written at the top of a generated Rust module
#[derive(Clone, Debug)]
pub struct ModuleHeader<'a> {
    /// Where the domain list came from
    pub source: &'a str,
    /// Number of domains inserted
    pub item_count: usize,
    /// Tier name
    pub tier: &'a str,
    /// Target false positive rate of the tier
    pub false_positive_rate: f64,
}

impl BloomArtifact {
    /// Serialize a filter's words
    pub fn encode(filter: &BloomFilter) -> Self {
        Self {
            m: filter.size_bits(),
            k: filter.hash_count(),
            data: encode_words(filter.words()),
        }
    }

    /// Rebuild the read-only filter this artifact describes
    pub fn decode(&self) -> Result<BloomFilter, DecodeError> {
        decode(self.m, self.k, &self.data)
    }

    /// Size of the base64 payload in bytes
    pub fn encoded_len(&self) -> usize {
        self.data.len()
    }

    /// Render the artifact as a Rust module exposing `M`, `K` and `DATA`
    pub fn to_rust_module(&self, header: &ModuleHeader<'_>) -> String {
        let mut out = String::new();
        // Writing to a String cannot fail
        let _ = writeln!(out, "// Auto-generated by bloommx. DO NOT EDIT.");
        let _ = writeln!(
            out,
            "// Source: {} ({} domains)",
            header.source, header.item_count
        );
        let _ = writeln!(
            out,
            "// Tier: {} | FP rate: ~{}% | m={} | k={}",
            header.tier,
            header.false_positive_rate * 100.0,
            self.m,
            self.k
        );
        let _ = writeln!(out, "pub const M: usize = {};", self.m);
        let _ = writeln!(out, "pub const K: usize = {};", self.k);
        let _ = writeln!(out, "pub const DATA: &str = \"{}\";", self.data);
        out
    }
}

/// Base64 of the words in little-endian byte order
pub fn encode_words(words: &[u32]) -> String {
    let bytes: Vec<u8> = words.iter().flat_map(|w| w.to_le_bytes()).collect();
    STANDARD.encode(bytes)
}

/// Inverse of [`encode_words`]
pub fn decode_words(data: &str) -> Result<Vec<u32>, DecodeError> {
    let bytes = STANDARD.decode(data.trim())?;
    if bytes.len() % 4 != 0 {
        return Err(DecodeError::UnalignedLength { len: bytes.len() });
    }
    Ok(bytes
        .chunks_exact(4)
        .map(|c| u32::from_le_bytes([c[0], c[1], c[2], c[3]]))
        .collect())
}

/// Decode `(m, k, data)` into a filter, checking the payload covers exactly `m` bits
pub fn decode(m: usize, k: usize, data: &str) -> Result<BloomFilter, DecodeError> {
    let words = decode_words(data)?;
    BloomFilter::from_words(m, k, words)
}

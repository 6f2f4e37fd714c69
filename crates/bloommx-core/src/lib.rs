//! # bloommx-core
//!
//! Bloom filter engine behind free email provider detection.
//!
//! ## Architecture
//!
//! - **Domain Layer** (`domain/`): Pure logic, no I/O
//!   - `BloomFilter`: Packed 32-bit word bit array with double-hashing probes
//!   - `hash_functions`: 64-bit FNV-1a in four 16-bit lanes over UTF-16 code units
//!   - `parameters`: Optimal `m`/`k` sizing from item count and target FPR
//!   - `BloomArtifact`: `{m, k, data}` triple with base64 word encoding
//!   - `BuildConfig` / `TierConfig` / `Tier`: Named accuracy tiers
//!   - `email` / `domain_list`: Query and source list normalisation
//!
//! - **Ports Layer** (`ports/`): Trait definitions
//!   - `DomainMembership`: Query API shared by raw filters and tier wrappers
//!
//! - **Service Layer** (`service/`): Orchestration
//!   - `TierBuilder`: Build, verify and encode every configured tier
//!
//! ## Invariants
//!
//! - **No false negatives**: every item passed to the builder tests positive,
//!   before and after an encode/decode round trip. A build that violates this
//!   is aborted.
//! - **Shared probes**: builder and runtime derive probe indices from the same
//!   hash and recurrence, so an artifact built here answers identically
//!   wherever it is decoded.
//!
//! ## Usage Example
//!
//! ```
//! use bloommx_core::{build, BloomArtifact, DomainMembership};
//!
//! let filter = build(&["gmail.com", "yahoo.com"], 0.01)?;
//! let artifact = BloomArtifact::encode(&filter);
//!
//! let runtime = artifact.decode()?;
//! assert!(runtime.check_email("user@gmail.com"));
//! assert!(!runtime.check_email("not-an-email"));
//! # Ok::<(), bloommx_core::FilterError>(())
//! ```

pub mod domain;
pub mod error;
pub mod ports;
pub mod service;

// Re-exports for convenience
pub use domain::{
    calculate_fpr, calculate_optimal_parameters, email_domain, normalize_domain,
    normalize_domain_list, parse_domain_list, BloomArtifact, BloomFilter, BloomFilterParams,
    BuildConfig, BuildConfigBuilder, ModuleHeader, Tier, TierConfig,
};
pub use error::{ConfigError, DecodeError, FilterError};
pub use ports::DomainMembership;
pub use service::{build, build_parallel, verify, BuildReport, TierBuild, TierBuilder};

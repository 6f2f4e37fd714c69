//! Domain Layer - Pure filter logic
//!
//! This layer contains:
//! - Core Bloom filter implementation
//! - Hash function and probe sequence
//! - Parameter calculations
//! - Artifact encoding
//! - Tier configuration
//! - Email and domain list normalisation
//!
//! RULES:
//! - No I/O operations
//! - No async code
//! - Pure functions where possible

pub mod artifact;
pub mod bloom_filter;
pub mod config;
pub mod domain_list;
pub mod email;
pub mod hash_functions;
pub mod parameters;
pub mod tier;

pub use artifact::{BloomArtifact, ModuleHeader};
pub use bloom_filter::BloomFilter;
pub use config::{BuildConfig, BuildConfigBuilder, TierConfig};
pub use domain_list::{normalize_domain_list, parse_domain_list};
pub use email::{email_domain, normalize_domain};
pub use parameters::{calculate_fpr, calculate_optimal_parameters, BloomFilterParams};
pub use tier::Tier;

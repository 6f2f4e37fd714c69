//! Build configuration and validation
//!
//! # Example
//!
//! ```
//! use bloommx_core::BuildConfigBuilder;
//!
//! let config = BuildConfigBuilder::new()
//!     .tier("tiny", 0.1)
//!     .tier("strict", 0.0005)
//!     .parallel(true)
//!     .build()
//!     .expect("valid config");
//! assert_eq!(config.tiers.len(), 2);
//! ```

use std::collections::HashSet;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::parameters::validate_false_positive_rate;
use super::tier::Tier;
use crate::error::ConfigError;

/// One named tier and its target false positive rate
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TierConfig {
    /// Tier identifier, used for artifact file names and module names
    pub name: String,
    /// Target false positive rate, in (0, 1)
    pub false_positive_rate: f64,
}

impl TierConfig {
    /// Create a tier configuration with validation
    pub fn new(name: impl Into<String>, false_positive_rate: f64) -> Result<Self, ConfigError> {
        let tier = Self {
            name: name.into(),
            false_positive_rate,
        };
        tier.validate()?;
        Ok(tier)
    }

    /// Validate the name and rate
    ///
    /// Names must be usable both as file stems and Rust identifiers.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut chars = self.name.chars();
        let valid_name = chars.next().is_some_and(|c| c.is_ascii_lowercase())
            && chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_');
        if !valid_name {
            return Err(ConfigError::InvalidTierName(self.name.clone()));
        }
        validate_false_positive_rate(self.false_positive_rate)
    }
}

impl From<Tier> for TierConfig {
    fn from(tier: Tier) -> Self {
        Self {
            name: tier.name().to_string(),
            false_positive_rate: tier.false_positive_rate(),
        }
    }
}

impl FromStr for TierConfig {
    type Err = ConfigError;

    /// Parse `name=rate`, e.g. `compact=0.01`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (name, rate) = s
            .split_once('=')
            .ok_or_else(|| ConfigError::InvalidTierSpec(s.to_string()))?;
        let rate: f64 = rate
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidTierSpec(s.to_string()))?;
        TierConfig::new(name.trim(), rate)
    }
}

/// Configuration for a multi-tier build
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BuildConfig {
    /// Tiers to build, in output order
    pub tiers: Vec<TierConfig>,
    /// Shard insertion across threads
    #[serde(default)]
    pub parallel: bool,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            tiers: Tier::ALL.into_iter().map(TierConfig::from).collect(),
            parallel: false,
        }
    }
}

impl BuildConfig {
    /// Validate every tier and reject duplicate names
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tiers.is_empty() {
            return Err(ConfigError::NoTiers);
        }

        let mut seen = HashSet::new();
        for tier in &self.tiers {
            tier.validate()?;
            if !seen.insert(tier.name.as_str()) {
                return Err(ConfigError::DuplicateTier(tier.name.clone()));
            }
        }

        Ok(())
    }

    /// Builder-style method to toggle parallel insertion
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }
}

/// Builder for BuildConfig with validation
///
/// Tiers default to the four standard tiers when none are added.
#[derive(Default)]
pub struct BuildConfigBuilder {
    tiers: Vec<TierConfig>,
    parallel: Option<bool>,
}

impl BuildConfigBuilder {
    /// Create a new builder with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a named tier
    pub fn tier(mut self, name: impl Into<String>, false_positive_rate: f64) -> Self {
        self.tiers.push(TierConfig {
            name: name.into(),
            false_positive_rate,
        });
        self
    }

    /// Add an already parsed tier
    pub fn tier_config(mut self, tier: TierConfig) -> Self {
        self.tiers.push(tier);
        self
    }

    /// Shard insertion across threads
    pub fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = Some(parallel);
        self
    }

    /// Build the BuildConfig, validating all tiers
    pub fn build(self) -> Result<BuildConfig, ConfigError> {
        let defaults = BuildConfig::default();

        let config = BuildConfig {
            tiers: if self.tiers.is_empty() {
                defaults.tiers
            } else {
                self.tiers
            },
            parallel: self.parallel.unwrap_or(defaults.parallel),
        };

        config.validate()?;
        Ok(config)
    }
}

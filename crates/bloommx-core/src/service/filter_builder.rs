//! Filter builder service
//!
//! Sizes, fills, verifies and encodes one filter per configured tier. A tier
//! that fails verification aborts the whole build: a filter that rejects its
//! own members points at a hashing, sizing or encoding bug, and retrying or
//! re-tuning would only hide it.

use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, error, info};

use crate::domain::{
    calculate_optimal_parameters, BloomArtifact, BloomFilter, BloomFilterParams, BuildConfig,
    TierConfig,
};
use crate::error::{ConfigError, FilterError};

/// Below this many items a parallel build falls back to sequential insertion
pub const PARALLEL_THRESHOLD: usize = 4096;

/// Items per shard in a parallel build
const SHARD_SIZE: usize = 1024;

/// Build a filter sized for `items` at `false_positive_rate`
///
/// Every item is inserted verbatim; normalise the list first.
pub fn build<S: AsRef<str>>(
    items: &[S],
    false_positive_rate: f64,
) -> Result<BloomFilter, FilterError> {
    let params = size_for(items.len(), false_positive_rate)?;
    let mut filter = BloomFilter::new(params.size_bits, params.hash_count);
    fill(&mut filter, items);
    Ok(filter)
}

/// Build a filter by sharding `items` across the rayon pool
///
/// Partial filters are merged with bitwise OR. Bit setting is commutative and
/// idempotent, so the result is identical to [`build`].
pub fn build_parallel<S: AsRef<str> + Sync>(
    items: &[S],
    false_positive_rate: f64,
) -> Result<BloomFilter, FilterError> {
    let params = size_for(items.len(), false_positive_rate)?;
    let (m, k) = (params.size_bits, params.hash_count);

    if items.len() < PARALLEL_THRESHOLD {
        let mut filter = BloomFilter::new(m, k);
        fill(&mut filter, items);
        return Ok(filter);
    }

    items
        .par_chunks(SHARD_SIZE)
        .map(|shard| {
            let mut partial = BloomFilter::new(m, k);
            fill(&mut partial, shard);
            Ok::<_, FilterError>(partial)
        })
        .try_reduce(
            || BloomFilter::new(m, k),
            |mut acc, partial| {
                acc.merge(&partial)?;
                Ok(acc)
            },
        )
}

/// Count items the filter fails to recognise
///
/// A correctly built filter always returns 0. Each miss is logged.
pub fn verify<S: AsRef<str>>(filter: &BloomFilter, items: &[S]) -> usize {
    items
        .iter()
        .map(|item| item.as_ref())
        .filter(|item| {
            let missing = !filter.contains(item);
            if missing {
                error!(domain = %item, "false negative");
            }
            missing
        })
        .count()
}

fn size_for(items: usize, false_positive_rate: f64) -> Result<BloomFilterParams, ConfigError> {
    let params = calculate_optimal_parameters(items, false_positive_rate)?;
    debug!(
        n = items,
        fpr = false_positive_rate,
        m = params.size_bits,
        k = params.hash_count,
        "sized filter"
    );
    Ok(params)
}

fn fill<S: AsRef<str>>(filter: &mut BloomFilter, items: &[S]) {
    for item in items {
        filter.insert(item.as_ref());
    }
}

/// Size and accuracy diagnostics for one built tier
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct BuildReport {
    /// Tier name
    pub tier: String,
    /// Requested false positive rate
    pub target_fpr: f64,
    /// Items inserted (n)
    pub items: usize,
    /// Size in bits
    pub m: usize,
    /// Hash rounds
    pub k: usize,
    /// Bits set after insertion
    pub bits_set: usize,
    /// `bits_set / m`
    pub fill_ratio: f64,
    /// Theoretical FPR for (m, n, k)
    pub expected_fpr: f64,
    /// Length of the base64 payload
    pub encoded_bytes: usize,
}

/// Output of one tier: its config, artifact and diagnostics
#[derive(Clone, Debug)]
pub struct TierBuild {
    pub tier: TierConfig,
    pub artifact: BloomArtifact,
    pub report: BuildReport,
}

/// Builds every tier of a [`BuildConfig`] from one item list
#[derive(Clone, Debug)]
pub struct TierBuilder {
    config: BuildConfig,
}

impl TierBuilder {
    /// Create a builder, validating the configuration up front
    pub fn new(config: BuildConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Get the configuration
    pub fn config(&self) -> &BuildConfig {
        &self.config
    }

    /// Build, verify and encode one tier
    ///
    /// Verification runs on the built filter and the encoded artifact must
    /// decode back to the same bits.
    pub fn build_tier<S: AsRef<str> + Sync>(
        &self,
        items: &[S],
        tier: &TierConfig,
    ) -> Result<TierBuild, FilterError> {
        tier.validate()?;

        let filter = if self.config.parallel {
            build_parallel(items, tier.false_positive_rate)?
        } else {
            build(items, tier.false_positive_rate)?
        };

        let false_negatives = verify(&filter, items);
        if false_negatives > 0 {
            return Err(FilterError::FalseNegatives {
                tier: tier.name.clone(),
                count: false_negatives,
            });
        }

        let artifact = BloomArtifact::encode(&filter);
        if artifact.decode()? != filter {
            return Err(FilterError::RoundTripMismatch {
                tier: tier.name.clone(),
            });
        }

        let report = BuildReport {
            tier: tier.name.clone(),
            target_fpr: tier.false_positive_rate,
            items: items.len(),
            m: filter.size_bits(),
            k: filter.hash_count(),
            bits_set: filter.bits_set(),
            fill_ratio: filter.fill_ratio(),
            expected_fpr: filter.estimated_fpr(items.len()),
            encoded_bytes: artifact.encoded_len(),
        };

        info!(
            tier = %report.tier,
            m = report.m,
            k = report.k,
            fill = %format!("{:.3}", report.fill_ratio),
            expected_fpr = %format!("{:.6}", report.expected_fpr),
            size_kb = %format!("{:.1}", report.encoded_bytes as f64 / 1024.0),
            "built tier"
        );

        Ok(TierBuild {
            tier: tier.clone(),
            artifact,
            report,
        })
    }

    /// Build every configured tier, stopping at the first failure
    pub fn build_all<S: AsRef<str> + Sync>(&self, items: &[S]) -> Result<Vec<TierBuild>, FilterError> {
        info!(
            domains = items.len(),
            tiers = self.config.tiers.len(),
            parallel = self.config.parallel,
            "generating bloom filters"
        );

        self.config
            .tiers
            .iter()
            .map(|tier| self.build_tier(items, tier))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::BuildConfigBuilder;
    use crate::ports::DomainMembership;

    fn domains(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("provider-{}.example", i)).collect()
    }

    #[test]
    fn test_fixture_scenario() {
        let filter = build(&["gmail.com", "yahoo.com"], 0.01).unwrap();

        assert_eq!(filter.size_bits(), 32);
        assert_eq!(filter.hash_count(), 7);
        assert!(filter.test("gmail.com"));
        assert!(filter.test("yahoo.com"));
        assert!(filter.check_email("user@gmail.com"));
        assert!(!filter.check_email("admin@example.com"));
    }

    #[test]
    fn test_build_rejects_empty_items() {
        let result = build(&Vec::<String>::new(), 0.01);
        assert!(matches!(
            result,
            Err(FilterError::Config(ConfigError::EmptyItemSet))
        ));
    }

    #[test]
    fn test_build_rejects_invalid_rate() {
        let result = build(&["gmail.com"], 0.0);
        assert!(matches!(
            result,
            Err(FilterError::Config(ConfigError::InvalidFalsePositiveRate { .. }))
        ));
    }

    #[test]
    fn test_verify_counts_missing_items() {
        let filter = build(&["gmail.com", "yahoo.com"], 0.01).unwrap();
        assert_eq!(verify(&filter, &["gmail.com", "yahoo.com"]), 0);

        let empty = BloomFilter::new(64, 3);
        assert_eq!(verify(&empty, &["gmail.com", "yahoo.com", "aol.com"]), 3);
    }

    #[test]
    fn test_build_is_deterministic() {
        let items = domains(500);
        let first = BloomArtifact::encode(&build(&items, 0.001).unwrap());
        let second = BloomArtifact::encode(&build(&items, 0.001).unwrap());
        assert_eq!(first, second);
    }

    #[test]
    fn test_parallel_build_matches_sequential() {
        let items = domains(PARALLEL_THRESHOLD * 3 + 17);
        let sequential = build(&items, 0.001).unwrap();
        let parallel = build_parallel(&items, 0.001).unwrap();
        assert_eq!(parallel, sequential, "Sharded OR-merge must equal sequential insertion");
    }

    #[test]
    fn test_parallel_build_small_input() {
        let items = domains(10);
        assert_eq!(
            build_parallel(&items, 0.01).unwrap(),
            build(&items, 0.01).unwrap()
        );
    }

    #[test]
    fn test_tier_builder_builds_every_tier() {
        let items = domains(300);
        let builder = TierBuilder::new(BuildConfig::default()).unwrap();
        let builds = builder.build_all(&items).unwrap();

        assert_eq!(builds.len(), 4);
        for build in &builds {
            let filter = build.artifact.decode().unwrap();
            assert_eq!(verify(&filter, &items), 0, "tier {}", build.tier.name);
            assert_eq!(build.report.items, 300);
            assert_eq!(build.report.m, build.artifact.m);
            assert_eq!(build.report.encoded_bytes, build.artifact.data.len());
            assert!(build.report.fill_ratio > 0.0 && build.report.fill_ratio < 1.0);
        }

        let sizes: Vec<usize> = builds.iter().map(|b| b.artifact.m).collect();
        assert!(sizes.windows(2).all(|w| w[0] < w[1]), "Stricter tiers need more bits");
    }

    #[test]
    fn test_tier_builder_parallel_matches_sequential() {
        let items = domains(PARALLEL_THRESHOLD + 1);
        let sequential = TierBuilder::new(BuildConfig::default()).unwrap();
        let parallel = TierBuilder::new(BuildConfig::default().with_parallel(true)).unwrap();

        let a = sequential.build_all(&items).unwrap();
        let b = parallel.build_all(&items).unwrap();
        for (x, y) in a.iter().zip(&b) {
            assert_eq!(x.artifact, y.artifact);
        }
    }

    #[test]
    fn test_tier_builder_rejects_invalid_config() {
        let config = BuildConfig {
            tiers: Vec::new(),
            parallel: false,
        };
        assert_eq!(TierBuilder::new(config).unwrap_err(), ConfigError::NoTiers);
    }

    #[test]
    fn test_tier_builder_custom_tier() {
        let config = BuildConfigBuilder::new().tier("tiny", 0.2).build().unwrap();
        let builder = TierBuilder::new(config).unwrap();
        let builds = builder.build_all(&["gmail.com", "yahoo.com"]).unwrap();

        assert_eq!(builds.len(), 1);
        assert_eq!(builds[0].report.tier, "tiny");
    }
}

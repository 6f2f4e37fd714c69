//! Subcommand implementations

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use bloommx_core::{
    BloomArtifact, BloomFilter, BuildConfig, BuildReport, DomainMembership, ModuleHeader,
    TierBuilder,
};
use clap::ValueEnum;
use serde::Serialize;
use tracing::info;

/// Manifest file written next to the artifacts
pub const MANIFEST_FILE: &str = "manifest.json";

/// Artifact output format
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// `{"m": .., "k": .., "data": ..}` per tier
    #[default]
    Json,
    /// Rust module with `M`, `K` and `DATA` constants per tier
    Rust,
}

impl OutputFormat {
    fn extension(self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Rust => "rs",
        }
    }
}

/// Build every configured tier and write one artifact per tier plus a
/// manifest of build reports into `out_dir`
///
/// `source` is recorded in generated Rust modules.
pub fn generate(
    domains: &[String],
    config: BuildConfig,
    out_dir: &Path,
    format: OutputFormat,
    source: &str,
) -> Result<Vec<BuildReport>> {
    let builder = TierBuilder::new(config).context("invalid tier configuration")?;
    let builds = builder
        .build_all(domains)
        .context("bloom filter build failed")?;

    fs::create_dir_all(out_dir)
        .with_context(|| format!("failed to create {}", out_dir.display()))?;

    let mut reports = Vec::with_capacity(builds.len());
    for build in builds {
        let path = artifact_path(out_dir, &build.tier.name, format);
        let contents = match format {
            OutputFormat::Json => serde_json::to_string_pretty(&build.artifact)?,
            OutputFormat::Rust => build.artifact.to_rust_module(&ModuleHeader {
                source,
                item_count: domains.len(),
                tier: &build.tier.name,
                false_positive_rate: build.tier.false_positive_rate,
            }),
        };
        fs::write(&path, contents)
            .with_context(|| format!("failed to write {}", path.display()))?;
        info!(path = %path.display(), "wrote artifact");

        reports.push(build.report);
    }

    let manifest = out_dir.join(MANIFEST_FILE);
    fs::write(&manifest, serde_json::to_string_pretty(&reports)?)
        .with_context(|| format!("failed to write {}", manifest.display()))?;

    Ok(reports)
}

/// Read a JSON artifact and decode it
pub fn load_artifact(path: &Path) -> Result<BloomFilter> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read artifact {}", path.display()))?;
    let artifact: BloomArtifact = serde_json::from_str(&text)
        .with_context(|| format!("failed to parse artifact {}", path.display()))?;
    artifact
        .decode()
        .with_context(|| format!("failed to decode artifact {}", path.display()))
}

/// One query answered by `check`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CheckResult {
    pub value: String,
    pub free: bool,
}

impl fmt::Display for CheckResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\t{}", self.value, self.free)
    }
}

/// Answer email queries then domain queries, in argument order
pub fn check<F: DomainMembership>(
    filter: &F,
    emails: &[String],
    domains: &[String],
) -> Vec<CheckResult> {
    let emails = emails.iter().map(|email| CheckResult {
        value: email.clone(),
        free: filter.check_email(email),
    });
    let domains = domains.iter().map(|domain| CheckResult {
        value: domain.clone(),
        free: filter.check_domain(domain),
    });
    emails.chain(domains).collect()
}

/// Shape and saturation of a decoded artifact
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Inspection {
    pub m: usize,
    pub k: usize,
    pub words: usize,
    pub bits_set: usize,
    pub fill_ratio: f64,
}

impl Inspection {
    pub fn of(filter: &BloomFilter) -> Self {
        Self {
            m: filter.size_bits(),
            k: filter.hash_count(),
            words: filter.words().len(),
            bits_set: filter.bits_set(),
            fill_ratio: filter.fill_ratio(),
        }
    }
}

impl fmt::Display for Inspection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "m\t{}", self.m)?;
        writeln!(f, "k\t{}", self.k)?;
        writeln!(f, "words\t{}", self.words)?;
        writeln!(f, "bits_set\t{}", self.bits_set)?;
        write!(f, "fill_ratio\t{:.4}", self.fill_ratio)
    }
}

/// Path of the artifact `generate` writes for `tier`
pub fn artifact_path(out_dir: &Path, tier: &str, format: OutputFormat) -> PathBuf {
    out_dir.join(format!("{}.{}", tier, format.extension()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use bloommx_core::{BuildConfigBuilder, Tier};

    fn sample_domains() -> Vec<String> {
        ["gmail.com", "yahoo.com", "hotmail.com", "outlook.com", "aol.com"]
            .iter()
            .map(|d| d.to_string())
            .collect()
    }

    #[test]
    fn test_generate_writes_every_tier_and_manifest() {
        let dir = tempfile::tempdir().unwrap();
        let reports = generate(
            &sample_domains(),
            BuildConfig::default(),
            dir.path(),
            OutputFormat::Json,
            "domains.txt",
        )
        .unwrap();

        assert_eq!(reports.len(), Tier::ALL.len());
        for tier in Tier::ALL {
            let path = artifact_path(dir.path(), tier.name(), OutputFormat::Json);
            assert!(path.exists(), "missing {}", path.display());
        }

        let manifest: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(dir.path().join(MANIFEST_FILE)).unwrap())
                .unwrap();
        assert_eq!(manifest[0]["tier"], "micro");
        assert_eq!(manifest[3]["items"], 5);
    }

    #[test]
    fn test_generated_artifact_answers_queries() {
        let dir = tempfile::tempdir().unwrap();
        let config = BuildConfigBuilder::new().tier("strict", 0.001).build().unwrap();
        generate(&sample_domains(), config, dir.path(), OutputFormat::Json, "test").unwrap();

        let filter =
            load_artifact(&artifact_path(dir.path(), "strict", OutputFormat::Json)).unwrap();
        let results = check(
            &filter,
            &["someone@Gmail.com".to_string(), "broken".to_string()],
            &[" AOL.com ".to_string()],
        );

        assert_eq!(
            results,
            vec![
                CheckResult { value: "someone@Gmail.com".into(), free: true },
                CheckResult { value: "broken".into(), free: false },
                CheckResult { value: " AOL.com ".into(), free: true },
            ]
        );
        assert_eq!(results[0].to_string(), "someone@Gmail.com\ttrue");
    }

    #[test]
    fn test_generate_rust_modules() {
        let dir = tempfile::tempdir().unwrap();
        let config = BuildConfigBuilder::new().tier("compact", 0.01).build().unwrap();
        generate(&sample_domains(), config, dir.path(), OutputFormat::Rust, "domains.txt").unwrap();

        let module =
            fs::read_to_string(artifact_path(dir.path(), "compact", OutputFormat::Rust)).unwrap();
        assert!(module.contains("DO NOT EDIT"));
        assert!(module.contains("pub const M: usize"));
        assert!(module.contains("domains.txt"));
    }

    #[test]
    fn test_generate_empty_list_fails() {
        let dir = tempfile::tempdir().unwrap();
        let result = generate(&[], BuildConfig::default(), dir.path(), OutputFormat::Json, "x");
        assert!(result.is_err());
        assert!(!dir.path().join(MANIFEST_FILE).exists());
    }

    #[test]
    fn test_load_artifact_rejects_bad_payload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        fs::write(&path, r#"{"m": 64, "k": 3, "data": "AAAAAA=="}"#).unwrap();

        let err = load_artifact(&path).unwrap_err();
        assert!(err.to_string().contains("failed to decode artifact"));
    }

    #[test]
    fn test_inspect() {
        let dir = tempfile::tempdir().unwrap();
        let config = BuildConfigBuilder::new().tier("balanced", 0.001).build().unwrap();
        let reports =
            generate(&sample_domains(), config, dir.path(), OutputFormat::Json, "test").unwrap();

        let filter =
            load_artifact(&artifact_path(dir.path(), "balanced", OutputFormat::Json)).unwrap();
        let inspection = Inspection::of(&filter);

        assert_eq!(inspection.m, reports[0].m);
        assert_eq!(inspection.k, reports[0].k);
        assert_eq!(inspection.words * 32, inspection.m);
        assert_eq!(inspection.bits_set, reports[0].bits_set);
        assert!(inspection.to_string().starts_with(&format!("m\t{}\n", inspection.m)));
    }
}

//! Domain list and tier configuration loading

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use bloommx_core::{normalize_domain_list, parse_domain_list, BuildConfig};
use tracing::info;

/// Parse a domain list from text
///
/// A JSON array of strings (`domains.json`) is accepted as well as one domain
/// per line with blank lines and `#` comments skipped. Both forms are
/// lowercased, trimmed and deduplicated in first-seen order.
pub fn parse_domains(text: &str) -> Result<Vec<String>> {
    if text.trim_start().starts_with('[') {
        let raw: Vec<String> =
            serde_json::from_str(text).context("domain list is not a JSON array of strings")?;
        Ok(normalize_domain_list(raw))
    } else {
        Ok(parse_domain_list(text))
    }
}

/// Read and parse a domain list file
pub fn load_domains(path: &Path) -> Result<Vec<String>> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read domain list {}", path.display()))?;
    let domains = parse_domains(&text)
        .with_context(|| format!("failed to parse domain list {}", path.display()))?;

    info!(path = %path.display(), domains = domains.len(), "loaded domain list");
    Ok(domains)
}

/// Read a JSON tier configuration file
pub fn load_config(path: &Path) -> Result<BuildConfig> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    let config: BuildConfig = serde_json::from_str(&text)
        .with_context(|| format!("failed to parse config {}", path.display()))?;
    config
        .validate()
        .with_context(|| format!("invalid config {}", path.display()))?;
    Ok(config)
}

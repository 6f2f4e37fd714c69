//! Source domain list preparation
//!
//! The builder hashes items verbatim, so the source list goes through the same
//! normalisation as queries before it is inserted.

use std::collections::HashSet;

use tracing::warn;

use super::email::normalize_domain;

/// Normalise raw domains, dropping blanks and later duplicates
///
/// Input order is preserved, so the same list always yields the same build.
pub fn normalize_domain_list<I, S>(domains: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen = HashSet::new();
    let mut out = Vec::new();

    for raw in domains {
        let Some(domain) = normalize_domain(raw.as_ref()) else {
            continue;
        };
        if seen.insert(domain.clone()) {
            out.push(domain);
        } else {
            warn!(%domain, "duplicate domain in source list");
        }
    }

    out
}

/// Parse a newline separated domain list
///
/// Blank lines and lines starting with `#` are skipped.
pub fn parse_domain_list(text: &str) -> Vec<String> {
    normalize_domain_list(
        text.lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#')),
    )
}

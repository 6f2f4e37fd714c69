//! Build script generating the embedded tier artifacts.
//!
//! Reads `data/domains.txt`, builds every standard tier with `bloommx-core`,
//! and writes one module per tier into `OUT_DIR`:
//!
//! - `<tier>.rs`: `M`, `K` and `DATA` constants
//! - `source.rs`: `SOURCE_DOMAIN_COUNT`
//!
//! Any configuration error or false negative fails compilation.

use std::env;
use std::fs;
use std::path::PathBuf;

use bloommx_core::{parse_domain_list, BuildConfig, ModuleHeader, TierBuilder};

const DOMAIN_LIST: &str = "data/domains.txt";

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-changed={DOMAIN_LIST}");

    let out_dir = PathBuf::from(env::var("OUT_DIR").expect("OUT_DIR not set by cargo"));

    let text = fs::read_to_string(DOMAIN_LIST)
        .unwrap_or_else(|e| panic!("failed to read {DOMAIN_LIST}: {e}"));
    let domains = parse_domain_list(&text);

    let builder = TierBuilder::new(BuildConfig::default())
        .unwrap_or_else(|e| panic!("invalid tier configuration: {e}"));
    let builds = builder
        .build_all(&domains)
        .unwrap_or_else(|e| panic!("bloom filter build failed: {e}"));

    for build in &builds {
        let module = build.artifact.to_rust_module(&ModuleHeader {
            source: DOMAIN_LIST,
            item_count: domains.len(),
            tier: &build.tier.name,
            false_positive_rate: build.tier.false_positive_rate,
        });
        let path = out_dir.join(format!("{}.rs", build.tier.name));
        fs::write(&path, module)
            .unwrap_or_else(|e| panic!("failed to write {}: {e}", path.display()));
    }

    let source = format!(
        "/// Number of domains the embedded filters were built from\npub const SOURCE_DOMAIN_COUNT: usize = {};\n",
        domains.len()
    );
    fs::write(out_dir.join("source.rs"), source).expect("failed to write source.rs");
}

//! bloommx: free email domain artifact tool
//!
//! ```text
//! bloommx generate --domains domains.txt --out-dir generated/
//! bloommx check --artifact generated/balanced.json --email user@gmail.com
//! bloommx inspect --artifact generated/balanced.json
//! ```
//!
//! Logs go to stderr and honour `RUST_LOG`; query results go to stdout.

use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use bloommx_cli::commands::{self, Inspection, OutputFormat};
use bloommx_cli::input;
use bloommx_core::{BuildConfig, BuildConfigBuilder, TierConfig};

/// bloommx: free email domain Bloom filters
#[derive(Parser, Debug)]
#[command(name = "bloommx", version)]
#[command(about = "Generate, check and inspect free email domain Bloom filters")]
struct Args {
    /// Log at debug level unless RUST_LOG is set
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Build per-tier artifacts from a domain list
    Generate {
        /// Domain list: JSON array or one domain per line
        #[arg(short, long, env = "BLOOMMX_DOMAINS")]
        domains: PathBuf,

        /// Directory for the artifacts and manifest.json
        #[arg(short, long, env = "BLOOMMX_OUT_DIR", default_value = "generated")]
        out_dir: PathBuf,

        /// Tier as name=rate, repeatable; replaces the configured tiers
        #[arg(short, long = "tier", value_name = "NAME=RATE")]
        tiers: Vec<TierConfig>,

        /// JSON tier configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Artifact format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Json)]
        format: OutputFormat,

        /// Shard insertion across threads
        #[arg(long)]
        parallel: bool,
    },

    /// Test emails and domains against a JSON artifact
    Check {
        /// Artifact file written by `generate --format json`
        #[arg(short, long)]
        artifact: PathBuf,

        /// Email address to check, repeatable
        #[arg(short, long = "email")]
        emails: Vec<String>,

        /// Domain to check, repeatable
        #[arg(short, long = "domain")]
        domains: Vec<String>,
    },

    /// Print the shape and fill of a JSON artifact
    Inspect {
        /// Artifact file written by `generate --format json`
        #[arg(short, long)]
        artifact: PathBuf,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
}

fn init_tracing(verbose: bool) -> Result<()> {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(default_level))?;

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

/// Resolve tiers: `--config` file first, then `--tier` flags replace its tiers
fn build_config(
    config: Option<PathBuf>,
    tiers: Vec<TierConfig>,
    parallel: bool,
) -> Result<BuildConfig> {
    let base = match config {
        Some(path) => input::load_config(&path)?,
        None => BuildConfig::default(),
    };

    let mut builder = BuildConfigBuilder::new().parallel(parallel || base.parallel);
    let tiers = if tiers.is_empty() { base.tiers } else { tiers };
    for tier in tiers {
        builder = builder.tier_config(tier);
    }
    Ok(builder.build()?)
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose)?;

    match args.command {
        Command::Generate {
            domains,
            out_dir,
            tiers,
            config,
            format,
            parallel,
        } => {
            let config = build_config(config, tiers, parallel)?;
            let list = input::load_domains(&domains)?;
            let source = domains.display().to_string();

            let reports = commands::generate(&list, config, &out_dir, format, &source)?;
            info!(
                tiers = reports.len(),
                out_dir = %out_dir.display(),
                "generation complete"
            );
        }
        Command::Check {
            artifact,
            emails,
            domains,
        } => {
            if emails.is_empty() && domains.is_empty() {
                bail!("nothing to check: pass --email or --domain");
            }
            let filter = commands::load_artifact(&artifact)?;
            for result in commands::check(&filter, &emails, &domains) {
                println!("{}", result);
            }
        }
        Command::Inspect { artifact, json } => {
            let inspection = Inspection::of(&commands::load_artifact(&artifact)?);
            if json {
                println!("{}", serde_json::to_string_pretty(&inspection)?);
            } else {
                println!("{}", inspection);
            }
        }
    }

    Ok(())
}

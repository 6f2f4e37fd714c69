//! Service Layer
//!
//! Orchestrates sizing, insertion, verification and encoding into per-tier
//! artifacts.

pub mod filter_builder;

pub use filter_builder::{build, build_parallel, verify, BuildReport, TierBuild, TierBuilder};

//! bloommx-cli: generate, check and inspect free email domain artifacts
//!
//! The binary in `main.rs` only parses arguments and sets up logging; the
//! work lives here so it can be tested without spawning a process.

pub mod commands;
pub mod input;

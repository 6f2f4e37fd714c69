//! Ports Layer
//!
//! Defines the query interface implemented by raw filters and by the
//! per-tier wrappers in the `bloommx` crate.

pub mod inbound;

pub use inbound::DomainMembership;

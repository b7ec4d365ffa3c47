//! ipguard core: framework-agnostic IP allowlist compilation and evaluation.
//!
//! This crate turns an allowlist of literal addresses and CIDR ranges into an
//! immutable compiled policy, and decides ALLOW/DENY for the candidate
//! addresses of a single request. It carries no HTTP or runtime dependencies
//! so any host pipeline can drive it through the [`policy::RequestContext`]
//! trait.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here
//! (`#![deny(clippy::panic, clippy::unwrap_used, clippy::expect_used)]`).
//! Malformed configuration entries and malformed request addresses degrade to
//! "never matches", never to a runtime fault.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod error;
pub mod policy;

/// Shared result type.
pub use error::{IpGuardError, Result};
pub use policy::{Decision, Evaluator, PolicyConfig, PortStrip, RequestContext};

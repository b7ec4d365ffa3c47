//! Request context types handed to the policy evaluator.
//!
//! The evaluator never sees axum types; this module resolves the candidate
//! addresses (and the path used by bypass rules) from a live request.

pub mod client;

pub use client::ClientAddrs;

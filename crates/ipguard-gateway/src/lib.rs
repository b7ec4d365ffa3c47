//! ipguard gateway library entry.
//!
//! This crate wires the strict YAML config, the compiled IP allowlist and the
//! axum middleware into a small gateway. It is consumed by the binary
//! (`main.rs`) and by integration tests.

pub mod app_state;
pub mod config;
pub mod context;
pub mod router;
pub mod transport;

//! Top-level facade crate for ipguard.
//!
//! Re-exports the allowlist core and the axum gateway so users can depend on a single crate.

pub mod core {
    pub use ipguard_core::*;
}

pub mod gateway {
    pub use ipguard_gateway::*;
}

pub use ipguard_core::{Decision, Evaluator, PolicyConfig, PortStrip, RequestContext};

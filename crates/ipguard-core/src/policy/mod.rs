//! Policy layer (allowlist compilation, per-request evaluation).
//!
//! Compiles the raw allowlist once into an immutable lookup structure that
//! host pipelines share across concurrent requests.

pub mod allowlist;
pub mod engine;

pub use allowlist::{compile_entries, CompiledPolicy};
pub use engine::{
    Bypass, Decision, Evaluator, PolicyConfig, PortStrip, RequestContext,
    DEFAULT_ALLOWED_ENTRIES, FORBIDDEN_BODY,
};

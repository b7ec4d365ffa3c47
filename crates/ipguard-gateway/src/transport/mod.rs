//! Transport layer (HTTP middleware).
//!
//! Exposes the IP filter that runs before any route handler.

pub mod filter;

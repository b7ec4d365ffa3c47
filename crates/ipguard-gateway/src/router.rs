//! Axum router wiring.
//!
//! The IP filter wraps the whole router, fallback included, so a denied
//! client gets 403 on every path.

use axum::{middleware, routing::get, Router};

use crate::{app_state::AppState, transport};

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(hello))
        .route("/healthz", get(healthz))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            transport::filter::ip_filter,
        ))
        .with_state(state)
}

async fn hello() -> &'static str {
    "Hello world"
}

async fn healthz() -> &'static str {
    "ok"
}

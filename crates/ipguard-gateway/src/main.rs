//! ipguard gateway
//!
//! - Loads `ipguard.yaml` (or the path given as the first argument)
//! - Compiles the allowlist once
//! - Serves every route behind the IP filter, with peer addresses from connect info

use std::net::SocketAddr;

use tracing_subscriber::{fmt, EnvFilter};

use ipguard_core::error::{IpGuardError, Result};
use ipguard_gateway::{app_state, config, router};

#[tokio::main]
async fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let path = std::env::args().nth(1).unwrap_or_else(|| "ipguard.yaml".to_string());
    let cfg = config::load_from_file(&path)?;
    let listen = cfg.gateway.listen_addr()?;

    let state = app_state::AppState::new(&cfg)?;
    let app = router::build_router(state);

    tracing::info!(%listen, config = %path, "ipguard-gateway starting");
    let listener = tokio::net::TcpListener::bind(listen)
        .await
        .map_err(|e| IpGuardError::Internal(format!("failed to bind {listen}: {e}")))?;

    axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>())
        .await
        .map_err(|e| IpGuardError::Internal(format!("server failed: {e}")))
}

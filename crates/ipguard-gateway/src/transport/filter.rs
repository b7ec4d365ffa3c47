//! IP filter middleware.
//!
//! - Resolve candidate addresses (peer + forwarding header)
//! - Evaluate the compiled allowlist
//! - Allow: continue to the next handler
//! - Deny: short-circuit with HTTP 403 and the body `Forbidden access`

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
};
use ipguard_core::error::IpGuardError;

use crate::app_state::AppState;
use crate::context::ClientAddrs;

pub async fn ip_filter(State(state): State<AppState>, req: Request, next: Next) -> Response {
    let ctx = ClientAddrs::from_request(&req, state.forwarded_header());

    match state.evaluator().evaluate(&ctx).into_result() {
        Ok(()) => next.run(req).await,
        Err(e) => {
            tracing::debug!(
                primary = %ctx.primary,
                forwarded = ?ctx.forwarded,
                path = %ctx.path,
                "ip filter denied request"
            );
            error_response(e)
        }
    }
}

/// Map an error to a plain-text response. Forbidden carries its reason verbatim.
pub fn error_response(err: IpGuardError) -> Response {
    let code = err.client_code();
    let status =
        StatusCode::from_u16(code.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let body = match err {
        IpGuardError::Forbidden(reason) => reason,
        other => other.to_string(),
    };
    (status, body).into_response()
}

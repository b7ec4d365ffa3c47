use std::net::SocketAddr;

use axum::extract::{ConnectInfo, Request};
use axum::http::{HeaderMap, HeaderName};
use ipguard_core::policy::RequestContext;

/// Candidate addresses of one HTTP request.
#[derive(Debug, Clone, Default)]
pub struct ClientAddrs {
    /// Peer IP. Empty when the server was not started with connect info.
    pub primary: String,
    /// Forwarding header entries, in header order.
    pub forwarded: Vec<String>,
    pub path: String,
}

impl ClientAddrs {
    /// Resolve from a request. `forwarded_header == None` ignores proxy headers.
    pub fn from_request(req: &Request, forwarded_header: Option<&HeaderName>) -> Self {
        let primary = req
            .extensions()
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| addr.ip().to_string())
            .unwrap_or_default();

        let forwarded = forwarded_header
            .map(|name| split_forwarded(req.headers(), name))
            .unwrap_or_default();

        Self {
            primary,
            forwarded,
            path: req.uri().path().to_string(),
        }
    }
}

/// Split every occurrence of `name` on `,`. Empty and non-UTF-8 values are skipped.
pub fn split_forwarded(headers: &HeaderMap, name: &HeaderName) -> Vec<String> {
    headers
        .get_all(name)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(','))
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

impl RequestContext for ClientAddrs {
    fn primary_address(&self) -> &str {
        &self.primary
    }
    fn forwarded_addresses(&self) -> &[String] {
        &self.forwarded
    }
}

//! Shared application state for the ipguard gateway.
//!
//! The allowlist is compiled exactly once here and shared by every request
//! through `Arc`.

use std::sync::Arc;

use axum::http::HeaderName;
use ipguard_core::error::Result;
use ipguard_core::policy::{Evaluator, PolicyConfig};

use crate::config::GatewayConfig;
use crate::context::ClientAddrs;

#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    evaluator: Evaluator<ClientAddrs>,
    forwarded_header: Option<HeaderName>,
}

impl AppState {
    /// Build application state.
    /// Returns Result so main can handle errors gracefully (no panic).
    pub fn new(cfg: &GatewayConfig) -> Result<Self> {
        let filter = &cfg.ip_filter;

        let forwarded_header = if filter.trust_forwarded_header {
            Some(filter.header_name()?)
        } else {
            None
        };

        let mut policy: PolicyConfig<ClientAddrs> =
            PolicyConfig::new(filter.allowed_ips.iter().cloned())
                .with_port_strip(filter.port_strip.into());

        let bypassed = !filter.bypass_paths.is_empty();
        if bypassed {
            let paths = filter.bypass_paths.clone();
            policy = policy
                .with_bypass(move |ctx: &ClientAddrs| paths.iter().any(|p| *p == ctx.path));
        }

        let evaluator = Evaluator::compile(policy);

        let dropped = filter
            .allowed_ips
            .iter()
            .filter(|e| e.contains('/'))
            .count()
            .saturating_sub(evaluator.policy().parsed_ranges().len());
        if dropped > 0 {
            tracing::warn!(
                dropped,
                "ip_filter.allowed_ips contains unparsable CIDR entries (ignored)"
            );
        }
        if evaluator.policy().is_empty() {
            tracing::warn!(
                bypassed,
                "ip_filter.allowed_ips is empty, only bypassed requests are allowed"
            );
        }

        Ok(Self::with_evaluator(evaluator, forwarded_header))
    }

    /// Wrap an already compiled evaluator, e.g. one with a custom bypass rule.
    pub fn with_evaluator(
        evaluator: Evaluator<ClientAddrs>,
        forwarded_header: Option<HeaderName>,
    ) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                evaluator,
                forwarded_header,
            }),
        }
    }

    pub fn evaluator(&self) -> &Evaluator<ClientAddrs> {
        &self.inner.evaluator
    }

    pub fn forwarded_header(&self) -> Option<&HeaderName> {
        self.inner.forwarded_header.as_ref()
    }
}

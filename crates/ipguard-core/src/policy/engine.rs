use std::fmt;
use std::net::{IpAddr, Ipv4Addr};
use std::sync::Arc;

use crate::error::{ClientCode, IpGuardError, Result};

use super::allowlist::{compile_entries, CompiledPolicy};

/// Body text sent to denied clients. Part of the observable contract.
pub const FORBIDDEN_BODY: &str = "Forbidden access";

/// Entries used by [`PolicyConfig::default`].
pub const DEFAULT_ALLOWED_ENTRIES: &[&str] = &["localhost"];

/// Addresses of one request, as resolved by the host framework.
pub trait RequestContext {
    /// Address of the direct peer, possibly with a port suffix.
    fn primary_address(&self) -> &str;
    /// Proxy-declared addresses, already split into individual entries.
    fn forwarded_addresses(&self) -> &[String];
}

/// Predicate that lets a request skip address matching entirely.
pub type Bypass<C> = Arc<dyn Fn(&C) -> bool + Send + Sync>;

/// How a trailing port is removed from a candidate before parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PortStrip {
    /// Keep everything before the first `:`. Bare IPv6 candidates are
    /// truncated to their first hextet and never match.
    FirstColon,
    /// Strip `host:port` and `[v6]:port`, leave bare addresses intact.
    /// Anything starting with `a.b.c.d:` cleans to `a.b.c.d`, as in `FirstColon`.
    #[default]
    AddressAware,
}

impl PortStrip {
    /// Returns the candidate text used for both parsing and exact matching.
    pub fn clean<'a>(self, raw: &'a str) -> &'a str {
        let s = raw.trim();
        match self {
            PortStrip::FirstColon => s.split(':').next().unwrap_or(s),
            PortStrip::AddressAware => {
                if s.parse::<IpAddr>().is_ok() {
                    return s;
                }
                if let Some(rest) = s.strip_prefix('[') {
                    if let Some((host, _)) = rest.split_once(']') {
                        return host;
                    }
                }
                match s.split_once(':') {
                    Some((host, _)) if host.parse::<Ipv4Addr>().is_ok() => host,
                    Some((host, port)) if !port.contains(':') => host,
                    _ => s,
                }
            }
        }
    }
}

/// Decision from policy evaluation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny { code: ClientCode, reason: &'static str },
}

impl Decision {
    fn deny() -> Self {
        Decision::Deny {
            code: ClientCode::Forbidden,
            reason: FORBIDDEN_BODY,
        }
    }

    pub fn is_allow(&self) -> bool {
        matches!(self, Decision::Allow)
    }

    /// `Allow` => `Ok(())`, `Deny` => `IpGuardError::Forbidden(reason)`.
    pub fn into_result(self) -> Result<()> {
        match self {
            Decision::Allow => Ok(()),
            Decision::Deny { reason, .. } => Err(IpGuardError::Forbidden(reason.to_string())),
        }
    }
}

/// Raw allowlist configuration.
pub struct PolicyConfig<C> {
    pub allowed_entries: Vec<String>,
    pub bypass: Option<Bypass<C>>,
    pub port_strip: PortStrip,
}

impl<C> PolicyConfig<C> {
    pub fn new<I, S>(allowed_entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            allowed_entries: allowed_entries.into_iter().map(Into::into).collect(),
            bypass: None,
            port_strip: PortStrip::default(),
        }
    }

    pub fn with_bypass<F>(mut self, f: F) -> Self
    where
        F: Fn(&C) -> bool + Send + Sync + 'static,
    {
        self.bypass = Some(Arc::new(f));
        self
    }

    pub fn with_port_strip(mut self, mode: PortStrip) -> Self {
        self.port_strip = mode;
        self
    }
}

impl<C> Default for PolicyConfig<C> {
    fn default() -> Self {
        Self::new(DEFAULT_ALLOWED_ENTRIES.iter().copied())
    }
}

impl<C> Clone for PolicyConfig<C> {
    fn clone(&self) -> Self {
        Self {
            allowed_entries: self.allowed_entries.clone(),
            bypass: self.bypass.clone(),
            port_strip: self.port_strip,
        }
    }
}

impl<C> fmt::Debug for PolicyConfig<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PolicyConfig")
            .field("allowed_entries", &self.allowed_entries)
            .field("bypass", &self.bypass.is_some())
            .field("port_strip", &self.port_strip)
            .finish()
    }
}

/// Compiled address policy.
/// Construct once at startup, then share via Arc.
pub struct Evaluator<C> {
    policy: CompiledPolicy,
    bypass: Option<Bypass<C>>,
    port_strip: PortStrip,
}

impl<C: RequestContext> Evaluator<C> {
    pub fn compile(cfg: PolicyConfig<C>) -> Self {
        let policy = compile_entries(&cfg.allowed_entries);
        tracing::debug!(
            exact = policy.exact_addresses().len(),
            ranges = policy.parsed_ranges().len(),
            "ip policy compiled"
        );
        Self {
            policy,
            bypass: cfg.bypass,
            port_strip: cfg.port_strip,
        }
    }

    pub fn policy(&self) -> &CompiledPolicy {
        &self.policy
    }

    /// Decide for one request. Never fails; unparsable candidates are skipped.
    pub fn evaluate(&self, ctx: &C) -> Decision {
        if let Some(bypass) = &self.bypass {
            if (**bypass)(ctx) {
                return Decision::Allow;
            }
        }

        let candidates = std::iter::once(ctx.primary_address())
            .chain(ctx.forwarded_addresses().iter().map(String::as_str));

        for raw in candidates {
            let cleaned = self.port_strip.clean(raw);
            let Ok(addr) = cleaned.parse::<IpAddr>() else {
                continue;
            };

            if self.policy.matches_exact(cleaned) || self.policy.matches_range(addr) {
                return Decision::Allow;
            }
        }

        Decision::deny()
    }
}

impl<C> fmt::Debug for Evaluator<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Evaluator")
            .field("policy", &self.policy)
            .field("bypass", &self.bypass.is_some())
            .field("port_strip", &self.port_strip)
            .finish()
    }
}

use std::net::SocketAddr;

use axum::http::HeaderName;
use ipguard_core::error::{IpGuardError, Result};
use ipguard_core::policy::PortStrip;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GatewayConfig {
    pub version: u32,

    #[serde(default)]
    pub gateway: GatewaySection,

    #[serde(default)]
    pub ip_filter: IpFilterSection,
}

impl GatewayConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(IpGuardError::UnsupportedVersion);
        }

        self.gateway.validate()?;
        self.ip_filter.validate()?;

        Ok(())
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GatewaySection {
    #[serde(default = "default_listen")]
    pub listen: String,
}

impl Default for GatewaySection {
    fn default() -> Self {
        Self {
            listen: default_listen(),
        }
    }
}

impl GatewaySection {
    pub fn validate(&self) -> Result<()> {
        self.listen_addr().map(|_| ())
    }

    pub fn listen_addr(&self) -> Result<SocketAddr> {
        self.listen.parse().map_err(|_| {
            IpGuardError::BadRequest(format!(
                "gateway.listen must be a valid socket address: {}",
                self.listen
            ))
        })
    }
}

fn default_listen() -> String {
    "0.0.0.0:3000".into()
}

/// Serde mirror of [`PortStrip`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PortStripMode {
    FirstColon,
    #[default]
    AddressAware,
}

impl From<PortStripMode> for PortStrip {
    fn from(m: PortStripMode) -> Self {
        match m {
            PortStripMode::FirstColon => PortStrip::FirstColon,
            PortStripMode::AddressAware => PortStrip::AddressAware,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IpFilterSection {
    /// Literal addresses and CIDR ranges. Bad CIDR entries are ignored.
    #[serde(default = "default_allowed_ips")]
    pub allowed_ips: Vec<String>,

    /// Request paths that skip address matching.
    #[serde(default)]
    pub bypass_paths: Vec<String>,

    /// Read proxy-declared addresses from `forwarded_header`.
    #[serde(default = "default_true")]
    pub trust_forwarded_header: bool,

    #[serde(default = "default_forwarded_header")]
    pub forwarded_header: String,

    #[serde(default)]
    pub port_strip: PortStripMode,
}

impl Default for IpFilterSection {
    fn default() -> Self {
        Self {
            allowed_ips: default_allowed_ips(),
            bypass_paths: Vec::new(),
            trust_forwarded_header: true,
            forwarded_header: default_forwarded_header(),
            port_strip: PortStripMode::default(),
        }
    }
}

impl IpFilterSection {
    pub fn validate(&self) -> Result<()> {
        self.header_name().map(|_| ())?;
        for p in &self.bypass_paths {
            if !p.starts_with('/') {
                return Err(IpGuardError::BadRequest(format!(
                    "ip_filter.bypass_paths entries must start with '/': {p}"
                )));
            }
        }
        Ok(())
    }

    pub fn header_name(&self) -> Result<HeaderName> {
        HeaderName::from_bytes(self.forwarded_header.as_bytes()).map_err(|_| {
            IpGuardError::BadRequest(format!(
                "ip_filter.forwarded_header is not a valid header name: {}",
                self.forwarded_header
            ))
        })
    }
}

fn default_allowed_ips() -> Vec<String> {
    ipguard_core::policy::DEFAULT_ALLOWED_ENTRIES
        .iter()
        .map(|s| s.to_string())
        .collect()
}
fn default_true() -> bool {
    true
}
fn default_forwarded_header() -> String {
    "x-forwarded-for".into()
}

//! Allowlist compilation and matching utilities.
//!
//! Entries containing `/` are CIDR ranges, everything else is an exact
//! literal compared by string equality.

use std::collections::HashSet;
use std::net::IpAddr;

use ipnet::IpNet;

/// Compiled allowlist. Built once, read-only afterwards.
#[derive(Debug, Clone, Default)]
pub struct CompiledPolicy {
    exact_addresses: HashSet<String>,
    parsed_ranges: Vec<IpNet>,
}

impl CompiledPolicy {
    pub fn exact_addresses(&self) -> &HashSet<String> {
        &self.exact_addresses
    }

    pub fn parsed_ranges(&self) -> &[IpNet] {
        &self.parsed_ranges
    }

    pub fn is_empty(&self) -> bool {
        self.exact_addresses.is_empty() && self.parsed_ranges.is_empty()
    }

    /// Literal match on the cleaned candidate text.
    pub fn matches_exact(&self, cleaned: &str) -> bool {
        self.exact_addresses.contains(cleaned)
    }

    /// Containment in any compiled range.
    pub fn matches_range(&self, addr: IpAddr) -> bool {
        // ::ffff:a.b.c.d is also checked against v4 ranges
        let mapped = match addr {
            IpAddr::V6(v6) => v6.to_ipv4_mapped().map(IpAddr::V4),
            IpAddr::V4(_) => None,
        };
        self.parsed_ranges
            .iter()
            .any(|net| net.contains(&addr) || mapped.is_some_and(|m| net.contains(&m)))
    }
}

/// Compile raw allowlist entries.
///
/// CIDR entries that fail to parse are dropped without error so one bad line
/// does not disable the rest of the list. Literals are not validated.
pub fn compile_entries<S: AsRef<str>>(raw: &[S]) -> CompiledPolicy {
    let mut exact_addresses = HashSet::with_capacity(raw.len());
    let mut parsed_ranges = Vec::new();

    for s in raw {
        let s = s.as_ref();
        if s.contains('/') {
            if let Ok(net) = s.parse::<IpNet>() {
                parsed_ranges.push(net.trunc());
            }
        } else {
            exact_addresses.insert(s.to_string());
        }
    }

    CompiledPolicy { exact_addresses, parsed_ranges }
}

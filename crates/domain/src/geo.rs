use ipnetwork::IpNetwork;
use serde::{Deserialize, Serialize};
use std::net::IpAddr;

pub const UNKNOWN_COUNTRY: &str = "Unknown";

/// A CIDR block tagged with the ISO-3166 alpha-2 country it belongs to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Prefix {
    pub network: IpNetwork,
    pub country: String,
}

impl Prefix {
    pub fn new(network: IpNetwork, country: impl Into<String>) -> Self {
        Self {
            network,
            country: country.into(),
        }
    }

    pub fn prefix_len(&self) -> u8 {
        self.network.prefix()
    }

    pub fn contains(&self, ip: IpAddr) -> bool {
        self.network.contains(ip)
    }
}

/// Sort prefixes descending by mask length so the first match found by a
/// linear scan is always the longest-prefix match.
pub fn sort_longest_prefix_first(prefixes: &mut [Prefix]) {
    prefixes.sort_by(|a, b| b.prefix_len().cmp(&a.prefix_len()));
}

pub fn normalize_country_code(raw: &str) -> String {
    raw.trim().to_uppercase()
}

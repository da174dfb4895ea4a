use std::net::IpAddr;

/// Longest-prefix-match from CIDR to country, and a country-block
/// predicate. Reads are lock-free snapshots over an atomically swapped
/// table; reload never blocks a concurrent `country_of` call.
pub trait GeoResolverPort: Send + Sync {
    /// Country of the first (= longest) matching prefix, or `"Unknown"`.
    fn country_of(&self, addr: IpAddr) -> String;
    fn is_blocked_country(&self, addr: IpAddr) -> bool;
}

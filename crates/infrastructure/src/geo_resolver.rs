use std::collections::HashSet;
use std::net::IpAddr;
use std::sync::Arc;

use arc_swap::ArcSwap;
use sentinel_fw_domain::{parse_seed_lines, sort_longest_prefix_first, DomainError, Prefix, UNKNOWN_COUNTRY};
use tracing::warn;

use sentinel_fw_application::ports::GeoResolverPort;

/// Longest-prefix-match CIDR-to-country table, generalized from
/// `domain::client_subnet::SubnetMatcher`'s "CIDR → group_id" shape the same
/// way `BlockFilterEngine.index` hot-swaps its table: reads never block a
/// concurrent reload.
pub struct GeoResolver {
    prefixes: ArcSwap<Vec<Prefix>>,
    blocked_countries: ArcSwap<HashSet<String>>,
    zones_dir: String,
    blocked_countries_path: String,
}

impl GeoResolver {
    pub async fn load(zones_dir: &str, blocked_countries_path: &str) -> Result<Self, DomainError> {
        let resolver = Self {
            prefixes: ArcSwap::from_pointee(Vec::new()),
            blocked_countries: ArcSwap::from_pointee(HashSet::new()),
            zones_dir: zones_dir.to_string(),
            blocked_countries_path: blocked_countries_path.to_string(),
        };
        resolver.reload_from_disk().await?;
        Ok(resolver)
    }

    pub async fn reload_from_disk(&self) -> Result<(), DomainError> {
        let mut prefixes = Vec::new();
        let mut entries = match tokio::fs::read_dir(&self.zones_dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                self.prefixes.store(Arc::new(prefixes));
                return self.reload_blocked_countries().await;
            }
            Err(e) => return Err(DomainError::Io(e.to_string())),
        };

        while let Some(entry) = entries.next_entry().await.map_err(|e| DomainError::Io(e.to_string()))? {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("zone") {
                continue;
            }
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            let country = stem.to_uppercase();
            let contents = tokio::fs::read_to_string(&path)
                .await
                .map_err(|e| DomainError::Io(e.to_string()))?;
            for line in parse_seed_lines(&contents) {
                match line.parse() {
                    Ok(network) => prefixes.push(Prefix::new(network, country.clone())),
                    Err(e) => warn!(zone = %country, line, error = %e, "skipping unparsable CIDR"),
                }
            }
        }

        sort_longest_prefix_first(&mut prefixes);
        self.prefixes.store(Arc::new(prefixes));
        self.reload_blocked_countries().await
    }

    async fn reload_blocked_countries(&self) -> Result<(), DomainError> {
        let contents = match tokio::fs::read_to_string(&self.blocked_countries_path).await {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                self.blocked_countries.store(Arc::new(HashSet::new()));
                return Ok(());
            }
            Err(e) => return Err(DomainError::Io(e.to_string())),
        };
        let countries: HashSet<String> = parse_seed_lines(&contents)
            .into_iter()
            .map(sentinel_fw_domain::normalize_country_code)
            .collect();
        self.blocked_countries.store(Arc::new(countries));
        Ok(())
    }
}

impl GeoResolverPort for GeoResolver {
    fn country_of(&self, addr: IpAddr) -> String {
        let prefixes = self.prefixes.load();
        prefixes
            .iter()
            .find(|p| p.contains(addr))
            .map(|p| p.country.clone())
            .unwrap_or_else(|| UNKNOWN_COUNTRY.to_string())
    }

    fn is_blocked_country(&self, addr: IpAddr) -> bool {
        let country = self.country_of(addr);
        self.blocked_countries.load().contains(&country)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn longest_prefix_wins_regardless_of_file_order() {
        let dir = tempfile::tempdir().unwrap();
        tokio::fs::write(dir.path().join("AA.zone"), "203.0.113.0/16\n")
            .await
            .unwrap();
        tokio::fs::write(dir.path().join("BB.zone"), "203.0.113.0/24\n")
            .await
            .unwrap();
        let resolver = GeoResolver::load(
            dir.path().to_str().unwrap(),
            dir.path().join("blocked_countries.txt").to_str().unwrap(),
        )
        .await
        .unwrap();
        assert_eq!(resolver.country_of("203.0.113.5".parse().unwrap()), "BB");
    }

    #[tokio::test]
    async fn unmatched_address_is_unknown() {
        let dir = tempfile::tempdir().unwrap();
        let resolver = GeoResolver::load(
            dir.path().to_str().unwrap(),
            dir.path().join("blocked_countries.txt").to_str().unwrap(),
        )
        .await
        .unwrap();
        assert_eq!(
            resolver.country_of("8.8.8.8".parse().unwrap()),
            UNKNOWN_COUNTRY
        );
    }
}

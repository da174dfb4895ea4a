mod windows;

use std::net::IpAddr;
use std::sync::Arc;

use chrono::Utc;
use dashmap::DashMap;
use sentinel_fw_domain::{AddressId, ConnectionRecord, Event};
use tracing::{debug, warn};

use crate::ports::{BlockListPort, ConnectionLogPort, EventPublisherPort, GeoResolverPort, StorePort};
use crate::use_cases::blocking::BlockAddressUseCase;
use windows::AttemptWindows;

/// Tuning for the rate/geo decision made on every classified connection.
#[derive(Debug, Clone, Copy)]
pub struct EngineConfig {
    pub threshold_attempts: usize,
    pub threshold_seconds: i64,
    pub default_duration_seconds: i64,
    pub plaintext_logs_enabled: bool,
}

/// The rate/geo decision engine.
///
/// Per-address state (the attempt window and the minted identifier) lives
/// behind a striped map so contention between different addresses never
/// serializes. `observe` is the single entry point the syslog classifier
/// calls for every accepted connection line.
pub struct EnforcementEngine {
    block_list: Arc<dyn BlockListPort>,
    geo: Arc<dyn GeoResolverPort>,
    events: Arc<dyn EventPublisherPort>,
    store: Arc<dyn StorePort>,
    connection_log: Arc<dyn ConnectionLogPort>,
    block: Arc<BlockAddressUseCase>,
    config: EngineConfig,
    windows: AttemptWindows,
    address_ids: DashMap<IpAddr, AddressId>,
}

impl EnforcementEngine {
    pub fn new(
        block_list: Arc<dyn BlockListPort>,
        geo: Arc<dyn GeoResolverPort>,
        events: Arc<dyn EventPublisherPort>,
        store: Arc<dyn StorePort>,
        connection_log: Arc<dyn ConnectionLogPort>,
        block: Arc<BlockAddressUseCase>,
        config: EngineConfig,
    ) -> Self {
        Self {
            block_list,
            geo,
            events,
            store,
            connection_log,
            block,
            config,
            windows: AttemptWindows::new(),
            address_ids: DashMap::new(),
        }
    }

    async fn identifier_for(&self, ip: IpAddr) -> AddressId {
        if let Some(id) = self.address_ids.get(&ip) {
            return *id;
        }
        // Memoized but best-effort: a store failure here degrades to a
        // fresh, process-local identifier rather than dropping the
        // connection on the floor.
        let id = self
            .store
            .get_or_create_address_id(ip)
            .await
            .unwrap_or_else(|e| {
                warn!(%ip, error = %e, "failed to mint/persist address identifier");
                AddressId::new()
            });
        *self.address_ids.entry(ip).or_insert(id)
    }

    /// Runs the full classify-to-decide pipeline for one accepted connection
    /// record.
    pub async fn observe(&self, record: ConnectionRecord) {
        let addr = record.address;

        // Step 1 — identifier lookup/mint.
        let _address_id = self.identifier_for(addr).await;

        // Step 2 — whitelist immunity: no counting, no blocking, no events.
        if self.block_list.is_whitelisted(addr) {
            debug!(%addr, "whitelisted address, ignoring connection attempt");
            return;
        }

        // Step 3 — ConnectionAttempt is canonical: exactly one publication
        // per accepted line.
        self.events.publish(Event::ConnectionAttempt {
            address: addr,
            time: record.time,
            src_port: record.src_port,
            dst_port: record.dst_port,
        });

        // Step 4 — geo block.
        let country = self.geo.country_of(addr);
        if self.geo.is_blocked_country(addr) {
            self.events.publish(Event::GeoBlock {
                address: addr,
                country: country.clone(),
                time: record.time,
            });
            warn!(%addr, country = %country, "geo-blocked country, installing block");
            if let Err(e) = self
                .block
                .execute(addr, Some(self.config.default_duration_seconds))
                .await
            {
                warn!(%addr, error = %e, "geo block install failed");
            }
            return;
        }

        // Step 5 — append and prune under the address's own lock.
        let (size, span_seconds) = self.windows.record(addr, record.time, self.config.threshold_seconds);

        // Step 6 — optional plaintext connection log.
        if self.config.plaintext_logs_enabled {
            self.write_plaintext_log(&record, &country, size, span_seconds)
                .await;
        }

        // Step 7 — rate threshold, inclusive.
        if size >= self.config.threshold_attempts {
            warn!(%addr, attempts = size, "rate limit exceeded, installing block");
            self.events.publish(Event::RateLimitExceeded {
                address: addr,
                attempts: size,
                window_seconds: span_seconds.unwrap_or(0.0),
                time: record.time,
            });
            if let Err(e) = self
                .block
                .execute(addr, Some(self.config.default_duration_seconds))
                .await
            {
                warn!(%addr, error = %e, "rate limit block install failed");
            }
        }
    }

    async fn write_plaintext_log(
        &self,
        record: &ConnectionRecord,
        country: &str,
        attempts: usize,
        span_seconds: Option<f64>,
    ) {
        let rdns = self.connection_log.reverse_dns(record.address).await;
        let line = format!(
            "{ts}|{addr}|{pid}|{tid:?}|{addr}|{rdns}|{country}|{sport}|{dport}|attempts={attempts}|window={window:.1}",
            ts = Utc::now().to_rfc3339(),
            addr = record.address,
            pid = std::process::id(),
            tid = std::thread::current().id(),
            rdns = rdns,
            country = country,
            sport = record.src_port,
            dport = record.dst_port,
            attempts = attempts,
            window = span_seconds.unwrap_or(0.0),
        );
        self.connection_log.append(&line).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::*;
    use sentinel_fw_domain::EventKind;

    fn engine(
        block_list: Arc<MockBlockList>,
        geo: Arc<MockGeoResolver>,
        events: Arc<MockEvents>,
        store: Arc<MockStore>,
        filter_succeeds: bool,
        config: EngineConfig,
    ) -> EnforcementEngine {
        let block = Arc::new(BlockAddressUseCase::new(
            Arc::new(MockFilter {
                succeed: filter_succeeds,
            }),
            store.clone(),
            block_list.clone(),
            events.clone(),
            config.default_duration_seconds,
        ));
        EnforcementEngine::new(
            block_list,
            geo,
            events,
            store,
            Arc::new(MockConnectionLog::default()),
            block,
            config,
        )
    }

    fn record(ip: IpAddr, offset_secs: i64) -> ConnectionRecord {
        ConnectionRecord::new(ip, Utc::now() + chrono::Duration::seconds(offset_secs), 51000, 22)
    }

    fn config() -> EngineConfig {
        EngineConfig {
            threshold_attempts: 3,
            threshold_seconds: 10,
            default_duration_seconds: 60,
            plaintext_logs_enabled: false,
        }
    }

    #[tokio::test]
    async fn rate_block_fires_at_exactly_the_threshold() {
        let block_list = Arc::new(MockBlockList::default());
        let events = Arc::new(MockEvents::default());
        let engine = engine(
            block_list.clone(),
            Arc::new(MockGeoResolver::default()),
            events.clone(),
            Arc::new(MockStore::default()),
            true,
            config(),
        );
        let ip = addr("1.2.3.4");

        for t in 0..3 {
            engine.observe(record(ip, t)).await;
        }

        assert!(block_list.is_blocked(ip));
        assert_eq!(events.count_kind(EventKind::Block), 1);
        assert_eq!(events.count_kind(EventKind::RateLimitExceeded), 1);
    }

    #[tokio::test]
    async fn whitelisted_address_never_counts_or_blocks() {
        let ip = addr("8.8.8.8");
        let block_list = Arc::new(MockBlockList::default());
        block_list.whitelisted.insert(ip);
        let events = Arc::new(MockEvents::default());
        let engine = engine(
            block_list.clone(),
            Arc::new(MockGeoResolver::default()),
            events.clone(),
            Arc::new(MockStore::default()),
            true,
            config(),
        );

        for t in 0..100 {
            engine.observe(record(ip, 0)).await;
            let _ = t;
        }

        assert!(!block_list.is_blocked(ip));
        assert!(events.published.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn geo_blocked_country_blocks_on_first_line() {
        let ip = addr("203.0.113.5");
        let block_list = Arc::new(MockBlockList::default());
        let events = Arc::new(MockEvents::default());
        let geo = Arc::new(MockGeoResolver {
            mapping: Some((ip, "XX")),
            blocked_countries: Default::default(),
        });
        geo.blocked_countries.insert("XX");

        let engine = engine(
            block_list.clone(),
            geo,
            events.clone(),
            Arc::new(MockStore::default()),
            true,
            config(),
        );
        engine.observe(record(ip, 0)).await;

        assert!(block_list.is_blocked(ip));
        let published = events.published.lock().unwrap();
        assert_eq!(published.len(), 3); // ConnectionAttempt, GeoBlock, Block
        assert!(matches!(published[1], Event::GeoBlock { .. }));
        assert!(matches!(published[2], Event::Block { .. }));
    }
}

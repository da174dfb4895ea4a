use std::net::IpAddr;
use std::sync::Arc;

use chrono::Utc;
use sentinel_fw_domain::{BlockRecord, DomainError, Event};
use tracing::{info, instrument, warn};

use crate::ports::{BlockListPort, EventPublisherPort, PacketFilterPort, StorePort};

/// `block(addr, duration?)`.
///
/// Whitelisted addresses are rejected with a user-visible message and no
/// side effect. An address already in the in-memory blocked set is a no-op
/// success — the caller doesn't need to know whether this is the first or
/// the tenth attempt to block it.
pub struct BlockAddressUseCase {
    packet_filter: Arc<dyn PacketFilterPort>,
    store: Arc<dyn StorePort>,
    block_list: Arc<dyn BlockListPort>,
    events: Arc<dyn EventPublisherPort>,
    default_duration_seconds: i64,
}

impl BlockAddressUseCase {
    pub fn new(
        packet_filter: Arc<dyn PacketFilterPort>,
        store: Arc<dyn StorePort>,
        block_list: Arc<dyn BlockListPort>,
        events: Arc<dyn EventPublisherPort>,
        default_duration_seconds: i64,
    ) -> Self {
        Self {
            packet_filter,
            store,
            block_list,
            events,
            default_duration_seconds,
        }
    }

    #[instrument(skip(self))]
    pub async fn execute(
        &self,
        addr: IpAddr,
        duration_seconds: Option<i64>,
    ) -> Result<(), DomainError> {
        if self.block_list.is_whitelisted(addr) {
            return Err(DomainError::AddressWhitelisted(addr.to_string()));
        }

        if self.block_list.is_blocked(addr) {
            info!(%addr, "address already blocked, no-op");
            return Ok(());
        }

        let duration = duration_seconds.unwrap_or(self.default_duration_seconds);
        let outcome = self.packet_filter.block(addr).await?;
        if !outcome.success {
            warn!(%addr, diagnostic = %outcome.diagnostic, "packet filter block failed");
            return Err(DomainError::ExternalToolFailure(outcome.diagnostic));
        }

        let record = BlockRecord::new(addr, Utc::now(), duration);
        self.store.upsert_block(&record).await?;
        self.block_list.insert_blocked(addr);

        self.events.publish(Event::Block {
            address: addr,
            duration_seconds: duration,
            time: record.blocked_at,
        });

        info!(%addr, duration, "address blocked");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::*;

    #[tokio::test]
    async fn whitelisted_address_is_rejected() {
        let block_list = Arc::new(MockBlockList::default());
        block_list.whitelisted.insert(addr("203.0.113.9"));
        let use_case = BlockAddressUseCase::new(
            Arc::new(MockFilter { succeed: true }),
            Arc::new(MockStore::default()),
            block_list,
            Arc::new(MockEvents::default()),
            60,
        );
        let err = use_case
            .execute(addr("203.0.113.9"), None)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::AddressWhitelisted(_)));
    }

    #[tokio::test]
    async fn already_blocked_is_a_noop_success() {
        let block_list = Arc::new(MockBlockList::default());
        block_list.blocked.insert(addr("203.0.113.9"));
        let events = Arc::new(MockEvents::default());
        let use_case = BlockAddressUseCase::new(
            Arc::new(MockFilter { succeed: true }),
            Arc::new(MockStore::default()),
            block_list,
            events.clone(),
            60,
        );
        use_case.execute(addr("203.0.113.9"), None).await.unwrap();
        assert!(events.published.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn filter_failure_leaves_no_record() {
        let store = Arc::new(MockStore::default());
        let use_case = BlockAddressUseCase::new(
            Arc::new(MockFilter { succeed: false }),
            store.clone(),
            Arc::new(MockBlockList::default()),
            Arc::new(MockEvents::default()),
            60,
        );
        let err = use_case
            .execute(addr("203.0.113.9"), None)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::ExternalToolFailure(_)));
        assert!(store.blocks.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn successful_block_publishes_event_with_default_duration() {
        let events = Arc::new(MockEvents::default());
        let use_case = BlockAddressUseCase::new(
            Arc::new(MockFilter { succeed: true }),
            Arc::new(MockStore::default()),
            Arc::new(MockBlockList::default()),
            events.clone(),
            60,
        );
        use_case.execute(addr("203.0.113.9"), None).await.unwrap();
        let published = events.published.lock().unwrap();
        assert_eq!(published.len(), 1);
        match &published[0] {
            Event::Block {
                duration_seconds, ..
            } => assert_eq!(*duration_seconds, 60),
            other => panic!("unexpected event: {other:?}"),
        }
    }
}

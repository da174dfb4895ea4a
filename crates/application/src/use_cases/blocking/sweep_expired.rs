use std::sync::Arc;

use chrono::Utc;
use sentinel_fw_domain::{DomainError, Event};
use tracing::{info, warn};

use crate::ports::{BlockListPort, EventPublisherPort, PacketFilterPort, StorePort};

/// Expiry sweep: deletes every expired `BlockRecord` from the store and
/// unwinds the matching in-memory/packet-filter state. Driven by the
/// scheduler roughly every 30 ticks.
pub struct SweepExpiredUseCase {
    packet_filter: Arc<dyn PacketFilterPort>,
    store: Arc<dyn StorePort>,
    block_list: Arc<dyn BlockListPort>,
    events: Arc<dyn EventPublisherPort>,
}

impl SweepExpiredUseCase {
    pub fn new(
        packet_filter: Arc<dyn PacketFilterPort>,
        store: Arc<dyn StorePort>,
        block_list: Arc<dyn BlockListPort>,
        events: Arc<dyn EventPublisherPort>,
    ) -> Self {
        Self {
            packet_filter,
            store,
            block_list,
            events,
        }
    }

    pub async fn execute(&self) -> Result<usize, DomainError> {
        let expired = self.store.remove_all_expired(Utc::now()).await?;
        for record in &expired {
            match self.packet_filter.unblock(record.address).await {
                Ok(outcome) if !outcome.success => {
                    warn!(
                        address = %record.address,
                        diagnostic = %outcome.diagnostic,
                        "expiry sweep unblock failed"
                    );
                }
                Err(e) => {
                    warn!(address = %record.address, error = %e, "expiry sweep unblock errored");
                }
                _ => {}
            }
            self.block_list.remove_blocked(record.address);
            self.events.publish(Event::BlockExpired {
                address: record.address,
                time: Utc::now(),
            });
        }
        if !expired.is_empty() {
            info!(count = expired.len(), "expiry sweep unblocked addresses");
        }
        Ok(expired.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::*;
    use sentinel_fw_domain::BlockRecord;

    #[tokio::test]
    async fn sweep_unblocks_expired_and_publishes_one_event_each() {
        let store = Arc::new(MockStore::default());
        store.blocks.lock().unwrap().push(BlockRecord::new(
            addr("10.0.0.1"),
            Utc::now() - chrono::Duration::seconds(2),
            1,
        ));
        let block_list = Arc::new(MockBlockList::default());
        block_list.insert_blocked(addr("10.0.0.1"));
        let events = Arc::new(MockEvents::default());
        let use_case = SweepExpiredUseCase::new(
            Arc::new(MockFilter { succeed: true }),
            store.clone(),
            block_list.clone(),
            events.clone(),
        );
        let swept = use_case.execute().await.unwrap();
        assert_eq!(swept, 1);
        assert!(!block_list.is_blocked(addr("10.0.0.1")));
        assert_eq!(events.published.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn sweep_with_nothing_expired_is_a_noop() {
        let use_case = SweepExpiredUseCase::new(
            Arc::new(MockFilter { succeed: true }),
            Arc::new(MockStore::default()),
            Arc::new(MockBlockList::default()),
            Arc::new(MockEvents::default()),
        );
        assert_eq!(use_case.execute().await.unwrap(), 0);
    }
}

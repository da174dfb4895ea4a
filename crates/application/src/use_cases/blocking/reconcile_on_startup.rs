use std::sync::Arc;
use std::time::Duration as StdDuration;

use chrono::Utc;
use sentinel_fw_domain::DomainError;
use tracing::{info, warn};

use crate::ports::{BlockListPort, PacketFilterPort, SchedulerPort, StorePort};

/// Startup reconciliation: aligns the store, the in-memory blocked set, and
/// pending expiry callbacks before the syslog tail starts. Must complete
/// before any connection is classified, or a race could produce a spurious
/// duplicate block.
pub struct ReconcileOnStartupUseCase {
    packet_filter: Arc<dyn PacketFilterPort>,
    store: Arc<dyn StorePort>,
    block_list: Arc<dyn BlockListPort>,
    scheduler: Arc<dyn SchedulerPort>,
}

impl ReconcileOnStartupUseCase {
    pub fn new(
        packet_filter: Arc<dyn PacketFilterPort>,
        store: Arc<dyn StorePort>,
        block_list: Arc<dyn BlockListPort>,
        scheduler: Arc<dyn SchedulerPort>,
    ) -> Self {
        Self {
            packet_filter,
            store,
            block_list,
            scheduler,
        }
    }

    pub async fn execute(&self) -> Result<(), DomainError> {
        let records = self.store.list_blocks().await?;
        let now = Utc::now();
        info!(count = records.len(), "reconciling block records at startup");

        for record in records {
            if record.is_expired_at(now) {
                if let Ok(outcome) = self.packet_filter.unblock(record.address).await {
                    if !outcome.success {
                        warn!(
                            address = %record.address,
                            diagnostic = %outcome.diagnostic,
                            "reconciliation unblock failed for already-expired record"
                        );
                    }
                }
                self.store.delete_block(record.address).await?;
                continue;
            }

            self.block_list.insert_blocked(record.address);

            let delay = (record.scheduled_unblock() - now)
                .to_std()
                .unwrap_or(StdDuration::from_secs(0));
            let packet_filter = self.packet_filter.clone();
            let store = self.store.clone();
            let block_list = self.block_list.clone();
            let address = record.address;
            self.scheduler.schedule_once(
                delay,
                Arc::new(move || {
                    let packet_filter = packet_filter.clone();
                    let store = store.clone();
                    let block_list = block_list.clone();
                    Box::pin(async move {
                        if let Ok(outcome) = packet_filter.unblock(address).await {
                            if !outcome.success {
                                warn!(%address, diagnostic = %outcome.diagnostic, "scheduled unblock failed");
                            }
                        }
                        let _ = store.delete_block(address).await;
                        block_list.remove_blocked(address);
                    })
                }),
            );
        }

        Ok(())
    }
}

use std::net::IpAddr;
use std::sync::Arc;

use chrono::Utc;
use sentinel_fw_domain::{DomainError, Event};
use tracing::{info, instrument, warn};

use crate::ports::{BlockListPort, EventPublisherPort, PacketFilterPort, StorePort};

/// `unblock(addr)`. Unblocking an address that isn't currently blocked
/// logs and returns success — it is not a user error.
pub struct UnblockAddressUseCase {
    packet_filter: Arc<dyn PacketFilterPort>,
    store: Arc<dyn StorePort>,
    block_list: Arc<dyn BlockListPort>,
    events: Arc<dyn EventPublisherPort>,
}

impl UnblockAddressUseCase {
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

    #[instrument(skip(self))]
    pub async fn execute(&self, addr: IpAddr) -> Result<(), DomainError> {
        if !self.block_list.is_blocked(addr) {
            info!(%addr, "already unblocked");
            return Ok(());
        }

        let outcome = self.packet_filter.unblock(addr).await?;
        if !outcome.success {
            warn!(%addr, diagnostic = %outcome.diagnostic, "packet filter unblock failed");
            return Err(DomainError::ExternalToolFailure(outcome.diagnostic));
        }

        self.store.delete_block(addr).await?;
        self.block_list.remove_blocked(addr);

        self.events.publish(Event::Unblock {
            address: addr,
            time: Utc::now(),
        });

        info!(%addr, "address unblocked");
        Ok(())
    }
}

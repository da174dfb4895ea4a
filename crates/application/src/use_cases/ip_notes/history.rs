use std::net::IpAddr;
use std::sync::Arc;

use sentinel_fw_domain::{DomainError, HistoryEvent};
use tracing::instrument;

use crate::ports::StorePort;

pub struct ListHistoryUseCase {
    store: Arc<dyn StorePort>,
}

impl ListHistoryUseCase {
    pub fn new(store: Arc<dyn StorePort>) -> Self {
        Self { store }
    }

    #[instrument(skip(self))]
    pub async fn execute(&self, addr: IpAddr) -> Result<Vec<HistoryEvent>, DomainError> {
        let address_id = self.store.get_or_create_address_id(addr).await?;
        self.store.list_history(address_id).await
    }
}

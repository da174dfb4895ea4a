use std::net::IpAddr;
use std::sync::Arc;

use sentinel_fw_domain::DomainError;
use tracing::instrument;

use crate::ports::BlockListPort;

pub struct AddWhitelistUseCase {
    block_list: Arc<dyn BlockListPort>,
}

impl AddWhitelistUseCase {
    pub fn new(block_list: Arc<dyn BlockListPort>) -> Self {
        Self { block_list }
    }

    #[instrument(skip(self))]
    pub async fn execute(&self, addr: IpAddr) -> Result<(), DomainError> {
        self.block_list.add_whitelist(addr).await
    }
}

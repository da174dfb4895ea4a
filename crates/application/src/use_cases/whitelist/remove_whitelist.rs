use std::net::IpAddr;
use std::sync::Arc;

use sentinel_fw_domain::DomainError;
use tracing::instrument;

use crate::ports::BlockListPort;

pub struct RemoveWhitelistUseCase {
    block_list: Arc<dyn BlockListPort>,
}

impl RemoveWhitelistUseCase {
    pub fn new(block_list: Arc<dyn BlockListPort>) -> Self {
        Self { block_list }
    }

    #[instrument(skip(self))]
    pub async fn execute(&self, addr: IpAddr) -> Result<(), DomainError> {
        self.block_list.remove_whitelist(addr).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::*;

    #[tokio::test]
    async fn add_then_remove_round_trips() {
        let block_list = Arc::new(MockBlockList::default());
        let add = crate::use_cases::whitelist::AddWhitelistUseCase::new(block_list.clone());
        let remove = RemoveWhitelistUseCase::new(block_list.clone());
        add.execute(addr("8.8.8.8")).await.unwrap();
        assert!(block_list.is_whitelisted(addr("8.8.8.8")));
        remove.execute(addr("8.8.8.8")).await.unwrap();
        assert!(!block_list.is_whitelisted(addr("8.8.8.8")));
    }
}

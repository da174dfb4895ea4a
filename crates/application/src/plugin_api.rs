use std::net::IpAddr;
use std::sync::Arc;

use async_trait::async_trait;
use sentinel_fw_domain::DomainError;

use crate::ports::FirewallApiPort;
use crate::use_cases::blocking::{BlockAddressUseCase, UnblockAddressUseCase};
use crate::use_cases::whitelist::{AddWhitelistUseCase, RemoveWhitelistUseCase};

/// The composition root's [`FirewallApiPort`]: thin delegation to the same
/// use cases the command registry drives, so a plugin and a human operator
/// go through identical validation and event publication.
pub struct UseCaseFirewallApi {
    block: Arc<BlockAddressUseCase>,
    unblock: Arc<UnblockAddressUseCase>,
    add_whitelist: Arc<AddWhitelistUseCase>,
    remove_whitelist: Arc<RemoveWhitelistUseCase>,
}

impl UseCaseFirewallApi {
    pub fn new(
        block: Arc<BlockAddressUseCase>,
        unblock: Arc<UnblockAddressUseCase>,
        add_whitelist: Arc<AddWhitelistUseCase>,
        remove_whitelist: Arc<RemoveWhitelistUseCase>,
    ) -> Self {
        Self {
            block,
            unblock,
            add_whitelist,
            remove_whitelist,
        }
    }
}

#[async_trait]
impl FirewallApiPort for UseCaseFirewallApi {
    async fn block(&self, addr: IpAddr, duration_seconds: Option<i64>) -> Result<(), DomainError> {
        self.block.execute(addr, duration_seconds).await
    }

    async fn unblock(&self, addr: IpAddr) -> Result<(), DomainError> {
        self.unblock.execute(addr).await
    }

    async fn add_whitelist(&self, addr: IpAddr) -> Result<(), DomainError> {
        self.add_whitelist.execute(addr).await
    }

    async fn remove_whitelist(&self, addr: IpAddr) -> Result<(), DomainError> {
        self.remove_whitelist.execute(addr).await
    }
}

use async_trait::async_trait;
use sentinel_fw_domain::DomainError;
use std::net::IpAddr;

/// In-memory block/whitelist sets, seeded from file-backed lists.
#[async_trait]
pub trait BlockListPort: Send + Sync {
    fn is_blocked(&self, addr: IpAddr) -> bool;
    fn is_whitelisted(&self, addr: IpAddr) -> bool;

    /// Records `addr` as blocked in the in-memory set. Does not touch the
    /// store or the packet filter; the block lifecycle manager is
    /// responsible for those.
    fn insert_blocked(&self, addr: IpAddr);
    fn remove_blocked(&self, addr: IpAddr);

    /// Persists to the whitelist file (append) and publishes
    /// `WhitelistAdded`.
    async fn add_whitelist(&self, addr: IpAddr) -> Result<(), DomainError>;
    /// Rewrites the whitelist file omitting `addr` and publishes
    /// `WhitelistRemoved`.
    async fn remove_whitelist(&self, addr: IpAddr) -> Result<(), DomainError>;

    fn blocked_snapshot(&self) -> Vec<IpAddr>;
    fn whitelisted_snapshot(&self) -> Vec<IpAddr>;
}

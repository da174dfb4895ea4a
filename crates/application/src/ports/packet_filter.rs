use async_trait::async_trait;
use sentinel_fw_domain::{DomainError, FirewallCommandOutcome};
use std::net::IpAddr;

/// Invokes the external packet filter to insert/remove DROP rules.
///
/// Stateless and idempotence-agnostic; callers (the block lifecycle manager)
/// guard against duplicate installs. Implementations must serialize their
/// own invocations process-wide to avoid interleaved rule ordering.
#[async_trait]
pub trait PacketFilterPort: Send + Sync {
    async fn block(&self, addr: IpAddr) -> Result<FirewallCommandOutcome, DomainError>;
    async fn unblock(&self, addr: IpAddr) -> Result<FirewallCommandOutcome, DomainError>;
    async fn reload(&self) -> Result<FirewallCommandOutcome, DomainError>;
}

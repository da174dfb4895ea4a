use std::net::IpAddr;
use std::sync::Arc;

use async_trait::async_trait;
use sentinel_fw_domain::{Config, DomainError};

use super::{EventPublisherPort, SchedulerPort};

/// The subset of enforcement operations a plugin is allowed to trigger
/// directly, rather than through the full command registry.
#[async_trait]
pub trait FirewallApiPort: Send + Sync {
    async fn block(&self, addr: IpAddr, duration_seconds: Option<i64>) -> Result<(), DomainError>;
    async fn unblock(&self, addr: IpAddr) -> Result<(), DomainError>;
    async fn add_whitelist(&self, addr: IpAddr) -> Result<(), DomainError>;
    async fn remove_whitelist(&self, addr: IpAddr) -> Result<(), DomainError>;
}

/// Everything a loaded plugin receives at startup: a logging target to tag
/// its own spans with, the event bus, the resolved config, a scheduler
/// scoped to jobs the plugin itself creates, and the restricted enforcement
/// API above.
pub struct PluginCapabilities {
    pub logger_target: &'static str,
    pub events: Arc<dyn EventPublisherPort>,
    pub config: Arc<Config>,
    pub scheduler: Arc<dyn SchedulerPort>,
    pub api: Arc<dyn FirewallApiPort>,
}

/// Implemented by a plugin's entry point. No loader discovers or invokes
/// this trait yet; it exists so a future one has a stable seam to call
/// into rather than a reflective free-for-all.
#[async_trait]
pub trait PluginHandlerPort: Send + Sync {
    fn name(&self) -> &str;
    async fn on_load(&self, capabilities: PluginCapabilities) -> Result<(), DomainError>;
}

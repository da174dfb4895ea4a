use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio_util::sync::CancellationToken;

use crate::ports::{
    BlockListPort, ConnectionLogPort, EventPublisherPort, ExportPort, GeoResolverPort,
    PacketFilterPort, SchedulerPort, StorePort,
};
use crate::use_cases::blocking::{BlockAddressUseCase, UnblockAddressUseCase};
use crate::use_cases::ip_notes::{
    AddCommentUseCase, AddTagUseCase, ListCommentsUseCase, ListHistoryUseCase, ListTagsUseCase,
    RemoveTagUseCase,
};
use crate::use_cases::whitelist::{AddWhitelistUseCase, RemoveWhitelistUseCase};

/// Trait for reloading file-backed state (blocklist/whitelist/geo zones)
/// from disk, distinct from [`PacketFilterPort::reload`] which reapplies the
/// external packet filter's rule set.
#[async_trait::async_trait]
pub trait ReloadPort: Send + Sync {
    async fn reload(&self) -> Result<(), sentinel_fw_domain::DomainError>;
}

/// Everything a [`crate::commands::Command`] needs to run. Built once at
/// startup and shared read-only across every command-server connection.
pub struct CommandContext {
    pub packet_filter: Arc<dyn PacketFilterPort>,
    pub store: Arc<dyn StorePort>,
    pub block_list: Arc<dyn BlockListPort>,
    pub geo: Arc<dyn GeoResolverPort>,
    pub events: Arc<dyn EventPublisherPort>,
    pub scheduler: Arc<dyn SchedulerPort>,
    pub connection_log: Arc<dyn ConnectionLogPort>,
    pub export: Arc<dyn ExportPort>,
    pub reload: Arc<dyn ReloadPort>,

    pub block: Arc<BlockAddressUseCase>,
    pub unblock: Arc<UnblockAddressUseCase>,
    pub add_whitelist: Arc<AddWhitelistUseCase>,
    pub remove_whitelist: Arc<RemoveWhitelistUseCase>,
    pub add_tag: Arc<AddTagUseCase>,
    pub remove_tag: Arc<RemoveTagUseCase>,
    pub list_tags: Arc<ListTagsUseCase>,
    pub add_comment: Arc<AddCommentUseCase>,
    pub list_comments: Arc<ListCommentsUseCase>,
    pub list_history: Arc<ListHistoryUseCase>,

    pub registry: Arc<super::registry::CommandRegistry>,
    pub shutdown: CancellationToken,
    pub started_at: DateTime<Utc>,
}

impl CommandContext {
    pub fn uptime_seconds(&self) -> i64 {
        (Utc::now() - self.started_at).num_seconds().max(0)
    }
}

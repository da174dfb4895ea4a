use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sentinel_fw_domain::{AddressId, BlockRecord, Comment, DomainError, HistoryEvent, Tag};
use std::net::IpAddr;

#[derive(Debug, Clone, Default)]
pub struct StoreStats {
    pub total: i64,
    pub recent_fails: i64,
    pub last_seen: Option<DateTime<Utc>>,
}

/// The durable table of blocked addresses and per-address history,
/// tags, and comments. Safe for concurrent callers from the scheduler tick
/// and the command server alike.
#[async_trait]
pub trait StorePort: Send + Sync {
    /// Returns the memoized identifier for `ip`, minting and persisting one
    /// on first observation.
    async fn get_or_create_address_id(&self, ip: IpAddr) -> Result<AddressId, DomainError>;

    async fn upsert_block(&self, record: &BlockRecord) -> Result<(), DomainError>;
    async fn delete_block(&self, addr: IpAddr) -> Result<(), DomainError>;
    async fn list_blocks(&self) -> Result<Vec<BlockRecord>, DomainError>;
    /// Deletes every row whose `scheduled_unblock <= now` and returns them.
    async fn remove_all_expired(&self, now: DateTime<Utc>) -> Result<Vec<BlockRecord>, DomainError>;

    async fn insert_history(&self, event: HistoryEvent) -> Result<(), DomainError>;
    async fn list_history(&self, address_id: AddressId) -> Result<Vec<HistoryEvent>, DomainError>;

    async fn insert_tag(&self, tag: Tag) -> Result<(), DomainError>;
    async fn delete_tag(&self, address_id: AddressId, value: &str) -> Result<(), DomainError>;
    async fn list_tags(&self, address_id: AddressId) -> Result<Vec<Tag>, DomainError>;

    async fn insert_comment(&self, comment: Comment) -> Result<(), DomainError>;
    async fn list_comments(&self, address_id: AddressId) -> Result<Vec<Comment>, DomainError>;

    async fn stats(&self) -> Result<StoreStats, DomainError>;
}

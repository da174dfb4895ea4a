use std::collections::HashSet;
use std::net::IpAddr;
use std::sync::Mutex;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sentinel_fw_application::commands::builtin::install_builtins;
use sentinel_fw_application::commands::{CommandContext, CommandRegistry, ReloadPort};
use sentinel_fw_application::ports::{
    BlockListPort, ConnectionLogPort, EventPublisherPort, ExportPort, GeoResolverPort,
    PacketFilterPort, SchedulerPort, StorePort, StoreStats,
};
use sentinel_fw_application::use_cases::blocking::{
    BlockAddressUseCase, UnblockAddressUseCase,
};
use sentinel_fw_application::use_cases::ip_notes::{
    AddCommentUseCase, AddTagUseCase, ListCommentsUseCase, ListHistoryUseCase, ListTagsUseCase,
    RemoveTagUseCase,
};
use sentinel_fw_application::use_cases::whitelist::{AddWhitelistUseCase, RemoveWhitelistUseCase};
use sentinel_fw_domain::{
    AddressId, BlockRecord, Comment, DomainError, Event, FirewallCommandOutcome, HistoryEvent,
    JobId, Tag,
};
use sentinel_fw_infrastructure::command_server::{load_or_generate_server_config, CommandServer};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;
use tokio_util::sync::CancellationToken;

/// In-memory [`StorePort`] good enough for the command-protocol tests — no
/// SQLite pool, just the rows a `list`/`block`/`unblock` round trip touches.
#[derive(Default)]
pub struct InMemoryStore {
    blocks: Mutex<Vec<BlockRecord>>,
}

#[async_trait]
impl StorePort for InMemoryStore {
    async fn get_or_create_address_id(&self, _ip: IpAddr) -> Result<AddressId, DomainError> {
        Ok(AddressId::new())
    }
    async fn upsert_block(&self, record: &BlockRecord) -> Result<(), DomainError> {
        let mut blocks = self.blocks.lock().unwrap();
        blocks.retain(|r| r.address != record.address);
        blocks.push(record.clone());
        Ok(())
    }
    async fn delete_block(&self, addr: IpAddr) -> Result<(), DomainError> {
        self.blocks.lock().unwrap().retain(|r| r.address != addr);
        Ok(())
    }
    async fn list_blocks(&self) -> Result<Vec<BlockRecord>, DomainError> {
        Ok(self.blocks.lock().unwrap().clone())
    }
    async fn remove_all_expired(&self, now: DateTime<Utc>) -> Result<Vec<BlockRecord>, DomainError> {
        let mut blocks = self.blocks.lock().unwrap();
        let (expired, remaining): (Vec<_>, Vec<_>) =
            blocks.drain(..).partition(|r| r.is_expired_at(now));
        *blocks = remaining;
        Ok(expired)
    }
    async fn insert_history(&self, _event: HistoryEvent) -> Result<(), DomainError> {
        Ok(())
    }
    async fn list_history(&self, _address_id: AddressId) -> Result<Vec<HistoryEvent>, DomainError> {
        Ok(Vec::new())
    }
    async fn insert_tag(&self, _tag: Tag) -> Result<(), DomainError> {
        Ok(())
    }
    async fn delete_tag(&self, _address_id: AddressId, _value: &str) -> Result<(), DomainError> {
        Ok(())
    }
    async fn list_tags(&self, _address_id: AddressId) -> Result<Vec<Tag>, DomainError> {
        Ok(Vec::new())
    }
    async fn insert_comment(&self, _comment: Comment) -> Result<(), DomainError> {
        Ok(())
    }
    async fn list_comments(&self, _address_id: AddressId) -> Result<Vec<Comment>, DomainError> {
        Ok(Vec::new())
    }
    async fn stats(&self) -> Result<StoreStats, DomainError> {
        Ok(StoreStats {
            total: self.blocks.lock().unwrap().len() as i64,
            recent_fails: 0,
            last_seen: None,
        })
    }
}

#[derive(Default)]
pub struct InMemoryBlockList {
    blocked: Mutex<HashSet<IpAddr>>,
    whitelisted: Mutex<HashSet<IpAddr>>,
}

#[async_trait]
impl BlockListPort for InMemoryBlockList {
    fn is_blocked(&self, addr: IpAddr) -> bool {
        self.blocked.lock().unwrap().contains(&addr)
    }
    fn is_whitelisted(&self, addr: IpAddr) -> bool {
        self.whitelisted.lock().unwrap().contains(&addr)
    }
    fn insert_blocked(&self, addr: IpAddr) {
        self.blocked.lock().unwrap().insert(addr);
    }
    fn remove_blocked(&self, addr: IpAddr) {
        self.blocked.lock().unwrap().remove(&addr);
    }
    async fn add_whitelist(&self, addr: IpAddr) -> Result<(), DomainError> {
        self.whitelisted.lock().unwrap().insert(addr);
        Ok(())
    }
    async fn remove_whitelist(&self, addr: IpAddr) -> Result<(), DomainError> {
        self.whitelisted.lock().unwrap().remove(&addr);
        Ok(())
    }
    fn blocked_snapshot(&self) -> Vec<IpAddr> {
        self.blocked.lock().unwrap().iter().copied().collect()
    }
    fn whitelisted_snapshot(&self) -> Vec<IpAddr> {
        self.whitelisted.lock().unwrap().iter().copied().collect()
    }
}

pub struct NoopPacketFilter;

#[async_trait]
impl PacketFilterPort for NoopPacketFilter {
    async fn block(&self, addr: IpAddr) -> Result<FirewallCommandOutcome, DomainError> {
        Ok(FirewallCommandOutcome::ok(format!("blocked {addr}")))
    }
    async fn unblock(&self, addr: IpAddr) -> Result<FirewallCommandOutcome, DomainError> {
        Ok(FirewallCommandOutcome::ok(format!("unblocked {addr}")))
    }
    async fn reload(&self) -> Result<FirewallCommandOutcome, DomainError> {
        Ok(FirewallCommandOutcome::ok("reloaded"))
    }
}

pub struct NoopGeoResolver;

impl GeoResolverPort for NoopGeoResolver {
    fn country_of(&self, _addr: IpAddr) -> String {
        sentinel_fw_domain::UNKNOWN_COUNTRY.to_string()
    }
    fn is_blocked_country(&self, _addr: IpAddr) -> bool {
        false
    }
}

pub struct NoopEventPublisher;

impl EventPublisherPort for NoopEventPublisher {
    fn publish(&self, _event: Event) {}
}

pub struct NoopConnectionLog;

#[async_trait]
impl ConnectionLogPort for NoopConnectionLog {
    async fn append(&self, _line: &str) {}
    async fn reverse_dns(&self, _addr: IpAddr) -> String {
        "n/a".to_string()
    }
    async fn rotate_if_needed(&self) {}
    async fn force_rotate(&self) {}
    async fn tail(&self, _n: usize) -> Vec<String> {
        Vec::new()
    }
}

pub struct NoopExport;

#[async_trait]
impl ExportPort for NoopExport {
    async fn export_logs(&self, name: &str) -> Result<String, DomainError> {
        Ok(name.to_string())
    }
}

pub struct NoopReload;

#[async_trait]
impl ReloadPort for NoopReload {
    async fn reload(&self) -> Result<(), DomainError> {
        Ok(())
    }
}

pub struct NoopScheduler;

impl SchedulerPort for NoopScheduler {
    fn schedule_once(&self, _delay: std::time::Duration, _cb: sentinel_fw_application::ports::JobCallback) -> JobId {
        JobId::new()
    }
    fn schedule_once_at(&self, _at: DateTime<Utc>, _cb: sentinel_fw_application::ports::JobCallback) -> JobId {
        JobId::new()
    }
    fn schedule_recurring(
        &self,
        _due: DateTime<Utc>,
        _period: std::time::Duration,
        _cb: sentinel_fw_application::ports::JobCallback,
    ) -> JobId {
        JobId::new()
    }
    fn pause(&self, _id: JobId) -> Result<(), DomainError> {
        Ok(())
    }
    fn resume(&self, _id: JobId) -> Result<(), DomainError> {
        Ok(())
    }
    fn cancel(&self, _id: JobId) {}
    fn cancel_all(&self) {}
    fn list_ids(&self) -> Vec<JobId> {
        Vec::new()
    }
}

/// Boots a real [`CommandServer`] on loopback, backed entirely by in-memory
/// adapters, for black-box protocol tests against the actual wire format.
pub struct CommandHarness {
    pub port: u16,
    shutdown: CancellationToken,
    store: Arc<InMemoryStore>,
    block_list: Arc<InMemoryBlockList>,
}

impl CommandHarness {
    pub async fn start(port: u16) -> Self {
        let store: Arc<InMemoryStore> = Arc::new(InMemoryStore::default());
        let block_list: Arc<InMemoryBlockList> = Arc::new(InMemoryBlockList::default());
        let packet_filter: Arc<dyn PacketFilterPort> = Arc::new(NoopPacketFilter);
        let geo: Arc<dyn GeoResolverPort> = Arc::new(NoopGeoResolver);
        let events: Arc<dyn EventPublisherPort> = Arc::new(NoopEventPublisher);
        let scheduler: Arc<dyn SchedulerPort> = Arc::new(NoopScheduler);
        let connection_log: Arc<dyn ConnectionLogPort> = Arc::new(NoopConnectionLog);
        let export: Arc<dyn ExportPort> = Arc::new(NoopExport);
        let reload: Arc<dyn ReloadPort> = Arc::new(NoopReload);

        let block = Arc::new(BlockAddressUseCase::new(
            packet_filter.clone(),
            store.clone() as Arc<dyn StorePort>,
            block_list.clone() as Arc<dyn BlockListPort>,
            events.clone(),
            60,
        ));
        let unblock = Arc::new(UnblockAddressUseCase::new(
            packet_filter.clone(),
            store.clone() as Arc<dyn StorePort>,
            block_list.clone() as Arc<dyn BlockListPort>,
            events.clone(),
        ));
        let add_whitelist = Arc::new(AddWhitelistUseCase::new(block_list.clone() as Arc<dyn BlockListPort>));
        let remove_whitelist = Arc::new(RemoveWhitelistUseCase::new(block_list.clone() as Arc<dyn BlockListPort>));
        let add_tag = Arc::new(AddTagUseCase::new(store.clone() as Arc<dyn StorePort>));
        let remove_tag = Arc::new(RemoveTagUseCase::new(store.clone() as Arc<dyn StorePort>));
        let list_tags = Arc::new(ListTagsUseCase::new(store.clone() as Arc<dyn StorePort>));
        let add_comment = Arc::new(AddCommentUseCase::new(store.clone() as Arc<dyn StorePort>));
        let list_comments = Arc::new(ListCommentsUseCase::new(store.clone() as Arc<dyn StorePort>));
        let list_history = Arc::new(ListHistoryUseCase::new(store.clone() as Arc<dyn StorePort>));

        let registry = Arc::new(CommandRegistry::new());
        install_builtins(&registry);

        let shutdown = CancellationToken::new();
        let ctx = Arc::new(CommandContext {
            packet_filter,
            store: store.clone() as Arc<dyn StorePort>,
            block_list: block_list.clone() as Arc<dyn BlockListPort>,
            geo,
            events,
            scheduler,
            connection_log,
            export,
            reload,
            block,
            unblock,
            add_whitelist,
            remove_whitelist,
            add_tag,
            remove_tag,
            list_tags,
            add_comment,
            list_comments,
            list_history,
            registry: registry.clone(),
            shutdown: shutdown.clone(),
            started_at: Utc::now(),
        });

        let tmp_cert = std::env::temp_dir().join(format!("sentinel-fw-test-cert-{port}.pem"));
        let _ = std::fs::remove_file(&tmp_cert);
        let tls_config = load_or_generate_server_config(tmp_cert.to_str().unwrap(), 30)
            .await
            .expect("self-signed cert generation must succeed in tests");

        let server = Arc::new(CommandServer::new(
            "127.0.0.1".to_string(),
            port,
            true, // plaintext allowed — this harness only exercises the wire protocol
            tls_config,
            None,
            registry,
            ctx,
        ));

        let run_shutdown = shutdown.clone();
        tokio::spawn(async move {
            let _ = server.run(run_shutdown).await;
        });

        // Give the accept loop a moment to bind before the first connection.
        tokio::time::sleep(std::time::Duration::from_millis(50)).await;

        Self {
            port,
            shutdown,
            store,
            block_list,
        }
    }

    pub fn is_blocked(&self, addr: IpAddr) -> bool {
        self.block_list.is_blocked(addr)
    }

    pub fn block_count(&self) -> usize {
        self.store.blocks.lock().unwrap().len()
    }

    pub fn stop(&self) {
        self.shutdown.cancel();
    }
}

impl Drop for CommandHarness {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

/// A raw line-protocol client speaking the same one-line-in,
/// one-response-out contract the real command server exposes.
pub struct CommandClient {
    reader: BufReader<tokio::net::tcp::OwnedReadHalf>,
    writer: tokio::net::tcp::OwnedWriteHalf,
}

impl CommandClient {
    pub async fn connect(port: u16) -> std::io::Result<Self> {
        let stream = TcpStream::connect(("127.0.0.1", port)).await?;
        let (read_half, writer) = stream.into_split();
        Ok(Self {
            reader: BufReader::new(read_half),
            writer,
        })
    }

    pub async fn send_line(&mut self, line: &str) -> std::io::Result<String> {
        self.writer.write_all(line.as_bytes()).await?;
        self.writer.write_all(b"\n").await?;
        let mut response = String::new();
        self.reader.read_line(&mut response).await?;
        Ok(response.trim_end_matches(['\r', '\n']).to_string())
    }
}

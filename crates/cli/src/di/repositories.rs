use std::sync::Arc;

use sentinel_fw_application::ports::{ConnectionLogPort, EventPublisherPort};
use sentinel_fw_domain::{Config, EventKind};
use sentinel_fw_infrastructure::block_list::BlockListManager;
use sentinel_fw_infrastructure::command_server::load_or_generate_server_config;
use sentinel_fw_infrastructure::connection_log::FileConnectionLog;
use sentinel_fw_infrastructure::event_bus::EventBus;
use sentinel_fw_infrastructure::export::{AesKeyMaterial, FileExport};
use sentinel_fw_infrastructure::geo_resolver::GeoResolver;
use sentinel_fw_infrastructure::history_recorder::HistoryRecorder;
use sentinel_fw_infrastructure::iptables::IptablesDriver;
use sentinel_fw_infrastructure::reload::FileBackedReload;
use sentinel_fw_infrastructure::scheduler::Scheduler;
use sentinel_fw_infrastructure::store::SqliteStore;
use sqlx::SqlitePool;
use tokio_util::sync::CancellationToken;

/// Every long-lived adapter the daemon wires at startup, built once and
/// shared behind `Arc` with the use-case and command layers above it: one
/// struct, one constructor, no service locator.
pub struct Repositories {
    pub event_bus: Arc<EventBus>,
    pub store: Arc<SqliteStore>,
    pub block_list: Arc<BlockListManager>,
    pub geo: Arc<GeoResolver>,
    pub packet_filter: Arc<IptablesDriver>,
    pub scheduler: Arc<Scheduler>,
    pub connection_log: Arc<FileConnectionLog>,
    pub export: Arc<FileExport>,
    pub reload: Arc<FileBackedReload>,
    pub tls_config: Arc<rustls::ServerConfig>,
}

impl Repositories {
    pub async fn build(
        config: &Config,
        write_pool: SqlitePool,
        read_pool: SqlitePool,
        scheduler_root: CancellationToken,
        aes: AesKeyMaterial,
    ) -> anyhow::Result<Self> {
        let event_bus = Arc::new(EventBus::new());
        let store = Arc::new(SqliteStore::new(write_pool, read_pool));

        let history_store = store.clone() as Arc<dyn sentinel_fw_application::ports::StorePort>;
        let history_recorder = Arc::new(HistoryRecorder::new(history_store));
        for kind in [
            EventKind::Block,
            EventKind::Unblock,
            EventKind::BlockExpired,
            EventKind::GeoBlock,
            EventKind::RateLimitExceeded,
        ] {
            event_bus.subscribe(kind, history_recorder.clone());
        }

        let block_list = Arc::new(
            BlockListManager::load(
                &config.paths.block_list_path,
                &config.paths.whitelist_path,
                event_bus.clone() as Arc<dyn EventPublisherPort>,
            )
            .await?,
        );

        let geo =
            Arc::new(GeoResolver::load(&config.geo.zones_dir, &config.geo.blocked_countries_path).await?);

        let packet_filter = Arc::new(IptablesDriver::new(
            config.paths.rules_path.clone(),
            config.paths.custom_rules_path.clone(),
            config.firewall.ssh_port,
        ));

        let scheduler = Arc::new(Scheduler::new(scheduler_root));

        let connection_log = Arc::new(FileConnectionLog::new(
            config.paths.connection_log_path.clone(),
            config.paths.archive_dir.clone(),
            config.paths.max_log_archives,
        ));

        let export = Arc::new(FileExport::new(
            config.paths.secure_export_dir.clone(),
            connection_log.clone() as Arc<dyn ConnectionLogPort>,
            aes,
        ));

        let reload = Arc::new(FileBackedReload::new(block_list.clone(), geo.clone()));

        let tls_config =
            load_or_generate_server_config(&config.paths.certificate_path, config.tls.cert_validity_days)
                .await?;

        Ok(Self {
            event_bus,
            store,
            block_list,
            geo,
            packet_filter,
            scheduler,
            connection_log,
            export,
            reload,
            tls_config,
        })
    }
}

mod repositories;
mod use_cases;

pub use repositories::Repositories;
pub use use_cases::UseCases;

use std::sync::Arc;

use chrono::Utc;
use sentinel_fw_application::commands::builtin::install_builtins;
use sentinel_fw_application::commands::{CommandContext, CommandRegistry, ReloadPort};
use sentinel_fw_application::engine::EngineConfig;
use sentinel_fw_application::ports::{
    BlockListPort, ConnectionLogPort, EventPublisherPort, ExportPort, GeoResolverPort,
    PacketFilterPort, PluginCapabilities, SchedulerPort, StorePort,
};
use sentinel_fw_application::EnforcementEngine;
use sentinel_fw_domain::Config;
use sentinel_fw_infrastructure::export::AesKeyMaterial;
use sentinel_fw_infrastructure::scheduler::PluginScopedScheduler;
use sqlx::SqlitePool;
use tokio_util::sync::CancellationToken;

/// The explicit dependency-injection root: every adapter, use case, and the
/// enforcement engine itself, built once at startup and handed to every
/// long-running task as an `Arc`. No global service locator — mirrors the
/// teacher's `AppState`/`di::{Repositories, UseCases}` composition root,
/// widened to also own the command registry and the decision engine.
pub struct FirewallContext {
    pub repos: Repositories,
    pub use_cases: UseCases,
    pub engine: Arc<EnforcementEngine>,
    pub command_ctx: Arc<CommandContext>,
    pub registry: Arc<CommandRegistry>,
}

impl FirewallContext {
    pub async fn build(
        config: &Config,
        write_pool: SqlitePool,
        read_pool: SqlitePool,
        scheduler_root: CancellationToken,
        shutdown: CancellationToken,
        aes: AesKeyMaterial,
    ) -> anyhow::Result<Self> {
        let repos = Repositories::build(config, write_pool, read_pool, scheduler_root, aes).await?;
        let use_cases = UseCases::build(&repos, config);

        let engine = Arc::new(EnforcementEngine::new(
            repos.block_list.clone(),
            repos.geo.clone(),
            repos.event_bus.clone(),
            repos.store.clone(),
            repos.connection_log.clone(),
            use_cases.block.clone(),
            EngineConfig {
                threshold_attempts: config.enforcement.threshold_attempts,
                threshold_seconds: config.enforcement.threshold_seconds,
                default_duration_seconds: config.enforcement.default_duration_seconds,
                plaintext_logs_enabled: config.enforcement.plaintext_logs_enabled,
            },
        ));

        let registry = Arc::new(CommandRegistry::new());
        install_builtins(&registry);

        let command_ctx = Arc::new(CommandContext {
            packet_filter: repos.packet_filter.clone() as Arc<dyn PacketFilterPort>,
            store: repos.store.clone() as Arc<dyn StorePort>,
            block_list: repos.block_list.clone() as Arc<dyn BlockListPort>,
            geo: repos.geo.clone() as Arc<dyn GeoResolverPort>,
            events: repos.event_bus.clone() as Arc<dyn EventPublisherPort>,
            scheduler: repos.scheduler.clone() as Arc<dyn SchedulerPort>,
            connection_log: repos.connection_log.clone() as Arc<dyn ConnectionLogPort>,
            export: repos.export.clone() as Arc<dyn ExportPort>,
            reload: repos.reload.clone() as Arc<dyn ReloadPort>,

            block: use_cases.block.clone(),
            unblock: use_cases.unblock.clone(),
            add_whitelist: use_cases.add_whitelist.clone(),
            remove_whitelist: use_cases.remove_whitelist.clone(),
            add_tag: use_cases.add_tag.clone(),
            remove_tag: use_cases.remove_tag.clone(),
            list_tags: use_cases.list_tags.clone(),
            add_comment: use_cases.add_comment.clone(),
            list_comments: use_cases.list_comments.clone(),
            list_history: use_cases.list_history.clone(),

            registry: registry.clone(),
            shutdown,
            started_at: Utc::now(),
        });

        Ok(Self {
            repos,
            use_cases,
            engine,
            command_ctx,
            registry,
        })
    }

    /// Builds the capability bundle handed to a plugin named `name` at load
    /// time. No loader exists yet to call this — it documents the seam a
    /// future one would use.
    pub fn plugin_capabilities(&self, name: &'static str, config: Arc<Config>) -> PluginCapabilities {
        PluginCapabilities {
            logger_target: name,
            events: self.repos.event_bus.clone() as Arc<dyn EventPublisherPort>,
            config,
            scheduler: Arc::new(PluginScopedScheduler::new(
                self.repos.scheduler.clone() as Arc<dyn SchedulerPort>
            )),
            api: self.use_cases.plugin_api.clone(),
        }
    }
}

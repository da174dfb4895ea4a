use std::sync::Arc;

use sentinel_fw_application::use_cases::blocking::{
    BlockAddressUseCase, ReconcileOnStartupUseCase, SweepExpiredUseCase, UnblockAddressUseCase,
};
use sentinel_fw_application::use_cases::ip_notes::{
    AddCommentUseCase, AddTagUseCase, ListCommentsUseCase, ListHistoryUseCase, ListTagsUseCase,
    RemoveTagUseCase,
};
use sentinel_fw_application::use_cases::whitelist::{AddWhitelistUseCase, RemoveWhitelistUseCase};
use sentinel_fw_application::ports::FirewallApiPort;
use sentinel_fw_application::plugin_api::UseCaseFirewallApi;
use sentinel_fw_domain::Config;

use super::repositories::Repositories;

/// Every orchestration object the command surface and the enforcement
/// engine share, built once from a [`Repositories`] bundle.
pub struct UseCases {
    pub block: Arc<BlockAddressUseCase>,
    pub unblock: Arc<UnblockAddressUseCase>,
    pub reconcile_on_startup: Arc<ReconcileOnStartupUseCase>,
    pub sweep_expired: Arc<SweepExpiredUseCase>,
    pub add_whitelist: Arc<AddWhitelistUseCase>,
    pub remove_whitelist: Arc<RemoveWhitelistUseCase>,
    pub add_tag: Arc<AddTagUseCase>,
    pub remove_tag: Arc<RemoveTagUseCase>,
    pub list_tags: Arc<ListTagsUseCase>,
    pub add_comment: Arc<AddCommentUseCase>,
    pub list_comments: Arc<ListCommentsUseCase>,
    pub list_history: Arc<ListHistoryUseCase>,
    /// The restricted enforcement surface a plugin's [`PluginCapabilities`]
    /// carries, delegating to the same `block`/`unblock`/whitelist use
    /// cases the command registry drives.
    ///
    /// [`PluginCapabilities`]: sentinel_fw_application::ports::PluginCapabilities
    pub plugin_api: Arc<dyn FirewallApiPort>,
}

impl UseCases {
    pub fn build(repos: &Repositories, config: &Config) -> Self {
        let block = Arc::new(BlockAddressUseCase::new(
            repos.packet_filter.clone(),
            repos.store.clone(),
            repos.block_list.clone(),
            repos.event_bus.clone(),
            config.enforcement.default_duration_seconds,
        ));
        let unblock = Arc::new(UnblockAddressUseCase::new(
            repos.packet_filter.clone(),
            repos.store.clone(),
            repos.block_list.clone(),
            repos.event_bus.clone(),
        ));
        let reconcile_on_startup = Arc::new(ReconcileOnStartupUseCase::new(
            repos.packet_filter.clone(),
            repos.store.clone(),
            repos.block_list.clone(),
            repos.scheduler.clone(),
        ));
        let sweep_expired = Arc::new(SweepExpiredUseCase::new(
            repos.packet_filter.clone(),
            repos.store.clone(),
            repos.block_list.clone(),
            repos.event_bus.clone(),
        ));
        let add_whitelist = Arc::new(AddWhitelistUseCase::new(repos.block_list.clone()));
        let remove_whitelist = Arc::new(RemoveWhitelistUseCase::new(repos.block_list.clone()));
        let add_tag = Arc::new(AddTagUseCase::new(repos.store.clone()));
        let remove_tag = Arc::new(RemoveTagUseCase::new(repos.store.clone()));
        let list_tags = Arc::new(ListTagsUseCase::new(repos.store.clone()));
        let add_comment = Arc::new(AddCommentUseCase::new(repos.store.clone()));
        let list_comments = Arc::new(ListCommentsUseCase::new(repos.store.clone()));
        let list_history = Arc::new(ListHistoryUseCase::new(repos.store.clone()));
        let plugin_api = Arc::new(UseCaseFirewallApi::new(
            block.clone(),
            unblock.clone(),
            add_whitelist.clone(),
            remove_whitelist.clone(),
        )) as Arc<dyn FirewallApiPort>;

        Self {
            block,
            unblock,
            reconcile_on_startup,
            sweep_expired,
            add_whitelist,
            remove_whitelist,
            add_tag,
            remove_tag,
            list_tags,
            add_comment,
            list_comments,
            list_history,
            plugin_api,
        }
    }
}

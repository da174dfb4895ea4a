use std::sync::Arc;

use async_trait::async_trait;
use sentinel_fw_domain::DomainError;

use sentinel_fw_application::commands::ReloadPort;

use crate::block_list::BlockListManager;
use crate::geo_resolver::GeoResolver;

/// Wires the `reload` command's file-backed-state half to the block list
/// and geo resolver adapters; the packet-filter half is
/// `PacketFilterPort::reload`, invoked separately by the command.
pub struct FileBackedReload {
    block_list: Arc<BlockListManager>,
    geo: Arc<GeoResolver>,
}

impl FileBackedReload {
    pub fn new(block_list: Arc<BlockListManager>, geo: Arc<GeoResolver>) -> Self {
        Self { block_list, geo }
    }
}

#[async_trait]
impl ReloadPort for FileBackedReload {
    async fn reload(&self) -> Result<(), DomainError> {
        self.block_list.reload_from_disk().await?;
        self.geo.reload_from_disk().await?;
        Ok(())
    }
}

mod block_ops;
mod ip_meta;
mod logs;
mod misc;
mod reload_cmd;
mod whitelist_cmd;

use std::sync::Arc;

use crate::commands::CommandRegistry;

/// Registers every built-in command. Called once at startup; the registry
/// is then shared, read-only, by every command-server connection.
pub fn install_builtins(registry: &CommandRegistry) {
    registry.register(Arc::new(misc::HelpCommand));
    registry.register(Arc::new(misc::InfoCommand));
    registry.register(Arc::new(misc::ExitCommand));
    registry.register(Arc::new(misc::MonitorCommand));

    registry.register(Arc::new(block_ops::ListCommand));
    registry.register(Arc::new(block_ops::StatusCommand));
    registry.register(Arc::new(block_ops::BlockCommand));
    registry.register(Arc::new(block_ops::UnblockCommand));
    registry.register(Arc::new(block_ops::UnblockAllCommand));

    registry.register(Arc::new(whitelist_cmd::WhitelistCommand));

    registry.register(Arc::new(logs::RotateCommand));
    registry.register(Arc::new(logs::ExportLogsCommand));
    registry.register(Arc::new(logs::ShowLogsCommand));
    registry.register(Arc::new(logs::ClearCommand));

    registry.register(Arc::new(reload_cmd::ReloadCommand));

    registry.register(Arc::new(ip_meta::IpHistoryCommand));
    registry.register(Arc::new(ip_meta::IpTagCommand));
    registry.register(Arc::new(ip_meta::IpCommentCommand));
}

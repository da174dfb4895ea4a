use async_trait::async_trait;

use crate::commands::{Command, CommandContext};

pub struct ReloadCommand;

#[async_trait]
impl Command for ReloadCommand {
    fn name(&self) -> &str {
        "reload"
    }
    fn description(&self) -> &str {
        "reloads blocklist/whitelist/geo files from disk and reapplies the packet filter"
    }
    fn usage(&self) -> &str {
        "reload"
    }
    async fn execute(&self, _args: &[String], ctx: &CommandContext) -> String {
        if let Err(e) = ctx.reload.reload().await {
            return format!("error reloading file-backed state: {e}");
        }
        match ctx.packet_filter.reload().await {
            Ok(outcome) if outcome.success => "reloaded".to_string(),
            Ok(outcome) => format!("packet filter reload reported failure: {}", outcome.diagnostic),
            Err(e) => format!("error: {e}"),
        }
    }
}

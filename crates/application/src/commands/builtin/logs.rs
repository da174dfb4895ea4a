use async_trait::async_trait;
use chrono::Utc;

use crate::commands::{Command, CommandContext};

pub struct RotateCommand;

#[async_trait]
impl Command for RotateCommand {
    fn name(&self) -> &str {
        "rotate"
    }
    fn description(&self) -> &str {
        "forces rotation of the connection log into a compressed archive"
    }
    fn usage(&self) -> &str {
        "rotate"
    }
    async fn execute(&self, _args: &[String], ctx: &CommandContext) -> String {
        ctx.connection_log.force_rotate().await;
        "log rotated".to_string()
    }
}

pub struct ExportLogsCommand;

#[async_trait]
impl Command for ExportLogsCommand {
    fn name(&self) -> &str {
        "exportlogs"
    }
    fn description(&self) -> &str {
        "encrypts recent logs and writes them to the secure export directory"
    }
    fn usage(&self) -> &str {
        "exportlogs [name]"
    }
    async fn execute(&self, args: &[String], ctx: &CommandContext) -> String {
        let name = args
            .first()
            .cloned()
            .unwrap_or_else(|| format!("export-{}.enc", Utc::now().format("%Y%m%dT%H%M%S")));
        match ctx.export.export_logs(&name).await {
            Ok(path) => format!("exported to {path}"),
            Err(e) => format!("error: {e}"),
        }
    }
}

pub struct ShowLogsCommand;

#[async_trait]
impl Command for ShowLogsCommand {
    fn name(&self) -> &str {
        "show-logs"
    }
    fn description(&self) -> &str {
        "shows the most recent connection log lines"
    }
    fn usage(&self) -> &str {
        "show-logs [count]"
    }
    async fn execute(&self, args: &[String], ctx: &CommandContext) -> String {
        let n = args.first().and_then(|s| s.parse::<usize>().ok()).unwrap_or(20);
        let lines = ctx.connection_log.tail(n).await;
        if lines.is_empty() {
            "no log lines available".to_string()
        } else {
            lines.join("\n")
        }
    }
}

pub struct ClearCommand;

#[async_trait]
impl Command for ClearCommand {
    fn name(&self) -> &str {
        "clear"
    }
    fn description(&self) -> &str {
        "clears the connected terminal"
    }
    fn usage(&self) -> &str {
        "clear"
    }
    async fn execute(&self, _args: &[String], _ctx: &CommandContext) -> String {
        "\x1b[2J\x1b[H".to_string()
    }
}

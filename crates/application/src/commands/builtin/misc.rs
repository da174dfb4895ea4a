use async_trait::async_trait;

use crate::commands::{Command, CommandContext};

pub struct HelpCommand;

#[async_trait]
impl Command for HelpCommand {
    fn name(&self) -> &str {
        "help"
    }
    fn description(&self) -> &str {
        "lists every available command"
    }
    fn usage(&self) -> &str {
        "help"
    }
    async fn execute(&self, _args: &[String], ctx: &CommandContext) -> String {
        let mut out = String::from("available commands:\n");
        for command in ctx.registry.registered() {
            out.push_str(&format!("  {:<14} {}\n", command.usage(), command.description()));
        }
        out
    }
}

pub struct InfoCommand;

#[async_trait]
impl Command for InfoCommand {
    fn name(&self) -> &str {
        "info"
    }
    fn description(&self) -> &str {
        "reports daemon identity, pid, and uptime"
    }
    fn usage(&self) -> &str {
        "info"
    }
    async fn execute(&self, _args: &[String], ctx: &CommandContext) -> String {
        format!(
            "sentinel-fw pid={} uptime={}s",
            std::process::id(),
            ctx.uptime_seconds()
        )
    }
}

pub struct ExitCommand;

#[async_trait]
impl Command for ExitCommand {
    fn name(&self) -> &str {
        "exit"
    }
    fn description(&self) -> &str {
        "requests a graceful shutdown of the daemon"
    }
    fn usage(&self) -> &str {
        "exit"
    }
    async fn execute(&self, _args: &[String], ctx: &CommandContext) -> String {
        ctx.shutdown.cancel();
        "shutting down".to_string()
    }
}

pub struct MonitorCommand;

#[async_trait]
impl Command for MonitorCommand {
    fn name(&self) -> &str {
        "monitor"
    }
    fn description(&self) -> &str {
        "one-shot snapshot of current counters (no live dashboard)"
    }
    fn usage(&self) -> &str {
        "monitor"
    }
    async fn execute(&self, _args: &[String], ctx: &CommandContext) -> String {
        let blocked = ctx.block_list.blocked_snapshot().len();
        let whitelisted = ctx.block_list.whitelisted_snapshot().len();
        match ctx.store.stats().await {
            Ok(stats) => format!(
                "blocked={blocked} whitelisted={whitelisted} total_ever_blocked={} recent_fails={}",
                stats.total, stats.recent_fails
            ),
            Err(e) => format!("blocked={blocked} whitelisted={whitelisted} (store stats unavailable: {e})"),
        }
    }
}

use async_trait::async_trait;

use crate::commands::{Command, CommandContext};

fn parse_addr(args: &[String]) -> Result<std::net::IpAddr, String> {
    args.first()
        .ok_or_else(|| "usage: block <address> [duration_seconds]".to_string())?
        .parse()
        .map_err(|_| "not a valid IP address".to_string())
}

pub struct ListCommand;

#[async_trait]
impl Command for ListCommand {
    fn name(&self) -> &str {
        "list"
    }
    fn description(&self) -> &str {
        "lists every currently blocked address"
    }
    fn usage(&self) -> &str {
        "list"
    }
    async fn execute(&self, _args: &[String], ctx: &CommandContext) -> String {
        match ctx.store.list_blocks().await {
            Ok(blocks) if blocks.is_empty() => "no addresses are currently blocked".to_string(),
            Ok(mut blocks) => {
                blocks.sort_by_key(|b| b.address);
                blocks
                    .into_iter()
                    .map(|b| {
                        format!(
                            "{} blocked_at={} scheduled_unblock={}",
                            b.address,
                            b.blocked_at.to_rfc3339(),
                            b.scheduled_unblock().to_rfc3339()
                        )
                    })
                    .collect::<Vec<_>>()
                    .join("\n")
            }
            Err(e) => format!("error: {e}"),
        }
    }
}

pub struct StatusCommand;

#[async_trait]
impl Command for StatusCommand {
    fn name(&self) -> &str {
        "status"
    }
    fn description(&self) -> &str {
        "summarizes daemon state: counts, uptime, recent activity"
    }
    fn usage(&self) -> &str {
        "status"
    }
    async fn execute(&self, _args: &[String], ctx: &CommandContext) -> String {
        let blocked = ctx.block_list.blocked_snapshot().len();
        let whitelisted = ctx.block_list.whitelisted_snapshot().len();
        let stats = ctx.store.stats().await;
        let last_seen = stats
            .as_ref()
            .ok()
            .and_then(|s| s.last_seen)
            .map(|t| t.to_rfc3339())
            .unwrap_or_else(|| "n/a".to_string());
        format!(
            "uptime={}s blocked={blocked} whitelisted={whitelisted} last_block={last_seen}",
            ctx.uptime_seconds()
        )
    }
}

pub struct BlockCommand;

#[async_trait]
impl Command for BlockCommand {
    fn name(&self) -> &str {
        "block"
    }
    fn description(&self) -> &str {
        "installs a DROP rule for an address, optionally with a duration"
    }
    fn usage(&self) -> &str {
        "block <address> [duration_seconds]"
    }
    async fn execute(&self, args: &[String], ctx: &CommandContext) -> String {
        let addr = match parse_addr(args) {
            Ok(addr) => addr,
            Err(msg) => return msg,
        };
        let duration = args.get(1).and_then(|s| s.parse::<i64>().ok());
        match ctx.block.execute(addr, duration).await {
            Ok(()) => format!("blocked {addr}"),
            Err(e) => format!("error: {e}"),
        }
    }
}

pub struct UnblockCommand;

#[async_trait]
impl Command for UnblockCommand {
    fn name(&self) -> &str {
        "unblock"
    }
    fn description(&self) -> &str {
        "removes the DROP rule for an address"
    }
    fn usage(&self) -> &str {
        "unblock <address>"
    }
    async fn execute(&self, args: &[String], ctx: &CommandContext) -> String {
        let addr = match parse_addr(args) {
            Ok(addr) => addr,
            Err(msg) => return msg,
        };
        match ctx.unblock.execute(addr).await {
            Ok(()) => format!("unblocked {addr}"),
            Err(e) => format!("error: {e}"),
        }
    }
}

pub struct UnblockAllCommand;

#[async_trait]
impl Command for UnblockAllCommand {
    fn name(&self) -> &str {
        "unblockall"
    }
    fn description(&self) -> &str {
        "removes every currently installed DROP rule"
    }
    fn usage(&self) -> &str {
        "unblockall"
    }
    async fn execute(&self, _args: &[String], ctx: &CommandContext) -> String {
        let addrs = ctx.block_list.blocked_snapshot();
        let mut unblocked = 0usize;
        let mut failed = 0usize;
        for addr in addrs {
            match ctx.unblock.execute(addr).await {
                Ok(()) => unblocked += 1,
                Err(_) => failed += 1,
            }
        }
        format!("unblocked={unblocked} failed={failed}")
    }
}

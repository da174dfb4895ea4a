use async_trait::async_trait;

use crate::commands::{Command, CommandContext};

pub struct WhitelistCommand;

#[async_trait]
impl Command for WhitelistCommand {
    fn name(&self) -> &str {
        "whitelist"
    }
    fn description(&self) -> &str {
        "adds or removes an address from the whitelist"
    }
    fn usage(&self) -> &str {
        "whitelist <add|remove> <address>"
    }
    async fn execute(&self, args: &[String], ctx: &CommandContext) -> String {
        let Some(verb) = args.first() else {
            return self.usage().to_string();
        };
        let Some(addr) = args.get(1).and_then(|s| s.parse::<std::net::IpAddr>().ok()) else {
            return "not a valid IP address".to_string();
        };
        match verb.as_str() {
            "add" => match ctx.add_whitelist.execute(addr).await {
                Ok(()) => format!("whitelisted {addr}"),
                Err(e) => format!("error: {e}"),
            },
            "remove" => match ctx.remove_whitelist.execute(addr).await {
                Ok(()) => format!("removed {addr} from whitelist"),
                Err(e) => format!("error: {e}"),
            },
            other => format!("unknown subcommand: {other} (expected add|remove)"),
        }
    }
}

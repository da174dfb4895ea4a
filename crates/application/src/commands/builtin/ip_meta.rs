use async_trait::async_trait;

use crate::commands::{Command, CommandContext};

fn parse_addr(args: &[String]) -> Result<std::net::IpAddr, String> {
    args.first()
        .ok_or_else(|| "address argument required".to_string())?
        .parse()
        .map_err(|_| "not a valid IP address".to_string())
}

pub struct IpHistoryCommand;

#[async_trait]
impl Command for IpHistoryCommand {
    fn name(&self) -> &str {
        "ip-history"
    }
    fn description(&self) -> &str {
        "shows the audit trail recorded for an address"
    }
    fn usage(&self) -> &str {
        "ip-history <address>"
    }
    async fn execute(&self, args: &[String], ctx: &CommandContext) -> String {
        let addr = match parse_addr(args) {
            Ok(addr) => addr,
            Err(msg) => return msg,
        };
        match ctx.list_history.execute(addr).await {
            Ok(events) if events.is_empty() => format!("no history recorded for {addr}"),
            Ok(events) => events
                .into_iter()
                .map(|e| format!("{} {}", e.time.to_rfc3339(), e.message))
                .collect::<Vec<_>>()
                .join("\n"),
            Err(e) => format!("error: {e}"),
        }
    }
}

pub struct IpTagCommand;

#[async_trait]
impl Command for IpTagCommand {
    fn name(&self) -> &str {
        "ip-tag"
    }
    fn description(&self) -> &str {
        "adds, removes, or lists tags attached to an address"
    }
    fn usage(&self) -> &str {
        "ip-tag <add|remove|list> <address> [value]"
    }
    async fn execute(&self, args: &[String], ctx: &CommandContext) -> String {
        let Some(verb) = args.first() else {
            return self.usage().to_string();
        };
        let rest = &args[1..];
        let addr = match parse_addr(rest) {
            Ok(addr) => addr,
            Err(msg) => return msg,
        };
        match verb.as_str() {
            "add" => {
                let Some(value) = rest.get(1) else {
                    return "usage: ip-tag add <address> <value>".to_string();
                };
                match ctx.add_tag.execute(addr, value).await {
                    Ok(()) => format!("tagged {addr} with {value}"),
                    Err(e) => format!("error: {e}"),
                }
            }
            "remove" => {
                let Some(value) = rest.get(1) else {
                    return "usage: ip-tag remove <address> <value>".to_string();
                };
                match ctx.remove_tag.execute(addr, value).await {
                    Ok(()) => format!("removed tag {value} from {addr}"),
                    Err(e) => format!("error: {e}"),
                }
            }
            "list" => match ctx.list_tags.execute(addr).await {
                Ok(tags) if tags.is_empty() => format!("no tags for {addr}"),
                Ok(tags) => tags
                    .into_iter()
                    .map(|t| t.value)
                    .collect::<Vec<_>>()
                    .join(", "),
                Err(e) => format!("error: {e}"),
            },
            other => format!("unknown subcommand: {other} (expected add|remove|list)"),
        }
    }
}

pub struct IpCommentCommand;

#[async_trait]
impl Command for IpCommentCommand {
    fn name(&self) -> &str {
        "ip-comment"
    }
    fn description(&self) -> &str {
        "adds or lists free-text comments attached to an address"
    }
    fn usage(&self) -> &str {
        "ip-comment <add|list> <address> [text...]"
    }
    async fn execute(&self, args: &[String], ctx: &CommandContext) -> String {
        let Some(verb) = args.first() else {
            return self.usage().to_string();
        };
        let rest = &args[1..];
        let addr = match parse_addr(rest) {
            Ok(addr) => addr,
            Err(msg) => return msg,
        };
        match verb.as_str() {
            "add" => {
                if rest.len() < 2 {
                    return "usage: ip-comment add <address> <text>".to_string();
                }
                let text = rest[1..].join(" ");
                match ctx.add_comment.execute(addr, &text).await {
                    Ok(()) => format!("comment added for {addr}"),
                    Err(e) => format!("error: {e}"),
                }
            }
            "list" => match ctx.list_comments.execute(addr).await {
                Ok(comments) if comments.is_empty() => format!("no comments for {addr}"),
                Ok(comments) => comments
                    .into_iter()
                    .map(|c| format!("{} {}", c.time.to_rfc3339(), c.text))
                    .collect::<Vec<_>>()
                    .join("\n"),
                Err(e) => format!("error: {e}"),
            },
            other => format!("unknown subcommand: {other} (expected add|list)"),
        }
    }
}

use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;

use super::context::CommandContext;

/// A single named operation exposed over the command server.
///
/// `execute` never returns a Rust error: a command that fails for
/// operational reasons (bad arguments, an address already unblocked, a
/// packet-filter failure) reports that failure as text in its response, the
/// same way a human typing at a REPL would read it. This mirrors the wire
/// protocol's one-line-in, one-response-out contract.
#[async_trait]
pub trait Command: Send + Sync {
    /// Canonical lowercase name clients send on the wire.
    fn name(&self) -> &str;
    fn description(&self) -> &str;
    fn usage(&self) -> &str;
    async fn execute(&self, args: &[String], ctx: &CommandContext) -> String;
}

/// Case-insensitive registry of every command the server understands.
///
/// Registration and lookup are independent of execution: a command can be
/// unregistered (and a later lookup will report "unknown command") without
/// disturbing connections already mid-execution, since each holds its own
/// `Arc<dyn Command>`.
#[derive(Default)]
pub struct CommandRegistry {
    commands: DashMap<String, Arc<dyn Command>>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self {
            commands: DashMap::new(),
        }
    }

    pub fn register(&self, command: Arc<dyn Command>) {
        self.commands
            .insert(command.name().to_ascii_lowercase(), command);
    }

    pub fn unregister(&self, name: &str) {
        self.commands.remove(&name.to_ascii_lowercase());
    }

    pub fn get_by_name(&self, name: &str) -> Option<Arc<dyn Command>> {
        self.commands
            .get(&name.to_ascii_lowercase())
            .map(|entry| entry.value().clone())
    }

    /// Every registered command, sorted by name (used by `help`).
    pub fn registered(&self) -> Vec<Arc<dyn Command>> {
        let mut all: Vec<_> = self.commands.iter().map(|e| e.value().clone()).collect();
        all.sort_by(|a, b| a.name().cmp(b.name()));
        all
    }
}

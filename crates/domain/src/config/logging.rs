use serde::{Deserialize, Serialize};

/// Logging configuration. Mirrors the level/format knobs `tracing-subscriber`
/// exposes; the logger itself is the structured error sink every subsystem
/// reports recoverable errors to.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// "trace" | "debug" | "info" | "warn" | "error". Default: "info".
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

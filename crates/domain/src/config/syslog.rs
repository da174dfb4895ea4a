use serde::{Deserialize, Serialize};

/// Syslog tailing source.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SyslogConfig {
    #[serde(default = "default_syslog_path")]
    pub syslog_path: String,

    /// How often to poll for new lines / rotation, in seconds.
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,
}

fn default_syslog_path() -> String {
    "/var/log/syslog".to_string()
}

fn default_poll_interval_secs() -> u64 {
    2
}

impl Default for SyslogConfig {
    fn default() -> Self {
        Self {
            syslog_path: default_syslog_path(),
            poll_interval_secs: default_poll_interval_secs(),
        }
    }
}

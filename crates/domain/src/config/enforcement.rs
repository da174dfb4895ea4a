use serde::{Deserialize, Serialize};

/// Rate/geo decision-engine tuning.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EnforcementConfig {
    /// Number of attempts within `threshold_seconds` that trips a block.
    #[serde(default = "default_threshold_attempts")]
    pub threshold_attempts: usize,

    /// Width of the sliding window, in seconds.
    #[serde(default = "default_threshold_seconds")]
    pub threshold_seconds: i64,

    /// Duration applied to blocks created by the rate/geo engine.
    #[serde(default = "default_duration_seconds")]
    pub default_duration_seconds: i64,

    /// Append a pipe-delimited record to `connection_attempts.log` for every
    /// classified connection.
    #[serde(default = "default_false")]
    pub plaintext_logs_enabled: bool,
}

fn default_threshold_attempts() -> usize {
    10
}

fn default_threshold_seconds() -> i64 {
    60
}

fn default_duration_seconds() -> i64 {
    3600
}

fn default_false() -> bool {
    false
}

impl Default for EnforcementConfig {
    fn default() -> Self {
        Self {
            threshold_attempts: default_threshold_attempts(),
            threshold_seconds: default_threshold_seconds(),
            default_duration_seconds: default_duration_seconds(),
            plaintext_logs_enabled: default_false(),
        }
    }
}

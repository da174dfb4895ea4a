use serde::{Deserialize, Serialize};

/// iptables-facing settings: the SSH port carve-out and the rule file pair
/// applied on startup (`rules_path`, then `custom_rules_path` appended after).
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FirewallConfig {
    /// Port that must never be blocked, regardless of attempt count. Overridable
    /// via the `SSH_PORT` environment variable at load time.
    #[serde(default = "default_ssh_port")]
    pub ssh_port: u16,
}

fn default_ssh_port() -> u16 {
    22
}

impl Default for FirewallConfig {
    fn default() -> Self {
        Self {
            ssh_port: default_ssh_port(),
        }
    }
}

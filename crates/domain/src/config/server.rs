use serde::{Deserialize, Serialize};

/// Command server bind/TLS posture.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind_address")]
    pub bind_address: String,

    #[serde(default = "default_command_port")]
    pub command_port: u16,

    /// Accept plaintext commands from non-loopback peers too. Loopback peers
    /// always get plaintext regardless of this flag.
    #[serde(default = "default_false")]
    pub allow_plaintext_commands: bool,
}

fn default_bind_address() -> String {
    "0.0.0.0".to_string()
}

fn default_command_port() -> u16 {
    53860
}

fn default_false() -> bool {
    false
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            command_port: default_command_port(),
            allow_plaintext_commands: default_false(),
        }
    }
}

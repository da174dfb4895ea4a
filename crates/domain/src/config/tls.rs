use serde::{Deserialize, Serialize};

/// TLS and payload-encryption settings for the command server.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TlsConfig {
    /// Path to the self-signed certificate. Generated on first boot if
    /// missing (see `certificate_path` in `PathsConfig`).
    #[serde(default = "default_cert_validity_days")]
    pub cert_validity_days: u32,

    /// Base64-encoded 256-bit key for the AES-CBC payload layer that rides
    /// inside the TLS channel. Generated on first boot if absent from the
    /// config file and persisted back.
    #[serde(default)]
    pub aes_key_base64: Option<String>,

    /// Base64-encoded 128-bit IV paired with `aes_key_base64`.
    #[serde(default)]
    pub aes_iv_base64: Option<String>,
}

fn default_cert_validity_days() -> u32 {
    825
}

impl Default for TlsConfig {
    fn default() -> Self {
        Self {
            cert_validity_days: default_cert_validity_days(),
            aes_key_base64: None,
            aes_iv_base64: None,
        }
    }
}

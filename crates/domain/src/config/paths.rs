use serde::{Deserialize, Serialize};

/// Filesystem layout, relative to `base_dir` unless a field is already
/// absolute.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PathsConfig {
    #[serde(default = "default_block_list_path")]
    pub block_list_path: String,

    #[serde(default = "default_whitelist_path")]
    pub whitelist_path: String,

    #[serde(default = "default_rules_path")]
    pub rules_path: String,

    #[serde(default = "default_custom_rules_path")]
    pub custom_rules_path: String,

    #[serde(default = "default_connection_log_path")]
    pub connection_log_path: String,

    #[serde(default = "default_archive_dir")]
    pub archive_dir: String,

    #[serde(default = "default_max_log_archives")]
    pub max_log_archives: usize,

    #[serde(default = "default_secure_export_dir")]
    pub secure_export_dir: String,

    #[serde(default = "default_certificate_path")]
    pub certificate_path: String,
}

fn default_block_list_path() -> String {
    "./BlockList/blocklist.txt".to_string()
}

fn default_whitelist_path() -> String {
    "./Whitelist/whitelist.txt".to_string()
}

fn default_rules_path() -> String {
    "./FirewallRuleSet/rules.txt".to_string()
}

fn default_custom_rules_path() -> String {
    "./FirewallRuleSet/custom_rules.txt".to_string()
}

fn default_connection_log_path() -> String {
    "./connection_attempts.log".to_string()
}

fn default_archive_dir() -> String {
    "./ServerConnectionLogs".to_string()
}

fn default_max_log_archives() -> usize {
    30
}

fn default_secure_export_dir() -> String {
    "./SecureExports".to_string()
}

fn default_certificate_path() -> String {
    "./certificate.pfx".to_string()
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            block_list_path: default_block_list_path(),
            whitelist_path: default_whitelist_path(),
            rules_path: default_rules_path(),
            custom_rules_path: default_custom_rules_path(),
            connection_log_path: default_connection_log_path(),
            archive_dir: default_archive_dir(),
            max_log_archives: default_max_log_archives(),
            secure_export_dir: default_secure_export_dir(),
            certificate_path: default_certificate_path(),
        }
    }
}

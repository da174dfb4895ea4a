use std::path::Path;

use serde::{Deserialize, Serialize};

use super::{
    ConfigError, DatabaseConfig, EnforcementConfig, FirewallConfig, GeoConfig, LoggingConfig,
    PathsConfig, ServerConfig, SyslogConfig, TlsConfig,
};

/// Aggregate configuration tree, loaded once at startup and threaded through
/// the composition root as an `Arc<Config>`.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub database: DatabaseConfig,

    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub enforcement: EnforcementConfig,

    #[serde(default)]
    pub geo: GeoConfig,

    #[serde(default)]
    pub paths: PathsConfig,

    #[serde(default)]
    pub tls: TlsConfig,

    #[serde(default)]
    pub syslog: SyslogConfig,

    #[serde(default)]
    pub firewall: FirewallConfig,
}

/// Overrides accepted on the command line, applied after the file is parsed
/// and before validation.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub bind_address: Option<String>,
    pub command_port: Option<u16>,
    pub log_level: Option<String>,
    pub database_path: Option<String>,
}

impl Config {
    /// Loads `config_path` (defaulting to `./firewall.toml`), falling back to
    /// built-in defaults for any field the file omits or for a wholly missing
    /// file. Applies `overrides`, then the `SSH_PORT` environment variable,
    /// then returns the tree unvalidated.
    pub fn load(config_path: Option<&str>, overrides: CliOverrides) -> Result<Self, ConfigError> {
        let path = config_path.unwrap_or("./firewall.toml");

        let mut config = if Path::new(path).exists() {
            let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
                path: path.to_string(),
                source,
            })?;
            toml::from_str(&contents).map_err(|source| ConfigError::Parse {
                path: path.to_string(),
                source,
            })?
        } else {
            Config::default()
        };

        config.apply_overrides(overrides);
        config.apply_env();

        Ok(config)
    }

    fn apply_overrides(&mut self, overrides: CliOverrides) {
        if let Some(bind) = overrides.bind_address {
            self.server.bind_address = bind;
        }
        if let Some(port) = overrides.command_port {
            self.server.command_port = port;
        }
        if let Some(level) = overrides.log_level {
            self.logging.level = level;
        }
        if let Some(db_path) = overrides.database_path {
            self.database.path = db_path;
        }
    }

    fn apply_env(&mut self) {
        if let Ok(ssh_port) = std::env::var("SSH_PORT") {
            if let Ok(port) = ssh_port.parse::<u16>() {
                self.firewall.ssh_port = port;
            }
        }
    }

    /// Cross-field sanity checks that can't be expressed as per-struct
    /// `serde(default)`. Called once after `load`, before any adapter is
    /// constructed.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.command_port == 0 {
            return Err(ConfigError::Invalid(
                "server.command_port must be nonzero".to_string(),
            ));
        }
        if self.firewall.ssh_port == self.server.command_port {
            return Err(ConfigError::Invalid(
                "firewall.ssh_port and server.command_port must differ".to_string(),
            ));
        }
        if self.enforcement.threshold_attempts == 0 {
            return Err(ConfigError::Invalid(
                "enforcement.threshold_attempts must be at least 1".to_string(),
            ));
        }
        if self.enforcement.threshold_seconds <= 0 {
            return Err(ConfigError::Invalid(
                "enforcement.threshold_seconds must be positive".to_string(),
            ));
        }
        if self.enforcement.default_duration_seconds <= 0 {
            return Err(ConfigError::Invalid(
                "enforcement.default_duration_seconds must be positive".to_string(),
            ));
        }
        if self.database.write_pool_max_connections == 0 {
            return Err(ConfigError::Invalid(
                "database.write_pool_max_connections must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("failed to serialize config back to {path}: {source}")]
    Serialize {
        path: String,
        #[source]
        source: toml::ser::Error,
    },

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

use thiserror::Error;

/// Error taxonomy for the enforcement pipeline and its collaborators.
///
/// Transient I/O and cancellation are deliberately absent: the owning loop
/// retries or exits cleanly rather than surfacing a `DomainError` for them.
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("invalid address: {0}")]
    InvalidAddress(String),

    #[error("invalid CIDR: {0}")]
    InvalidCidr(String),

    #[error("invalid configuration: {0}")]
    Configuration(String),

    #[error("external tool failed: {0}")]
    ExternalToolFailure(String),

    #[error("address {0} is whitelisted")]
    AddressWhitelisted(String),

    #[error("address {0} is not currently blocked")]
    NotBlocked(String),

    #[error("database error: {0}")]
    Database(String),

    #[error("resource not found: {0}")]
    NotFound(String),

    #[error("unknown command: {0}")]
    UnknownCommand(String),

    #[error("invalid command arguments: {0}")]
    InvalidArguments(String),

    #[error("job not found: {0}")]
    JobNotFound(String),

    #[error("io error: {0}")]
    Io(String),
}

impl From<std::io::Error> for DomainError {
    fn from(e: std::io::Error) -> Self {
        DomainError::Io(e.to_string())
    }
}

use async_trait::async_trait;
use std::net::IpAddr;

/// Ambient collaborator for the syslog tailer and decision engine: the plaintext `connection_attempts.log`
/// and its rotation into `ServerConnectionLogs/*.txt.gz`.
#[async_trait]
pub trait ConnectionLogPort: Send + Sync {
    /// Appends one pipe-delimited record. Never returns an error to the
    /// caller — write failures are logged and swallowed (ambient logging is
    /// not allowed to break the enforcement hot path).
    async fn append(&self, line: &str);

    /// Best-effort reverse lookup for the classifier's log line. Any
    /// failure collapses to `"n/a"` and is logged at debug.
    async fn reverse_dns(&self, addr: IpAddr) -> String;

    /// Rotates the current log into a timestamped `.txt.gz` archive if the
    /// rotation policy says it's due, retaining the newest `MaxLogArchives`.
    async fn rotate_if_needed(&self);

    /// Forces a rotation regardless of policy (the `rotate` command).
    async fn force_rotate(&self);

    /// Returns the last `n` lines of the current log (the `show-logs`
    /// command).
    async fn tail(&self, n: usize) -> Vec<String>;
}

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use sentinel_fw_domain::ConnectionRecord;
use tokio::io::{AsyncReadExt, AsyncSeekExt};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use sentinel_fw_application::ports::ConnectionLogPort;
use sentinel_fw_application::EnforcementEngine;

const LOOPBACK_MARKER: &str = "SRC=127.0.0.1";

/// Extracts a [`ConnectionRecord`] from one syslog line, if it describes an
/// accepted TCP or UDP connection. One parse path, one record per accepted
/// line — no dual regex/prefix-check parsing, and no loopback traffic.
///
/// Fields are pulled by delimited-field scan (`KEY=value` tokens separated
/// by whitespace), not a full regex: the source format is rigid enough that
/// a single `str::split_whitespace` pass is both simpler and cheaper.
pub fn parse_connection_line(line: &str) -> Option<ConnectionRecord> {
    if !(line.contains("New TCP connection:") || line.contains("New UDP connection:")) {
        return None;
    }
    if line.contains(LOOPBACK_MARKER) {
        return None;
    }

    let mut src = None;
    let mut spt = None;
    let mut dpt = None;
    for token in line.split_whitespace() {
        if let Some(value) = token.strip_prefix("SRC=") {
            src = value.parse().ok();
        } else if let Some(value) = token.strip_prefix("SPT=") {
            spt = value.parse().ok();
        } else if let Some(value) = token.strip_prefix("DPT=") {
            dpt = value.parse().ok();
        }
    }

    Some(ConnectionRecord::new(src?, Utc::now(), spt.unwrap_or(0), dpt.unwrap_or(0)))
}

/// Tails the configured syslog path, classifies each new line, and feeds
/// accepted connections into the enforcement engine. Runs as its own
/// `tokio::spawn`'d task honoring the root cancellation token.
pub struct SyslogTailer {
    path: String,
    poll_interval: Duration,
    engine: Arc<EnforcementEngine>,
    connection_log: Arc<dyn ConnectionLogPort>,
    shutdown: CancellationToken,
}

impl SyslogTailer {
    pub fn new(
        path: String,
        poll_interval: Duration,
        engine: Arc<EnforcementEngine>,
        connection_log: Arc<dyn ConnectionLogPort>,
        shutdown: CancellationToken,
    ) -> Self {
        Self {
            path,
            poll_interval,
            engine,
            connection_log,
            shutdown,
        }
    }

    pub fn spawn(self: Arc<Self>) {
        tokio::spawn(async move {
            self.run().await;
        });
    }

    async fn run(&self) {
        let mut cursor: u64 = match tokio::fs::metadata(&self.path).await {
            Ok(meta) => meta.len(),
            Err(e) => {
                warn!(path = %self.path, error = %e, "syslog path unavailable at startup, starting from offset 0");
                0
            }
        };

        let mut ticker = tokio::time::interval(self.poll_interval);
        loop {
            tokio::select! {
                _ = self.shutdown.cancelled() => {
                    debug!("syslog tailer shutting down");
                    break;
                }
                _ = ticker.tick() => {
                    let (next_cursor, advanced) = self.poll_once(cursor).await;
                    cursor = next_cursor;
                    if advanced {
                        self.connection_log.rotate_if_needed().await;
                    }
                }
            }
        }
    }

    /// Returns the new cursor and whether any new bytes were actually read —
    /// the caller only runs the output-log rotation check when new lines
    /// were processed.
    async fn poll_once(&self, cursor: u64) -> (u64, bool) {
        let meta = match tokio::fs::metadata(&self.path).await {
            Ok(meta) => meta,
            Err(e) => {
                warn!(path = %self.path, error = %e, "failed to stat syslog path");
                return (cursor, false);
            }
        };

        // Truncation (log rotated out from under us): restart from 0.
        let cursor = if meta.len() < cursor { 0 } else { cursor };
        if meta.len() == cursor {
            return (cursor, false);
        }

        let mut file = match tokio::fs::File::open(&self.path).await {
            Ok(f) => f,
            Err(e) => {
                warn!(path = %self.path, error = %e, "failed to open syslog path");
                return (cursor, false);
            }
        };
        if file.seek(std::io::SeekFrom::Start(cursor)).await.is_err() {
            return (cursor, false);
        }

        let mut buf = String::new();
        if let Err(e) = file.read_to_string(&mut buf).await {
            warn!(path = %self.path, error = %e, "failed to read new syslog bytes");
            return (cursor, false);
        }

        for line in buf.lines() {
            if let Some(record) = parse_connection_line(line) {
                self.engine.observe(record).await;
            }
        }

        (meta.len(), true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_tcp_connection_line() {
        let line = "Jul 29 10:00:00 host kernel: [12345.0] New TCP connection: SRC=203.0.113.5 DST=10.0.0.1 SPT=51234 DPT=22";
        let record = parse_connection_line(line).unwrap();
        assert_eq!(record.address, "203.0.113.5".parse::<std::net::IpAddr>().unwrap());
        assert_eq!(record.src_port, 51234);
        assert_eq!(record.dst_port, 22);
    }

    #[test]
    fn loopback_source_is_filtered() {
        let line = "New TCP connection: SRC=127.0.0.1 DST=10.0.0.1 SPT=1 DPT=2";
        assert!(parse_connection_line(line).is_none());
    }

    #[test]
    fn unrelated_line_is_ignored() {
        assert!(parse_connection_line("Jul 29 10:00:00 host sshd: session opened").is_none());
    }
}

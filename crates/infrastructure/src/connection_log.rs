use std::net::IpAddr;
use std::path::PathBuf;

use async_trait::async_trait;
use chrono::Utc;
use flate2::write::GzEncoder;
use flate2::Compression;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use sentinel_fw_application::ports::ConnectionLogPort;

/// Ambient collaborator: the plaintext `connection_attempts.log` and
/// its rotation into timestamped `.txt.gz` archives.
pub struct FileConnectionLog {
    log_path: PathBuf,
    archive_dir: PathBuf,
    max_archives: usize,
    /// Rotate once the plaintext log passes this size, checked on every
    /// syslog poll tick rather than on a separate timer.
    rotate_at_bytes: u64,
    lock: Mutex<()>,
}

impl FileConnectionLog {
    pub fn new(log_path: impl Into<PathBuf>, archive_dir: impl Into<PathBuf>, max_archives: usize) -> Self {
        Self {
            log_path: log_path.into(),
            archive_dir: archive_dir.into(),
            max_archives,
            rotate_at_bytes: 10 * 1024 * 1024,
            lock: Mutex::new(()),
        }
    }

    async fn current_size(&self) -> u64 {
        tokio::fs::metadata(&self.log_path)
            .await
            .map(|m| m.len())
            .unwrap_or(0)
    }

    async fn do_rotate(&self) {
        let _guard = self.lock.lock().await;
        let contents = match tokio::fs::read(&self.log_path).await {
            Ok(c) if !c.is_empty() => c,
            _ => return,
        };

        if let Err(e) = tokio::fs::create_dir_all(&self.archive_dir).await {
            warn!(error = %e, "failed to create connection log archive directory");
            return;
        }

        let archive_name = format!("{}.txt.gz", Utc::now().format("%Y%m%dT%H%M%S"));
        let archive_path = self.archive_dir.join(archive_name);

        let compress_result = tokio::task::spawn_blocking(move || {
            let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
            std::io::Write::write_all(&mut encoder, &contents)?;
            encoder.finish()
        })
        .await;

        let compressed = match compress_result {
            Ok(Ok(bytes)) => bytes,
            Ok(Err(e)) => {
                warn!(error = %e, "failed to compress connection log archive");
                return;
            }
            Err(e) => {
                warn!(error = %e, "archive compression task panicked");
                return;
            }
        };

        if let Err(e) = tokio::fs::write(&archive_path, compressed).await {
            warn!(error = %e, "failed to write connection log archive");
            return;
        }
        if let Err(e) = tokio::fs::write(&self.log_path, b"").await {
            warn!(error = %e, "failed to truncate connection log after rotation");
        }

        self.prune_old_archives().await;
    }

    async fn prune_old_archives(&self) {
        let mut entries = match tokio::fs::read_dir(&self.archive_dir).await {
            Ok(e) => e,
            Err(_) => return,
        };
        let mut archives = Vec::new();
        while let Ok(Some(entry)) = entries.next_entry().await {
            if let Ok(meta) = entry.metadata().await {
                archives.push((entry.path(), meta.modified().ok()));
            }
        }
        archives.sort_by_key(|(_, modified)| *modified);
        let excess = archives.len().saturating_sub(self.max_archives);
        for (path, _) in archives.into_iter().take(excess) {
            let _ = tokio::fs::remove_file(path).await;
        }
    }
}

#[async_trait]
impl ConnectionLogPort for FileConnectionLog {
    async fn append(&self, line: &str) {
        let _guard = self.lock.lock().await;
        let result = async {
            let mut file = tokio::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(&self.log_path)
                .await?;
            file.write_all(line.as_bytes()).await?;
            file.write_all(b"\n").await?;
            Ok::<(), std::io::Error>(())
        }
        .await;
        if let Err(e) = result {
            warn!(error = %e, "failed to append connection log line");
        }
    }

    async fn reverse_dns(&self, addr: IpAddr) -> String {
        tokio::task::spawn_blocking(move || {
            dns_lookup::lookup_addr(&addr).unwrap_or_else(|e| {
                debug!(%addr, error = %e, "reverse dns lookup failed");
                "n/a".to_string()
            })
        })
        .await
        .unwrap_or_else(|_| "n/a".to_string())
    }

    async fn rotate_if_needed(&self) {
        if self.current_size().await >= self.rotate_at_bytes {
            self.do_rotate().await;
        }
    }

    async fn force_rotate(&self) {
        self.do_rotate().await;
    }

    async fn tail(&self, n: usize) -> Vec<String> {
        let contents = tokio::fs::read_to_string(&self.log_path).await.unwrap_or_default();
        let lines: Vec<&str> = contents.lines().collect();
        let start = lines.len().saturating_sub(n);
        lines[start..].iter().map(|s| s.to_string()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn tail_returns_last_n_lines() {
        let dir = tempfile::tempdir().unwrap();
        let log = FileConnectionLog::new(dir.path().join("c.log"), dir.path().join("archive"), 5);
        for i in 0..5 {
            log.append(&format!("line{i}")).await;
        }
        let tail = log.tail(2).await;
        assert_eq!(tail, vec!["line3".to_string(), "line4".to_string()]);
    }

    #[tokio::test]
    async fn force_rotate_archives_and_truncates() {
        let dir = tempfile::tempdir().unwrap();
        let log_path = dir.path().join("c.log");
        let archive_dir = dir.path().join("archive");
        let log = FileConnectionLog::new(&log_path, &archive_dir, 5);
        log.append("a line").await;
        log.force_rotate().await;
        let remaining = tokio::fs::read_to_string(&log_path).await.unwrap();
        assert!(remaining.is_empty());
        let mut entries = tokio::fs::read_dir(&archive_dir).await.unwrap();
        assert!(entries.next_entry().await.unwrap().is_some());
    }
}

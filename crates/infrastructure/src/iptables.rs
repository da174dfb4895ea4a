use std::net::IpAddr;

use async_trait::async_trait;
use sentinel_fw_domain::{DomainError, FirewallCommandOutcome};
use tokio::process::Command;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use sentinel_fw_application::ports::PacketFilterPort;

const IPTABLES_BIN: &str = "/sbin/iptables";

/// Invokes `/sbin/iptables` to insert/remove DROP rules.
///
/// Stateless except for the serialization mutex: every invocation acquires
/// it for the duration of spawning and awaiting the child, so two concurrent
/// `block`/`unblock`/`reload` calls never interleave their rule ordering.
pub struct IptablesDriver {
    rules_path: String,
    custom_rules_path: String,
    ssh_port: u16,
    lock: Mutex<()>,
}

impl IptablesDriver {
    pub fn new(rules_path: String, custom_rules_path: String, ssh_port: u16) -> Self {
        Self {
            rules_path,
            custom_rules_path,
            ssh_port,
            lock: Mutex::new(()),
        }
    }

    async fn run(&self, args: &[&str]) -> Result<FirewallCommandOutcome, DomainError> {
        let _guard = self.lock.lock().await;
        self.run_locked(args).await
    }

    /// Same as `run` but assumes the caller already holds `lock` — used by
    /// `reload` to serialize its whole multi-command sequence as one unit.
    async fn run_locked(&self, args: &[&str]) -> Result<FirewallCommandOutcome, DomainError> {
        debug!(?args, "invoking iptables");
        let output = Command::new(IPTABLES_BIN)
            .args(args)
            .output()
            .await
            .map_err(|e| DomainError::ExternalToolFailure(format!("failed to spawn iptables: {e}")))?;

        if output.status.success() {
            Ok(FirewallCommandOutcome::ok(String::from_utf8_lossy(&output.stdout).trim().to_string()))
        } else {
            let diagnostic = String::from_utf8_lossy(&output.stderr).trim().to_string();
            warn!(?args, %diagnostic, "iptables reported a nonzero exit");
            Ok(FirewallCommandOutcome::failed(diagnostic))
        }
    }

    async fn apply_rule_file(&self, path: &str) -> Result<(), DomainError> {
        let contents = match tokio::fs::read_to_string(path).await {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(()),
            Err(e) => return Err(DomainError::Io(e.to_string())),
        };
        for line in contents.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let args: Vec<&str> = line.split_whitespace().collect();
            if let Err(e) = self.run_locked(&args).await {
                warn!(rule = line, error = %e, "rule file line failed, continuing");
            }
        }
        Ok(())
    }
}

#[async_trait]
impl PacketFilterPort for IptablesDriver {
    async fn block(&self, addr: IpAddr) -> Result<FirewallCommandOutcome, DomainError> {
        self.run(&["-I", "INPUT", "1", "-s", &addr.to_string(), "-j", "DROP"])
            .await
    }

    async fn unblock(&self, addr: IpAddr) -> Result<FirewallCommandOutcome, DomainError> {
        self.run(&["-D", "INPUT", "-s", &addr.to_string(), "-j", "DROP"])
            .await
    }

    async fn reload(&self) -> Result<FirewallCommandOutcome, DomainError> {
        let _guard = self.lock.lock().await;

        self.run_locked(&["-P", "INPUT", "ACCEPT"]).await?;
        self.run_locked(&["-F", "INPUT"]).await?;

        let ssh_port = self.ssh_port.to_string();
        self.run_locked(&[
            "-A", "INPUT", "-p", "tcp", "--dport", &ssh_port, "-m", "conntrack",
            "--ctstate", "NEW", "-m", "limit", "--limit", "3/min", "-j", "ACCEPT",
        ])
        .await?;
        self.run_locked(&["-A", "INPUT", "-p", "tcp", "--dport", &ssh_port, "-j", "DROP"])
            .await?;

        self.apply_rule_file(&self.rules_path).await?;
        self.apply_rule_file(&self.custom_rules_path).await?;

        self.run_locked(&["-P", "INPUT", "DROP"]).await
    }
}

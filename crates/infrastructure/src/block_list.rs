use std::net::IpAddr;

use async_trait::async_trait;
use dashmap::DashSet;
use sentinel_fw_domain::{parse_seed_lines, DomainError, Event};
use tracing::warn;

use sentinel_fw_application::ports::{BlockListPort, EventPublisherPort};

/// In-memory `blocked`/`whitelisted` membership sets seeded from the two
/// file-backed lists.
pub struct BlockListManager {
    blocked: DashSet<IpAddr>,
    whitelisted: DashSet<IpAddr>,
    block_list_path: String,
    whitelist_path: String,
    events: std::sync::Arc<dyn EventPublisherPort>,
}

impl BlockListManager {
    /// Reads `block_list_path`/`whitelist_path`; blank and `#`-prefixed
    /// lines are ignored, unparsable literals are logged at `warn` and
    /// skipped (non-fatal).
    pub async fn load(
        block_list_path: &str,
        whitelist_path: &str,
        events: std::sync::Arc<dyn EventPublisherPort>,
    ) -> Result<Self, DomainError> {
        let blocked = DashSet::new();
        let whitelisted = DashSet::new();

        seed_into(block_list_path, &blocked).await?;
        seed_into(whitelist_path, &whitelisted).await?;

        Ok(Self {
            blocked,
            whitelisted,
            block_list_path: block_list_path.to_string(),
            whitelist_path: whitelist_path.to_string(),
            events,
        })
    }

    /// Re-reads both seed files from disk (the `reload` command). The
    /// in-memory sets the enforcement engine and command surface consult
    /// are additive reseed targets: entries already present are left alone,
    /// newly-added file entries are picked up, nothing is removed (removal
    /// goes through `unblock`/`remove_whitelist`, not a file edit).
    pub async fn reload_from_disk(&self) -> Result<(), DomainError> {
        seed_into(&self.block_list_path, &self.blocked).await?;
        seed_into(&self.whitelist_path, &self.whitelisted).await?;
        Ok(())
    }
}

async fn seed_into(path: &str, set: &DashSet<IpAddr>) -> Result<(), DomainError> {
    let contents = match tokio::fs::read_to_string(path).await {
        Ok(c) => c,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(()),
        Err(e) => return Err(DomainError::Io(e.to_string())),
    };
    for line in parse_seed_lines(&contents) {
        match line.parse::<IpAddr>() {
            Ok(addr) => {
                set.insert(addr);
            }
            Err(e) => warn!(line, error = %e, "skipping unparsable address in seed file"),
        }
    }
    Ok(())
}

#[async_trait]
impl BlockListPort for BlockListManager {
    fn is_blocked(&self, addr: IpAddr) -> bool {
        self.blocked.contains(&addr)
    }

    fn is_whitelisted(&self, addr: IpAddr) -> bool {
        self.whitelisted.contains(&addr)
    }

    fn insert_blocked(&self, addr: IpAddr) {
        self.blocked.insert(addr);
    }

    fn remove_blocked(&self, addr: IpAddr) {
        self.blocked.remove(&addr);
    }

    async fn add_whitelist(&self, addr: IpAddr) -> Result<(), DomainError> {
        self.whitelisted.insert(addr);
        let mut contents = tokio::fs::read_to_string(&self.whitelist_path)
            .await
            .unwrap_or_default();
        if !contents.ends_with('\n') && !contents.is_empty() {
            contents.push('\n');
        }
        contents.push_str(&addr.to_string());
        contents.push('\n');
        tokio::fs::write(&self.whitelist_path, contents)
            .await
            .map_err(|e| DomainError::Io(e.to_string()))?;
        self.events.publish(Event::WhitelistAdded {
            address: addr,
            time: chrono::Utc::now(),
        });
        Ok(())
    }

    async fn remove_whitelist(&self, addr: IpAddr) -> Result<(), DomainError> {
        self.whitelisted.remove(&addr);
        let contents = tokio::fs::read_to_string(&self.whitelist_path)
            .await
            .unwrap_or_default();
        let target = addr.to_string();
        // Filter the raw lines directly rather than going through
        // `parse_seed_lines`, which drops comments and blank lines — those
        // belong to the file's owner, not to this address's removal.
        let rewritten: String = contents
            .lines()
            .filter(|line| line.trim() != target)
            .map(|line| format!("{line}\n"))
            .collect();
        tokio::fs::write(&self.whitelist_path, rewritten)
            .await
            .map_err(|e| DomainError::Io(e.to_string()))?;
        self.events.publish(Event::WhitelistRemoved {
            address: addr,
            time: chrono::Utc::now(),
        });
        Ok(())
    }

    fn blocked_snapshot(&self) -> Vec<IpAddr> {
        self.blocked.iter().map(|e| *e).collect()
    }

    fn whitelisted_snapshot(&self) -> Vec<IpAddr> {
        self.whitelisted.iter().map(|e| *e).collect()
    }
}

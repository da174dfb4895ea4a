use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::net::IpAddr;

/// A persisted row describing an active block.
///
/// Invariant: at most one record per address exists in the store at a time;
/// if an address is in the in-memory blocked set, a matching [`BlockRecord`]
/// exists in the store (or startup reconciliation is still in progress).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockRecord {
    pub address: IpAddr,
    pub blocked_at: DateTime<Utc>,
    pub duration_seconds: i64,
}

impl BlockRecord {
    pub fn new(address: IpAddr, blocked_at: DateTime<Utc>, duration_seconds: i64) -> Self {
        Self {
            address,
            blocked_at,
            duration_seconds,
        }
    }

    pub fn scheduled_unblock(&self) -> DateTime<Utc> {
        self.blocked_at + chrono::Duration::seconds(self.duration_seconds)
    }

    /// `scheduled_unblock == now` counts as expired (inclusive boundary).
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.scheduled_unblock() <= now
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn expiry_boundary_is_inclusive() {
        let blocked_at = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
        let record = BlockRecord::new("10.0.0.1".parse().unwrap(), blocked_at, 60);
        let exactly_due = record.scheduled_unblock();
        assert!(record.is_expired_at(exactly_due));
        assert!(!record.is_expired_at(exactly_due - chrono::Duration::seconds(1)));
    }
}

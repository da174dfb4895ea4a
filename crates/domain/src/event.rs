use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::net::IpAddr;

/// The discriminant used to key subscriptions on the event bus.
///
/// Kept separate from [`Event`] itself so `subscribe` can be called before
/// any event of that kind has ever been constructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    ConnectionAttempt,
    Block,
    Unblock,
    BlockExpired,
    GeoBlock,
    PortScanDetected,
    BandwidthExceeded,
    RateLimitExceeded,
    WhitelistAdded,
    WhitelistRemoved,
}

/// Tagged union over everything the pipeline publishes. All timestamps UTC.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    ConnectionAttempt {
        address: IpAddr,
        time: DateTime<Utc>,
        src_port: u16,
        dst_port: u16,
    },
    Block {
        address: IpAddr,
        duration_seconds: i64,
        time: DateTime<Utc>,
    },
    Unblock {
        address: IpAddr,
        time: DateTime<Utc>,
    },
    BlockExpired {
        address: IpAddr,
        time: DateTime<Utc>,
    },
    GeoBlock {
        address: IpAddr,
        country: String,
        time: DateTime<Utc>,
    },
    PortScanDetected {
        address: IpAddr,
        distinct_ports: usize,
        time: DateTime<Utc>,
    },
    BandwidthExceeded {
        address: IpAddr,
        bytes: u64,
        time: DateTime<Utc>,
    },
    RateLimitExceeded {
        address: IpAddr,
        attempts: usize,
        window_seconds: f64,
        time: DateTime<Utc>,
    },
    WhitelistAdded {
        address: IpAddr,
        time: DateTime<Utc>,
    },
    WhitelistRemoved {
        address: IpAddr,
        time: DateTime<Utc>,
    },
}

impl Event {
    pub fn kind(&self) -> EventKind {
        match self {
            Event::ConnectionAttempt { .. } => EventKind::ConnectionAttempt,
            Event::Block { .. } => EventKind::Block,
            Event::Unblock { .. } => EventKind::Unblock,
            Event::BlockExpired { .. } => EventKind::BlockExpired,
            Event::GeoBlock { .. } => EventKind::GeoBlock,
            Event::PortScanDetected { .. } => EventKind::PortScanDetected,
            Event::BandwidthExceeded { .. } => EventKind::BandwidthExceeded,
            Event::RateLimitExceeded { .. } => EventKind::RateLimitExceeded,
            Event::WhitelistAdded { .. } => EventKind::WhitelistAdded,
            Event::WhitelistRemoved { .. } => EventKind::WhitelistRemoved,
        }
    }
}

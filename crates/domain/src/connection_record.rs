use chrono::{DateTime, Utc};
use std::net::IpAddr;

/// A single accepted connection attempt extracted from the syslog stream.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConnectionRecord {
    pub address: IpAddr,
    pub time: DateTime<Utc>,
    pub src_port: u16,
    pub dst_port: u16,
}

impl ConnectionRecord {
    pub fn new(address: IpAddr, time: DateTime<Utc>, src_port: u16, dst_port: u16) -> Self {
        Self {
            address,
            time,
            src_port,
            dst_port,
        }
    }
}

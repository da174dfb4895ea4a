//! In-memory port implementations shared by this crate's unit tests.
#![cfg(test)]

use std::net::IpAddr;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashSet;
use sentinel_fw_domain::{
    AddressId, BlockRecord, Comment, DomainError, Event, FirewallCommandOutcome, HistoryEvent, Tag,
};

use crate::ports::{
    BlockListPort, ConnectionLogPort, EventPublisherPort, GeoResolverPort, PacketFilterPort,
    StorePort, StoreStats,
};

pub struct MockFilter {
    pub succeed: bool,
}

#[async_trait]
impl PacketFilterPort for MockFilter {
    async fn block(&self, _addr: IpAddr) -> Result<FirewallCommandOutcome, DomainError> {
        Ok(outcome(self.succeed))
    }
    async fn unblock(&self, _addr: IpAddr) -> Result<FirewallCommandOutcome, DomainError> {
        Ok(outcome(self.succeed))
    }
    async fn reload(&self) -> Result<FirewallCommandOutcome, DomainError> {
        Ok(outcome(self.succeed))
    }
}

fn outcome(succeed: bool) -> FirewallCommandOutcome {
    if succeed {
        FirewallCommandOutcome::ok("ok")
    } else {
        FirewallCommandOutcome::failed("iptables: permission denied")
    }
}

#[derive(Default)]
pub struct MockStore {
    pub blocks: Mutex<Vec<BlockRecord>>,
    pub history: Mutex<Vec<HistoryEvent>>,
    pub tags: Mutex<Vec<Tag>>,
    pub comments: Mutex<Vec<Comment>>,
    pub address_ids: Mutex<std::collections::HashMap<IpAddr, AddressId>>,
}

#[async_trait]
impl StorePort for MockStore {
    async fn get_or_create_address_id(&self, ip: IpAddr) -> Result<AddressId, DomainError> {
        let mut ids = self.address_ids.lock().unwrap();
        Ok(*ids.entry(ip).or_insert_with(AddressId::new))
    }
    async fn upsert_block(&self, record: &BlockRecord) -> Result<(), DomainError> {
        self.blocks.lock().unwrap().push(record.clone());
        Ok(())
    }
    async fn delete_block(&self, addr: IpAddr) -> Result<(), DomainError> {
        self.blocks.lock().unwrap().retain(|b| b.address != addr);
        Ok(())
    }
    async fn list_blocks(&self) -> Result<Vec<BlockRecord>, DomainError> {
        Ok(self.blocks.lock().unwrap().clone())
    }
    async fn remove_all_expired(
        &self,
        now: DateTime<Utc>,
    ) -> Result<Vec<BlockRecord>, DomainError> {
        let mut blocks = self.blocks.lock().unwrap();
        let (expired, remaining): (Vec<_>, Vec<_>) =
            blocks.drain(..).partition(|b| b.is_expired_at(now));
        *blocks = remaining;
        Ok(expired)
    }
    async fn insert_history(&self, event: HistoryEvent) -> Result<(), DomainError> {
        self.history.lock().unwrap().push(event);
        Ok(())
    }
    async fn list_history(&self, address_id: AddressId) -> Result<Vec<HistoryEvent>, DomainError> {
        Ok(self
            .history
            .lock()
            .unwrap()
            .iter()
            .filter(|h| h.address_id == address_id)
            .cloned()
            .collect())
    }
    async fn insert_tag(&self, tag: Tag) -> Result<(), DomainError> {
        self.tags.lock().unwrap().push(tag);
        Ok(())
    }
    async fn delete_tag(&self, address_id: AddressId, value: &str) -> Result<(), DomainError> {
        self.tags
            .lock()
            .unwrap()
            .retain(|t| !(t.address_id == address_id && t.value == value));
        Ok(())
    }
    async fn list_tags(&self, address_id: AddressId) -> Result<Vec<Tag>, DomainError> {
        Ok(self
            .tags
            .lock()
            .unwrap()
            .iter()
            .filter(|t| t.address_id == address_id)
            .cloned()
            .collect())
    }
    async fn insert_comment(&self, comment: Comment) -> Result<(), DomainError> {
        self.comments.lock().unwrap().push(comment);
        Ok(())
    }
    async fn list_comments(&self, address_id: AddressId) -> Result<Vec<Comment>, DomainError> {
        Ok(self
            .comments
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.address_id == address_id)
            .cloned()
            .collect())
    }
    async fn stats(&self) -> Result<StoreStats, DomainError> {
        Ok(StoreStats {
            total: self.blocks.lock().unwrap().len() as i64,
            recent_fails: 0,
            last_seen: None,
        })
    }
}

#[derive(Default)]
pub struct MockBlockList {
    pub blocked: DashSet<IpAddr>,
    pub whitelisted: DashSet<IpAddr>,
}

#[async_trait]
impl BlockListPort for MockBlockList {
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
        Ok(())
    }
    async fn remove_whitelist(&self, addr: IpAddr) -> Result<(), DomainError> {
        self.whitelisted.remove(&addr);
        Ok(())
    }
    fn blocked_snapshot(&self) -> Vec<IpAddr> {
        self.blocked.iter().map(|e| *e).collect()
    }
    fn whitelisted_snapshot(&self) -> Vec<IpAddr> {
        self.whitelisted.iter().map(|e| *e).collect()
    }
}

#[derive(Default)]
pub struct MockEvents {
    pub published: Mutex<Vec<Event>>,
}

impl EventPublisherPort for MockEvents {
    fn publish(&self, event: Event) {
        self.published.lock().unwrap().push(event);
    }
}

pub fn addr(s: &str) -> IpAddr {
    s.parse().unwrap()
}

/// A single fixed CIDR-to-country mapping — enough for one scenario, unlike
/// the real resolver's atomically-swapped prefix table.
#[derive(Default)]
pub struct MockGeoResolver {
    pub mapping: Option<(IpAddr, &'static str)>,
    pub blocked_countries: DashSet<&'static str>,
}

impl GeoResolverPort for MockGeoResolver {
    fn country_of(&self, addr: IpAddr) -> String {
        match self.mapping {
            Some((a, country)) if a == addr => country.to_string(),
            _ => sentinel_fw_domain::UNKNOWN_COUNTRY.to_string(),
        }
    }
    fn is_blocked_country(&self, addr: IpAddr) -> bool {
        match self.mapping {
            Some((a, country)) if a == addr => self.blocked_countries.contains(country),
            _ => false,
        }
    }
}

#[derive(Default)]
pub struct MockConnectionLog;

#[async_trait]
impl ConnectionLogPort for MockConnectionLog {
    async fn append(&self, _line: &str) {}
    async fn reverse_dns(&self, _addr: IpAddr) -> String {
        "n/a".to_string()
    }
    async fn rotate_if_needed(&self) {}
    async fn force_rotate(&self) {}
    async fn tail(&self, _n: usize) -> Vec<String> {
        Vec::new()
    }
}

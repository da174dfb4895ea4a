use crate::address::AddressId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Append-only audit row attached to an address.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryEvent {
    pub address_id: AddressId,
    pub time: DateTime<Utc>,
    pub message: String,
}

impl HistoryEvent {
    pub fn new(address_id: AddressId, time: DateTime<Utc>, message: impl Into<String>) -> Self {
        Self {
            address_id,
            time,
            message: message.into(),
        }
    }
}

/// A unique tag attached to an address (set semantics per `address_id`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Tag {
    pub address_id: AddressId,
    pub value: String,
}

/// A time-ordered, append-only comment attached to an address.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    pub address_id: AddressId,
    pub time: DateTime<Utc>,
    pub text: String,
}

pub fn validate_tag(value: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        return Err("tag cannot be empty".to_string());
    }
    if value.len() > 64 {
        return Err("tag cannot exceed 64 characters".to_string());
    }
    Ok(())
}

pub fn validate_comment(text: &str) -> Result<(), String> {
    if text.trim().is_empty() {
        return Err("comment cannot be empty".to_string());
    }
    if text.len() > 1000 {
        return Err("comment cannot exceed 1000 characters".to_string());
    }
    Ok(())
}

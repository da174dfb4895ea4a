//! Sentinel Firewall Domain Layer
//!
//! Pure types, parsing, and validation for the firewall daemon: addresses,
//! the sliding attempt window behind rate blocking, block records, geo
//! prefixes, whitelist entries, history/tag/comment records, the event
//! taxonomy published by the enforcement engine, scheduler job identifiers,
//! and the configuration tree. Nothing in this crate performs I/O.

pub mod address;
pub mod attempt_window;
pub mod block_record;
pub mod config;
pub mod connection_record;
pub mod errors;
pub mod event;
pub mod firewall_outcome;
pub mod geo;
pub mod history;
pub mod job;
pub mod whitelist;

pub use address::{validate_ip_literal, Address, AddressId};
pub use attempt_window::AttemptWindow;
pub use block_record::BlockRecord;
pub use config::{CliOverrides, Config, ConfigError};
pub use connection_record::ConnectionRecord;
pub use errors::DomainError;
pub use event::{Event, EventKind};
pub use firewall_outcome::FirewallCommandOutcome;
pub use geo::{normalize_country_code, sort_longest_prefix_first, Prefix, UNKNOWN_COUNTRY};
pub use history::{validate_comment, validate_tag, Comment, HistoryEvent, Tag};
pub use job::JobId;
pub use whitelist::{parse_seed_lines, WhitelistEntry};

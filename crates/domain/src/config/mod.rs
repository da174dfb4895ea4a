//! Configuration module for the firewall daemon. This module contains all
//! configuration structures organized by domain: server transport, database
//! pools, logging, rate/geo enforcement tuning, geo-prefix resolver paths,
//! filesystem layout, TLS/payload encryption, the syslog source, and the
//! iptables-facing SSH carve-out. `Config` aggregates all of the above and is
//! the single value threaded through the composition root.

mod database;
mod enforcement;
mod errors;
mod firewall;
mod geo;
mod logging;
mod paths;
mod root;
mod server;
mod syslog;
mod tls;

pub use database::DatabaseConfig;
pub use enforcement::EnforcementConfig;
pub use errors::ConfigError;
pub use firewall::FirewallConfig;
pub use geo::GeoConfig;
pub use logging::LoggingConfig;
pub use paths::PathsConfig;
pub use root::{CliOverrides, Config};
pub use server::ServerConfig;
pub use syslog::SyslogConfig;
pub use tls::TlsConfig;

//! Sentinel Firewall application layer.
//!
//! Ports describe what the enforcement pipeline and command surface need
//! from the outside world; nothing in this crate opens a socket, a file, or
//! a database connection directly — adapters in `sentinel-fw-infrastructure`
//! implement these traits. The engine and use cases here are orchestration
//! logic only, testable against mock ports.

pub mod commands;
pub mod engine;
pub mod plugin_api;
pub mod ports;
#[cfg(test)]
mod test_support;
pub mod use_cases;

pub use engine::EnforcementEngine;

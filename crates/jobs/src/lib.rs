//! Periodic background tasks: wrappers around the application layer's use cases and
//! ports, registered against the shared `SchedulerPort` rather than spawning
//! independent loops.

pub mod cert_watch;
pub mod monitors;
pub mod reload;
pub mod runner;
pub mod sweep;

pub use monitors::MonitorConfig;
pub use runner::JobRunner;

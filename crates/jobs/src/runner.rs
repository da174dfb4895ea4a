use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use sentinel_fw_application::commands::ReloadPort;
use sentinel_fw_application::ports::{ConnectionLogPort, EventPublisherPort, PacketFilterPort, SchedulerPort};
use sentinel_fw_application::use_cases::blocking::{BlockAddressUseCase, SweepExpiredUseCase};
use sentinel_fw_domain::JobId;
use tracing::info;

use crate::monitors::{schedule_security_monitors, MonitorConfig};
use crate::{cert_watch, reload, sweep};

/// Registers every periodic background task against the shared scheduler.
/// Jobs here are thin closures registered with `SchedulerPort` rather than
/// self-spawned loops, since the scheduler already owns their lifecycle.
pub struct JobRunner {
    scheduler: Arc<dyn SchedulerPort>,
    ids: Vec<JobId>,
}

impl JobRunner {
    pub fn new(scheduler: Arc<dyn SchedulerPort>) -> Self {
        Self {
            scheduler,
            ids: Vec::new(),
        }
    }

    pub fn with_sweep_expired(mut self, sweep: Arc<SweepExpiredUseCase>, interval: Duration) -> Self {
        self.ids.push(sweep::schedule_sweep_expired(self.scheduler.as_ref(), sweep, interval));
        self
    }

    pub fn with_periodic_reload(
        mut self,
        reload: Arc<dyn ReloadPort>,
        packet_filter: Arc<dyn PacketFilterPort>,
        interval: Duration,
    ) -> Self {
        self.ids.push(reload::schedule_periodic_reload(
            self.scheduler.as_ref(),
            reload,
            packet_filter,
            interval,
        ));
        self
    }

    pub fn with_cert_expiry_watch(mut self, cert_path: PathBuf, warn_within_days: i64, interval: Duration) -> Self {
        self.ids.push(cert_watch::schedule_cert_expiry_watch(
            self.scheduler.as_ref(),
            cert_path,
            warn_within_days,
            interval,
        ));
        self
    }

    pub fn with_security_monitors(
        mut self,
        connection_log: Arc<dyn ConnectionLogPort>,
        events: Arc<dyn EventPublisherPort>,
        block: Arc<BlockAddressUseCase>,
        config: MonitorConfig,
        interval: Duration,
    ) -> Self {
        self.ids.push(schedule_security_monitors(
            self.scheduler.as_ref(),
            connection_log,
            events,
            block,
            config,
            interval,
        ));
        self
    }

    /// Finishes registration and returns every job id, so the caller (the
    /// composition root) can cancel the whole batch on shutdown without
    /// disturbing jobs owned by other subsystems.
    pub fn start(self) -> Vec<JobId> {
        info!(count = self.ids.len(), "background job runner registered all periodic tasks");
        self.ids
    }
}

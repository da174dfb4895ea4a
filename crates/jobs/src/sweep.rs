use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use sentinel_fw_application::ports::SchedulerPort;
use sentinel_fw_application::use_cases::blocking::SweepExpiredUseCase;
use sentinel_fw_domain::JobId;
use tracing::{error, info};

/// Drives the expiry sweep as a periodic task: a closure registered against
/// the shared [`SchedulerPort`] rather than spawning its own interval, since
/// the scheduler already owns cancellation/pause/resume.
pub fn schedule_sweep_expired(
    scheduler: &dyn SchedulerPort,
    sweep: Arc<SweepExpiredUseCase>,
    interval: Duration,
) -> JobId {
    info!(interval_secs = interval.as_secs(), "scheduling expiry sweep");
    scheduler.schedule_recurring(
        Utc::now() + chrono::Duration::from_std(interval).unwrap_or_default(),
        interval,
        Arc::new(move || {
            let sweep = sweep.clone();
            Box::pin(async move {
                match sweep.execute().await {
                    Ok(0) => {}
                    Ok(count) => info!(count, "expiry sweep unblocked addresses"),
                    Err(e) => error!(error = %e, "expiry sweep failed"),
                }
            })
        }),
    )
}

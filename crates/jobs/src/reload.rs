use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use sentinel_fw_application::commands::ReloadPort;
use sentinel_fw_application::ports::{PacketFilterPort, SchedulerPort};
use sentinel_fw_domain::JobId;
use tracing::{error, info};

/// Periodic blocklist/whitelist/geo-zone reload, the scheduler-driven
/// counterpart to the `reload` command.
pub fn schedule_periodic_reload(
    scheduler: &dyn SchedulerPort,
    reload: Arc<dyn ReloadPort>,
    packet_filter: Arc<dyn PacketFilterPort>,
    interval: Duration,
) -> JobId {
    info!(interval_secs = interval.as_secs(), "scheduling periodic blocklist/whitelist/geo reload");
    scheduler.schedule_recurring(
        Utc::now() + chrono::Duration::from_std(interval).unwrap_or_default(),
        interval,
        Arc::new(move || {
            let reload = reload.clone();
            let packet_filter = packet_filter.clone();
            Box::pin(async move {
                if let Err(e) = reload.reload().await {
                    error!(error = %e, "periodic file-backed reload failed");
                    return;
                }
                match packet_filter.reload().await {
                    Ok(outcome) if outcome.success => info!("periodic reload completed"),
                    Ok(outcome) => error!(diagnostic = %outcome.diagnostic, "periodic packet-filter reload failed"),
                    Err(e) => error!(error = %e, "periodic packet-filter reload errored"),
                }
            })
        }),
    )
}

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use sentinel_fw_application::ports::SchedulerPort;
use sentinel_fw_domain::JobId;
use tracing::{error, warn};
use x509_parser::pem::parse_x509_pem;

/// Certificate monitor: warns well ahead of the service certificate's expiry so
/// a restart has time to regenerate it (`rcgen`/`x509-parser`). Read-only —
/// it never rewrites or rotates the certificate itself, that's
/// `command_server::tls` on next process start.
pub fn schedule_cert_expiry_watch(
    scheduler: &dyn SchedulerPort,
    cert_path: PathBuf,
    warn_within_days: i64,
    interval: Duration,
) -> JobId {
    scheduler.schedule_recurring(
        Utc::now() + chrono::Duration::from_std(interval).unwrap_or_default(),
        interval,
        Arc::new(move || {
            let cert_path = cert_path.clone();
            Box::pin(async move {
                check_once(&cert_path, warn_within_days).await;
            })
        }),
    )
}

async fn check_once(cert_path: &PathBuf, warn_within_days: i64) {
    let pem_bytes = match tokio::fs::read(cert_path).await {
        Ok(bytes) => bytes,
        Err(e) => {
            warn!(error = %e, path = %cert_path.display(), "cert watch: unable to read certificate bundle");
            return;
        }
    };

    let (_, pem) = match parse_x509_pem(&pem_bytes) {
        Ok(parsed) => parsed,
        Err(e) => {
            error!(error = %e, "cert watch: certificate bundle is not valid PEM");
            return;
        }
    };

    let cert = match pem.parse_x509() {
        Ok(cert) => cert,
        Err(e) => {
            error!(error = %e, "cert watch: failed to parse certificate DER");
            return;
        }
    };

    let not_after = cert.validity().not_after;
    let remaining_seconds = not_after.timestamp() - Utc::now().timestamp();
    let remaining_days = remaining_seconds / 86_400;

    if remaining_seconds <= 0 {
        error!("cert watch: service certificate has expired");
    } else if remaining_days <= warn_within_days {
        warn!(remaining_days, "cert watch: service certificate nearing expiry");
    }
}

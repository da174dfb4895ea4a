use chrono::{DateTime, Utc};
use sentinel_fw_domain::{DomainError, JobId};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

/// A job callback produces a future each time it fires, so the same job can
/// run more than once (recurring jobs) without reconstructing its closure.
pub type JobCallback = Arc<dyn Fn() -> Pin<Box<dyn Future<Output = ()> + Send>> + Send + Sync>;

/// One-shot, recurring, and absolute-time jobs with pause/resume/cancel.
///
/// Every job is independently timed. Cancellation is immediate with respect
/// to future fires; a fire already in flight is allowed to complete.
pub trait SchedulerPort: Send + Sync {
    fn schedule_once(&self, delay: Duration, cb: JobCallback) -> JobId;
    fn schedule_once_at(&self, at: DateTime<Utc>, cb: JobCallback) -> JobId;
    fn schedule_recurring(&self, due: DateTime<Utc>, period: Duration, cb: JobCallback) -> JobId;

    fn pause(&self, id: JobId) -> Result<(), DomainError>;
    fn resume(&self, id: JobId) -> Result<(), DomainError>;
    /// Idempotent: cancelling an already-cancelled or unknown id is a no-op,
    /// never an error.
    fn cancel(&self, id: JobId);
    fn cancel_all(&self);
    fn list_ids(&self) -> Vec<JobId>;
}

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use sentinel_fw_domain::{DomainError, JobId};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use sentinel_fw_application::ports::{JobCallback, SchedulerPort};

struct JobHandle {
    cancel: CancellationToken,
    paused: Arc<AtomicBool>,
}

/// A registry of arbitrary one-shot/recurring callbacks driven by
/// `tokio::spawn` + `tokio::select!` loops, each with its own cancellation
/// and pause state. A one-shot removes its own entry once its callback
/// returns, so a fired job stops appearing in `list_ids()`/`cancel()`.
pub struct Scheduler {
    jobs: Arc<DashMap<JobId, JobHandle>>,
    root: CancellationToken,
}

impl Scheduler {
    pub fn new(root: CancellationToken) -> Self {
        Self {
            jobs: Arc::new(DashMap::new()),
            root,
        }
    }

    fn register(&self, cb: JobCallback, first_fire: FireSchedule) -> JobId {
        let id = JobId::new();
        let cancel = self.root.child_token();
        let paused = Arc::new(AtomicBool::new(false));
        self.jobs.insert(
            id,
            JobHandle {
                cancel: cancel.clone(),
                paused: paused.clone(),
            },
        );

        let jobs = self.jobs.clone();
        tokio::spawn(async move {
            match first_fire {
                FireSchedule::Once(delay) => {
                    tokio::select! {
                        _ = cancel.cancelled() => return,
                        _ = tokio::time::sleep(delay) => {}
                    }
                    if !paused.load(Ordering::Relaxed) {
                        cb().await;
                    }
                    jobs.remove(&id);
                }
                FireSchedule::OnceAt(at) => {
                    let delay = (at - Utc::now()).to_std().unwrap_or(Duration::ZERO);
                    tokio::select! {
                        _ = cancel.cancelled() => return,
                        _ = tokio::time::sleep(delay) => {}
                    }
                    if !paused.load(Ordering::Relaxed) {
                        cb().await;
                    }
                    jobs.remove(&id);
                }
                FireSchedule::Recurring(due, period) => {
                    let initial_delay = (due - Utc::now()).to_std().unwrap_or(Duration::ZERO);
                    tokio::select! {
                        _ = cancel.cancelled() => return,
                        _ = tokio::time::sleep(initial_delay) => {}
                    }
                    if !paused.load(Ordering::Relaxed) {
                        cb().await;
                    }
                    let mut ticker = tokio::time::interval(period);
                    ticker.tick().await; // absorb the immediate first tick
                    loop {
                        tokio::select! {
                            _ = cancel.cancelled() => break,
                            _ = ticker.tick() => {
                                if !paused.load(Ordering::Relaxed) {
                                    cb().await;
                                }
                            }
                        }
                    }
                }
            }
            debug!(%id, "scheduler job loop exited");
        });

        id
    }
}

enum FireSchedule {
    Once(Duration),
    OnceAt(DateTime<Utc>),
    Recurring(DateTime<Utc>, Duration),
}

impl SchedulerPort for Scheduler {
    fn schedule_once(&self, delay: Duration, cb: JobCallback) -> JobId {
        self.register(cb, FireSchedule::Once(delay))
    }

    fn schedule_once_at(&self, at: DateTime<Utc>, cb: JobCallback) -> JobId {
        self.register(cb, FireSchedule::OnceAt(at))
    }

    fn schedule_recurring(&self, due: DateTime<Utc>, period: Duration, cb: JobCallback) -> JobId {
        self.register(cb, FireSchedule::Recurring(due, period))
    }

    fn pause(&self, id: JobId) -> Result<(), DomainError> {
        let handle = self
            .jobs
            .get(&id)
            .ok_or_else(|| DomainError::JobNotFound(id.to_string()))?;
        handle.paused.store(true, Ordering::Relaxed);
        Ok(())
    }

    fn resume(&self, id: JobId) -> Result<(), DomainError> {
        let handle = self
            .jobs
            .get(&id)
            .ok_or_else(|| DomainError::JobNotFound(id.to_string()))?;
        handle.paused.store(false, Ordering::Relaxed);
        Ok(())
    }

    fn cancel(&self, id: JobId) {
        if let Some((_, handle)) = self.jobs.remove(&id) {
            handle.cancel.cancel();
        } else {
            warn!(%id, "cancel of unknown or already-cancelled job, ignoring");
        }
    }

    fn cancel_all(&self) {
        for entry in self.jobs.iter() {
            entry.value().cancel.cancel();
        }
        self.jobs.clear();
    }

    fn list_ids(&self) -> Vec<JobId> {
        self.jobs.iter().map(|e| *e.key()).collect()
    }
}

/// Wraps an inner [`SchedulerPort`] and tracks only the jobs it created
/// itself, so its `cancel_all` never disturbs jobs owned by other
/// subsystems.
pub struct PluginScopedScheduler {
    inner: Arc<dyn SchedulerPort>,
    owned: std::sync::Mutex<Vec<JobId>>,
}

impl PluginScopedScheduler {
    pub fn new(inner: Arc<dyn SchedulerPort>) -> Self {
        Self {
            inner,
            owned: std::sync::Mutex::new(Vec::new()),
        }
    }

    fn track(&self, id: JobId) -> JobId {
        self.owned.lock().unwrap().push(id);
        id
    }
}

impl SchedulerPort for PluginScopedScheduler {
    fn schedule_once(&self, delay: Duration, cb: JobCallback) -> JobId {
        self.track(self.inner.schedule_once(delay, cb))
    }
    fn schedule_once_at(&self, at: DateTime<Utc>, cb: JobCallback) -> JobId {
        self.track(self.inner.schedule_once_at(at, cb))
    }
    fn schedule_recurring(&self, due: DateTime<Utc>, period: Duration, cb: JobCallback) -> JobId {
        self.track(self.inner.schedule_recurring(due, period, cb))
    }
    fn pause(&self, id: JobId) -> Result<(), DomainError> {
        self.inner.pause(id)
    }
    fn resume(&self, id: JobId) -> Result<(), DomainError> {
        self.inner.resume(id)
    }
    fn cancel(&self, id: JobId) {
        self.inner.cancel(id);
        self.owned.lock().unwrap().retain(|owned| *owned != id);
    }
    fn cancel_all(&self) {
        let mut owned = self.owned.lock().unwrap();
        for id in owned.drain(..) {
            self.inner.cancel(id);
        }
    }
    fn list_ids(&self) -> Vec<JobId> {
        self.owned.lock().unwrap().clone()
    }
}

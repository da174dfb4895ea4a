use std::net::IpAddr;
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use rustc_hash::FxBuildHasher;
use sentinel_fw_domain::AttemptWindow;

/// Per-address attempt windows behind striped locks: a `DashMap` shards
/// internally, so pruning address A never blocks a concurrent read/write on
/// address B.
pub struct AttemptWindows {
    inner: DashMap<IpAddr, Mutex<AttemptWindow>, FxBuildHasher>,
}

impl AttemptWindows {
    pub fn new() -> Self {
        Self {
            inner: DashMap::with_hasher(FxBuildHasher),
        }
    }

    /// Records `at`, prunes entries older than `threshold_seconds`, and
    /// returns `(size, span_seconds)` after pruning. An empty window after
    /// pruning is reported as `(0, None)`, never as an error.
    pub fn record(
        &self,
        addr: IpAddr,
        at: DateTime<Utc>,
        threshold_seconds: i64,
    ) -> (usize, Option<f64>) {
        let entry = self
            .inner
            .entry(addr)
            .or_insert_with(|| Mutex::new(AttemptWindow::new()));
        let mut window = entry.lock().unwrap();
        window.record(at, threshold_seconds);
        (window.size(), window.span_seconds())
    }
}

impl Default for AttemptWindows {
    fn default() -> Self {
        Self::new()
    }
}

use chrono::{DateTime, Utc};
use std::collections::VecDeque;

/// Bounded, time-ordered sequence of observation timestamps for a single
/// address. All entries satisfy `t >= now - threshold_seconds` after
/// [`AttemptWindow::prune`] runs; callers own the locking discipline (see
/// `sentinel_fw_application::engine`), this type only maintains the invariant
/// once it holds the lock.
#[derive(Debug, Clone, Default)]
pub struct AttemptWindow {
    timestamps: VecDeque<DateTime<Utc>>,
}

impl AttemptWindow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an observation at `now`, then drop everything older than
    /// `now - threshold_seconds`.
    pub fn record(&mut self, now: DateTime<Utc>, threshold_seconds: i64) {
        self.timestamps.push_back(now);
        self.prune(now, threshold_seconds);
    }

    pub fn prune(&mut self, now: DateTime<Utc>, threshold_seconds: i64) {
        let cutoff = now - chrono::Duration::seconds(threshold_seconds);
        while let Some(front) = self.timestamps.front() {
            if *front < cutoff {
                self.timestamps.pop_front();
            } else {
                break;
            }
        }
    }

    pub fn size(&self) -> usize {
        self.timestamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    /// Span of the window in seconds, to one decimal place. `None` when the
    /// window holds fewer than two timestamps, rather than an error or zero.
    pub fn span_seconds(&self) -> Option<f64> {
        let first = self.timestamps.front()?;
        let last = self.timestamps.back()?;
        if first == last {
            return None;
        }
        Some((*last - *first).num_milliseconds() as f64 / 1000.0)
    }

    pub fn oldest(&self) -> Option<DateTime<Utc>> {
        self.timestamps.front().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn t(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000 + secs, 0).unwrap()
    }

    #[test]
    fn prune_keeps_only_entries_within_threshold() {
        let mut w = AttemptWindow::new();
        w.record(t(0), 10);
        w.record(t(5), 10);
        w.record(t(11), 10);
        // cutoff at t(11) with threshold 10 is t(1); t(0) should be pruned.
        assert_eq!(w.size(), 2);
        assert_eq!(w.oldest(), Some(t(5)));
    }

    #[test]
    fn empty_window_reports_no_span_and_no_block_worthy_size() {
        let w = AttemptWindow::new();
        assert_eq!(w.size(), 0);
        assert_eq!(w.span_seconds(), None);
    }

    #[test]
    fn threshold_attempts_trips_at_exactly_the_threshold() {
        let mut w = AttemptWindow::new();
        w.record(t(0), 10);
        w.record(t(1), 10);
        w.record(t(2), 10);
        assert_eq!(w.size(), 3);
        assert!(w.size() >= 3);
    }
}

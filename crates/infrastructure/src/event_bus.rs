use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use dashmap::DashMap;
use sentinel_fw_domain::{Event, EventKind};
use tracing::error;

use sentinel_fw_application::ports::EventPublisherPort;

/// A subscriber: a named, panic-isolated callback invoked on the publisher's
/// thread for every event of the kind it registered for.
pub trait EventHandler: Send + Sync {
    fn name(&self) -> &str;
    fn handle(&self, event: &Event);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// The event bus: true multi-subscriber pub/sub over a `DashMap` keyed
/// by [`EventKind`] holding every subscriber's handler, snapshotted under a
/// short-lived read before delivery so a handler registering/unregistering
/// mid-publish never deadlocks the publisher.
pub struct EventBus {
    subscribers: DashMap<EventKind, Vec<(SubscriptionId, Arc<dyn EventHandler>)>>,
    next_id: AtomicU64,
}

impl EventBus {
    pub fn new() -> Self {
        Self {
            subscribers: DashMap::new(),
            next_id: AtomicU64::new(1),
        }
    }

    pub fn subscribe(&self, kind: EventKind, handler: Arc<dyn EventHandler>) -> SubscriptionId {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.subscribers.entry(kind).or_default().push((id, handler));
        id
    }

    pub fn unsubscribe(&self, id: SubscriptionId) {
        for mut entry in self.subscribers.iter_mut() {
            entry.value_mut().retain(|(sub_id, _)| *sub_id != id);
        }
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl EventPublisherPort for EventBus {
    fn publish(&self, event: Event) {
        let handlers: Vec<_> = self
            .subscribers
            .get(&event.kind())
            .map(|entry| entry.value().clone())
            .unwrap_or_default();

        for (_, handler) in handlers {
            let result = catch_unwind(AssertUnwindSafe(|| handler.handle(&event)));
            if let Err(panic) = result {
                let message = panic
                    .downcast_ref::<&str>()
                    .map(|s| s.to_string())
                    .or_else(|| panic.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| "non-string panic payload".to_string());
                error!(handler = handler.name(), %message, "event handler panicked");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use std::sync::Mutex;

    struct Recorder {
        seen: Mutex<Vec<String>>,
    }
    impl EventHandler for Recorder {
        fn name(&self) -> &str {
            "recorder"
        }
        fn handle(&self, event: &Event) {
            self.seen.lock().unwrap().push(format!("{:?}", event.kind()));
        }
    }

    struct Panicker;
    impl EventHandler for Panicker {
        fn name(&self) -> &str {
            "panicker"
        }
        fn handle(&self, _event: &Event) {
            panic!("boom");
        }
    }

    fn sample() -> Event {
        Event::Unblock {
            address: "10.0.0.1".parse().unwrap(),
            time: Utc::now(),
        }
    }

    #[test]
    fn subscriber_receives_matching_events_only() {
        let bus = EventBus::new();
        let recorder = Arc::new(Recorder {
            seen: Mutex::new(Vec::new()),
        });
        bus.subscribe(EventKind::Unblock, recorder.clone());
        bus.subscribe(EventKind::Block, recorder.clone());
        bus.publish(sample());
        assert_eq!(recorder.seen.lock().unwrap().len(), 1);
    }

    #[test]
    fn unsubscribe_stops_delivery() {
        let bus = EventBus::new();
        let recorder = Arc::new(Recorder {
            seen: Mutex::new(Vec::new()),
        });
        let id = bus.subscribe(EventKind::Unblock, recorder.clone());
        bus.unsubscribe(id);
        bus.publish(sample());
        assert!(recorder.seen.lock().unwrap().is_empty());
    }

    #[test]
    fn a_panicking_handler_does_not_stop_other_handlers() {
        let bus = EventBus::new();
        let recorder = Arc::new(Recorder {
            seen: Mutex::new(Vec::new()),
        });
        bus.subscribe(EventKind::Unblock, Arc::new(Panicker));
        bus.subscribe(EventKind::Unblock, recorder.clone());
        bus.publish(sample());
        assert_eq!(recorder.seen.lock().unwrap().len(), 1);
    }
}

use std::sync::Arc;

use sentinel_fw_domain::{Event, HistoryEvent};
use tracing::warn;

use sentinel_fw_application::ports::StorePort;

use crate::event_bus::EventHandler;

/// The event-bus subscriber that turns block/unblock/geo-block/rate-limit
/// decisions into durable `ip_history` rows. The only production writer of
/// history — everything else only reads it back through `ip-history`.
pub struct HistoryRecorder {
    store: Arc<dyn StorePort>,
}

impl HistoryRecorder {
    pub fn new(store: Arc<dyn StorePort>) -> Self {
        Self { store }
    }
}

fn describe(event: &Event) -> Option<(std::net::IpAddr, chrono::DateTime<chrono::Utc>, String)> {
    match event {
        Event::Block {
            address,
            time,
            duration_seconds,
        } => Some((*address, *time, format!("blocked for {duration_seconds}s"))),
        Event::Unblock { address, time } => Some((*address, *time, "unblocked".to_string())),
        Event::BlockExpired { address, time } => {
            Some((*address, *time, "block expired".to_string()))
        }
        Event::GeoBlock {
            address,
            time,
            country,
        } => Some((*address, *time, format!("geo-blocked ({country})"))),
        Event::RateLimitExceeded {
            address,
            time,
            attempts,
            window_seconds,
        } => Some((
            *address,
            *time,
            format!("rate limit exceeded: {attempts} attempts in {window_seconds:.1}s"),
        )),
        _ => None,
    }
}

impl EventHandler for HistoryRecorder {
    fn name(&self) -> &str {
        "history_recorder"
    }

    fn handle(&self, event: &Event) {
        let Some((address, time, message)) = describe(event) else {
            return;
        };

        let store = self.store.clone();
        tokio::spawn(async move {
            let address_id = match store.get_or_create_address_id(address).await {
                Ok(id) => id,
                Err(e) => {
                    warn!(%address, error = %e, "failed to resolve address id for history write");
                    return;
                }
            };
            if let Err(e) = store
                .insert_history(HistoryEvent::new(address_id, time, message))
                .await
            {
                warn!(%address, error = %e, "failed to record history event");
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use sentinel_fw_domain::{AddressId, BlockRecord, Comment, DomainError, Tag};
    use sentinel_fw_application::ports::StoreStats;
    use std::net::IpAddr;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingStore {
        history: Mutex<Vec<HistoryEvent>>,
    }

    #[async_trait]
    impl StorePort for RecordingStore {
        async fn get_or_create_address_id(&self, _ip: IpAddr) -> Result<AddressId, DomainError> {
            Ok(AddressId::new())
        }
        async fn upsert_block(&self, _record: &BlockRecord) -> Result<(), DomainError> {
            Ok(())
        }
        async fn delete_block(&self, _addr: IpAddr) -> Result<(), DomainError> {
            Ok(())
        }
        async fn list_blocks(&self) -> Result<Vec<BlockRecord>, DomainError> {
            Ok(vec![])
        }
        async fn remove_all_expired(
            &self,
            _now: chrono::DateTime<chrono::Utc>,
        ) -> Result<Vec<BlockRecord>, DomainError> {
            Ok(vec![])
        }
        async fn insert_history(&self, event: HistoryEvent) -> Result<(), DomainError> {
            self.history.lock().unwrap().push(event);
            Ok(())
        }
        async fn list_history(&self, _address_id: AddressId) -> Result<Vec<HistoryEvent>, DomainError> {
            Ok(vec![])
        }
        async fn insert_tag(&self, _tag: Tag) -> Result<(), DomainError> {
            Ok(())
        }
        async fn delete_tag(&self, _address_id: AddressId, _value: &str) -> Result<(), DomainError> {
            Ok(())
        }
        async fn list_tags(&self, _address_id: AddressId) -> Result<Vec<Tag>, DomainError> {
            Ok(vec![])
        }
        async fn insert_comment(&self, _comment: Comment) -> Result<(), DomainError> {
            Ok(())
        }
        async fn list_comments(&self, _address_id: AddressId) -> Result<Vec<Comment>, DomainError> {
            Ok(vec![])
        }
        async fn stats(&self) -> Result<StoreStats, DomainError> {
            Ok(StoreStats::default())
        }
    }

    fn addr(s: &str) -> IpAddr {
        s.parse().unwrap()
    }

    #[tokio::test]
    async fn block_event_is_persisted_as_history() {
        let store = Arc::new(RecordingStore::default());
        let recorder = HistoryRecorder::new(store.clone());
        recorder.handle(&Event::Block {
            address: addr("10.0.0.1"),
            duration_seconds: 60,
            time: chrono::Utc::now(),
        });
        // handle() fires a detached task; give it a chance to run.
        tokio::time::sleep(std::time::Duration::from_millis(20)).await;
        let history = store.history.lock().unwrap();
        assert_eq!(history.len(), 1);
        assert!(history[0].message.contains("blocked for 60s"));
    }

    #[test]
    fn connection_attempt_is_not_recorded() {
        assert!(describe(&Event::ConnectionAttempt {
            address: addr("10.0.0.1"),
            time: chrono::Utc::now(),
            src_port: 1,
            dst_port: 2,
        })
        .is_none());
    }
}

use sentinel_fw_domain::Event;

/// Publishes to the event bus. Delivery is synchronous on the
/// publisher's thread; a handler panic is isolated by the implementation and
/// never propagates back through `publish`.
pub trait EventPublisherPort: Send + Sync {
    fn publish(&self, event: Event);
}

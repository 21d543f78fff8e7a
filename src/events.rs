//! Cache Events
//!
//! Explicit publish/subscribe channel for cache changes made by the
//! mediator. Subscribers that fall behind miss events (lagged); publishing
//! with no subscribers is not an error.

use serde::Serialize;
use tokio::sync::broadcast;
use tracing::debug;

use crate::key::RequestKey;

/// Default number of buffered events per subscriber
pub const DEFAULT_EVENT_CAPACITY: usize = 256;

// == Cache Event ==
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "key", rename_all = "snake_case")]
pub enum CacheEvent {
    /// A freshly produced value was stored
    Stored(RequestKey),
    /// An entry was invalidated
    Invalidated(RequestKey),
}

impl CacheEvent {
    pub fn key(&self) -> &RequestKey {
        match self {
            CacheEvent::Stored(key) | CacheEvent::Invalidated(key) => key,
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            CacheEvent::Stored(_) => "stored",
            CacheEvent::Invalidated(_) => "invalidated",
        }
    }
}

// == Event Bus ==
#[derive(Debug, Clone)]
pub struct EventBus {
    tx: broadcast::Sender<CacheEvent>,
}

impl EventBus {
    /// Capacity is clamped to at least one slot.
    pub fn new(capacity: usize) -> Self {
        let (tx, _rx) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    pub fn publish(&self, event: CacheEvent) {
        let kind = event.kind();
        match self.tx.send(event) {
            Ok(receivers) => debug!(event = kind, receivers, "Published cache event"),
            Err(_) => debug!(event = kind, "No subscribers for cache event"),
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<CacheEvent> {
        self.tx.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_EVENT_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_publish_without_subscribers() {
        let bus = EventBus::default();
        bus.publish(CacheEvent::Stored(RequestKey::from("k")));
    }

    #[tokio::test]
    async fn test_publish_with_subscriber() {
        let bus = EventBus::new(4);
        let mut rx = bus.subscribe();

        bus.publish(CacheEvent::Invalidated(RequestKey::from("k")));

        let event = rx.recv().await.unwrap();
        assert_eq!(event, CacheEvent::Invalidated(RequestKey::from("k")));
        assert_eq!(event.key().as_str(), "k");
    }

    #[test]
    fn test_event_serialize() {
        let json = serde_json::to_string(&CacheEvent::Stored(RequestKey::from("k"))).unwrap();
        assert_eq!(json, r#"{"type":"stored","key":"k"}"#);
    }
}

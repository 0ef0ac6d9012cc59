//! Message-bus abstraction and the in-process implementation.
//!
//! The adapter only needs publish and subscribe; everything else (consumer
//! groups, provisioning, delivery guarantees) belongs to the concrete
//! backend. `InMemoryBus` is the default backend for tests and
//! single-process runs; a NATS-backed implementation lives behind the
//! `nats` feature.

use async_trait::async_trait;
use bytes::Bytes;
use dashmap::DashMap;
use tokio::sync::mpsc;

/// Channel capacity for each subscriber.
const SUBSCRIBER_CAPACITY: usize = 256;

// ---------------------------------------------------------------------------
// MessageBus trait
// ---------------------------------------------------------------------------

/// Receiving half of one topic subscription.
///
/// Backends with foreign subscription types forward their deliveries into
/// this common channel shape.
#[derive(Debug)]
pub struct BusSubscriber {
    rx: mpsc::Receiver<Bytes>,
}

impl BusSubscriber {
    pub(crate) fn new(rx: mpsc::Receiver<Bytes>) -> Self {
        Self { rx }
    }

    /// Receives the next message payload, or `None` once the subscription
    /// is closed.
    pub async fn recv(&mut self) -> Option<Bytes> {
        self.rx.recv().await
    }
}

/// Topic-addressed publish/subscribe transport.
#[async_trait]
pub trait MessageBus: Send + Sync + 'static {
    /// Publishes a payload to a topic.
    async fn publish(&self, topic: &str, payload: Bytes) -> anyhow::Result<()>;

    /// Opens a subscription to a topic.
    async fn subscribe(&self, topic: &str) -> anyhow::Result<BusSubscriber>;
}

// ---------------------------------------------------------------------------
// InMemoryBus
// ---------------------------------------------------------------------------

/// In-process bus: a topic table of subscriber channels.
///
/// Deliveries fan out to every subscriber of the topic. Publishing to a
/// topic with no subscribers succeeds and delivers nothing, as on a real
/// bus.
#[derive(Debug, Default)]
pub struct InMemoryBus {
    topics: DashMap<String, Vec<mpsc::Sender<Bytes>>>,
}

impl InMemoryBus {
    /// Creates an empty bus.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MessageBus for InMemoryBus {
    async fn publish(&self, topic: &str, payload: Bytes) -> anyhow::Result<()> {
        // Clone the senders out first: holding a map guard across an await
        // would block concurrent subscribes on the same shard.
        let senders: Vec<mpsc::Sender<Bytes>> = self
            .topics
            .get(topic)
            .map(|entry| entry.value().clone())
            .unwrap_or_default();

        let mut dropped = false;
        for sender in senders {
            if sender.send(payload.clone()).await.is_err() {
                dropped = true;
            }
        }
        if dropped {
            if let Some(mut entry) = self.topics.get_mut(topic) {
                entry.value_mut().retain(|s| !s.is_closed());
            }
        }
        Ok(())
    }

    async fn subscribe(&self, topic: &str) -> anyhow::Result<BusSubscriber> {
        let (tx, rx) = mpsc::channel(SUBSCRIBER_CAPACITY);
        self.topics.entry(topic.to_string()).or_default().push(tx);
        Ok(BusSubscriber::new(rx))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[tokio::test]
    async fn subscriber_receives_published_payload() {
        let bus = InMemoryBus::new();
        let mut sub = bus.subscribe("alpha").await.unwrap();

        bus.publish("alpha", Bytes::from_static(b"hello"))
            .await
            .unwrap();

        let payload = sub.recv().await.unwrap();
        assert_eq!(payload.as_ref(), b"hello");
    }

    #[tokio::test]
    async fn topics_are_isolated() {
        let bus = InMemoryBus::new();
        let mut sub = bus.subscribe("alpha").await.unwrap();

        bus.publish("beta", Bytes::from_static(b"other"))
            .await
            .unwrap();
        bus.publish("alpha", Bytes::from_static(b"mine"))
            .await
            .unwrap();

        assert_eq!(sub.recv().await.unwrap().as_ref(), b"mine");
    }

    #[tokio::test]
    async fn publish_without_subscribers_succeeds() {
        let bus = InMemoryBus::new();
        bus.publish("nobody", Bytes::from_static(b"void"))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn deliveries_fan_out_to_all_subscribers() {
        let bus = InMemoryBus::new();
        let mut a = bus.subscribe("alpha").await.unwrap();
        let mut b = bus.subscribe("alpha").await.unwrap();

        bus.publish("alpha", Bytes::from_static(b"both"))
            .await
            .unwrap();

        assert_eq!(a.recv().await.unwrap().as_ref(), b"both");
        assert_eq!(b.recv().await.unwrap().as_ref(), b"both");
    }

    #[tokio::test]
    async fn dropped_subscribers_are_pruned() {
        let bus = InMemoryBus::new();
        let sub = bus.subscribe("alpha").await.unwrap();
        let mut live = bus.subscribe("alpha").await.unwrap();
        drop(sub);

        bus.publish("alpha", Bytes::from_static(b"still works"))
            .await
            .unwrap();
        assert_eq!(live.recv().await.unwrap().as_ref(), b"still works");

        // The closed channel was removed from the topic table.
        assert_eq!(bus.topics.get("alpha").unwrap().len(), 1);
    }

    #[tokio::test]
    async fn recv_on_quiet_topic_waits() {
        let bus = InMemoryBus::new();
        let mut sub = bus.subscribe("alpha").await.unwrap();

        let outcome = tokio::time::timeout(Duration::from_millis(50), sub.recv()).await;
        assert!(outcome.is_err());
    }
}

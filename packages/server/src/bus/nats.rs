//! NATS-backed message bus (enabled with the `nats` feature).

use async_trait::async_trait;
use bytes::Bytes;
use futures_util::StreamExt;
use tokio::sync::mpsc;
use tracing::{debug, info};
use uuid::Uuid;

use super::transport::{BusSubscriber, MessageBus};

/// Message bus backed by a NATS server.
///
/// Subscriptions use a queue group so multiple instances of the same
/// service share one request stream instead of all receiving every message.
pub struct NatsBus {
    client: async_nats::Client,
    group: String,
}

impl NatsBus {
    /// Connects to the given NATS URL.
    ///
    /// The connection is named `{client_id_prefix}-{uuid}` so individual
    /// instances are distinguishable in server-side monitoring.
    ///
    /// # Errors
    ///
    /// Returns an error when the server cannot be reached.
    pub async fn connect(url: &str, group: &str, client_id_prefix: &str) -> anyhow::Result<Self> {
        let name = format!("{client_id_prefix}-{}", Uuid::new_v4());
        let client = async_nats::ConnectOptions::new()
            .name(&name)
            .connect(url)
            .await?;
        info!("connected to NATS at {url} as {name} (group {group})");
        Ok(Self {
            client,
            group: group.to_string(),
        })
    }
}

#[async_trait]
impl MessageBus for NatsBus {
    async fn publish(&self, topic: &str, payload: Bytes) -> anyhow::Result<()> {
        self.client.publish(topic.to_string(), payload).await?;
        Ok(())
    }

    async fn subscribe(&self, topic: &str) -> anyhow::Result<BusSubscriber> {
        let mut subscription = self
            .client
            .queue_subscribe(topic.to_string(), self.group.clone())
            .await?;

        // Forward deliveries into the common subscriber channel shape.
        let (tx, rx) = mpsc::channel(256);
        let subject = topic.to_string();
        tokio::spawn(async move {
            while let Some(message) = subscription.next().await {
                if tx.send(message.payload).await.is_err() {
                    break;
                }
            }
            debug!("forwarding loop for {subject} finished");
        });

        Ok(BusSubscriber::new(rx))
    }
}

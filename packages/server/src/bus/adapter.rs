//! Asynchronous adapter: bridges bus traffic to the operation registry.
//!
//! Per inbound message the adapter moves through
//! `RECEIVED -> RESOLVING -> INVOKING -> {SUCCEEDED | HANDLER_NOT_FOUND |
//! HANDLER_FAILED} -> PUBLISHED`: every message that reaches RESOLVING
//! produces exactly one reply envelope on its `reply_destination`, no more
//! and no fewer. Each message is dispatched on its own task so one slow
//! handler never stalls the subscription loop.

use std::sync::Arc;

use bytes::Bytes;
use chrono::Utc;
use tracing::{debug, error, info, warn};

use patchbay_core::{ApiError, ApiRequest, CorrelationContext, Envelope};

use crate::config::EnvironmentConfig;
use crate::service::dispatch::failure_envelope;
use crate::service::registry::OperationRegistry;

use super::transport::{BusSubscriber, MessageBus};

/// Bridges message-bus traffic to the operation registry and back.
pub struct BusAdapter {
    bus: Arc<dyn MessageBus>,
    registry: Arc<OperationRegistry>,
    env: Arc<EnvironmentConfig>,
}

impl BusAdapter {
    /// Creates an adapter over the given bus, registry, and settings.
    #[must_use]
    pub fn new(
        bus: Arc<dyn MessageBus>,
        registry: Arc<OperationRegistry>,
        env: Arc<EnvironmentConfig>,
    ) -> Self {
        Self { bus, registry, env }
    }

    /// Publishes an outbound request to a topic.
    ///
    /// # Errors
    ///
    /// Fails loudly with `ApiError::Validation` when the request is not
    /// dispatchable over the bus (missing reply destination or unparseable
    /// resource URI) — such a request must never be silently dropped.
    pub async fn publish_request(&self, topic: &str, request: &ApiRequest) -> Result<(), ApiError> {
        info!(
            "publishing request to {topic}: {} {} txid={}",
            request.verb, request.resource, request.txid
        );
        if !request.is_valid_for_bus() {
            error!("request failed bus validity check - rejecting");
            return Err(ApiError::Validation {
                reason: "bus requests need a reply destination and a parseable resource URI"
                    .to_string(),
            });
        }
        let payload = serde_json::to_vec(request).map_err(|e| ApiError::Internal(e.into()))?;
        self.bus
            .publish(topic, payload.into())
            .await
            .map_err(ApiError::Internal)
    }

    /// Subscribes to the configured request and reply topics and spawns the
    /// dispatch loop.
    ///
    /// Subscriptions are opened before this returns, so a message published
    /// right after `start()` is never missed.
    ///
    /// # Errors
    ///
    /// Returns an error when either subscription cannot be opened.
    pub async fn start(self: Arc<Self>) -> anyhow::Result<tokio::task::JoinHandle<()>> {
        let requests = self.bus.subscribe(&self.env.request_topic).await?;
        let replies = self.bus.subscribe(&self.env.reply_topic).await?;
        info!(
            "bus adapter listening on {} (replies observed on {})",
            self.env.request_topic, self.env.reply_topic
        );
        Ok(tokio::spawn(async move { self.run(requests, replies).await }))
    }

    async fn run(self: Arc<Self>, mut requests: BusSubscriber, mut replies: BusSubscriber) {
        let mut replies_open = true;
        loop {
            tokio::select! {
                message = requests.recv() => {
                    match message {
                        Some(payload) => {
                            let adapter = Arc::clone(&self);
                            tokio::spawn(async move { adapter.handle_message(payload).await });
                        }
                        None => {
                            info!("request subscription closed; bus adapter stopping");
                            break;
                        }
                    }
                }
                message = replies.recv(), if replies_open => {
                    match message {
                        Some(payload) => Self::log_reply(&payload),
                        None => replies_open = false,
                    }
                }
            }
        }
    }

    /// Handles one inbound request message end to end.
    async fn handle_message(&self, payload: Bytes) {
        let request: ApiRequest = match serde_json::from_slice(&payload) {
            Ok(request) => request,
            Err(e) => {
                // No reply destination is knowable before decoding succeeds.
                error!("dropping undecodable request message: {e}");
                return;
            }
        };
        info!(
            "received request message: {} {} txid={}",
            request.verb, request.resource, request.txid
        );
        if request.reply_to.is_empty() {
            error!(
                "dropping request without reply destination: txid={}",
                request.txid
            );
            return;
        }

        let envelope = self.dispatch(&request).await;
        let code = envelope.code;
        match serde_json::to_vec(&envelope) {
            Ok(bytes) => match self.bus.publish(&request.reply_to, bytes.into()).await {
                Ok(()) => debug!(
                    "published reply to {}: code={code} txid={}",
                    request.reply_to, request.txid
                ),
                Err(e) => error!("failed to publish reply to {}: {e:#}", request.reply_to),
            },
            Err(e) => error!("failed to serialize reply envelope: {e}"),
        }
    }

    /// Resolves and invokes the handler for a decoded request, producing
    /// exactly one envelope.
    async fn dispatch(&self, request: &ApiRequest) -> Envelope {
        // The originating caller owns the transaction id; only the arrival
        // time is stamped here.
        let ctx = CorrelationContext::inherited(request.txid, Utc::now());
        let responder = &self.env.service_name;

        let path = match request.uri() {
            Ok(uri) => uri.path().to_string(),
            Err(e) => {
                let err = ApiError::Validation {
                    reason: format!("unparseable resource URI: {e}"),
                };
                return failure_envelope(&err, &ctx, responder);
            }
        };

        match self.registry.resolve(request.verb, &path) {
            None => {
                let err = ApiError::NotFound {
                    verb: request.verb,
                    resource: request.resource.clone(),
                };
                failure_envelope(&err, &ctx, responder)
            }
            Some(handler) => match handler.invoke(ctx.clone()).await {
                Ok(mut envelope) => {
                    envelope.responder_name = Some(responder.clone());
                    envelope.responder_resource_signature = Some(request.resource_signature());
                    envelope
                }
                Err(err) => failure_envelope(&err, &ctx, responder),
            },
        }
    }

    fn log_reply(payload: &Bytes) {
        // Inspection hook for responses addressed to this service; decide
        // here what, if anything, happens next in the workflow.
        match serde_json::from_slice::<Envelope>(payload) {
            Ok(envelope) => info!(
                "received response envelope: code={} txid={}",
                envelope.code, envelope.txid
            ),
            Err(e) => warn!("received undecodable response message: {e}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

//! The uniform response envelope and its builder.
//!
//! Every response this service produces — HTTP or bus, success or failure —
//! is this one shape. The builder is pure construction with no failure
//! modes: the status code is a mandatory argument and the transaction id and
//! received-at timestamp are copied verbatim from the correlation context.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::context::CorrelationContext;

/// The standard response wrapper returned regardless of transport.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    /// Name of the service that produced this envelope. Stamped by the bus
    /// adapter immediately before publication; set directly on HTTP paths.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub responder_name: Option<String>,
    /// HTTP-style status code. Set on every path, no exceptions.
    pub code: u16,
    /// Transaction id, verbatim from the correlation context.
    pub txid: Uuid,
    /// When the responder first saw the request, verbatim from the context.
    pub request_received_at: DateTime<Utc>,
    /// `verb + "_" + resource` of the operation that produced this envelope.
    /// Present only on successful bus replies.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub responder_resource_signature: Option<String>,
    /// Operation result payload, if any.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub data: Option<Map<String, Value>>,
}

impl Envelope {
    /// Starts building an envelope for the given status and context.
    #[must_use]
    pub fn build(code: u16, ctx: &CorrelationContext) -> EnvelopeBuilder {
        EnvelopeBuilder {
            envelope: Envelope {
                responder_name: None,
                code,
                txid: ctx.txid,
                request_received_at: ctx.received_at,
                responder_resource_signature: None,
                data: None,
            },
        }
    }
}

/// Chained construction for [`Envelope`]. Created via [`Envelope::build`].
#[derive(Debug)]
pub struct EnvelopeBuilder {
    envelope: Envelope,
}

impl EnvelopeBuilder {
    /// Sets the responder's service name.
    #[must_use]
    pub fn responder_name(mut self, name: impl Into<String>) -> Self {
        self.envelope.responder_name = Some(name.into());
        self
    }

    /// Sets the responder resource signature (`verb + "_" + resource`).
    #[must_use]
    pub fn resource_signature(mut self, signature: impl Into<String>) -> Self {
        self.envelope.responder_resource_signature = Some(signature.into());
        self
    }

    /// Sets the result payload.
    #[must_use]
    pub fn data(mut self, data: Map<String, Value>) -> Self {
        self.envelope.data = Some(data);
        self
    }

    /// Sets a single-entry result payload, the common case for small
    /// acknowledgment responses.
    #[must_use]
    pub fn data_entry(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        let mut map = self.envelope.data.take().unwrap_or_default();
        map.insert(key.into(), value.into());
        self.envelope.data = Some(map);
        self
    }

    /// Finishes construction.
    #[must_use]
    pub fn finish(self) -> Envelope {
        self.envelope
    }
}

//! Correlation context carried with every request through the pipeline.
//!
//! The context is created once at the earliest entry point of a request
//! (HTTP middleware or bus message arrival) and passed by value to every
//! downstream call. Nothing retains it after the response is emitted.

use chrono::{DateTime, Utc};
use tracing::warn;
use uuid::Uuid;

/// Header carrying a caller-supplied transaction id on the HTTP path.
pub const TXID_HEADER: &str = "x-txid";

/// Transaction id and received-at timestamp for a single logical request.
///
/// Immutable after construction. Both fields are echoed verbatim into every
/// envelope produced for the request, regardless of transport or outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorrelationContext {
    /// Opaque identifier correlating this request across services.
    pub txid: Uuid,
    /// When this service first saw the request.
    pub received_at: DateTime<Utc>,
}

impl CorrelationContext {
    /// Creates a fresh context with a generated txid, stamped now.
    #[must_use]
    pub fn new() -> Self {
        Self {
            txid: Uuid::new_v4(),
            received_at: Utc::now(),
        }
    }

    /// Builds a context from a caller-supplied txid, if any.
    ///
    /// A syntactically valid UUID is reused verbatim so the same txid spans
    /// every hop of a cross-service workflow. An invalid value is replaced
    /// with a generated one — never propagated, never an error.
    #[must_use]
    pub fn from_caller(supplied: Option<&str>) -> Self {
        let txid = match supplied {
            Some(raw) => match raw.parse::<Uuid>() {
                Ok(txid) => txid,
                Err(_) => {
                    warn!("caller supplied invalid txid: {raw} -- using newly generated one");
                    Uuid::new_v4()
                }
            },
            None => Uuid::new_v4(),
        };
        Self {
            txid,
            received_at: Utc::now(),
        }
    }

    /// Builds a context from values already assigned by an upstream caller.
    ///
    /// Used on the bus path, where the originating caller owns txid
    /// generation and this service only stamps the arrival time.
    #[must_use]
    pub fn inherited(txid: Uuid, received_at: DateTime<Utc>) -> Self {
        Self { txid, received_at }
    }
}

impl Default for CorrelationContext {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_generates_distinct_txids() {
        let a = CorrelationContext::new();
        let b = CorrelationContext::new();
        assert_ne!(a.txid, b.txid);
    }

    #[test]
    fn valid_caller_txid_is_reused_verbatim() {
        let raw = "11111111-1111-1111-1111-111111111111";
        let ctx = CorrelationContext::from_caller(Some(raw));
        assert_eq!(ctx.txid.to_string(), raw);
    }

    #[test]
    fn invalid_caller_txid_is_replaced() {
        let ctx = CorrelationContext::from_caller(Some("not-a-uuid"));
        assert_ne!(ctx.txid.to_string(), "not-a-uuid");
        // A fresh id was generated rather than an error raised.
        assert_eq!(ctx.txid.get_version_num(), 4);
    }

    #[test]
    fn missing_caller_txid_generates_one() {
        let ctx = CorrelationContext::from_caller(None);
        assert_eq!(ctx.txid.get_version_num(), 4);
    }

    #[test]
    fn inherited_preserves_both_fields() {
        let txid = Uuid::new_v4();
        let at = Utc::now();
        let ctx = CorrelationContext::inherited(txid, at);
        assert_eq!(ctx.txid, txid);
        assert_eq!(ctx.received_at, at);
    }
}

//! Shared failure-to-envelope conversion for both adapters.

use patchbay_core::{ApiError, CorrelationContext, Envelope};
use tracing::{error, warn};

/// Converts a dispatch or handler failure into the standard envelope.
///
/// The caller's transaction id and received-at timestamp are preserved, the
/// status code follows the error taxonomy, and internal detail is logged
/// here rather than exposed in the reply.
#[must_use]
pub fn failure_envelope(err: &ApiError, ctx: &CorrelationContext, responder: &str) -> Envelope {
    match err {
        ApiError::Internal(cause) => {
            error!("request {} failed with internal error: {cause:#}", ctx.txid);
        }
        other => {
            warn!("request {} rejected: {other}", ctx.txid);
        }
    }
    Envelope::build(err.status_code(), ctx)
        .responder_name(responder)
        .finish()
}

#[cfg(test)]
mod tests {
    use patchbay_core::Verb;

    use super::*;

    #[test]
    fn not_found_maps_to_404_with_context_preserved() {
        let ctx = CorrelationContext::new();
        let err = ApiError::NotFound {
            verb: Verb::Get,
            resource: "/api/v1/doesnotexist".to_string(),
        };
        let envelope = failure_envelope(&err, &ctx, "patchbay");
        assert_eq!(envelope.code, 404);
        assert_eq!(envelope.txid, ctx.txid);
        assert_eq!(envelope.request_received_at, ctx.received_at);
        assert_eq!(envelope.responder_name.as_deref(), Some("patchbay"));
        assert!(envelope.data.is_none());
    }

    #[test]
    fn internal_error_maps_to_500_without_detail() {
        let ctx = CorrelationContext::new();
        let err = ApiError::Internal(anyhow::anyhow!("secret stack detail"));
        let envelope = failure_envelope(&err, &ctx, "patchbay");
        assert_eq!(envelope.code, 500);
        assert!(envelope.data.is_none());
        let json = serde_json::to_string(&envelope).unwrap();
        assert!(!json.contains("secret"));
    }

    #[test]
    fn upstream_status_is_forwarded_verbatim() {
        let ctx = CorrelationContext::new();
        let envelope = failure_envelope(&ApiError::Upstream { code: 503 }, &ctx, "patchbay");
        assert_eq!(envelope.code, 503);
    }
}

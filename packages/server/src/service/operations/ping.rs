//! Liveness probe operation.

use http::StatusCode;
use patchbay_core::Envelope;

use crate::service::handler::Handler;

/// Path the liveness probe is registered at, on both transports.
pub const PING_PATH: &str = "/api/v1/ping";

/// Returns a 200 envelope with the fixed acknowledgment payload.
#[must_use]
pub fn handler() -> Handler {
    Handler::new(|ctx| async move {
        Ok(Envelope::build(StatusCode::OK.as_u16(), &ctx)
            .data_entry("response", "pong")
            .finish())
    })
}

#[cfg(test)]
mod tests {
    use patchbay_core::CorrelationContext;

    use super::*;

    #[tokio::test]
    async fn ping_responds_pong_with_caller_context() {
        let ctx = CorrelationContext::new();
        let envelope = handler().invoke(ctx.clone()).await.unwrap();
        assert_eq!(envelope.code, 200);
        assert_eq!(envelope.txid, ctx.txid);
        assert_eq!(envelope.data.unwrap()["response"], "pong");
    }
}

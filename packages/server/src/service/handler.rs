//! First-class operation handlers.
//!
//! A handler is a cloneable, type-erased async closure from a correlation
//! context to an envelope or an error. Registering handlers as plain values
//! at startup keeps every exposed operation reachable from both transports
//! without any runtime type introspection.

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use patchbay_core::{ApiError, CorrelationContext, Envelope};

/// Boxed future returned by a handler invocation.
pub type HandlerFuture = Pin<Box<dyn Future<Output = Result<Envelope, ApiError>> + Send>>;

type HandlerFn = dyn Fn(CorrelationContext) -> HandlerFuture + Send + Sync;

/// A unit of business logic invoked with a correlation context.
///
/// Handlers build their own success envelopes (they own the status code and
/// payload); failures flow through the [`ApiError`] taxonomy and are
/// converted to envelopes at the adapter boundary.
#[derive(Clone)]
pub struct Handler {
    inner: Arc<HandlerFn>,
}

impl Handler {
    /// Wraps an async closure as a handler.
    pub fn new<F, Fut>(f: F) -> Self
    where
        F: Fn(CorrelationContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Envelope, ApiError>> + Send + 'static,
    {
        Self {
            inner: Arc::new(move |ctx| Box::pin(f(ctx))),
        }
    }

    /// Invokes the handler with the given context.
    #[must_use]
    pub fn invoke(&self, ctx: CorrelationContext) -> HandlerFuture {
        (self.inner)(ctx)
    }
}

impl fmt::Debug for Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Handler(..)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_the_same_closure() {
        let handler = Handler::new(|ctx| async move { Ok(Envelope::build(200, &ctx).finish()) });
        let clone = handler.clone();
        assert!(Arc::ptr_eq(&handler.inner, &clone.inner));
    }

    #[tokio::test]
    async fn invoke_passes_the_context_through() {
        let handler = Handler::new(|ctx| async move {
            Ok(Envelope::build(200, &ctx)
                .data_entry("response", "pong")
                .finish())
        });

        let ctx = CorrelationContext::new();
        let envelope = handler.invoke(ctx.clone()).await.unwrap();
        assert_eq!(envelope.txid, ctx.txid);
        assert_eq!(envelope.request_received_at, ctx.received_at);
    }

    #[tokio::test]
    async fn handler_errors_surface_to_the_caller() {
        let handler =
            Handler::new(|_ctx| async move { Err(ApiError::Internal(anyhow::anyhow!("boom"))) });
        let err = handler.invoke(CorrelationContext::new()).await.unwrap_err();
        assert_eq!(err.status_code(), 500);
    }
}

//! HTTP handler plumbing for the synchronous transport.
//!
//! Registered operations are mounted onto the axum router straight from the
//! registry, so the HTTP surface and the bus surface are always the same set
//! of operations. Every response, the unmatched-route fallback included, is
//! the standard envelope.

use std::sync::Arc;

use axum::extract::{Extension, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::MethodFilter;
use axum::{routing, Json, Router};
use tracing::debug;

use patchbay_core::{CorrelationContext, Envelope, Verb};

use crate::config::EnvironmentConfig;
use crate::service::dispatch::failure_envelope;
use crate::service::registry::OperationRegistry;
use crate::storage::RecordStore;

/// Shared application state passed to axum handlers via `State` extraction.
///
/// Holds `Arc` references to shared resources so cloning is cheap.
#[derive(Clone)]
pub struct AppState {
    /// Process configuration; `service_name` is stamped into envelopes.
    pub env: Arc<EnvironmentConfig>,
    /// Record store chosen at startup.
    pub store: Arc<dyn RecordStore>,
}

/// Mounts every registered operation as an HTTP route.
///
/// Route matching here is axum's: static segments take precedence over
/// `{template}` segments regardless of registration order. For the key sets
/// the registry accepts this agrees with the bus-side resolution on all
/// literal lookups.
pub fn mount_operations(
    mut router: Router<AppState>,
    registry: &OperationRegistry,
    service_name: &str,
) -> Router<AppState> {
    for (key, handler) in registry.entries() {
        debug!("mounting HTTP route: {key}");
        let op = handler.clone();
        let responder = service_name.to_string();
        router = router.route(
            key.pattern.as_str(),
            routing::on(
                method_filter(key.verb),
                move |Extension(ctx): Extension<CorrelationContext>| async move {
                    match op.invoke(ctx.clone()).await {
                        Ok(mut envelope) => {
                            envelope.responder_name = Some(responder);
                            into_http(envelope)
                        }
                        Err(err) => into_http(failure_envelope(&err, &ctx, &responder)),
                    }
                },
            ),
        );
    }
    router
}

/// Answers any request no registered operation claims.
///
/// Unmatched routes get the same envelope shape as everything else, not the
/// framework's default error page.
pub async fn fallback_handler(
    State(state): State<AppState>,
    Extension(ctx): Extension<CorrelationContext>,
) -> Response {
    let envelope = Envelope::build(404, &ctx)
        .responder_name(state.env.service_name.clone())
        .finish();
    into_http(envelope)
}

/// Converts an envelope into an HTTP response whose status line mirrors the
/// envelope's `code` field.
fn into_http(envelope: Envelope) -> Response {
    let status =
        StatusCode::from_u16(envelope.code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(envelope)).into_response()
}

fn method_filter(verb: Verb) -> MethodFilter {
    match verb {
        Verb::Get => MethodFilter::GET,
        Verb::Post => MethodFilter::POST,
        Verb::Put => MethodFilter::PUT,
        Verb::Delete => MethodFilter::DELETE,
        Verb::Patch => MethodFilter::PATCH,
        Verb::Head => MethodFilter::HEAD,
        Verb::Options => MethodFilter::OPTIONS,
    }
}

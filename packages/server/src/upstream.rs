//! Outbound HTTP client that speaks the same request/envelope contract.
//!
//! An upstream call takes the same `ApiRequest` shape the bus consumes and
//! produces the same envelope every other path produces. The upstream's
//! status code is carried into the envelope verbatim, never re-mapped, so a
//! caller can tell an upstream 404 from a local one by the responder fields.

use std::time::Duration;

use reqwest::Client;
use tracing::{debug, info};

use patchbay_core::{ApiError, ApiRequest, CorrelationContext, TXID_HEADER};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Issues requests to other HTTP services on behalf of handlers.
#[derive(Debug, Clone)]
pub struct UpstreamClient {
    client: Client,
    service_name: String,
}

impl UpstreamClient {
    /// Creates a client stamping `service_name` as the responder on the
    /// envelopes it produces.
    ///
    /// # Errors
    ///
    /// Returns an error when the underlying HTTP client cannot be built.
    pub fn new(service_name: impl Into<String>) -> anyhow::Result<Self> {
        let client = Client::builder().timeout(DEFAULT_TIMEOUT).build()?;
        Ok(Self {
            client,
            service_name: service_name.into(),
        })
    }

    /// Calls the upstream named by `request.resource` and wraps the outcome
    /// in an envelope correlated under `ctx`.
    ///
    /// The caller's transaction id travels to the upstream in the `x-txid`
    /// header. The upstream's status code lands in the envelope verbatim; a
    /// JSON body is embedded as-is under `data.response`, any other body as
    /// a string.
    ///
    /// # Errors
    ///
    /// `ApiError::Validation` when the resource is not an absolute URI, and
    /// `ApiError::Internal` when the request cannot be sent at all.
    pub async fn call(
        &self,
        request: &ApiRequest,
        ctx: &CorrelationContext,
    ) -> Result<patchbay_core::Envelope, ApiError> {
        if !request.is_valid_for_http() {
            return Err(ApiError::Validation {
                reason: "outbound HTTP calls need an absolute resource URI".to_string(),
            });
        }

        info!(
            "calling upstream: {} {} txid={}",
            request.verb, request.resource, ctx.txid
        );

        let mut builder = self
            .client
            .request(request.verb.method(), &request.resource)
            .header(TXID_HEADER, ctx.txid.to_string());
        for (name, value) in &request.headers {
            builder = builder.header(name, value);
        }
        for (name, values) in &request.query_params {
            for value in values {
                builder = builder.query(&[(name, value)]);
            }
        }

        let response = builder
            .send()
            .await
            .map_err(|e| ApiError::Internal(e.into()))?;
        let code = response.status().as_u16();
        let body = response
            .bytes()
            .await
            .map_err(|e| ApiError::Internal(e.into()))?;

        debug!("upstream answered: code={code} txid={}", ctx.txid);

        let mut envelope = patchbay_core::Envelope::build(code, ctx)
            .responder_name(self.service_name.clone());
        if !body.is_empty() {
            let value = serde_json::from_slice::<serde_json::Value>(&body).unwrap_or_else(|_| {
                serde_json::Value::String(String::from_utf8_lossy(&body).into_owned())
            });
            envelope = envelope.data_entry("response", value);
        }
        Ok(envelope.finish())
    }
}

#[cfg(test)]
mod tests {
    use patchbay_core::Verb;

    use super::*;

    #[tokio::test]
    async fn rejects_non_absolute_resources() {
        let client = UpstreamClient::new("patchbay").unwrap();
        let request = ApiRequest::new(Verb::Get, "/api/v1/ping", "svc.responses");
        let ctx = CorrelationContext::new();

        let err = client.call(&request, &ctx).await.unwrap_err();
        assert!(matches!(err, ApiError::Validation { .. }));
    }

    #[tokio::test]
    async fn answered_call_carries_status_body_and_txid() {
        use axum::http::{HeaderMap, StatusCode};
        use axum::routing::get;
        use axum::{Json, Router};

        // Echo the received txid so header propagation is observable.
        let app = Router::new().route(
            "/teapot",
            get(|headers: HeaderMap| async move {
                let seen = headers
                    .get(TXID_HEADER)
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or_default()
                    .to_string();
                (
                    StatusCode::IM_A_TEAPOT,
                    Json(serde_json::json!({"k": 1, "seen_txid": seen})),
                )
            }),
        );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        let client = UpstreamClient::new("patchbay").unwrap();
        let request = ApiRequest::new(Verb::Get, format!("http://{addr}/teapot"), "svc.responses");
        let ctx = CorrelationContext::new();

        let envelope = client.call(&request, &ctx).await.unwrap();
        assert_eq!(envelope.code, 418);
        assert_eq!(envelope.txid, ctx.txid);
        assert_eq!(envelope.responder_name.as_deref(), Some("patchbay"));

        let data = envelope.data.unwrap();
        assert_eq!(data["response"]["k"], 1);
        assert_eq!(data["response"]["seen_txid"], ctx.txid.to_string());
    }

    #[tokio::test]
    async fn rejects_unparseable_resources() {
        let client = UpstreamClient::new("patchbay").unwrap();
        let mut request = ApiRequest::new(Verb::Get, "http://ok.example/x", "svc.responses");
        request.resource = String::new();
        let ctx = CorrelationContext::new();

        let err = client.call(&request, &ctx).await.unwrap_err();
        assert!(matches!(err, ApiError::Validation { .. }));
    }
}

//! The inbound/outbound request payload shared by both transports.

use std::collections::{BTreeSet, HashMap};

use http::Uri;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::verb::Verb;

/// A request for one operation, addressed by verb + resource.
///
/// The same shape is used as the message-bus payload, as the argument to the
/// bus publish helper, and as the input to the outbound HTTP client. The two
/// transports apply different validity rules: the bus only needs a reply
/// destination and a parseable resource, while an outbound HTTP call needs
/// an absolute URI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiRequest {
    /// Transaction id assigned by the originating caller.
    #[serde(rename = "transaction_id")]
    pub txid: Uuid,
    /// HTTP verb naming the operation.
    pub verb: Verb,
    /// Resource URI: a path like `/api/v1/ping` on the bus, an absolute URL
    /// for outbound HTTP calls.
    pub resource: String,
    /// Topic/queue the response envelope must be published to.
    #[serde(rename = "reply_destination", default)]
    pub reply_to: String,
    /// Headers forwarded to the handler or the upstream call.
    #[serde(default)]
    pub headers: HashMap<String, String>,
    /// Query parameters; a set per key, as repeated parameters are allowed.
    #[serde(default)]
    pub query_params: HashMap<String, BTreeSet<String>>,
}

impl ApiRequest {
    /// Creates a request with a fresh txid and no headers or parameters.
    #[must_use]
    pub fn new(verb: Verb, resource: impl Into<String>, reply_to: impl Into<String>) -> Self {
        Self {
            txid: Uuid::new_v4(),
            verb,
            resource: resource.into(),
            reply_to: reply_to.into(),
            headers: HashMap::new(),
            query_params: HashMap::new(),
        }
    }

    /// Parses the resource field as a URI.
    ///
    /// # Errors
    ///
    /// Returns the parse error when the resource is not a valid URI.
    pub fn uri(&self) -> Result<Uri, http::uri::InvalidUri> {
        self.resource.parse::<Uri>()
    }

    /// Whether this request is dispatchable over the message bus: a
    /// non-empty reply destination and a parseable resource URI.
    #[must_use]
    pub fn is_valid_for_bus(&self) -> bool {
        !self.reply_to.is_empty() && self.uri().is_ok()
    }

    /// Whether this request can be issued as an outbound HTTP call: the bus
    /// rule, plus an absolute resource URI (scheme and host present).
    #[must_use]
    pub fn is_valid_for_http(&self) -> bool {
        if !self.is_valid_for_bus() {
            return false;
        }
        match self.uri() {
            Ok(uri) => uri.scheme().is_some() && uri.host().is_some(),
            Err(_) => false,
        }
    }

    /// The resource signature stamped on successful bus replies:
    /// `verb + "_" + resource`.
    #[must_use]
    pub fn resource_signature(&self) -> String {
        format!("{}_{}", self.verb, self.resource)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ping_request() -> ApiRequest {
        ApiRequest::new(Verb::Get, "/api/v1/ping", "svc.responses")
    }

    #[test]
    fn bus_validity_requires_reply_destination() {
        let mut req = ping_request();
        assert!(req.is_valid_for_bus());

        req.reply_to = String::new();
        assert!(!req.is_valid_for_bus());
    }

    #[test]
    fn bus_validity_requires_parseable_resource() {
        let mut req = ping_request();
        req.resource = String::new();
        assert!(!req.is_valid_for_bus());
    }

    #[test]
    fn http_validity_requires_absolute_uri() {
        let mut req = ping_request();
        // A bare path is fine for the bus but not for outbound HTTP.
        assert!(req.is_valid_for_bus());
        assert!(!req.is_valid_for_http());

        req.resource = "https://upstream.example/api/v1/ping".to_string();
        assert!(req.is_valid_for_http());
    }

    #[test]
    fn resource_signature_joins_verb_and_resource() {
        let req = ping_request();
        assert_eq!(req.resource_signature(), "GET_/api/v1/ping");
    }

    #[test]
    fn wire_format_uses_renamed_fields() {
        let req = ping_request();
        let json = serde_json::to_value(&req).unwrap();
        assert!(json.get("transaction_id").is_some());
        assert_eq!(json["verb"], "GET");
        assert_eq!(json["resource"], "/api/v1/ping");
        assert_eq!(json["reply_destination"], "svc.responses");
    }

    #[test]
    fn deserializes_with_missing_optional_maps() {
        let raw = r#"{
            "transaction_id": "11111111-1111-1111-1111-111111111111",
            "verb": "GET",
            "resource": "/api/v1/ping",
            "reply_destination": "svc.responses"
        }"#;
        let req: ApiRequest = serde_json::from_str(raw).unwrap();
        assert!(req.headers.is_empty());
        assert!(req.query_params.is_empty());
        assert!(req.is_valid_for_bus());
    }
}

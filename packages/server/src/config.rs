//! Process-wide configuration, supplied via flags or environment variables.

use clap::Parser;

/// Read-only settings for one patchbay process.
///
/// Every field can be set as a command-line flag or through the
/// corresponding `PATCHBAY_*` environment variable.
#[derive(Parser, Debug, Clone)]
#[command(name = "patchbay", about = "Dual-transport service template")]
pub struct EnvironmentConfig {
    /// Service name stamped into response envelopes as `responder_name`.
    #[arg(long, env = "PATCHBAY_SERVICE_NAME", default_value = "patchbay")]
    pub service_name: String,

    /// Bind address for the HTTP listener.
    #[arg(long, env = "PATCHBAY_HTTP_HOST", default_value = "0.0.0.0")]
    pub http_host: String,

    /// Port for the HTTP listener. 0 means OS-assigned.
    #[arg(long, env = "PATCHBAY_HTTP_PORT", default_value_t = 8080)]
    pub http_port: u16,

    /// Topic this service consumes request messages from.
    #[arg(long, env = "PATCHBAY_REQUEST_TOPIC", default_value = "patchbay.requests")]
    pub request_topic: String,

    /// Topic other services publish this service's replies to; also the
    /// default reply destination for requests this service originates.
    #[arg(long, env = "PATCHBAY_REPLY_TOPIC", default_value = "patchbay.responses")]
    pub reply_topic: String,

    /// Consumer group name for shared bus subscriptions.
    #[arg(long, env = "PATCHBAY_GROUP_NAME", default_value = "patchbay")]
    pub group_name: String,

    /// Prefix for the bus client connection name.
    #[arg(long, env = "PATCHBAY_CLIENT_ID_PREFIX", default_value = "patchbay")]
    pub client_id_prefix: String,

    /// Record store backend: `memory` or `null`.
    #[arg(long, env = "PATCHBAY_STORE_BACKEND", default_value = "memory")]
    pub store_backend: String,

    /// Message bus server URL. When unset (or when the `nats` feature is
    /// disabled) the in-process bus is used.
    #[arg(long, env = "PATCHBAY_BUS_URL")]
    pub bus_url: Option<String>,
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            service_name: "patchbay".to_string(),
            http_host: "0.0.0.0".to_string(),
            http_port: 8080,
            request_topic: "patchbay.requests".to_string(),
            reply_topic: "patchbay.responses".to_string(),
            group_name: "patchbay".to_string(),
            client_id_prefix: "patchbay".to_string(),
            store_backend: "memory".to_string(),
            bus_url: None,
        }
    }
}

//! Network configuration for the HTTP listener.

use std::time::Duration;

use crate::config::EnvironmentConfig;

/// Settings for the synchronous (HTTP) transport.
#[derive(Debug, Clone)]
pub struct NetworkConfig {
    /// Bind address for the server.
    pub host: String,
    /// Port to listen on. 0 means OS-assigned.
    pub port: u16,
    /// Allowed CORS origins.
    pub cors_origins: Vec<String>,
    /// Maximum time to wait for a request to complete.
    pub request_timeout: Duration,
}

impl NetworkConfig {
    /// Derives the listener settings from the process configuration.
    #[must_use]
    pub fn from_env(env: &EnvironmentConfig) -> Self {
        Self {
            host: env.http_host.clone(),
            port: env.http_port,
            ..Self::default()
        }
    }
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 0,
            cors_origins: vec!["*".to_string()],
            request_timeout: Duration::from_secs(30),
        }
    }
}

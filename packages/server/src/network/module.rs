//! Network module with deferred startup lifecycle.
//!
//! Implements the deferred startup pattern: `new()` creates resources,
//! `start()` binds the TCP listener, and `serve()` starts accepting
//! connections. This separation lets the rest of the application finish
//! wiring (bus adapter, startup self-check) between `start()` and
//! `serve()`.

use std::future::Future;
use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;
use tracing::info;

use crate::config::EnvironmentConfig;
use crate::service::registry::OperationRegistry;
use crate::storage::RecordStore;

use super::config::NetworkConfig;
use super::handlers::{fallback_handler, mount_operations, AppState};
use super::middleware::{build_http_layers, correlation_middleware};

/// Manages the HTTP server lifecycle.
///
/// Follows the deferred startup pattern:
/// 1. `new()` -- captures configuration and shared state
/// 2. `start()` -- binds the TCP listener to the configured address
/// 3. `serve()` -- accepts connections until the shutdown future resolves
pub struct NetworkModule {
    config: NetworkConfig,
    listener: Option<TcpListener>,
    registry: Arc<OperationRegistry>,
    state: AppState,
}

impl NetworkModule {
    /// Creates a new network module without binding any port.
    #[must_use]
    pub fn new(
        config: NetworkConfig,
        registry: Arc<OperationRegistry>,
        env: Arc<EnvironmentConfig>,
        store: Arc<dyn RecordStore>,
    ) -> Self {
        Self {
            config,
            listener: None,
            registry,
            state: AppState { env, store },
        }
    }

    /// Assembles the axum router: one route per registered operation, the
    /// envelope fallback for everything else, correlation middleware, and
    /// the transport-level Tower stack outermost.
    #[must_use]
    pub fn build_router(&self) -> Router {
        let router = mount_operations(
            Router::new(),
            &self.registry,
            &self.state.env.service_name,
        );

        router
            .fallback(fallback_handler)
            .layer(axum::middleware::from_fn(correlation_middleware))
            .layer(build_http_layers(&self.config))
            .with_state(self.state.clone())
    }

    /// Binds the TCP listener to the configured host and port.
    ///
    /// Returns the actual bound port, which may differ from the configured
    /// port when port 0 is used (OS-assigned ephemeral port).
    ///
    /// # Errors
    ///
    /// Returns an error if the address cannot be bound (e.g., port in use).
    pub async fn start(&mut self) -> anyhow::Result<u16> {
        let addr = format!("{}:{}", self.config.host, self.config.port);
        let listener = TcpListener::bind(&addr).await?;
        let port = listener.local_addr()?.port();

        info!("HTTP listener bound to {}:{}", self.config.host, port);

        self.listener = Some(listener);
        Ok(port)
    }

    /// Serves connections until the shutdown future resolves.
    ///
    /// Consumes `self` because the listener is moved into the server.
    ///
    /// # Errors
    ///
    /// Returns an error when `start()` was not called first, or when the
    /// server hits a fatal I/O error.
    pub async fn serve(
        mut self,
        shutdown: impl Future<Output = ()> + Send + 'static,
    ) -> anyhow::Result<()> {
        let listener = self
            .listener
            .take()
            .ok_or_else(|| anyhow::anyhow!("start() must be called before serve()"))?;
        let router = self.build_router();

        info!("serving HTTP requests");

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown)
            .await?;

        info!("HTTP server stopped");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::service::operations;
    use crate::storage::NullStore;

    use super::*;

    fn test_module() -> NetworkModule {
        NetworkModule::new(
            NetworkConfig::default(),
            Arc::new(operations::build_registry().unwrap()),
            Arc::new(EnvironmentConfig::default()),
            Arc::new(NullStore),
        )
    }

    #[test]
    fn new_creates_module_without_binding() {
        let module = test_module();
        assert!(module.listener.is_none());
    }

    #[test]
    fn build_router_creates_router() {
        let _router = test_module().build_router();
    }

    #[tokio::test]
    async fn start_binds_to_os_assigned_port() {
        let mut module = test_module();
        let port = module.start().await.expect("start should succeed");
        assert!(port > 0, "OS-assigned port should be > 0");
        assert!(module.listener.is_some());
    }

    #[tokio::test]
    async fn serve_without_start_is_an_error() {
        let module = test_module();
        let outcome = module.serve(std::future::pending::<()>()).await;
        assert!(outcome.is_err());
    }
}

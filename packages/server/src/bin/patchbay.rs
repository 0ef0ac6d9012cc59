//! Process entry point: wires configuration, the operation registry, the
//! record store, and both transports, then serves until shutdown.

use std::sync::Arc;

use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};

use patchbay_core::{ApiRequest, Verb};
use patchbay_server::bus::{BusAdapter, InMemoryBus, MessageBus};
use patchbay_server::config::EnvironmentConfig;
use patchbay_server::network::{NetworkConfig, NetworkModule};
use patchbay_server::service::operations;
use patchbay_server::storage;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!("tracing init failed: {e}");
    }

    let env = Arc::new(EnvironmentConfig::parse());
    info!(
        "starting {} (http {}:{}, requests on {})",
        env.service_name, env.http_host, env.http_port, env.request_topic
    );

    let registry = Arc::new(operations::build_registry()?);
    info!("registered {} operations", registry.len());

    let store = storage::build_store(&env.store_backend)?;
    let bus = build_bus(&env).await?;

    let adapter = Arc::new(BusAdapter::new(bus, Arc::clone(&registry), Arc::clone(&env)));
    let _bus_task = Arc::clone(&adapter).start().await?;

    // Startup self-check: ask this process, over the bus, what it serves.
    // The reply lands on the reply topic and is logged by the adapter.
    let probe = ApiRequest::new(Verb::Get, "/api/v1/restinfo", env.reply_topic.clone());
    adapter.publish_request(&env.request_topic, &probe).await?;

    let mut network = NetworkModule::new(
        NetworkConfig::from_env(&env),
        registry,
        Arc::clone(&env),
        store,
    );
    network.start().await?;
    network.serve(shutdown_signal()).await
}

/// Chooses the bus implementation from the configuration.
async fn build_bus(env: &EnvironmentConfig) -> anyhow::Result<Arc<dyn MessageBus>> {
    #[cfg(feature = "nats")]
    if let Some(url) = &env.bus_url {
        let bus =
            patchbay_server::bus::NatsBus::connect(url, &env.group_name, &env.client_id_prefix)
                .await?;
        info!("connected to message bus at {url}");
        return Ok(Arc::new(bus));
    }

    #[cfg(not(feature = "nats"))]
    if env.bus_url.is_some() {
        warn!("bus URL configured but this build has no bus client; using the in-process bus");
    }
    info!("using the in-process message bus");
    Ok(Arc::new(InMemoryBus::new()))
}

/// Resolves on Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("failed to install Ctrl+C handler: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!("failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    info!("shutdown signal received, draining");
}

//! # Audit Marketplace Node
//!
//! Binary entry point: configuration, backend selection, wiring and the
//! HTTP gateway with graceful shutdown.

use anyhow::{Context, Result};
use tracing::{info, warn};

use am_06_api_gateway::ApiGatewayService;
use am_telemetry::{init_logging, TelemetryConfig};
use node_runtime::{NodeConfig, SubsystemContainer};

#[tokio::main]
async fn main() -> Result<()> {
    init_logging(&TelemetryConfig::from_env()).context("Failed to initialize logging")?;

    let config = NodeConfig::load().context("Failed to load configuration")?;
    config.validate().context("Invalid configuration")?;

    info!("===========================================");
    info!("  Audit Marketplace Node v{}", env!("CARGO_PKG_VERSION"));
    info!("  Backend: {}", config.backend.kind);
    info!("===========================================");

    let gateway_config = config.gateway.clone();
    let container = SubsystemContainer::new(config)
        .await
        .context("Failed to initialize subsystems")?;

    let gateway = ApiGatewayService::new(gateway_config, container.app_state())
        .context("Failed to build API gateway")?;
    info!("HTTP API: http://{}", gateway.addr());

    gateway.serve(shutdown_signal()).await?;

    info!("Shutdown complete");
    Ok(())
}

/// Resolves on Ctrl+C, or SIGTERM on unix.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
    info!("Initiating graceful shutdown...");
}

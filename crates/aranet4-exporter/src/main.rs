//! Aranet4 Prometheus exporter.
//!
//! Run with: `cargo run -p aranet4-exporter`

use std::net::SocketAddr;
use std::sync::Arc;

use clap::Parser;
use tokio::sync::watch;
use tracing::info;

use aranet4_link::SensorLink;
use aranet4_exporter::{Config, ExportedMetrics, PollingSupervisor, server};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("aranet4_exporter=info".parse()?)
                .add_directive("aranet4_link=info".parse()?),
        )
        .init();

    let config = Config::parse();

    info!(
        "Starting exporter on port {}, polling interval {} seconds",
        config.exporter_port, config.polling_interval_seconds
    );

    let metrics = Arc::new(ExportedMetrics::new());
    let link = SensorLink::new(config.sensor_mac_address.clone());

    let (stop_tx, stop_rx) = watch::channel(false);
    let supervisor = PollingSupervisor::new(link, Arc::clone(&metrics), config.poll_interval());
    let supervisor_task = tokio::spawn(supervisor.run(stop_rx));

    let app = server::router(metrics);
    let addr = SocketAddr::from(([0, 0, 0, 0], config.exporter_port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Serving metrics on http://{}/metrics", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(stop_tx))
        .await?;

    // The stop signal is already set; let the loop finish its cycle.
    supervisor_task.await?;

    Ok(())
}

/// Resolve on Ctrl-C and flip the supervisor's stop channel so the poll
/// loop winds down between cycles.
async fn shutdown_signal(stop_tx: watch::Sender<bool>) {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for shutdown signal: {}", e);
        return;
    }
    info!("Shutdown requested");
    let _ = stop_tx.send(true);
}

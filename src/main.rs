//! JobNotify - Batch Job Notification Dispatcher
//!
//! Receives job status-change events, formats them into email-ready
//! notifications, and publishes them to a pub/sub topic for fan-out.

use anyhow::{Context, Result};
use clap::Parser;
use jobnotify::{
    cli::Cli,
    config::Config,
    formatting::EmailFormatter,
    handler::NotificationHandler,
    notification::http::HttpPublisher,
    server::NotificationServer,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration by layering sources: defaults, file, environment,
    // and CLI args. Exit if configuration fails, as it's a critical step.
    let config = match Config::load(&cli) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("Failed to load configuration: {err}");
            std::process::exit(1);
        }
    };

    // Initialize logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level.clone()));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!("JobNotify starting up...");

    // Required settings fail fast, before any event is served.
    let topic = config.notification.require_topic()?.to_string();
    let endpoint_url = config.notification.require_endpoint_url()?.to_string();

    // Log the loaded configuration settings for visibility
    info!("-------------------- Configuration --------------------");
    info!("Log Level: {}", config.log_level);
    info!("Listen Address: {}", config.server.listen_addr);
    info!("Notification Topic: {}", topic);
    info!("Delivery Endpoint: {}", endpoint_url);
    info!("Publish Timeout: {}s", config.notification.timeout_seconds);
    info!("Log Group: {}", config.links.log_group);
    info!(
        "Metrics: {}",
        if config.server.metrics_enabled {
            "Enabled"
        } else {
            "Disabled"
        }
    );
    info!("-------------------------------------------------------");

    // =========================================================================
    // Initialize Metrics Recorder if enabled
    // =========================================================================
    let mut prom_handle: Option<PrometheusHandle> = None;
    if config.server.metrics_enabled {
        let handle = metrics_exporter_prometheus::PrometheusBuilder::new()
            .install_recorder()
            .context("Failed to install Prometheus recorder")?;
        prom_handle = Some(handle);
    }

    // =========================================================================
    // Instantiate Services
    // =========================================================================
    let publisher = Arc::new(HttpPublisher::new(
        endpoint_url,
        Duration::from_secs(config.notification.timeout_seconds),
    ));
    let formatter = Box::new(EmailFormatter::new(config.links.clone()));
    let handler = Arc::new(NotificationHandler::new(topic, formatter, publisher));

    // =========================================================================
    // Run the Ingress Server
    // =========================================================================
    let listener = TcpListener::bind(&config.server.listen_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.server.listen_addr))?;
    info!("Listening on {}", listener.local_addr()?);

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let server = NotificationServer::new(listener, handler, prom_handle, shutdown_rx);
    let server_task = tokio::spawn(server.run());

    info!("JobNotify initialized successfully. Waiting for events...");

    // Wait for shutdown signal
    tokio::signal::ctrl_c().await?;
    info!("Shutdown signal received. Shutting down gracefully...");

    let _ = shutdown_tx.send(true);
    if let Err(e) = server_task.await {
        error!("Ingress server task panicked: {:?}", e);
    }

    info!("All tasks shut down. Exiting.");

    Ok(())
}

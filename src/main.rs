// figma-report-service/src/main.rs

use anyhow::Context;
use figma_report_service::config::Config;
use figma_report_service::pipeline::ReportPipeline;
use figma_report_service::server::{create_app, AppState};
use figma_report_service::storage::ArtifactStore;
use std::sync::Arc;
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Print to stderr BEFORE logging initialization to catch early failures
    eprintln!("Starting figma-report-service...");

    // Load configuration
    let config = match Config::load() {
        Ok(cfg) => {
            eprintln!("Configuration loaded successfully");
            cfg
        }
        Err(e) => {
            eprintln!("FATAL: Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.service.log_level.clone().into()),
        )
        .with(tracing_subscriber::fmt::layer().json())
        .init();

    info!(
        service = %config.service.name,
        version = env!("CARGO_PKG_VERSION"),
        "Starting Figma Report Service"
    );

    if config.figma.token.is_none() {
        info!("No Figma token configured; designs will be synthesized via the LLM fallback");
    }

    let store = ArtifactStore::new(&config.output.dir)
        .await
        .with_context(|| format!("Failed to prepare output directory {}", config.output.dir))?;

    let pipeline = ReportPipeline::new(&config, store.clone())
        .context("Failed to initialize report pipeline")?;

    let state = AppState {
        pipeline: Arc::new(pipeline),
        store,
        service_name: config.service.name.clone(),
    };

    let app = create_app(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    info!(addr = %addr, "Server listening");

    // Shut down cleanly on ctrl-c
    let cancel = CancellationToken::new();
    let cancel_for_signal = cancel.clone();
    tokio::spawn(async move {
        match signal::ctrl_c().await {
            Ok(()) => {
                info!("Received shutdown signal, stopping server");
                cancel_for_signal.cancel();
            }
            Err(err) => {
                error!("Unable to listen for shutdown signal: {}", err);
            }
        }
    });

    axum::serve(listener, app)
        .with_graceful_shutdown(cancel.cancelled_owned())
        .await
        .context("Server error")?;

    info!("Server stopped");
    Ok(())
}

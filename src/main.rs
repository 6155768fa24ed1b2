//! Todo API (v1)
//!
//! CRUD over a single "todo" resource, built with Tokio, Axum and sqlx.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request
//!     ───────────────▶ request id ─▶ trace span ─▶ observer ─▶ router ─▶ handlers
//!                                                     │                     │
//!                                                     ▼                     ▼
//!                                              log + metrics        TodoRepository
//!                                                                          │
//!                                                                          ▼
//!                                                                  PostgreSQL (sqlx)
//! ```

use std::path::PathBuf;

use clap::Parser;

use todo_api::config::resolve_config;
use todo_api::lifecycle::{init_services, signals, startup, Shutdown};
use todo_api::observability;
use todo_api::HttpServer;

#[derive(Parser)]
#[command(name = "todo-api")]
#[command(about = "A simple TODO API based on PostgreSQL", long_about = None)]
struct Cli {
    /// Path to a TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = resolve_config(cli.config.as_deref())?;
    observability::init(&config.observability)?;

    tracing::info!("todo-api v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        backend = ?config.database.backend,
        metrics_enabled = config.observability.metrics_enabled,
        "Configuration loaded"
    );

    let services = init_services(&config).await?;
    let repository = services.repository.clone();

    let listener = startup::bind(&config).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let shutdown_rx = shutdown.subscribe();
    signals::spawn_signal_handler(shutdown);

    let server = HttpServer::new(config, services.repository, services.metrics);
    server.run(listener, shutdown_rx).await?;

    repository.shutdown().await;
    observability::tracing::shutdown_tracer().await;

    tracing::info!("Shutdown complete");
    Ok(())
}

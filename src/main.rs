//! Portfolio API entry point.
//!
//! Initializes tracing, loads configuration (file, then the `PORT` override),
//! builds the configured document store, sets up the Axum router and starts
//! the HTTP server.

use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use portfolio_api::config::{AppConfig, LogFormat, DEFAULT_LOG_FILTER};
use portfolio_api::{create_router, http, store, AppState};

/// Portfolio API: contact form backend
#[derive(Parser, Debug)]
#[command(name = "portfolio-api", version, about)]
struct Args {
    /// Path to configuration file (defaults to config/default.toml if present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log level filter (e.g., "portfolio_api=debug,tower_http=info")
    #[arg(short, long)]
    log_level: Option<String>,
}

fn init_tracing(filter: &str, format: LogFormat) {
    let registry = tracing_subscriber::registry().with(EnvFilter::new(filter));
    match format {
        LogFormat::Text => registry.with(tracing_subscriber::fmt::layer()).init(),
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json())
            .init(),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Load configuration before tracing so the log format is known
    let config = AppConfig::load(args.config.as_deref())?;

    // Initialize tracing with priority: CLI > env > default
    let log_filter = args
        .log_level
        .or_else(|| std::env::var("RUST_LOG").ok())
        .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string());
    init_tracing(&log_filter, config.logging.format);

    tracing::info!(
        host = %config.http.host,
        port = config.http.port,
        store = ?config.store.backend,
        "Loaded configuration"
    );

    let store = store::from_config(&config.store);
    tracing::info!(backend = store.name(), "Initialized document store");

    let state = AppState::new(config.clone(), store);
    let app = create_router(state);

    http::start_server(app, &config.http).await?;

    Ok(())
}

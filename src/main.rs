use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use watchlist_api::config::AppConfig;
use watchlist_api::database::{MemoryStore, PgStore, UuidGenerator};
use watchlist_api::{app, AppState};

#[derive(Parser)]
#[command(name = "watchlist-api")]
#[command(about = "Watchlist sharing API server")]
#[command(version)]
struct Args {
    #[arg(long, help = "YAML configuration file (replaces the APP_ENV preset)")]
    config: Option<PathBuf>,

    #[arg(long, help = "Port to listen on (overrides configuration)")]
    port: Option<u16>,

    #[arg(long, help = "Use the in-memory store even if DATABASE_URL is set")]
    memory: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();

    let mut config = AppConfig::load(args.config.as_deref()).context("failed to load configuration")?;
    if let Some(port) = args.port {
        config.server.port = port;
    }
    tracing::info!("Starting Watchlist API in {:?} mode", config.environment);

    let ids = Arc::new(UuidGenerator);
    let state = if config.database.url.is_some() && !args.memory {
        let database = PgStore::connect(&config.database)
            .await
            .context("failed to connect to database")?;
        AppState::with_database(config.clone(), database, ids)
    } else {
        tracing::warn!("No database configured; using in-memory store (data is lost on exit)");
        AppState::new(config.clone(), Arc::new(MemoryStore::new()), ids)
    };

    let bind_addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("Watchlist API listening on http://{}", bind_addr);

    axum::serve(listener, app(state)).await.context("server error")?;
    Ok(())
}

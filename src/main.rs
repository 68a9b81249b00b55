use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use biztime_api::config::{AppConfig, StoreBackend};
use biztime_api::database::{DatabaseManager, MemoryStore, PgStore, Store};
use biztime_api::{app, AppState};

#[derive(Debug, Parser)]
#[command(name = "biztime-api")]
#[command(about = "BizTime JSON API server")]
#[command(version)]
struct Args {
    #[arg(long, help = "Address to bind (overrides HOST)")]
    host: Option<String>,

    #[arg(long, help = "Port to listen on (overrides PORT / BIZTIME_PORT)")]
    port: Option<u16>,

    #[arg(long, value_parser = parse_backend, help = "Store backend: postgres or memory")]
    store: Option<StoreBackend>,
}

fn parse_backend(value: &str) -> Result<StoreBackend, String> {
    StoreBackend::parse(value).ok_or_else(|| format!("unknown store backend '{}'", value))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("biztime_api=info,tower_http=info")),
        )
        .init();

    let args = Args::parse();
    let config = apply_args(biztime_api::config::config().clone(), args);
    tracing::info!(
        "Starting BizTime API in {:?} mode with {:?} store",
        config.environment,
        config.database.backend
    );

    let store: Arc<dyn Store> = match config.database.backend {
        StoreBackend::Postgres => {
            let pool = DatabaseManager::connect(&config.database)
                .await
                .context("failed to connect to database")?;
            Arc::new(PgStore::new(pool, &config.database))
        }
        StoreBackend::Memory => Arc::new(MemoryStore::seeded()),
    };

    let router = app(AppState::new(store), &config);

    let bind_addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("BizTime API listening on http://{}", bind_addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    tracing::info!("BizTime API stopped");
    Ok(())
}

fn apply_args(mut config: AppConfig, args: Args) -> AppConfig {
    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(backend) = args.store {
        config.database.backend = backend;
    }
    config
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}

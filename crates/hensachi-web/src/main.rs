//! hensachi Web Server
//!
//! Run with: cargo run -p hensachi-web

use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

use hensachi_db::{load_seed, Database};
use hensachi_web::{config::Config, router::build_router, state::AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load()?;

    // Initialize tracing
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.filter));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!("Starting hensachi web server...");

    let db = Arc::new(Database::new());
    if let Some(path) = &config.data.seed_path {
        let report = load_seed(&db, path)?;
        info!(?report, "seed applied");
    } else {
        info!("no seed configured; starting with an empty store");
    }

    let app = build_router(AppState::new(db), &config.cors);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Server listening on http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

// Finance Tracker - Web Server
// REST API over per-session in-memory ledgers

use anyhow::{Context, Result};
use clap::Parser;
use finance_tracker::server::{router, AppState};
use finance_tracker::SessionStore;
use std::time::Duration;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "tracker-server", version, about = "Finance tracker REST API")]
struct Config {
    /// Address to listen on
    #[arg(long, env = "TRACKER_ADDR", default_value = "0.0.0.0:3000")]
    addr: String,

    /// Most sessions kept at once; the least recently used is dropped first
    #[arg(long, env = "TRACKER_MAX_SESSIONS", default_value_t = 10_000)]
    max_sessions: usize,

    /// Seconds without activity before a session is dropped
    #[arg(long, env = "TRACKER_SESSION_IDLE_SECS", default_value_t = 3600)]
    session_idle_secs: u64,
}

#[tokio::main]
async fn main() -> Result<()> {
    // .env is optional; real environment variables win
    dotenvy::dotenv().ok();
    finance_tracker::init_tracing();

    let config = Config::parse();
    let store = SessionStore::with_limits(
        config.max_sessions,
        Duration::from_secs(config.session_idle_secs),
    );
    let app = router(AppState::with_store(store));

    let listener = tokio::net::TcpListener::bind(&config.addr)
        .await
        .with_context(|| format!("Failed to bind to {}", config.addr))?;

    info!(
        addr = %config.addr,
        version = finance_tracker::VERSION,
        max_sessions = config.max_sessions,
        idle_secs = config.session_idle_secs,
        "server running"
    );
    info!("API: http://{}/api/health", config.addr);

    axum::serve(listener, app)
        .await
        .context("Server stopped unexpectedly")?;

    Ok(())
}

//! SaberPro Analytics API
//!
//! Read-only ranking and catalog service over historical SaberPro results,
//! backing the prediction/exploration front end. All queries are
//! parameterized single-statement reads against a pooled Postgres store.

use anyhow::Result;
use tracing::info;
use tracing_subscriber::EnvFilter;

use saberpro_analytics::config::Config;
use saberpro_analytics::db;
use saberpro_analytics::server::{self, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenv::dotenv().ok();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    // DATABASE_URL missing is fatal here, before anything listens.
    let config = Config::from_env()?;

    let pool = db::connect(&config).await?;
    info!(max_connections = config.pool_max, "database pool initialized");

    server::run(&config, AppState { pool }).await
}

//! `MessMate` server binary.
//!
//! Boot order: tracing first, then `.env`, configuration, database, the daily
//! cycle-rollover job, and finally the HTTP server.

use chrono::Utc;
use dotenvy::dotenv;
use messmate::{
    config,
    core::cycle,
    errors::Result,
    http::{AppState, router},
};
use sea_orm::DatabaseConnection;
use std::time::Duration;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

const ROLLOVER_SWEEP_INTERVAL: Duration = Duration::from_secs(24 * 60 * 60);

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file; env vars can also be set externally
    dotenv().ok();

    // 3. Load the application configuration
    let app_config = config::load_app_configuration()
        .inspect_err(|e| error!("Failed to load configuration: {e}"))?;
    info!(bind = %app_config.bind_address, "configuration loaded");

    // 4. Initialize the database
    let db = sea_orm::Database::connect(&app_config.database_url)
        .await
        .inspect_err(|e| error!("Failed to connect to database: {e}"))?;
    config::database::create_tables(&db)
        .await
        .inspect_err(|e| error!("Failed to create tables: {e}"))?;
    info!("database initialized");

    // 5. Start the daily cycle-rollover sweep
    spawn_rollover_job(db.clone());

    // 6. Serve
    let state = AppState::new(db, app_config.billing);
    let listener = tokio::net::TcpListener::bind(&app_config.bind_address).await?;
    info!(addr = %app_config.bind_address, "server listening");
    axum::serve(listener, router(state)).await?;

    Ok(())
}

/// Spawns the recurring sweep that advances expired subscription cycles.
///
/// Runs immediately at startup and then once a day, independent of request
/// handling. Failures are logged and retried on the next tick.
fn spawn_rollover_job(db: DatabaseConnection) {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(ROLLOVER_SWEEP_INTERVAL);
        loop {
            ticker.tick().await;
            let today = Utc::now().date_naive();
            if let Err(e) = cycle::roll_all_expired(&db, today).await {
                error!("cycle rollover sweep failed: {e}");
            }
        }
    });
}

use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use triage_portal::api::start_portal_server;
use triage_portal::config::{self, AppConfig};
use triage_portal::db::{open_database, seed_demo_users};
use triage_portal::state::AppState;

#[tokio::main]
async fn main() -> Result<(), String> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();

    tracing::info!("Triage portal starting v{}", config::APP_VERSION);

    let config = AppConfig::from_env();

    std::fs::create_dir_all(&config.data_dir)
        .map_err(|e| format!("Cannot create data dir {}: {e}", config.data_dir.display()))?;
    std::fs::create_dir_all(config.upload_dir())
        .map_err(|e| format!("Cannot create upload dir: {e}"))?;

    // Open once up front so migration or seeding failures abort startup
    // instead of surfacing on the first request.
    {
        let conn =
            open_database(&config.db_path()).map_err(|e| format!("Cannot open database: {e}"))?;
        seed_demo_users(&conn).map_err(|e| format!("Cannot seed demo accounts: {e}"))?;
    }

    let state = Arc::new(AppState::new(config));
    let mut server = start_portal_server(state).await?;
    tracing::info!(addr = %server.addr, "Portal ready");

    tokio::signal::ctrl_c()
        .await
        .map_err(|e| format!("Cannot listen for shutdown signal: {e}"))?;
    tracing::info!("Shutdown requested");
    server.shutdown();

    Ok(())
}

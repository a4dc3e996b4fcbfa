//! Portal server lifecycle — starts/stops the axum HTTP server.
//!
//! Pattern: bind → spawn background task → return handle with shutdown
//! channel. The handle owns the shutdown sender; dropping it without
//! calling [`PortalServer::shutdown`] leaves the server running until
//! the process exits.

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::sync::oneshot;

use crate::api::router::portal_router;
use crate::state::AppState;

/// Handle to a running portal server.
pub struct PortalServer {
    /// The address actually bound, with the resolved port when the
    /// configured port was 0.
    pub addr: SocketAddr,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl PortalServer {
    /// Shut down the server gracefully.
    pub fn shutdown(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
            tracing::info!("Portal server shutdown signal sent");
        }
    }
}

/// Start the portal server on the configured bind address.
///
/// Builds the full router, binds, and spawns the axum server in a
/// background tokio task. Returns a [`PortalServer`] handle with the
/// bound address and a shutdown channel.
pub async fn start_portal_server(state: Arc<AppState>) -> Result<PortalServer, String> {
    let listener = tokio::net::TcpListener::bind(state.config.bind_addr)
        .await
        .map_err(|e| format!("Failed to bind portal server: {e}"))?;

    let addr = listener
        .local_addr()
        .map_err(|e| format!("Failed to get server address: {e}"))?;

    tracing::info!(%addr, "Portal server binding");

    let app = portal_router(state);

    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

    tokio::spawn(async move {
        let shutdown_signal = async move {
            let _ = shutdown_rx.await;
            tracing::info!("Portal server received shutdown signal");
        };

        tracing::info!(%addr, "Portal server started");

        if let Err(e) = axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal)
            .await
        {
            tracing::error!("Portal server error: {e}");
        }

        tracing::info!("Portal server stopped");
    });

    Ok(PortalServer {
        addr,
        shutdown_tx: Some(shutdown_tx),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::triage::TriageEngine;

    fn test_state() -> (Arc<AppState>, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig {
            bind_addr: ([127, 0, 0, 1], 0).into(),
            data_dir: dir.path().to_path_buf(),
            ..AppConfig::default()
        };
        (
            Arc::new(AppState::with_engine(config, TriageEngine::disabled())),
            dir,
        )
    }

    #[tokio::test]
    async fn start_and_stop_server() {
        let (state, _dir) = test_state();
        let mut server = start_portal_server(state).await.expect("server should start");

        assert!(server.addr.port() > 0);

        // Health endpoint is reachable without a session
        let url = format!("http://{}/api/health", server.addr);
        let resp = reqwest::get(&url).await.unwrap();
        assert_eq!(resp.status(), reqwest::StatusCode::OK);

        let json: serde_json::Value = resp.json().await.unwrap();
        assert_eq!(json["status"], "ok");

        server.shutdown();
        // Give the server time to stop
        tokio::time::sleep(std::time::Duration::from_millis(50)).await;
    }

    #[tokio::test]
    async fn server_rejects_unauthenticated_requests() {
        let (state, _dir) = test_state();
        let mut server = start_portal_server(state).await.expect("server should start");

        let url = format!("http://{}/api/reports", server.addr);
        let resp = reqwest::get(&url).await.unwrap();
        assert_eq!(resp.status(), reqwest::StatusCode::UNAUTHORIZED);

        let url = format!("http://{}/nonexistent", server.addr);
        let resp = reqwest::get(&url).await.unwrap();
        assert_eq!(resp.status(), reqwest::StatusCode::NOT_FOUND);

        server.shutdown();
    }

    #[tokio::test]
    async fn shutdown_is_idempotent() {
        let (state, _dir) = test_state();
        let mut server = start_portal_server(state).await.expect("server should start");

        server.shutdown();
        server.shutdown(); // Second call should be safe
    }
}

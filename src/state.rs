//! Shared application state.

use rusqlite::Connection;

use crate::config::AppConfig;
use crate::db::sqlite::open_database;
use crate::db::DatabaseError;
use crate::triage::TriageEngine;

/// Everything request handlers share: configuration and the triage
/// engine. Database access is per-request; SQLite serializes writers
/// itself and the portal's traffic is a handful of humans.
pub struct AppState {
    pub config: AppConfig,
    pub triage: TriageEngine,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        let triage = TriageEngine::from_config(&config);
        Self { config, triage }
    }

    /// State with an explicitly injected triage engine (tests swap in
    /// a mock client here).
    pub fn with_engine(config: AppConfig, triage: TriageEngine) -> Self {
        Self { config, triage }
    }

    /// Open a connection to the portal database.
    pub fn open_db(&self) -> Result<Connection, DatabaseError> {
        open_database(&self.config.db_path())
    }
}

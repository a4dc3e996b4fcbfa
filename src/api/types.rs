//! Shared types for the portal API layer.

use std::sync::{Arc, Mutex};

use rusqlite::Connection;

use crate::api::error::ApiError;
use crate::auth::{SessionStore, SessionUser};
use crate::state::AppState;

/// Shared context for all API routes and middleware.
/// Wraps `AppState` plus the in-memory session store.
#[derive(Clone)]
pub struct ApiContext {
    pub state: Arc<AppState>,
    pub sessions: Arc<Mutex<SessionStore>>,
}

impl ApiContext {
    pub fn new(state: Arc<AppState>) -> Self {
        Self {
            state,
            sessions: Arc::new(Mutex::new(SessionStore::new())),
        }
    }

    /// Open a database connection for the current request.
    /// Connections are per-request; SQLite serializes writers itself.
    pub fn open_db(&self) -> Result<Connection, ApiError> {
        self.state.open_db().map_err(ApiError::from)
    }

    /// Create a session for a logged-in user and return its cookie token.
    pub fn issue_session(&self, user: SessionUser) -> Result<String, ApiError> {
        let mut sessions = self
            .sessions
            .lock()
            .map_err(|_| ApiError::Internal("session store lock poisoned".into()))?;
        Ok(sessions.issue(user))
    }

    /// Look up the user behind a session token, if it is still live.
    pub fn resolve_session(&self, token: &str) -> Result<Option<SessionUser>, ApiError> {
        let mut sessions = self
            .sessions
            .lock()
            .map_err(|_| ApiError::Internal("session store lock poisoned".into()))?;
        Ok(sessions.get(token))
    }

    /// Drop a session. Returns `true` if the token was live.
    pub fn revoke_session(&self, token: &str) -> Result<bool, ApiError> {
        let mut sessions = self
            .sessions
            .lock()
            .map_err(|_| ApiError::Internal("session store lock poisoned".into()))?;
        Ok(sessions.revoke(token))
    }
}

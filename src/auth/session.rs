//! In-memory session store backing the login cookie.
//!
//! Sessions are opaque random tokens mapped to the authenticated user.
//! Entries expire after [`SESSION_TTL_SECS`] and are swept lazily: on
//! read of a stale token and on every issue.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use base64::Engine;
use serde::Serialize;
use uuid::Uuid;

use crate::models::Role;

/// Session lifetime (12 hours).
pub const SESSION_TTL_SECS: u64 = 12 * 60 * 60;

/// Cookie carrying the session token.
pub const SESSION_COOKIE: &str = "portal_session";

/// Authenticated user context, injected into request extensions by the
/// session middleware after cookie validation.
#[derive(Debug, Clone, Serialize)]
pub struct SessionUser {
    pub user_id: Uuid,
    pub username: String,
    pub role: Role,
    pub full_name: String,
}

struct SessionEntry {
    user: SessionUser,
    expires_at: Instant,
}

/// Store for active login sessions.
pub struct SessionStore {
    sessions: HashMap<String, SessionEntry>,
    ttl: Duration,
}

impl SessionStore {
    pub fn new() -> Self {
        Self {
            sessions: HashMap::new(),
            ttl: Duration::from_secs(SESSION_TTL_SECS),
        }
    }

    /// Issue a fresh session token for the given user.
    pub fn issue(&mut self, user: SessionUser) -> String {
        self.cleanup();
        let token = generate_token();
        self.sessions.insert(
            token.clone(),
            SessionEntry {
                user,
                expires_at: Instant::now() + self.ttl,
            },
        );
        token
    }

    /// Resolve a token to its user. Expired entries are removed on read.
    pub fn get(&mut self, token: &str) -> Option<SessionUser> {
        let entry = self.sessions.get(token)?;
        if Instant::now() > entry.expires_at {
            self.sessions.remove(token);
            return None;
        }
        Some(entry.user.clone())
    }

    /// Drop a session (logout). Returns `true` if the token existed.
    pub fn revoke(&mut self, token: &str) -> bool {
        self.sessions.remove(token).is_some()
    }

    fn cleanup(&mut self) {
        let now = Instant::now();
        self.sessions.retain(|_, s| now < s.expires_at);
    }

    /// Force a live token past its deadline.
    #[cfg(test)]
    pub(crate) fn expire_for_test(&mut self, token: &str) {
        if let Some(entry) = self.sessions.get_mut(token) {
            entry.expires_at = Instant::now() - Duration::from_secs(1);
        }
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Generate a random session token (URL-safe base64, 32 bytes of entropy).
fn generate_token() -> String {
    let bytes: [u8; 32] = rand::random();
    base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(bytes)
}

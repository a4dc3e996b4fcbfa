//! Credential verification and session management.

pub mod password;
pub mod session;

pub use password::{hash_password, verify_password};
pub use session::{SessionStore, SessionUser, SESSION_COOKIE, SESSION_TTL_SECS};

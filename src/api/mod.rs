//! Portal HTTP API.
//!
//! Exposes the intake and review workflows as HTTP endpoints. Routes
//! are nested under `/api/` and protected by the session middleware;
//! stored attachments are served under `/uploads/`.
//!
//! The router is composable — `portal_router()` returns a `Router`
//! that can be mounted on any axum server instance.

pub mod endpoints;
pub mod error;
pub mod middleware;
pub mod router;
pub mod server;
pub mod types;

pub use error::ApiError;
pub use router::portal_router;
pub use server::{start_portal_server, PortalServer};
pub use types::ApiContext;

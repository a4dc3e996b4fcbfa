//! Portal API router.
//!
//! Returns a composable `Router` that can be mounted on any axum server.
//! Routes are nested under `/api/`; stored attachments are served under
//! `/uploads/`.

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use tower_http::services::ServeDir;

use crate::api::endpoints;
use crate::api::middleware;
use crate::api::types::ApiContext;
use crate::state::AppState;
use crate::uploads::MAX_UPLOAD_BYTES;

/// Build the portal router.
///
/// Everything except `/api/health` and `/api/auth/login` requires a live
/// session cookie. Role checks happen in the handlers; the middleware
/// only authenticates.
///
/// Middleware uses `Extension<ApiContext>` (injected as the outermost layer).
/// Endpoint handlers use `State<ApiContext>` (provided via `with_state`).
pub fn portal_router(state: Arc<AppState>) -> Router {
    let ctx = ApiContext::new(state);
    build_router(ctx)
}

/// Build router from a pre-constructed `ApiContext`.
///
/// Used by integration tests that need access to the shared `ApiContext`
/// (e.g. to issue sessions directly).
#[cfg(test)]
pub(crate) fn portal_router_with_ctx(ctx: ApiContext) -> Router {
    build_router(ctx)
}

fn build_router(ctx: ApiContext) -> Router {
    let upload_dir = ctx.state.config.upload_dir();

    // Protected routes — require a session cookie.
    //
    // Layers are applied from bottom (innermost) to top (outermost):
    //   Extension (outermost) → session check → Handler
    //
    // Extension must be outermost so the middleware can access ApiContext.
    // `.with_state()` converts Router<ApiContext> → Router<()> so the
    // from_fn middleware (state = ()) composes.
    let protected = Router::new()
        .route("/auth/logout", post(endpoints::auth::logout))
        .route("/auth/me", get(endpoints::auth::me))
        .route(
            "/reports",
            post(endpoints::reports::submit).get(endpoints::reports::list_mine),
        )
        .route(
            "/reports/:id/notes",
            post(endpoints::notes::add).get(endpoints::notes::list_for_report),
        )
        .route("/dashboard/reports", get(endpoints::dashboard::list_all))
        .with_state(ctx.clone())
        .route_layer(axum::middleware::from_fn(middleware::auth::require_session))
        .layer(axum::Extension(ctx.clone()));

    // Unprotected routes — liveness and login
    let unprotected = Router::new()
        .route("/health", get(endpoints::health::check))
        .route("/auth/login", post(endpoints::auth::login))
        .with_state(ctx.clone());

    // Stored attachments, session-gated like the rest of the portal
    let uploads = Router::new()
        .nest_service("/uploads", ServeDir::new(upload_dir))
        .route_layer(axum::middleware::from_fn(middleware::auth::require_session))
        .layer(axum::Extension(ctx));

    // Body cap matches the attachment limit; requests over it are
    // rejected while the multipart body is being read.
    Router::new()
        .nest("/api", protected)
        .nest("/api", unprotected)
        .merge(uploads)
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
}

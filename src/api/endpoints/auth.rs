//! Authentication endpoints.
//!
//! `POST /api/auth/login` — Unprotected: exchange credentials for a session cookie
//! `POST /api/auth/logout` — Protected: revoke the session, clear the cookie
//! `GET /api/auth/me` — Protected: identify the current session

use axum::extract::State;
use axum::http::header::SET_COOKIE;
use axum::http::{HeaderMap, HeaderValue};
use axum::response::{IntoResponse, Response};
use axum::{Extension, Json};
use serde::{Deserialize, Serialize};

use crate::api::error::ApiError;
use crate::api::middleware::auth::session_token_from_headers;
use crate::api::types::ApiContext;
use crate::auth::{verify_password, SessionUser, SESSION_COOKIE, SESSION_TTL_SECS};
use crate::db::repository;
use crate::models::{Role, User};

#[derive(Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
    /// Which portal the login targets. Correct credentials under the
    /// wrong role still fail.
    pub role: Role,
}

#[derive(Serialize)]
pub struct StatusResponse {
    pub status: &'static str,
}

/// `POST /api/auth/login` — verify credentials and start a session.
///
/// Any failure (unknown username, wrong role, wrong password) collapses
/// into the same 401 so the response does not reveal which part was wrong.
pub async fn login(
    State(ctx): State<ApiContext>,
    Json(request): Json<LoginRequest>,
) -> Result<Response, ApiError> {
    let state = ctx.state.clone();
    let LoginRequest {
        username,
        password,
        role,
    } = request;

    // Credential verification runs a full PBKDF2 derivation; keep it off
    // the async runtime.
    let user: Option<User> = tokio::task::spawn_blocking(move || -> Result<_, ApiError> {
        let conn = state.open_db()?;
        let user = repository::find_user_by_username_role(&conn, &username, role)?;
        match user {
            Some(u) if verify_password(&password, &u.password_hash) => Ok(Some(u)),
            _ => Ok(None),
        }
    })
    .await
    .map_err(|e| ApiError::Internal(format!("Task failed: {e}")))??;

    let user = user.ok_or(ApiError::Unauthorized)?;

    let session_user = SessionUser {
        user_id: user.id,
        username: user.username.clone(),
        role: user.role,
        full_name: user.full_name.clone(),
    };
    let token = ctx.issue_session(session_user.clone())?;

    tracing::info!(username = %user.username, role = user.role.as_str(), "Login");

    let mut response = Json(session_user).into_response();
    response.headers_mut().insert(
        SET_COOKIE,
        HeaderValue::from_str(&session_cookie(&token, SESSION_TTL_SECS))
            .map_err(|_| ApiError::Internal("invalid cookie value".into()))?,
    );
    Ok(response)
}

/// `POST /api/auth/logout` — revoke the session and expire the cookie.
pub async fn logout(
    State(ctx): State<ApiContext>,
    Extension(session): Extension<SessionUser>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    if let Some(token) = session_token_from_headers(&headers) {
        ctx.revoke_session(&token)?;
    }

    tracing::info!(username = %session.username, "Logout");

    let mut response = Json(StatusResponse { status: "ok" }).into_response();
    response.headers_mut().insert(
        SET_COOKIE,
        HeaderValue::from_static(EXPIRED_SESSION_COOKIE),
    );
    Ok(response)
}

/// `GET /api/auth/me` — who does this session belong to.
pub async fn me(Extension(session): Extension<SessionUser>) -> Json<SessionUser> {
    Json(session)
}

/// `Max-Age=0` tells the browser to drop the cookie immediately.
const EXPIRED_SESSION_COOKIE: &str = "portal_session=; HttpOnly; SameSite=Lax; Path=/; Max-Age=0";

fn session_cookie(token: &str, max_age_secs: u64) -> String {
    format!("{SESSION_COOKIE}={token}; HttpOnly; SameSite=Lax; Path=/; Max-Age={max_age_secs}")
}

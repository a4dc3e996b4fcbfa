//! Session cookie authentication middleware.
//!
//! Extracts the session cookie, resolves it against the in-memory
//! session store, and injects `SessionUser` into request extensions
//! for downstream handlers.

use axum::http::header::{CACHE_CONTROL, COOKIE};
use axum::http::{HeaderMap, HeaderValue, Request};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::auth::SESSION_COOKIE;

/// Require a live session from a logged-in portal user.
///
/// Accesses `ApiContext` from request extensions (injected by Extension layer).
/// On success: injects `SessionUser`, adds a `Cache-Control: no-store` header.
pub async fn require_session(req: Request<axum::body::Body>, next: Next) -> Response {
    match require_session_inner(req, next).await {
        Ok(resp) => resp,
        Err(err) => err.into_response(),
    }
}

async fn require_session_inner(
    mut req: Request<axum::body::Body>,
    next: Next,
) -> Result<Response, ApiError> {
    let ctx: ApiContext = req
        .extensions()
        .get::<ApiContext>()
        .cloned()
        .ok_or(ApiError::Internal("missing API context".into()))?;

    // 1. Extract the session token from the cookie header
    let token = session_token_from_headers(req.headers()).ok_or(ApiError::Unauthorized)?;

    // 2. Resolve it against the session store (expired tokens resolve to None)
    let user = ctx
        .resolve_session(&token)?
        .ok_or(ApiError::Unauthorized)?;

    // 3. Inject the session user for downstream handlers
    req.extensions_mut().insert(user);

    // 4. Process request
    let mut response = next.run(req).await;

    response
        .headers_mut()
        .insert(CACHE_CONTROL, HeaderValue::from_static("no-store"));

    Ok(response)
}

/// Pull the portal session token out of a `Cookie` header, if present.
///
/// Shared with the logout handler, which needs the raw token to revoke it.
pub fn session_token_from_headers(headers: &HeaderMap) -> Option<String> {
    let cookies = headers.get(COOKIE)?.to_str().ok()?;
    cookies.split(';').find_map(|pair| {
        let (name, value) = pair.trim().split_once('=')?;
        (name == SESSION_COOKIE).then(|| value.to_string())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers_with_cookie(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn extracts_token_from_single_cookie() {
        let headers = headers_with_cookie("portal_session=abc123");
        assert_eq!(session_token_from_headers(&headers).as_deref(), Some("abc123"));
    }

    #[test]
    fn extracts_token_among_other_cookies() {
        let headers = headers_with_cookie("theme=dark; portal_session=tok; lang=en");
        assert_eq!(session_token_from_headers(&headers).as_deref(), Some("tok"));
    }

    #[test]
    fn missing_cookie_header_yields_none() {
        assert!(session_token_from_headers(&HeaderMap::new()).is_none());
    }

    #[test]
    fn unrelated_cookies_yield_none() {
        let headers = headers_with_cookie("theme=dark; lang=en");
        assert!(session_token_from_headers(&headers).is_none());
    }

    #[test]
    fn cookie_name_must_match_exactly() {
        let headers = headers_with_cookie("portal_session_old=tok");
        assert!(session_token_from_headers(&headers).is_none());
    }
}

//! Session refresh middleware.
//!
//! Runs on every request. A valid access-token cookie passes straight
//! through. When the access token is missing or no longer valid but a refresh
//! cookie is present, the session is renewed at the identity provider: the
//! new access token is used for the rest of this request and both cookies are
//! rewritten on the response. A refresh the provider rejects removes both
//! cookies.

use axum::body::Body;
use axum::extract::State;
use axum::http::header::SET_COOKIE;
use axum::http::Request;
use axum::middleware::Next;
use axum::response::Response;

use crate::auth::cookies::{
    append_cookies, read_cookie, removal_cookies, session_cookies, ACCESS_COOKIE, REFRESH_COOKIE,
};
use crate::auth::jwt::validate_token;
use crate::state::AppState;

/// Access token obtained by refreshing during the current request.
#[derive(Debug, Clone)]
pub struct RefreshedSession {
    pub access_token: String,
}

pub async fn refresh_session(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    let jwt = &state.config.auth.jwt;
    let secure = state.config.auth.cookie_secure;

    let access_valid = read_cookie(req.headers(), ACCESS_COOKIE)
        .is_some_and(|token| validate_token(&token, jwt).is_ok());
    if access_valid {
        return next.run(req).await;
    }
    let Some(refresh_token) = read_cookie(req.headers(), REFRESH_COOKIE) else {
        return next.run(req).await;
    };

    match state.identity.refresh(&refresh_token).await {
        Ok(session) => {
            tracing::debug!(user_id = %session.user.id, "Session refreshed");
            req.extensions_mut().insert(RefreshedSession {
                access_token: session.access_token.clone(),
            });
            let mut response = next.run(req).await;
            // Handlers that set session cookies themselves (sign-in, sign-out) win.
            if !response.headers().contains_key(SET_COOKIE) {
                append_cookies(response.headers_mut(), session_cookies(&session, secure));
            }
            response
        }
        Err(err) if err.is_rejection() => {
            tracing::info!(error = %err, "Session refresh rejected, clearing cookies");
            let mut response = next.run(req).await;
            if !response.headers().contains_key(SET_COOKIE) {
                append_cookies(response.headers_mut(), removal_cookies(secure));
            }
            response
        }
        Err(err) => {
            tracing::warn!(error = %err, "Session refresh failed, continuing unauthenticated");
            next.run(req).await
        }
    }
}

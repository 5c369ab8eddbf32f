//! Access-token extractors for Axum handlers.
//!
//! The token is taken from, in order: a session refreshed earlier in this
//! request by [`refresh_session`](super::session::refresh_session), the
//! `Authorization: Bearer` header, or the access-token cookie.

use std::convert::Infallible;

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use uuid::Uuid;
use weighbridge_core::error::CoreError;

use super::session::RefreshedSession;
use crate::auth::cookies::{read_cookie, ACCESS_COOKIE};
use crate::auth::jwt::{validate_token, Claims};
use crate::error::AppError;
use crate::state::AppState;

/// Authenticated user extracted from the session's access token.
///
/// ```ignore
/// async fn my_handler(user: AuthUser) -> AppResult<Json<()>> {
///     tracing::info!(user_id = %user.user_id, "handling request");
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser {
    /// The provider's user id (from `claims.sub`).
    pub user_id: Uuid,
    pub email: Option<String>,
    pub role: String,
}

impl From<Claims> for AuthUser {
    fn from(claims: Claims) -> Self {
        Self {
            user_id: claims.sub,
            email: claims.email,
            role: claims.role,
        }
    }
}

/// The raw access token for this request, if one was presented.
pub fn session_token(parts: &Parts) -> Result<Option<String>, CoreError> {
    if let Some(refreshed) = parts.extensions.get::<RefreshedSession>() {
        return Ok(Some(refreshed.access_token.clone()));
    }
    if let Some(header) = parts.headers.get(AUTHORIZATION) {
        let token = header
            .to_str()
            .ok()
            .and_then(|v| v.strip_prefix("Bearer "))
            .ok_or_else(|| {
                CoreError::Unauthorized(
                    "Invalid Authorization format. Expected: Bearer <token>".into(),
                )
            })?;
        return Ok(Some(token.to_string()));
    }
    Ok(read_cookie(&parts.headers, ACCESS_COOKIE))
}

fn authenticate(parts: &Parts, state: &AppState) -> Result<AuthUser, CoreError> {
    let token = session_token(parts)?
        .ok_or_else(|| CoreError::Unauthorized("Missing session".into()))?;
    let claims = validate_token(&token, &state.config.auth.jwt)
        .map_err(|_| CoreError::Unauthorized("Invalid or expired token".into()))?;
    Ok(claims.into())
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        Ok(authenticate(parts, state)?)
    }
}

/// The authenticated user when the request carries a valid session.
///
/// Never rejects; an absent or invalid token yields `None`.
#[derive(Debug, Clone)]
pub struct MaybeAuthUser(pub Option<AuthUser>);

impl FromRequestParts<AppState> for MaybeAuthUser {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        Ok(MaybeAuthUser(authenticate(parts, state).ok()))
    }
}

//! Handlers for the `/auth` resource (sign-in, sign-up, sign-out, current user).
//!
//! Credentials are checked by the identity provider; this service only turns
//! the issued session into cookies.

use axum::extract::{Request, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;
use weighbridge_core::weighing::validate_input;
use weighbridge_supabase::{Session, SignUpOutcome, User};

use crate::auth::cookies::{append_cookies, removal_cookies, session_cookies};
use crate::error::AppResult;
use crate::middleware::auth::{session_token, AuthUser};
use crate::state::AppState;

/// Role reported when the provider leaves it unset.
const DEFAULT_ROLE: &str = "authenticated";

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /auth/sign-in` and `POST /auth/sign-up`.
#[derive(Debug, Deserialize, Validate)]
pub struct CredentialsRequest {
    #[validate(email(message = "must be a valid email address"))]
    pub email: String,
    #[validate(length(min = 6, message = "must be at least 6 characters"))]
    pub password: String,
}

/// Public user info.
#[derive(Debug, Serialize)]
pub struct UserInfo {
    pub id: Uuid,
    pub email: Option<String>,
    pub role: String,
}

impl From<&User> for UserInfo {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            role: user.role.clone().unwrap_or_else(|| DEFAULT_ROLE.to_string()),
        }
    }
}

impl From<AuthUser> for UserInfo {
    fn from(user: AuthUser) -> Self {
        Self {
            id: user.user_id,
            email: user.email,
            role: user.role,
        }
    }
}

/// Body of a successful sign-in or sign-up.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    pub user: UserInfo,
    /// Set when the account exists but no session was issued yet.
    pub confirmation_required: bool,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/auth/sign-in
pub async fn sign_in(
    State(state): State<AppState>,
    Json(input): Json<CredentialsRequest>,
) -> AppResult<Response> {
    validate_input(&input)?;
    let session = state.identity.sign_in(&input.email, &input.password).await?;
    tracing::info!(user_id = %session.user.id, "User signed in");
    Ok(session_response(&state, StatusCode::OK, &session))
}

/// POST /api/v1/auth/sign-up
///
/// Sets cookies only when the provider issues a session straight away;
/// otherwise responds `202 Accepted` with `confirmationRequired`.
pub async fn sign_up(
    State(state): State<AppState>,
    Json(input): Json<CredentialsRequest>,
) -> AppResult<Response> {
    validate_input(&input)?;
    match state.identity.sign_up(&input.email, &input.password).await? {
        SignUpOutcome::Session(session) => {
            tracing::info!(user_id = %session.user.id, "User signed up");
            Ok(session_response(&state, StatusCode::CREATED, &session))
        }
        SignUpOutcome::ConfirmationRequired(user) => {
            tracing::info!(user_id = %user.id, "User signed up, awaiting confirmation");
            let body = SessionResponse {
                user: UserInfo::from(&user),
                confirmation_required: true,
            };
            Ok((StatusCode::ACCEPTED, Json(body)).into_response())
        }
    }
}

/// POST /api/v1/auth/sign-out
///
/// Revocation at the provider is best effort; the cookies are cleared either way.
pub async fn sign_out(State(state): State<AppState>, request: Request) -> Response {
    let (parts, _body) = request.into_parts();
    if let Ok(Some(token)) = session_token(&parts) {
        if let Err(e) = state.identity.sign_out(&token).await {
            tracing::warn!(error = %e, "Provider sign-out failed");
        }
    }

    let mut response = StatusCode::NO_CONTENT.into_response();
    append_cookies(
        response.headers_mut(),
        removal_cookies(state.config.auth.cookie_secure),
    );
    response
}

/// GET /api/v1/auth/user
pub async fn current_user(user: AuthUser) -> Json<UserInfo> {
    Json(user.into())
}

// ---------------------------------------------------------------------------
// Private helpers
// ---------------------------------------------------------------------------

fn session_response(state: &AppState, status: StatusCode, session: &Session) -> Response {
    let body = SessionResponse {
        user: UserInfo::from(&session.user),
        confirmation_required: false,
    };
    let mut response = (status, Json(body)).into_response();
    append_cookies(
        response.headers_mut(),
        session_cookies(session, state.config.auth.cookie_secure),
    );
    response
}

pub mod auth;
pub mod health;
pub mod rpc;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// ```text
/// /auth/sign-in                                    sign in (public)
/// /auth/sign-up                                    sign up (public)
/// /auth/sign-out                                   sign out, clears cookies
/// /auth/user                                       current user (requires auth)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new().nest("/auth", auth::router())
}

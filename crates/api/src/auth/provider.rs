//! The identity-provider seam.
//!
//! Handlers and the session middleware talk to [`IdentityProvider`] so tests
//! can substitute an in-process fake for the hosted service.

use async_trait::async_trait;
use weighbridge_supabase::{GoTrueClient, GoTrueError, Session, SignUpOutcome};

/// Email/password identity operations.
#[async_trait]
pub trait IdentityProvider: Send + Sync + 'static {
    async fn sign_in(&self, email: &str, password: &str) -> Result<Session, GoTrueError>;

    async fn sign_up(&self, email: &str, password: &str) -> Result<SignUpOutcome, GoTrueError>;

    /// Exchange a refresh token for a new session.
    async fn refresh(&self, refresh_token: &str) -> Result<Session, GoTrueError>;

    /// Revoke the session identified by its access token.
    async fn sign_out(&self, access_token: &str) -> Result<(), GoTrueError>;
}

#[async_trait]
impl IdentityProvider for GoTrueClient {
    async fn sign_in(&self, email: &str, password: &str) -> Result<Session, GoTrueError> {
        GoTrueClient::sign_in(self, email, password).await
    }

    async fn sign_up(&self, email: &str, password: &str) -> Result<SignUpOutcome, GoTrueError> {
        GoTrueClient::sign_up(self, email, password).await
    }

    async fn refresh(&self, refresh_token: &str) -> Result<Session, GoTrueError> {
        GoTrueClient::refresh(self, refresh_token).await
    }

    async fn sign_out(&self, access_token: &str) -> Result<(), GoTrueError> {
        GoTrueClient::sign_out(self, access_token).await
    }
}

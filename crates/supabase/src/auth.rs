//! GoTrue identity client: password sign-in, sign-up, token refresh and
//! sign-out.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use crate::SupabaseProject;

/// An issued session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,
    pub refresh_token: String,
    /// Access-token lifetime in seconds.
    pub expires_in: i64,
    #[serde(default = "default_token_type")]
    pub token_type: String,
    pub user: User,
}

fn default_token_type() -> String {
    "bearer".to_string()
}

/// The identity attached to a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub email: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
}

/// Result of a sign-up. Projects that require email confirmation return the
/// user without a session.
#[derive(Debug, Clone, PartialEq)]
pub enum SignUpOutcome {
    Session(Session),
    ConfirmationRequired(User),
}

/// Errors from the GoTrue API.
#[derive(Debug, thiserror::Error)]
pub enum GoTrueError {
    /// The HTTP request itself failed (network, DNS, TLS, decoding).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// GoTrue returned a non-2xx status.
    #[error("Identity provider rejected the request ({status}): {message}")]
    Rejected { status: u16, message: String },

    /// A 2xx body that matched neither a session nor a user.
    #[error("Unexpected identity provider response: {0}")]
    UnexpectedResponse(#[from] serde_json::Error),
}

impl GoTrueError {
    /// True when the provider judged the request itself (bad credentials,
    /// expired refresh token, duplicate email), as opposed to being unreachable.
    pub fn is_rejection(&self) -> bool {
        matches!(self, GoTrueError::Rejected { status, .. } if (400..500).contains(status))
    }
}

/// GoTrue's error bodies vary by endpoint and version.
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    error_description: Option<String>,
    msg: Option<String>,
    message: Option<String>,
    error: Option<String>,
}

impl ErrorBody {
    fn into_message(self) -> Option<String> {
        self.error_description
            .or(self.msg)
            .or(self.message)
            .or(self.error)
    }
}

/// HTTP client for a project's GoTrue endpoints.
#[derive(Clone)]
pub struct GoTrueClient {
    client: reqwest::Client,
    auth_url: String,
    anon_key: String,
}

impl GoTrueClient {
    pub fn new(project: &SupabaseProject) -> Self {
        Self::with_client(reqwest::Client::new(), project)
    }

    pub fn with_client(client: reqwest::Client, project: &SupabaseProject) -> Self {
        Self {
            client,
            auth_url: project.auth_url(),
            anon_key: project.anon_key().to_string(),
        }
    }

    /// `POST /token?grant_type=password`.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<Session, GoTrueError> {
        let response = self
            .client
            .post(format!("{}/token", self.auth_url))
            .query(&[("grant_type", "password")])
            .header("apikey", &self.anon_key)
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await?;
        parse_response(response).await
    }

    /// `POST /signup`.
    pub async fn sign_up(&self, email: &str, password: &str) -> Result<SignUpOutcome, GoTrueError> {
        let response = self
            .client
            .post(format!("{}/signup", self.auth_url))
            .header("apikey", &self.anon_key)
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await?;
        let value: serde_json::Value = parse_response(response).await?;
        Ok(sign_up_outcome(value)?)
    }

    /// `POST /token?grant_type=refresh_token`.
    pub async fn refresh(&self, refresh_token: &str) -> Result<Session, GoTrueError> {
        let response = self
            .client
            .post(format!("{}/token", self.auth_url))
            .query(&[("grant_type", "refresh_token")])
            .header("apikey", &self.anon_key)
            .json(&json!({ "refresh_token": refresh_token }))
            .send()
            .await?;
        parse_response(response).await
    }

    /// `POST /logout`, revoking the session's refresh tokens.
    pub async fn sign_out(&self, access_token: &str) -> Result<(), GoTrueError> {
        let response = self
            .client
            .post(format!("{}/logout", self.auth_url))
            .header("apikey", &self.anon_key)
            .bearer_auth(access_token)
            .send()
            .await?;
        ensure_success(response).await?;
        Ok(())
    }
}

// ---- private helpers ----

fn sign_up_outcome(value: serde_json::Value) -> Result<SignUpOutcome, serde_json::Error> {
    if value.get("access_token").is_some() {
        Ok(SignUpOutcome::Session(serde_json::from_value(value)?))
    } else {
        Ok(SignUpOutcome::ConfirmationRequired(serde_json::from_value(
            value,
        )?))
    }
}

async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, GoTrueError> {
    let status = response.status();
    if !status.is_success() {
        let text = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&text)
            .ok()
            .and_then(ErrorBody::into_message)
            .unwrap_or(text);
        tracing::debug!(status = status.as_u16(), %message, "Identity provider rejected request");
        return Err(GoTrueError::Rejected {
            status: status.as_u16(),
            message,
        });
    }
    Ok(response)
}

async fn parse_response<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, GoTrueError> {
    let response = ensure_success(response).await?;
    Ok(response.json::<T>().await?)
}

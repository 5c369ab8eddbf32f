//! Clients for a hosted Supabase project.
//!
//! - [`rest::PostgrestStore`] -- the [`WeighingStore`](weighbridge_db::store::WeighingStore)
//!   contract over the PostgREST HTTP dialect.
//! - [`auth::GoTrueClient`] -- email/password sessions against the GoTrue
//!   identity endpoints.
//!
//! Both authenticate with the project's public (anon) API key.

pub mod auth;
pub mod rest;

pub use auth::{GoTrueClient, GoTrueError, Session, SignUpOutcome, User};
pub use rest::{PostgrestError, PostgrestStore};

/// Location and public key of a hosted project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SupabaseProject {
    url: String,
    anon_key: String,
}

impl SupabaseProject {
    /// `url` is the project base URL, e.g. `https://abc.supabase.co`.
    pub fn new(url: impl Into<String>, anon_key: impl Into<String>) -> Self {
        let url = url.into().trim_end_matches('/').to_string();
        Self {
            url,
            anon_key: anon_key.into(),
        }
    }

    pub fn anon_key(&self) -> &str {
        &self.anon_key
    }

    /// Base URL of the PostgREST data API.
    pub fn rest_url(&self) -> String {
        format!("{}/rest/v1", self.url)
    }

    /// Base URL of the GoTrue identity API.
    pub fn auth_url(&self) -> String {
        format!("{}/auth/v1", self.url)
    }
}

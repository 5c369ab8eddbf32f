#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE, COOKIE, SET_COOKIE};
use axum::http::{Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use tower::ServiceExt;
use uuid::Uuid;
use weighbridge_api::auth::jwt::{issue_token, JwtConfig};
use weighbridge_api::auth::provider::IdentityProvider;
use weighbridge_api::config::{AuthConfig, ServerConfig, StoreBackend, StoreConfig};
use weighbridge_api::router::build_app_router;
use weighbridge_api::state::AppState;
use weighbridge_api::storage::StoreProvider;
use weighbridge_db::store::MemoryStore;
use weighbridge_supabase::{GoTrueError, Session, SignUpOutcome, SupabaseProject, User};

pub const TEST_JWT_SECRET: &str = "weighbridge-test-secret-that-is-long-enough";

/// Password accepted by [`FakeIdentity`] for every account.
pub const TEST_PASSWORD: &str = "correct-horse";

/// Refresh token [`FakeIdentity`] exchanges for a new session.
pub const VALID_REFRESH: &str = "valid-refresh-token";

/// Refresh token [`FakeIdentity`] answers with a 5xx.
pub const OUTAGE_REFRESH: &str = "outage-refresh-token";

/// Build a test `ServerConfig` with safe defaults and the in-memory backend.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:3001".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 5,
        store: StoreConfig {
            backend: StoreBackend::Memory,
            database_url: None,
            max_connections: 1,
            run_migrations: false,
        },
        supabase: SupabaseProject::new("http://127.0.0.1:9", "test-anon-key"),
        auth: AuthConfig {
            jwt: test_jwt(),
            cookie_secure: false,
        },
        require_known_company: false,
    }
}

pub fn test_jwt() -> JwtConfig {
    JwtConfig {
        secret: TEST_JWT_SECRET.to_string(),
    }
}

/// A signed access token for `user_id`. Negative `ttl_secs` yields an
/// expired token.
pub fn mint_token(user_id: Uuid, ttl_secs: i64) -> String {
    issue_token(user_id, Some("operator@example.com"), ttl_secs, &test_jwt()).unwrap()
}

// ---------------------------------------------------------------------------
// Fake identity provider
// ---------------------------------------------------------------------------

/// In-process stand-in for the hosted identity service.
///
/// Any email signs in with [`TEST_PASSWORD`]. Sign-ups for addresses starting
/// with `confirm` need email confirmation. Refresh succeeds only for
/// [`VALID_REFRESH`]; [`OUTAGE_REFRESH`] simulates a provider outage.
#[derive(Default)]
pub struct FakeIdentity {
    pub user_id: Uuid,
    pub signed_out: Mutex<Vec<String>>,
    pub refreshes: Mutex<u32>,
}

impl FakeIdentity {
    pub fn new() -> Self {
        Self {
            user_id: Uuid::new_v4(),
            ..Default::default()
        }
    }

    fn user(&self, email: &str) -> User {
        User {
            id: self.user_id,
            email: Some(email.to_string()),
            role: Some("authenticated".to_string()),
        }
    }

    pub fn session(&self, email: &str) -> Session {
        Session {
            access_token: issue_token(self.user_id, Some(email), 3600, &test_jwt()).unwrap(),
            refresh_token: format!("refresh-{}", Uuid::new_v4()),
            expires_in: 3600,
            token_type: "bearer".to_string(),
            user: self.user(email),
        }
    }
}

#[async_trait]
impl IdentityProvider for FakeIdentity {
    async fn sign_in(&self, email: &str, password: &str) -> Result<Session, GoTrueError> {
        if password != TEST_PASSWORD {
            return Err(GoTrueError::Rejected {
                status: 400,
                message: "Invalid login credentials".to_string(),
            });
        }
        Ok(self.session(email))
    }

    async fn sign_up(&self, email: &str, _password: &str) -> Result<SignUpOutcome, GoTrueError> {
        if email.starts_with("confirm") {
            return Ok(SignUpOutcome::ConfirmationRequired(self.user(email)));
        }
        Ok(SignUpOutcome::Session(self.session(email)))
    }

    async fn refresh(&self, refresh_token: &str) -> Result<Session, GoTrueError> {
        *self.refreshes.lock().unwrap() += 1;
        match refresh_token {
            VALID_REFRESH => Ok(self.session("operator@example.com")),
            OUTAGE_REFRESH => Err(GoTrueError::Rejected {
                status: 503,
                message: "upstream unavailable".to_string(),
            }),
            _ => Err(GoTrueError::Rejected {
                status: 400,
                message: "Invalid Refresh Token".to_string(),
            }),
        }
    }

    async fn sign_out(&self, access_token: &str) -> Result<(), GoTrueError> {
        self.signed_out.lock().unwrap().push(access_token.to_string());
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// App builders
// ---------------------------------------------------------------------------

/// A router over an in-memory store, plus handles to inspect it.
pub struct TestApp {
    pub router: Router,
    pub store: Arc<MemoryStore>,
    pub identity: Arc<FakeIdentity>,
}

pub fn build_test_state(
    config: ServerConfig,
    store: Arc<MemoryStore>,
    identity: Arc<FakeIdentity>,
) -> AppState {
    let provider = StoreProvider::with_store(StoreBackend::Memory, store);
    AppState::new(config, Arc::new(provider), identity)
}

pub fn build_test_app_with(config: ServerConfig) -> TestApp {
    let store = Arc::new(MemoryStore::new());
    let identity = Arc::new(FakeIdentity::new());
    let state = build_test_state(config.clone(), Arc::clone(&store), Arc::clone(&identity));
    TestApp {
        router: build_app_router(state, &config),
        store,
        identity,
    }
}

/// Build the full application router with all middleware layers.
pub fn build_test_app() -> TestApp {
    build_test_app_with(test_config())
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn send(app: &Router, request: Request<Body>) -> Response<Body> {
    app.clone().oneshot(request).await.unwrap()
}

pub async fn get(app: &Router, uri: &str) -> Response<Body> {
    send(app, Request::get(uri).body(Body::empty()).unwrap()).await
}

pub async fn get_auth(app: &Router, uri: &str, token: &str) -> Response<Body> {
    let request = Request::get(uri)
        .header(AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn get_with_cookie(app: &Router, uri: &str, cookie: &str) -> Response<Body> {
    let request = Request::get(uri)
        .header(COOKIE, cookie)
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn post_json(app: &Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    let request = Request::post(uri)
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

pub async fn post_json_auth(
    app: &Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response<Body> {
    let request = Request::post(uri)
        .header(CONTENT_TYPE, "application/json")
        .header(AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

/// Percent-encode a JSON value for the `input` query parameter.
pub fn encode_input(value: &serde_json::Value) -> String {
    urlencoding::encode(&value.to_string()).into_owned()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// All `Set-Cookie` header values of a response.
pub fn set_cookies(response: &Response<Body>) -> Vec<String> {
    response
        .headers()
        .get_all(SET_COOKIE)
        .iter()
        .map(|v| v.to_str().unwrap().to_string())
        .collect()
}

/// The `Set-Cookie` value for `name`, if any.
pub fn set_cookie<'a>(cookies: &'a [String], name: &str) -> Option<&'a str> {
    cookies
        .iter()
        .find(|c| c.starts_with(&format!("{name}=")))
        .map(String::as_str)
}

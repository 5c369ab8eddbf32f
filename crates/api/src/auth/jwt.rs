//! Access-token validation.
//!
//! Access tokens are HS256-signed JWTs issued by the identity provider with
//! audience `authenticated`. They are verified locally with the project's JWT
//! secret; no round-trip to the provider is needed per request.

use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Audience claim carried by tokens of signed-in users.
pub const AUTHENTICATED_AUDIENCE: &str = "authenticated";

/// Claims read from a provider access token.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject -- the provider's user id.
    pub sub: Uuid,
    pub aud: String,
    #[serde(default)]
    pub email: Option<String>,
    /// Provider role, normally `"authenticated"`.
    #[serde(default)]
    pub role: String,
    /// Expiration time (UTC Unix timestamp).
    pub exp: i64,
    /// Issued-at time (UTC Unix timestamp).
    pub iat: i64,
}

/// Verification settings for access tokens.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// HMAC-SHA256 secret shared with the identity provider.
    pub secret: String,
}

impl JwtConfig {
    /// Load from `SUPABASE_JWT_SECRET`.
    ///
    /// # Panics
    ///
    /// Panics if `SUPABASE_JWT_SECRET` is not set or is empty.
    pub fn from_env() -> Self {
        let secret = std::env::var("SUPABASE_JWT_SECRET")
            .expect("SUPABASE_JWT_SECRET must be set in the environment");
        assert!(!secret.is_empty(), "SUPABASE_JWT_SECRET must not be empty");
        Self { secret }
    }
}

/// Validate and decode an access token, returning the embedded [`Claims`].
///
/// Checks the signature, expiry and the `authenticated` audience.
pub fn validate_token(
    token: &str,
    config: &JwtConfig,
) -> Result<Claims, jsonwebtoken::errors::Error> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_audience(&[AUTHENTICATED_AUDIENCE]);
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &validation,
    )?;
    Ok(token_data.claims)
}

/// Sign a token the way the identity provider does. Used to mint sessions
/// for local tooling and tests.
pub fn issue_token(
    user_id: Uuid,
    email: Option<&str>,
    ttl_secs: i64,
    config: &JwtConfig,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = chrono::Utc::now().timestamp();
    let claims = Claims {
        sub: user_id,
        aud: AUTHENTICATED_AUDIENCE.to_string(),
        email: email.map(str::to_string),
        role: AUTHENTICATED_AUDIENCE.to_string(),
        exp: now + ttl_secs,
        iat: now,
    };
    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )
}

use std::fmt;
use std::str::FromStr;

use weighbridge_supabase::SupabaseProject;

use crate::auth::jwt::JwtConfig;

/// Which [`WeighingStore`](weighbridge_db::store::WeighingStore) backend to build.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    /// Pooled PostgreSQL connections (`DATABASE_URL`).
    Postgres,
    /// The hosted project's PostgREST endpoint (`SUPABASE_URL`).
    Supabase,
    /// In-process tables; data is lost on restart.
    Memory,
}

impl StoreBackend {
    pub fn as_str(self) -> &'static str {
        match self {
            StoreBackend::Postgres => "postgres",
            StoreBackend::Supabase => "supabase",
            StoreBackend::Memory => "memory",
        }
    }
}

impl fmt::Display for StoreBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StoreBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(StoreBackend::Postgres),
            "supabase" => Ok(StoreBackend::Supabase),
            "memory" => Ok(StoreBackend::Memory),
            other => Err(format!(
                "unknown store backend '{other}' (expected postgres, supabase or memory)"
            )),
        }
    }
}

/// Log output format for the tracing subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl LogFormat {
    /// Read `LOG_FORMAT`; anything other than `json` means pretty output.
    pub fn from_env() -> Self {
        match std::env::var("LOG_FORMAT") {
            Ok(v) if v.eq_ignore_ascii_case("json") => LogFormat::Json,
            _ => LogFormat::Pretty,
        }
    }
}

/// Storage settings. Connection happens on first use, not at startup.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub backend: StoreBackend,
    /// Required for [`StoreBackend::Postgres`].
    pub database_url: Option<String>,
    /// Pool size (default: `10`).
    pub max_connections: u32,
    /// Apply `db/migrations` when the pool is first opened (default: `true`).
    pub run_migrations: bool,
}

/// Session and token settings.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Verification settings for provider-issued access tokens.
    pub jwt: JwtConfig,
    /// Set the `Secure` attribute on session cookies (default: `false`).
    pub cookie_secure: bool,
}

/// Server configuration loaded from environment variables.
///
/// All fields except the hosted-project credentials have defaults suitable
/// for local development.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Upper bound on closing the store during shutdown (default: `10`).
    pub shutdown_timeout_secs: u64,
    pub store: StoreConfig,
    /// Hosted project used for identity and, optionally, storage.
    pub supabase: SupabaseProject,
    pub auth: AuthConfig,
    /// Reject `weighing.create` for companies that are not active (default: `false`).
    pub require_known_company: bool,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                 | Default                  |
    /// |-------------------------|--------------------------|
    /// | `HOST`                  | `0.0.0.0`                |
    /// | `PORT`                  | `3000`                   |
    /// | `CORS_ORIGINS`          | `http://localhost:3001`  |
    /// | `REQUEST_TIMEOUT_SECS`  | `30`                     |
    /// | `SHUTDOWN_TIMEOUT_SECS` | `10`                     |
    /// | `STORE_BACKEND`         | `postgres`               |
    /// | `DATABASE_URL`          | required for `postgres`  |
    /// | `DB_MAX_CONNECTIONS`    | `10`                     |
    /// | `RUN_MIGRATIONS`        | `true`                   |
    /// | `SUPABASE_URL`          | **required**             |
    /// | `SUPABASE_ANON_KEY`     | **required**             |
    /// | `SUPABASE_JWT_SECRET`   | **required**             |
    /// | `COOKIE_SECURE`         | `false`                  |
    /// | `REQUIRE_KNOWN_COMPANY` | `false`                  |
    ///
    /// # Panics
    ///
    /// Panics on a missing required variable or an unparseable value, so
    /// misconfiguration fails at startup.
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());
        let port: u16 = env_parse("PORT", 3000);

        let cors_origins = parse_origins(
            &std::env::var("CORS_ORIGINS").unwrap_or_else(|_| "http://localhost:3001".into()),
        );

        let request_timeout_secs: u64 = env_parse("REQUEST_TIMEOUT_SECS", 30);
        let shutdown_timeout_secs: u64 = env_parse("SHUTDOWN_TIMEOUT_SECS", 10);

        let backend: StoreBackend = env_parse("STORE_BACKEND", StoreBackend::Postgres);
        let database_url = std::env::var("DATABASE_URL").ok().filter(|s| !s.is_empty());
        if backend == StoreBackend::Postgres {
            assert!(
                database_url.is_some(),
                "DATABASE_URL must be set when STORE_BACKEND=postgres"
            );
        }
        let store = StoreConfig {
            backend,
            database_url,
            max_connections: env_parse("DB_MAX_CONNECTIONS", 10),
            run_migrations: env_flag("RUN_MIGRATIONS", true),
        };

        let supabase_url =
            std::env::var("SUPABASE_URL").expect("SUPABASE_URL must be set in the environment");
        let anon_key = std::env::var("SUPABASE_ANON_KEY")
            .expect("SUPABASE_ANON_KEY must be set in the environment");
        let supabase = SupabaseProject::new(supabase_url, anon_key);

        let auth = AuthConfig {
            jwt: JwtConfig::from_env(),
            cookie_secure: env_flag("COOKIE_SECURE", false),
        };

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            shutdown_timeout_secs,
            store,
            supabase,
            auth,
            require_known_company: env_flag("REQUIRE_KNOWN_COMPANY", false),
        }
    }
}

/// Split a comma-separated origin list, dropping blanks.
pub fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Interpret a boolean env value (`true/false`, `1/0`, `yes/no`, `on/off`).
pub fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn env_flag(key: &str, default: bool) -> bool {
    match std::env::var(key) {
        Ok(raw) => parse_flag(&raw).unwrap_or_else(|| panic!("{key} must be a boolean, got '{raw}'")),
        Err(_) => default,
    }
}

fn env_parse<T>(key: &str, default: T) -> T
where
    T: FromStr,
    T::Err: fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .parse()
            .unwrap_or_else(|e| panic!("{key} has an invalid value '{raw}': {e}")),
        Err(_) => default,
    }
}

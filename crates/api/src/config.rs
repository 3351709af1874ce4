use staffd_core::session::SessionManagerConfig;

/// Authentication tunables.
///
/// | Env Var                   | Required | Default  |
/// |---------------------------|----------|----------|
/// | `ACCESS_TOKEN_TTL_SECS`   | no       | `3600`   |
/// | `REFRESH_TOKEN_TTL_SECS`  | no       | `604800` |
/// | `HASH_WORK_FACTOR`        | no       | `3`      |
///
/// The work factor is the Argon2id iteration count; raise it as hardware
/// improves without touching callers.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub access_token_ttl_secs: i64,
    pub refresh_token_ttl_secs: i64,
    pub hash_work_factor: u32,
}

/// Default access token lifetime (1 hour).
const DEFAULT_ACCESS_TTL_SECS: i64 = 3600;
/// Default refresh token lifetime (7 days).
const DEFAULT_REFRESH_TTL_SECS: i64 = 604_800;
/// Default Argon2id iteration count.
const DEFAULT_HASH_WORK_FACTOR: u32 = 3;

impl AuthConfig {
    pub fn from_env() -> Self {
        let access_token_ttl_secs: i64 = std::env::var("ACCESS_TOKEN_TTL_SECS")
            .unwrap_or_else(|_| DEFAULT_ACCESS_TTL_SECS.to_string())
            .parse()
            .expect("ACCESS_TOKEN_TTL_SECS must be a valid i64");

        let refresh_token_ttl_secs: i64 = std::env::var("REFRESH_TOKEN_TTL_SECS")
            .unwrap_or_else(|_| DEFAULT_REFRESH_TTL_SECS.to_string())
            .parse()
            .expect("REFRESH_TOKEN_TTL_SECS must be a valid i64");

        let hash_work_factor: u32 = std::env::var("HASH_WORK_FACTOR")
            .unwrap_or_else(|_| DEFAULT_HASH_WORK_FACTOR.to_string())
            .parse()
            .expect("HASH_WORK_FACTOR must be a valid u32");

        Self {
            access_token_ttl_secs,
            refresh_token_ttl_secs,
            hash_work_factor,
        }
    }

    /// The session manager's view of these tunables.
    pub fn session_config(&self) -> SessionManagerConfig {
        SessionManagerConfig {
            access_token_ttl: chrono::Duration::seconds(self.access_token_ttl_secs),
            refresh_token_ttl: chrono::Duration::seconds(self.refresh_token_ttl_secs),
        }
    }
}

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
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
    /// Authentication tunables (token TTLs, hash work factor).
    pub auth: AuthConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                    |
    /// |------------------------|----------------------------|
    /// | `HOST`                 | `0.0.0.0`                  |
    /// | `PORT`                 | `3000`                     |
    /// | `CORS_ORIGINS`         | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                       |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let auth = AuthConfig::from_env();

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            auth,
        }
    }
}

//! crates/configs/src/lib.rs
//!
//! Layered configuration: built-in defaults, then the legacy flat
//! variables (`PORT`, `DATABASE_URL`, `JWT_SECRET`, `JWT_EXPIRES_IN_HOURS`),
//! then `STACKIT__SECTION__KEY` variables. A `.env` file is read first
//! when present.

use std::net::SocketAddr;

use secrecy::SecretString;
use serde::Deserialize;
use thiserror::Error;

const ENV_PREFIX: &str = "STACKIT";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("auth.jwt_secret is required (set STACKIT__AUTH__JWT_SECRET or JWT_SECRET)")]
    MissingSecret,

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn addr(&self) -> Result<SocketAddr, ConfigError> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| ConfigError::Invalid(format!("server address: {e}")))
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub jwt_secret: SecretString,
    pub token_ttl_hours: i64,
    /// Adds `Secure` to the session cookie.
    pub secure_cookie: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Plain,
    Json,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    pub format: LogFormat,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub log: LogConfig,
}

/// Shape of the merged sources before the secret is checked.
#[derive(Deserialize)]
struct RawConfig {
    server: ServerConfig,
    database: DatabaseConfig,
    auth: RawAuth,
    log: LogConfig,
}

#[derive(Deserialize)]
struct RawAuth {
    jwt_secret: Option<String>,
    token_ttl_hours: i64,
    secure_cookie: bool,
}

impl AppConfig {
    /// Loads `.env` (if any) and the process environment.
    pub fn load() -> Result<Self, ConfigError> {
        if let Ok(path) = dotenvy::dotenv() {
            tracing::debug!(path = %path.display(), "loaded .env");
        }
        Self::from_env(std::env::vars().collect())
    }

    /// Builds the configuration from an explicit variable map.
    pub fn from_env(vars: config::Map<String, String>) -> Result<Self, ConfigError> {
        let legacy = |name: &str, fallback: &str| -> String {
            vars.get(name).cloned().unwrap_or_else(|| fallback.to_string())
        };

        let mut builder = config::Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", legacy("PORT", "3000"))?
            .set_default("database.url", legacy("DATABASE_URL", "postgres://localhost:5432/stackit"))?
            .set_default("database.max_connections", 10)?
            .set_default("auth.token_ttl_hours", legacy("JWT_EXPIRES_IN_HOURS", "24"))?
            .set_default("auth.secure_cookie", false)?
            .set_default("log.format", "plain")?;
        if let Some(secret) = vars.get("JWT_SECRET") {
            builder = builder.set_default("auth.jwt_secret", secret.as_str())?;
        }

        let raw: RawConfig = builder
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true)
                    .source(Some(vars.clone())),
            )
            .build()?
            .try_deserialize()?;

        let secret = raw
            .auth
            .jwt_secret
            .filter(|s| !s.trim().is_empty())
            .ok_or(ConfigError::MissingSecret)?;
        if raw.auth.token_ttl_hours <= 0 {
            return Err(ConfigError::Invalid(
                "auth.token_ttl_hours must be positive".to_string(),
            ));
        }

        Ok(Self {
            server: raw.server,
            database: raw.database,
            auth: AuthConfig {
                jwt_secret: SecretString::from(secret),
                token_ttl_hours: raw.auth.token_ttl_hours,
                secure_cookie: raw.auth.secure_cookie,
            },
            log: raw.log,
        })
    }
}

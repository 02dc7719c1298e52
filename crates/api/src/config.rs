//! Process configuration for the API server.

use std::fmt::Debug;
use std::str::FromStr;

use crate::auth::jwt::JwtConfig;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 3000;
const DEFAULT_CORS_ORIGINS: &str = "http://localhost:5173";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
const DEFAULT_DB_MAX_CONNECTIONS: u32 = 20;

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Origins allowed by CORS. Unparseable entries are dropped with a warning.
    pub cors_origins: Vec<String>,
    pub request_timeout_secs: u64,
    pub db_max_connections: u32,
    pub jwt: JwtConfig,
}

impl ServerConfig {
    /// Load from the environment.
    ///
    /// | Env Var                  | Default                 |
    /// |--------------------------|-------------------------|
    /// | `HOST`                   | `0.0.0.0`               |
    /// | `PORT`                   | `3000`                  |
    /// | `CORS_ORIGINS`           | `http://localhost:5173` |
    /// | `REQUEST_TIMEOUT_SECS`   | `30`                    |
    /// | `DB_MAX_CONNECTIONS`     | `20`                    |
    /// | `JWT_SECRET`             | required                |
    /// | `JWT_ACCESS_EXPIRY_MINS` | `1440`                  |
    ///
    /// Mail settings live in [`yamdb_mail::EmailConfig::from_env`].
    ///
    /// # Panics
    ///
    /// Panics on a value that does not parse, or a missing `JWT_SECRET`.
    pub fn from_env() -> Self {
        Self {
            host: std::env::var("HOST").unwrap_or_else(|_| DEFAULT_HOST.into()),
            port: env_or("PORT", DEFAULT_PORT),
            cors_origins: split_origins(
                &std::env::var("CORS_ORIGINS").unwrap_or_else(|_| DEFAULT_CORS_ORIGINS.into()),
            ),
            request_timeout_secs: env_or("REQUEST_TIMEOUT_SECS", DEFAULT_REQUEST_TIMEOUT_SECS),
            db_max_connections: env_or("DB_MAX_CONNECTIONS", DEFAULT_DB_MAX_CONNECTIONS),
            jwt: JwtConfig::from_env(),
        }
    }
}

fn env_or<T>(key: &str, default: T) -> T
where
    T: FromStr,
    T::Err: Debug,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .unwrap_or_else(|e| panic!("{key} has an invalid value '{raw}': {e:?}")),
        Err(_) => default,
    }
}

fn split_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

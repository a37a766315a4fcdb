//! Server configuration loaded from environment variables (and `.env`).

use std::env;
use std::time::Duration;

use thiserror::Error;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:5000";
const DEFAULT_MAX_CONNECTIONS: u32 = 10;
const DEFAULT_CLEANUP_INTERVAL_SECS: u64 = 5;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{key} must be set when POSTGRES_HOST is set")]
    MissingVar { key: &'static str },
    #[error("{key} has an invalid value: {value}")]
    InvalidVar { key: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// `None` selects the in-memory store.
    pub database_url: Option<String>,
    pub bind_addr: String,
    /// Base of generated short URLs; the request `Host` is used when unset.
    pub public_base_url: Option<String>,
    pub max_connections: u32,
    pub cleanup_interval: Duration,
    pub json_logs: bool,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let database_url = match get("DATABASE_URL") {
            Some(url) => Some(url),
            None => compose_postgres_url(&get)?,
        };

        let cleanup_secs = parse_or(
            "CLEANUP_INTERVAL_SECS",
            get("CLEANUP_INTERVAL_SECS"),
            DEFAULT_CLEANUP_INTERVAL_SECS,
        )?;
        if cleanup_secs == 0 {
            return Err(ConfigError::InvalidVar {
                key: "CLEANUP_INTERVAL_SECS",
                value: "0".to_owned(),
            });
        }

        Ok(Self {
            database_url,
            bind_addr: get("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_owned()),
            public_base_url: get("PUBLIC_BASE_URL"),
            max_connections: parse_or(
                "DB_MAX_CONNECTIONS",
                get("DB_MAX_CONNECTIONS"),
                DEFAULT_MAX_CONNECTIONS,
            )?,
            cleanup_interval: Duration::from_secs(cleanup_secs),
            json_logs: get("LOG_FORMAT").is_some_and(|v| v.eq_ignore_ascii_case("json")),
        })
    }
}

fn compose_postgres_url(
    get: &impl Fn(&str) -> Option<String>,
) -> Result<Option<String>, ConfigError> {
    let Some(host) = get("POSTGRES_HOST") else {
        return Ok(None);
    };
    let require = |key: &'static str| get(key).ok_or(ConfigError::MissingVar { key });

    let port = get("POSTGRES_PORT").unwrap_or_else(|| "5432".to_owned());
    let user = require("POSTGRES_USER")?;
    let password = require("POSTGRES_PASSWORD")?;
    let database = require("POSTGRES_DATABASE")?;

    Ok(Some(format!(
        "postgres://{user}:{password}@{host}:{port}/{database}"
    )))
}

fn parse_or<T: std::str::FromStr>(
    key: &'static str,
    raw: Option<String>,
    default: T,
) -> Result<T, ConfigError> {
    match raw {
        None => Ok(default),
        Some(value) => match value.trim().parse() {
            Ok(parsed) => Ok(parsed),
            Err(_) => Err(ConfigError::InvalidVar { key, value }),
        },
    }
}

//! Centralized configuration (environment variables + defaults).
//!
//! Read once at startup; the resulting [`AppConfig`] is immutable for the
//! lifetime of the process.

use sqlx::postgres::PgConnectOptions;
use std::collections::HashMap;
use std::str::FromStr;
use thiserror::Error;

use crate::domain::query::DEFAULT_ITEMS_PER_PAGE;

pub const DEFAULT_DATABASE_PORT: u16 = 5432;
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;
pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set (or provide DATABASE_URL)")]
    Missing(&'static str),
    #[error("{name} has an invalid value '{value}'")]
    Invalid { name: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    pub connection: DatabaseConnection,
    pub max_connections: u32,
}

/// Where the catalog database lives: a full URL, or the individual settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatabaseConnection {
    Url(String),
    Parts {
        host: String,
        port: u16,
        username: Option<String>,
        password: Option<String>,
        name: String,
    },
}

impl DatabaseConnection {
    /// Parts are handed to sqlx one by one, so credentials are never parsed as a URL.
    pub fn connect_options(&self) -> Result<PgConnectOptions, sqlx::Error> {
        match self {
            Self::Url(url) => PgConnectOptions::from_str(url),
            Self::Parts {
                host,
                port,
                username,
                password,
                name,
            } => {
                let mut options = PgConnectOptions::new()
                    .host(host)
                    .port(*port)
                    .database(name);
                if let Some(username) = username {
                    options = options.username(username);
                }
                if let Some(password) = password {
                    options = options.password(password);
                }
                Ok(options)
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationConfig {
    pub items_per_page: u32,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            items_per_page: DEFAULT_ITEMS_PER_PAGE,
        }
    }
}

/// Which catalog store backs the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreKind {
    Postgres,
    Memory,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub bind_address: String,
    pub port: u16,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// `None` when the in-memory store is selected.
    pub database: Option<DatabaseConfig>,
    pub pagination: PaginationConfig,
    pub server: ServerConfig,
    pub store: StoreKind,
    pub log_format: LogFormat,
}

impl AppConfig {
    /// Loads `.env` (if present) and reads the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();
        Self::from_vars(&std::env::vars().collect())
    }

    pub fn from_vars(vars: &HashMap<String, String>) -> Result<Self, ConfigError> {
        let get = |name: &str| vars.get(name).map(|v| v.trim()).filter(|v| !v.is_empty());

        let store = match get("STORE") {
            None | Some("postgres") => StoreKind::Postgres,
            Some("memory") => StoreKind::Memory,
            Some(other) => {
                return Err(ConfigError::Invalid {
                    name: "STORE",
                    value: other.to_string(),
                })
            }
        };

        let log_format = match get("LOG_FORMAT") {
            None | Some("pretty") => LogFormat::Pretty,
            Some("json") => LogFormat::Json,
            Some(other) => {
                return Err(ConfigError::Invalid {
                    name: "LOG_FORMAT",
                    value: other.to_string(),
                })
            }
        };

        let database = match store {
            StoreKind::Postgres => Some(DatabaseConfig {
                connection: database_connection(&get)?,
                max_connections: parse_or(
                    "DATABASE_MAX_CONNECTIONS",
                    get("DATABASE_MAX_CONNECTIONS"),
                    DEFAULT_MAX_CONNECTIONS,
                )?,
            }),
            StoreKind::Memory => None,
        };

        // Unparsable or zero falls back to the default, like `parseInt(..) || 10`.
        let items_per_page = get("ITEMS_PER_PAGE")
            .and_then(|v| v.parse::<u32>().ok())
            .filter(|n| *n > 0)
            .unwrap_or(DEFAULT_ITEMS_PER_PAGE);

        let server = ServerConfig {
            bind_address: get("BIND_ADDRESS").unwrap_or(DEFAULT_BIND_ADDRESS).to_string(),
            port: parse_or("PORT", get("PORT"), DEFAULT_PORT)?,
        };

        Ok(Self {
            database,
            pagination: PaginationConfig { items_per_page },
            server,
            store,
            log_format,
        })
    }
}

/// `DATABASE_URL` wins; otherwise the individual `DATABASE_*` settings are used.
fn database_connection<'a>(
    get: &impl Fn(&str) -> Option<&'a str>,
) -> Result<DatabaseConnection, ConfigError> {
    if let Some(url) = get("DATABASE_URL") {
        return Ok(DatabaseConnection::Url(url.to_string()));
    }
    let host = get("DATABASE_HOST").ok_or(ConfigError::Missing("DATABASE_HOST"))?;
    let name = get("DATABASE_NAME").ok_or(ConfigError::Missing("DATABASE_NAME"))?;
    let port = parse_or("DATABASE_PORT", get("DATABASE_PORT"), DEFAULT_DATABASE_PORT)?;

    Ok(DatabaseConnection::Parts {
        host: host.to_string(),
        port,
        username: get("DATABASE_USERNAME").map(str::to_string),
        password: get("DATABASE_PASSWORD").map(str::to_string),
        name: name.to_string(),
    })
}

fn parse_or<T: std::str::FromStr>(
    name: &'static str,
    value: Option<&str>,
    default: T,
) -> Result<T, ConfigError> {
    match value {
        None => Ok(default),
        Some(raw) => raw.parse().map_err(|_| ConfigError::Invalid {
            name,
            value: raw.to_string(),
        }),
    }
}

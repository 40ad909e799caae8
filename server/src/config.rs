//! Server configuration parsed from environment variables.
//!
//! Every knob has a typed default; a value that fails to parse falls back to
//! the default rather than aborting startup. Only a bind address that cannot
//! form a socket address is fatal.

use std::net::SocketAddr;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0";
pub const DEFAULT_DB_MAX_CONNECTIONS: u32 = 5;
pub const DEFAULT_IMPORT_MAX_BYTES: usize = 5 * 1024 * 1024;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid bind address {0}")]
    InvalidBindAddr(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// `None` runs the server on the in-memory store.
    pub database_url: Option<String>,
    pub listen: SocketAddr,
    pub db_max_connections: u32,
    /// Request-body limit for CSV and backup uploads.
    pub import_max_bytes: usize,
}

impl ServerConfig {
    /// Read the process environment.
    ///
    /// Optional:
    /// - `DATABASE_URL`: Postgres connection string
    /// - `PORT`: default 3000
    /// - `BIND_ADDR`: default `0.0.0.0`
    /// - `DB_MAX_CONNECTIONS`: default 5
    /// - `IMPORT_MAX_BYTES`: default 5 MiB
    ///
    /// # Errors
    ///
    /// Returns `InvalidBindAddr` if `BIND_ADDR:PORT` is not a socket address.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build config from any key lookup.
    ///
    /// # Errors
    ///
    /// See [`ServerConfig::from_env`].
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let database_url = lookup("DATABASE_URL").filter(|url| !url.trim().is_empty());
        let port = env_parse(&lookup, "PORT", DEFAULT_PORT);
        let bind_addr = lookup("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let listen_raw = format!("{bind_addr}:{port}");
        let listen = listen_raw
            .parse::<SocketAddr>()
            .map_err(|_| ConfigError::InvalidBindAddr(listen_raw))?;

        Ok(Self {
            database_url,
            listen,
            db_max_connections: env_parse(&lookup, "DB_MAX_CONNECTIONS", DEFAULT_DB_MAX_CONNECTIONS),
            import_max_bytes: env_parse(&lookup, "IMPORT_MAX_BYTES", DEFAULT_IMPORT_MAX_BYTES),
        })
    }
}

pub(crate) fn env_parse<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> T
where
    T: std::str::FromStr + Copy,
{
    lookup(key)
        .and_then(|v| v.trim().parse::<T>().ok())
        .unwrap_or(default)
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;

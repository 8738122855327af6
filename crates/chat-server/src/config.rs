//! Configuration for the chat relay.
//!
//! Defaults can be overridden via a few environment variables:
//!
//! - `CHAT_BIND_ADDR`      (default: "127.0.0.1")
//! - `CHAT_PORT`           (default: "5555")
//! - `CHAT_MAX_CLIENTS`    (default: "1024")
//! - `CHAT_FILTERED_WORDS` (default: "badword", comma-separated)
//! - `CHAT_HANDSHAKE_TIMEOUT_SECS` (default: "30")

use std::env;
use std::str::FromStr;
use std::time::Duration;

use chat_core::ContentFilter;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value {value:?} for {key}: {reason}")]
    InvalidValue {
        key: &'static str,
        value: String,
        reason: String,
    },
}

/// Relay configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// IP address / interface to bind to (e.g. "0.0.0.0" or "127.0.0.1").
    pub bind_addr: String,

    /// TCP port to listen on.
    pub port: u16,

    /// Maximum number of simultaneously open connections, including those
    /// still in the handshake.
    pub max_clients: usize,

    /// Words that keep a frame from being broadcast.
    pub filter: ContentFilter,

    /// How long a new connection may take to send its display name
    /// before it is dropped and its slot freed.
    pub handshake_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            bind_addr: "127.0.0.1".to_string(),
            port: 5555,
            max_clients: 1024,
            filter: ContentFilter::default(),
            handshake_timeout: Duration::from_secs(30),
        }
    }
}

impl Config {
    /// Construct a `Config` from environment variables, falling back
    /// to defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        Config::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`Config::from_env`] but reads values through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Config::default();

        let bind_addr = lookup("CHAT_BIND_ADDR").unwrap_or(defaults.bind_addr);
        let port = parse_or_default(&lookup, "CHAT_PORT", defaults.port)?;
        let max_clients = parse_or_default(&lookup, "CHAT_MAX_CLIENTS", defaults.max_clients)?;
        let filter = lookup("CHAT_FILTERED_WORDS")
            .map(|list| ContentFilter::from_csv(&list))
            .unwrap_or(defaults.filter);
        let handshake_secs = parse_or_default(
            &lookup,
            "CHAT_HANDSHAKE_TIMEOUT_SECS",
            defaults.handshake_timeout.as_secs(),
        )?;

        if max_clients == 0 {
            return Err(ConfigError::InvalidValue {
                key: "CHAT_MAX_CLIENTS",
                value: "0".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }

        if handshake_secs == 0 {
            return Err(ConfigError::InvalidValue {
                key: "CHAT_HANDSHAKE_TIMEOUT_SECS",
                value: "0".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }

        Ok(Config {
            bind_addr,
            port,
            max_clients,
            filter,
            handshake_timeout: Duration::from_secs(handshake_secs),
        })
    }

    /// Convenience: `addr:port` socket string.
    pub fn socket_addr_string(&self) -> String {
        format!("{}:{}", self.bind_addr, self.port)
    }
}

fn parse_or_default<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(val) => val.trim().parse::<T>().map_err(|e| ConfigError::InvalidValue {
            key,
            value: val.clone(),
            reason: e.to_string(),
        }),
        None => Ok(default),
    }
}

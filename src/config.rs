//! Service configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! - `DATABASE_URL` - Postgres connection string. When unset the service
//!   runs on the in-memory store and nothing survives a restart.
//! - `DATABASE_MAX_CONNECTIONS` - Pool size (default: 10)
//! - `HOST` - Bind address (default: 0.0.0.0)
//! - `PORT` - Listen port (default: 5000)
//! - `CLIENT_URL` - Origin of the admin console allowed by CORS (default: any)
//! - `RECENT_ORDERS_LIMIT` - Size of the recent-orders view, at most 5 (default: 5)

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::str::FromStr;

use axum::http::HeaderValue;
use thiserror::Error;

use crate::services::MAX_RECENT_ORDERS;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: Option<String>,
    pub max_connections: u32,
    pub host: IpAddr,
    pub port: u16,
    pub client_origin: Option<HeaderValue>,
    pub recent_orders_limit: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: None,
            max_connections: 10,
            host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: 5000,
            client_origin: None,
            recent_orders_limit: MAX_RECENT_ORDERS,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from any key lookup; blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let defaults = Self::default();

        let max_connections = parse_or(get("DATABASE_MAX_CONNECTIONS"), "DATABASE_MAX_CONNECTIONS", defaults.max_connections)?;
        if max_connections == 0 {
            return Err(ConfigError::InvalidEnvVar("DATABASE_MAX_CONNECTIONS".into(), "must be at least 1".into()));
        }
        let client_origin = get("CLIENT_URL")
            .map(|url| HeaderValue::from_str(&url).map_err(|e| ConfigError::InvalidEnvVar("CLIENT_URL".into(), e.to_string())))
            .transpose()?;
        let recent: usize = parse_or(get("RECENT_ORDERS_LIMIT"), "RECENT_ORDERS_LIMIT", defaults.recent_orders_limit)?;

        Ok(Self {
            database_url: get("DATABASE_URL"),
            max_connections,
            host: parse_or(get("HOST"), "HOST", defaults.host)?,
            port: parse_or(get("PORT"), "PORT", defaults.port)?,
            client_origin,
            recent_orders_limit: recent.clamp(1, MAX_RECENT_ORDERS),
        })
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

fn parse_or<T>(value: Option<String>, key: &str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match value {
        Some(v) => v.parse().map_err(|e: T::Err| ConfigError::InvalidEnvVar(key.to_string(), e.to_string())),
        None => Ok(default),
    }
}

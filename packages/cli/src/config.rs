use std::env;
use std::net::{AddrParseError, IpAddr};
use std::num::ParseIntError;
use std::time::Duration;

use thiserror::Error;
use todo_storage::DatabaseConfig;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid port number: {0}")]
    InvalidPort(#[from] ParseIntError),
    #[error("Port {0} is out of valid range (1-65535)")]
    PortOutOfRange(u16),
    #[error("Invalid host address: {0}")]
    InvalidHost(#[from] AddrParseError),
    #[error("Invalid value for {name}: {value}")]
    InvalidNumber { name: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub host: IpAddr,
    pub port: u16,
    pub cors_origin: String,
    pub database: DatabaseConfig,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(|key| env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable source.
    pub fn from_vars<F>(var: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = var("PORT")
            .unwrap_or_else(|| "3000".to_string())
            .trim()
            .parse::<u16>()?;

        if port == 0 {
            return Err(ConfigError::PortOutOfRange(port));
        }

        let host = var("HOST")
            .unwrap_or_else(|| "127.0.0.1".to_string())
            .trim()
            .parse::<IpAddr>()?;

        let cors_origin =
            var("CORS_ORIGIN").unwrap_or_else(|| "http://localhost:5173".to_string());

        let defaults = DatabaseConfig::default();
        let database = DatabaseConfig {
            url: var("DATABASE_URL").unwrap_or(defaults.url),
            max_connections: parse_number(
                "DB_MAX_CONNECTIONS",
                var("DB_MAX_CONNECTIONS"),
                defaults.max_connections,
            )?,
            acquire_timeout: parse_number(
                "DB_ACQUIRE_TIMEOUT_SECS",
                var("DB_ACQUIRE_TIMEOUT_SECS"),
                defaults.acquire_timeout.as_secs(),
            )
            .map(Duration::from_secs)?,
        };

        if database.max_connections == 0 {
            return Err(ConfigError::InvalidNumber {
                name: "DB_MAX_CONNECTIONS",
                value: "0".to_string(),
            });
        }

        Ok(Config {
            host,
            port,
            cors_origin,
            database,
        })
    }
}

fn parse_number<T: std::str::FromStr>(
    name: &'static str,
    raw: Option<String>,
    default: T,
) -> Result<T, ConfigError> {
    match raw {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse::<T>()
            .map_err(|_| ConfigError::InvalidNumber { name, value }),
    }
}

//! Startup configuration loaded from the environment
//!
//! Read once in `main` and injected through `AppState`; nothing else reads
//! environment variables at request time.

use std::env;
use std::time::Duration;

use thiserror::Error;

pub const DEFAULT_GATEWAY_BASE_URL: &str = "https://api.tosspayments.com";
pub const DEFAULT_GATEWAY_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_CLIENT_BASE_URL: &str = "http://localhost:3000";
pub const DEFAULT_REGION: &str = "asia-northeast3";
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{name} is invalid: {value}")]
    Invalid { name: &'static str, value: String },
}

/// Outbound payment gateway settings
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub base_url: String,
    pub secret_key: String,
    /// Upper bound on a single confirm call
    pub timeout: Duration,
    /// Extra attempts after a connect failure. Responses are never retried.
    pub max_retries: u32,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub bind_addr: String,
    pub region: String,
    /// Origin of the web client, used to build the gateway success redirect
    pub client_base_url: String,
    pub gateway: GatewayConfig,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build a config from an arbitrary variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |name: &'static str| {
            lookup(name)
                .filter(|v| !v.trim().is_empty())
                .ok_or(ConfigError::Missing(name))
        };
        let or_default = |name: &str, default: &str| lookup(name).unwrap_or_else(|| default.to_string());

        let timeout_secs = parse_or(&lookup, "GATEWAY_TIMEOUT_SECS", DEFAULT_GATEWAY_TIMEOUT_SECS)?;
        if timeout_secs == 0 {
            return Err(ConfigError::Invalid {
                name: "GATEWAY_TIMEOUT_SECS",
                value: "0".to_string(),
            });
        }

        Ok(Self {
            database_url: required("DATABASE_URL")?,
            bind_addr: or_default("BIND_ADDR", DEFAULT_BIND_ADDR),
            region: or_default("REGION", DEFAULT_REGION),
            client_base_url: or_default("CLIENT_BASE_URL", DEFAULT_CLIENT_BASE_URL)
                .trim_end_matches('/')
                .to_string(),
            gateway: GatewayConfig {
                base_url: or_default("TOSS_API_BASE_URL", DEFAULT_GATEWAY_BASE_URL)
                    .trim_end_matches('/')
                    .to_string(),
                secret_key: required("TOSS_SECRET_KEY")?,
                timeout: Duration::from_secs(timeout_secs),
                max_retries: parse_or(&lookup, "GATEWAY_MAX_RETRIES", 0)?,
            },
        })
    }
}

fn parse_or<F, T>(lookup: &F, name: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(name) {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { name, value }),
    }
}

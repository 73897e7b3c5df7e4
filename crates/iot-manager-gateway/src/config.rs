//! Gateway configuration types.
//!
//! This module defines the configuration of the management gateway and its
//! loading from `IOT_MANAGER_*` environment variables.

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

/// Prefix of every environment variable read by [`GatewayConfig::from_env`].
pub const ENV_PREFIX: &str = "IOT_MANAGER_";

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// An environment variable holds a value that cannot be parsed.
    #[error("invalid value {value:?} for {var}: {reason}")]
    InvalidValue {
        /// Full variable name.
        var: String,
        /// The rejected value.
        value: String,
        /// Why it was rejected.
        reason: String,
    },
}

/// Configuration for the gateway service.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Listen address (e.g., "0.0.0.0:8080").
    pub listen_addr: String,

    /// Directory of the RocksDB settings store.
    pub data_dir: PathBuf,

    /// Base URL of the device twin service. Device operations fail when unset.
    pub twin_backend_url: Option<String>,

    /// Log at debug level.
    pub debug_log: bool,

    /// Health check timeout in seconds.
    pub health_timeout_seconds: u64,

    /// Time in-flight requests get to finish after a shutdown signal, in seconds.
    pub shutdown_grace_seconds: u64,

    /// Maximum request body size in bytes.
    pub max_body_bytes: usize,
}

impl GatewayConfig {
    fn default_listen_addr() -> String {
        "0.0.0.0:8080".to_string()
    }

    fn default_data_dir() -> PathBuf {
        PathBuf::from("/var/lib/iot-manager")
    }

    const fn default_health_timeout() -> u64 {
        10
    }

    const fn default_shutdown_grace() -> u64 {
        5
    }

    const fn default_max_body() -> usize {
        1024 * 1024 // 1 MB
    }

    /// Load configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if a variable cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration from an arbitrary variable source.
    ///
    /// `lookup` receives full variable names (e.g. `IOT_MANAGER_LISTEN`).
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if a variable cannot be parsed.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| {
            let name = format!("{ENV_PREFIX}{key}");
            lookup(&name)
                .filter(|value| !value.trim().is_empty())
                .map(|value| (name, value))
        };

        let mut config = Self::default();
        if let Some((_, value)) = var("LISTEN") {
            config.listen_addr = value;
        }
        if let Some((_, value)) = var("DATA_DIR") {
            config.data_dir = PathBuf::from(value);
        }
        if let Some((_, value)) = var("TWIN_BACKEND_URL") {
            config.twin_backend_url = Some(value);
        }
        if let Some((name, value)) = var("DEBUG_LOG") {
            config.debug_log = parse_bool(&name, &value)?;
        }
        if let Some((name, value)) = var("HEALTH_TIMEOUT_SECONDS") {
            config.health_timeout_seconds = parse_number(&name, &value)?;
        }
        if let Some((name, value)) = var("SHUTDOWN_GRACE_SECONDS") {
            config.shutdown_grace_seconds = parse_number(&name, &value)?;
        }
        if let Some((name, value)) = var("MAX_BODY_BYTES") {
            config.max_body_bytes = parse_number(&name, &value)?;
        }

        Ok(config)
    }

    /// Get the health check timeout as a `Duration`.
    #[must_use]
    pub fn health_timeout(&self) -> Duration {
        Duration::from_secs(self.health_timeout_seconds)
    }

    /// Get the shutdown grace period as a `Duration`.
    #[must_use]
    pub fn shutdown_grace(&self) -> Duration {
        Duration::from_secs(self.shutdown_grace_seconds)
    }
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            listen_addr: Self::default_listen_addr(),
            data_dir: Self::default_data_dir(),
            twin_backend_url: None,
            debug_log: false,
            health_timeout_seconds: Self::default_health_timeout(),
            shutdown_grace_seconds: Self::default_shutdown_grace(),
            max_body_bytes: Self::default_max_body(),
        }
    }
}

fn parse_bool(name: &str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            var: name.to_string(),
            value: value.to_string(),
            reason: "expected a boolean".to_string(),
        }),
    }
}

fn parse_number<T>(name: &str, value: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse()
        .map_err(|e: T::Err| ConfigError::InvalidValue {
            var: name.to_string(),
            value: value.to_string(),
            reason: e.to_string(),
        })
}

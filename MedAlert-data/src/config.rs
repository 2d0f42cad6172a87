//! Environment-driven configuration for the stores

use std::env;
use std::fmt::Display;
use std::str::FromStr;

use thiserror::Error;
use tracing::info;

#[cfg(feature = "sqlite")]
use crate::database::DatabaseConfig;

/// Configuration error
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    /// Variable present but unparsable
    #[error("Invalid value for {key}: {value} ({reason})")]
    Invalid {
        key: String,
        value: String,
        reason: String,
    },
}

/// Read a non-empty environment variable
pub fn env_string(key: &str) -> Option<String> {
    env::var(key).ok().map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

/// Read and parse an environment variable, falling back to a default when unset
pub fn env_or<T>(key: &str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: Display,
{
    match env_string(key) {
        Some(value) => value.parse::<T>().map_err(|e| ConfigError::Invalid {
            key: key.to_string(),
            value: value.clone(),
            reason: e.to_string(),
        }),
        None => Ok(default),
    }
}

/// Remote store connection settings
#[derive(Debug, Clone, PartialEq)]
pub struct RemoteConfig {
    /// Base URL of the hosted backend, without trailing slash
    pub base_url: String,
    /// Public API key sent as `apikey` with every request
    pub api_key: Option<String>,
    /// Request timeout in seconds
    pub timeout_seconds: u64,
}

impl RemoteConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: None,
            timeout_seconds: 10,
        }
    }

    /// Remote settings from the environment; `None` when no URL is configured
    pub fn from_env() -> Result<Option<Self>, ConfigError> {
        let Some(base_url) = env_string("MEDALERT_REMOTE_URL") else {
            return Ok(None);
        };
        let api_key = env_string("MEDALERT_REMOTE_API_KEY");
        let timeout_seconds = env_or("MEDALERT_REMOTE_TIMEOUT_SECONDS", 10u64)?;

        info!("Remote store configured at {}", base_url);

        Ok(Some(Self {
            api_key,
            timeout_seconds,
            ..Self::new(base_url)
        }))
    }
}

/// Combined configuration for the local and remote stores
#[derive(Debug, Clone, PartialEq)]
pub struct StoreConfig {
    /// Local SQLite cache settings
    #[cfg(feature = "sqlite")]
    pub database: DatabaseConfig,
    /// Remote store settings; in-memory stand-in when absent
    pub remote: Option<RemoteConfig>,
}

impl StoreConfig {
    /// Load the full store configuration from environment variables
    pub fn from_env() -> Result<Self, crate::repository::StoreError> {
        Ok(Self {
            #[cfg(feature = "sqlite")]
            database: DatabaseConfig::from_env()?,
            remote: RemoteConfig::from_env()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_or_uses_default_when_unset() {
        let value: u32 = env_or("MEDALERT_TEST_SURELY_UNSET_VARIABLE", 7).unwrap();
        assert_eq!(value, 7);
    }

    #[test]
    fn test_env_or_rejects_garbage() {
        env::set_var("MEDALERT_TEST_GARBAGE_NUMBER", "five");
        let result: Result<u32, _> = env_or("MEDALERT_TEST_GARBAGE_NUMBER", 5);
        env::remove_var("MEDALERT_TEST_GARBAGE_NUMBER");

        assert!(matches!(result, Err(ConfigError::Invalid { .. })));
    }

    #[test]
    fn test_remote_config_trims_trailing_slash() {
        let config = RemoteConfig::new("https://example.supabase.co/");
        assert_eq!(config.base_url, "https://example.supabase.co");
        assert_eq!(config.timeout_seconds, 10);
        assert!(config.api_key.is_none());
    }
}

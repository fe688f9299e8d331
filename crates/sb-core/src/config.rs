//! Client configuration
//!
//! The workflow talks to one REST backend with a bearer credential. The
//! consumer loads this once at startup and hands it to the API client.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(&'static str),
    #[error("Invalid value for {0}: {1}")]
    InvalidValue(&'static str, String),
}

/// Backend connection settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiConfig {
    /// Base URL of the SkillBridge REST API
    pub base_url: String,
    /// Bearer token attached to every request
    pub bearer_token: Option<String>,
    /// Per-request timeout in seconds
    pub request_timeout_seconds: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080/api".to_string(),
            bearer_token: None,
            request_timeout_seconds: 30,
        }
    }
}

impl ApiConfig {
    /// Load configuration from the environment, reading a `.env` file
    /// first when one is present.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let mut config = Self::default();

        if let Ok(url) = std::env::var("SKILLBRIDGE_API_URL") {
            config.base_url = url;
        }
        if let Ok(token) = std::env::var("SKILLBRIDGE_API_TOKEN") {
            if !token.is_empty() {
                config.bearer_token = Some(token);
            }
        }
        if let Ok(timeout) = std::env::var("SKILLBRIDGE_API_TIMEOUT_SECONDS") {
            config.request_timeout_seconds = timeout
                .parse()
                .map_err(|_| ConfigError::InvalidValue("SKILLBRIDGE_API_TIMEOUT_SECONDS", timeout.clone()))?;
        }

        Ok(config)
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.bearer_token = Some(token.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ApiConfig::default();
        assert_eq!(config.request_timeout_seconds, 30);
        assert!(config.bearer_token.is_none());
    }

    #[test]
    fn test_with_token() {
        let config = ApiConfig::default().with_token("abc");
        assert_eq!(config.bearer_token.as_deref(), Some("abc"));
    }
}

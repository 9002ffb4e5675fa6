//! Configuration validation rules.
//!
//! This module provides validation logic for `AppConfig` values
//! after they have been loaded from environment, files, or defaults.

use crate::config::AppConfig;
use thiserror::Error;

/// Configuration validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    LoadFailed(String),

    #[error("invalid configuration: {field} - {reason}")]
    Invalid { field: String, reason: String },

    #[error("missing required configuration: {field} ({hint})")]
    Missing { field: String, hint: String },
}

impl AppConfig {
    /// Validate configuration values after loading.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if:
    /// - `timeout_ms` is less than 100ms or exceeds 5 minutes
    /// - `pacing_ms` exceeds one minute
    /// - `user_agent` is set but blank, or contains control characters
    /// - `search_url` or `reverse_url` is not an http(s) URL
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.timeout_ms < 100 {
            return Err(ConfigError::Invalid { field: "timeout_ms".into(), reason: "must be at least 100ms".into() });
        }
        if self.timeout_ms > 300_000 {
            return Err(ConfigError::Invalid {
                field: "timeout_ms".into(),
                reason: "must not exceed 5 minutes (300000ms)".into(),
            });
        }

        if self.pacing_ms > 60_000 {
            return Err(ConfigError::Invalid {
                field: "pacing_ms".into(),
                reason: "must not exceed 1 minute (60000ms)".into(),
            });
        }

        if let Some(user_agent) = &self.user_agent
            && user_agent.trim().is_empty()
        {
            return Err(ConfigError::Invalid { field: "user_agent".into(), reason: "must not be empty".into() });
        }
        if let Some(user_agent) = &self.user_agent
            && user_agent.chars().any(|c| c.is_control() && c != '\t')
        {
            return Err(ConfigError::Invalid {
                field: "user_agent".into(),
                reason: "contains characters not allowed in an HTTP header".into(),
            });
        }

        validate_endpoint("search_url", &self.search_url)?;
        validate_endpoint("reverse_url", &self.reverse_url)?;

        if self.pacing_ms == 0 {
            tracing::warn!("pacing_ms is 0; remote calls are serialized but not spaced");
        }

        Ok(())
    }
}

fn validate_endpoint(field: &str, value: &str) -> Result<(), ConfigError> {
    let url = url::Url::parse(value)
        .map_err(|e| ConfigError::Invalid { field: field.into(), reason: format!("not a valid URL: {e}") })?;

    match url.scheme() {
        "http" | "https" => Ok(()),
        other => Err(ConfigError::Invalid { field: field.into(), reason: format!("unsupported scheme '{other}'") }),
    }
}

//! Application configuration with layered loading.
//!
//! This module provides configuration management using figment for layered
//! configuration loading from multiple sources:
//!
//! 1. Environment variables (PLACES_*)
//! 2. TOML config file (if PLACES_CONFIG_FILE set)
//! 3. Built-in defaults

use std::path::PathBuf;
use std::time::Duration;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

use crate::cache::{CacheOptions, NameMatch, StorageLayout};

mod validation;

pub use validation::ConfigError;

/// Default forward-search endpoint.
pub const DEFAULT_SEARCH_URL: &str = "https://nominatim.openstreetmap.org/search";

/// Default reverse-lookup endpoint.
pub const DEFAULT_REVERSE_URL: &str = "https://nominatim.openstreetmap.org/reverse";

/// Application configuration with layered loading.
///
/// Loading precedence (highest wins):
/// 1. Environment variables (PLACES_*)
/// 2. TOML config file (if PLACES_CONFIG_FILE set)
/// 3. Built-in defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// User-Agent identifying this application to the geocoding service.
    ///
    /// Set via PLACES_USER_AGENT environment variable.
    /// Has no default; the service rejects anonymous clients.
    #[serde(default)]
    pub user_agent: Option<String>,

    /// Path to SQLite cache database.
    ///
    /// Set via PLACES_DB_PATH environment variable.
    #[serde(default = "default_db_path")]
    pub db_path: PathBuf,

    /// Keep the cache in memory instead of on disk.
    ///
    /// Set via PLACES_IN_MEMORY environment variable.
    #[serde(default)]
    pub in_memory: bool,

    /// Forward-search endpoint.
    ///
    /// Set via PLACES_SEARCH_URL environment variable.
    #[serde(default = "default_search_url")]
    pub search_url: String,

    /// Reverse-lookup endpoint.
    ///
    /// Set via PLACES_REVERSE_URL environment variable.
    #[serde(default = "default_reverse_url")]
    pub reverse_url: String,

    /// HTTP request timeout in milliseconds.
    ///
    /// Set via PLACES_TIMEOUT_MS environment variable.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Delay applied before and after every remote call, in milliseconds.
    ///
    /// Set via PLACES_PACING_MS environment variable.
    #[serde(default = "default_pacing_ms")]
    pub pacing_ms: u64,

    /// Ask the service for the address hierarchy.
    ///
    /// Set via PLACES_ADDRESS_DETAILS environment variable.
    #[serde(default = "default_true")]
    pub address_details: bool,

    /// Name lookup matching rule.
    ///
    /// Set via PLACES_NAME_MATCH environment variable (query_only | query_or_name).
    #[serde(default)]
    pub name_match: NameMatch,

    /// Cache storage layout.
    ///
    /// Set via PLACES_LAYOUT environment variable (columns | document).
    #[serde(default)]
    pub layout: StorageLayout,
}

fn default_db_path() -> PathBuf {
    PathBuf::from("./places-cache.sqlite")
}

fn default_search_url() -> String {
    DEFAULT_SEARCH_URL.into()
}

fn default_reverse_url() -> String {
    DEFAULT_REVERSE_URL.into()
}

fn default_timeout_ms() -> u64 {
    20_000
}

fn default_pacing_ms() -> u64 {
    500
}

fn default_true() -> bool {
    true
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            user_agent: None,
            db_path: default_db_path(),
            in_memory: false,
            search_url: default_search_url(),
            reverse_url: default_reverse_url(),
            timeout_ms: default_timeout_ms(),
            pacing_ms: default_pacing_ms(),
            address_details: true,
            name_match: NameMatch::default(),
            layout: StorageLayout::default(),
        }
    }
}

impl AppConfig {
    /// Configuration with only the user agent set.
    pub fn with_user_agent(user_agent: impl Into<String>) -> Self {
        Self { user_agent: Some(user_agent.into()), ..Default::default() }
    }

    /// Timeout as Duration for use with reqwest/tokio.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Pacing delay as Duration for the rate gate.
    pub fn pacing(&self) -> Duration {
        Duration::from_millis(self.pacing_ms)
    }

    /// Store options derived from this configuration.
    pub fn cache_options(&self) -> CacheOptions {
        CacheOptions { layout: self.layout, name_match: self.name_match }
    }

    /// Load configuration from all sources with layered precedence.
    ///
    /// Priority (highest wins):
    /// 1. Environment variables prefixed with `PLACES_`
    /// 2. TOML file from `PLACES_CONFIG_FILE` (if set)
    /// 3. Built-in defaults via `Default::default()`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - Configuration file cannot be read
    /// - Environment variables cannot be parsed
    /// - Validation fails after loading
    pub fn load() -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Ok(config_path) = std::env::var("PLACES_CONFIG_FILE") {
            figment = figment.merge(Toml::file(&config_path));
        }

        figment = figment.merge(
            Env::prefixed("PLACES_")
                .ignore(&["CONFIG_FILE"])
                .map(|key| key.as_str().to_lowercase().into())
                .split("__"),
        );

        let config: Self = figment.extract().map_err(|e| ConfigError::LoadFailed(e.to_string()))?;

        config.validate()?;

        Ok(config)
    }

    /// Return the user agent, failing if it was never configured.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Missing` if the user agent is not set.
    pub fn require_user_agent(&self) -> Result<&str, ConfigError> {
        self.user_agent
            .as_deref()
            .ok_or_else(|| ConfigError::Missing {
                field: "user_agent".into(),
                hint: "Set PLACES_USER_AGENT environment variable".into(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.db_path, PathBuf::from("./places-cache.sqlite"));
        assert!(config.user_agent.is_none());
        assert!(!config.in_memory);
        assert_eq!(config.search_url, DEFAULT_SEARCH_URL);
        assert_eq!(config.reverse_url, DEFAULT_REVERSE_URL);
        assert_eq!(config.timeout_ms, 20_000);
        assert_eq!(config.pacing_ms, 500);
        assert!(config.address_details);
        assert_eq!(config.name_match, NameMatch::QueryOrName);
        assert_eq!(config.layout, StorageLayout::Document);
    }

    #[test]
    fn test_durations() {
        let config = AppConfig::default();
        assert_eq!(config.timeout(), Duration::from_millis(20_000));
        assert_eq!(config.pacing(), Duration::from_millis(500));
    }

    #[test]
    fn test_require_user_agent_missing() {
        let config = AppConfig::default();
        let result = config.require_user_agent();
        assert!(matches!(result, Err(ConfigError::Missing { .. })));
    }

    #[test]
    fn test_require_user_agent_present() {
        let config = AppConfig::with_user_agent("places-test/0.1");
        assert_eq!(config.require_user_agent().unwrap(), "places-test/0.1");
    }

    #[test]
    fn test_load_layers_env_over_file() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(
                "places.toml",
                r#"
                user_agent = "from-file/1.0"
                pacing_ms = 250
                layout = "columns"
                "#,
            )?;
            jail.set_env("PLACES_CONFIG_FILE", "places.toml");
            jail.set_env("PLACES_USER_AGENT", "from-env/2.0");
            jail.set_env("PLACES_NAME_MATCH", "query_only");

            let config = AppConfig::load().map_err(|e| e.to_string())?;
            assert_eq!(config.user_agent.as_deref(), Some("from-env/2.0"));
            assert_eq!(config.pacing_ms, 250);
            assert_eq!(config.layout, StorageLayout::Columns);
            assert_eq!(config.name_match, NameMatch::QueryOnly);
            Ok(())
        });
    }

    #[test]
    fn test_load_rejects_invalid_values() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("PLACES_TIMEOUT_MS", "5");

            let result = AppConfig::load();
            assert!(matches!(result, Err(ConfigError::Invalid { field, .. }) if field == "timeout_ms"));
            Ok(())
        });
    }
}

//! Session configuration, loaded from TOML with the catalog credential
//! optionally supplied through the environment.

use moviescope_catalog_client::CatalogConfig;
use moviescope_trending::TrendingConfig;
use serde::Deserialize;
use serde::Serialize;
use std::time::Duration;
use thiserror::Error;

/// Environment variable consulted when the catalog API key is not set in the
/// config file.
pub const API_KEY_ENV_VAR: &str = "MOVIESCOPE_API_KEY";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("catalog API key missing; set `catalog.api_key` or {API_KEY_ENV_VAR}")]
    MissingApiKey,

    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub catalog: CatalogConfig,

    /// Counter store for the trending leaderboard. Absent means no trending
    /// section and no hit recording.
    #[serde(default)]
    pub trending: Option<TrendingConfig>,

    #[serde(default)]
    pub session: SessionConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionConfig {
    /// Quiet interval before typed input becomes the active query
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,

    /// Number of leaderboard entries loaded at startup
    #[serde(default = "default_trending_limit")]
    pub trending_limit: usize,

    /// Number of consecutive page numbers shown around the current page
    #[serde(default = "default_pagination_window")]
    pub pagination_window: u32,
}

fn default_debounce_ms() -> u64 {
    750
}

fn default_trending_limit() -> usize {
    5
}

fn default_pagination_window() -> u32 {
    5
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
            trending_limit: default_trending_limit(),
            pagination_window: default_pagination_window(),
        }
    }
}

impl SessionConfig {
    pub fn debounce_interval(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

impl Config {
    /// Parses a TOML document. The result is not validated so the API key
    /// can still be filled in from the environment.
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(contents)?)
    }

    /// Defaults plus the API key from [`API_KEY_ENV_VAR`], validated.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();
        config.fill_from(|name| std::env::var(name).ok());
        config.validate()?;
        Ok(config)
    }

    /// Fills an empty catalog API key from the environment.
    pub fn apply_env(&mut self) {
        self.fill_from(|name| std::env::var(name).ok());
    }

    fn fill_from(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if !self.catalog.api_key.trim().is_empty() {
            return;
        }
        if let Some(key) = lookup(API_KEY_ENV_VAR).filter(|key| !key.trim().is_empty()) {
            self.catalog.api_key = key;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.catalog.api_key.trim().is_empty() {
            return Err(ConfigError::MissingApiKey);
        }
        self.catalog.validate().map_err(ConfigError::Invalid)?;
        if let Some(trending) = &self.trending {
            trending.validate().map_err(ConfigError::Invalid)?;
        }
        if self.session.debounce_ms == 0 {
            return Err(ConfigError::Invalid(
                "Debounce interval must be > 0".to_string(),
            ));
        }
        if self.session.pagination_window == 0 {
            return Err(ConfigError::Invalid(
                "Pagination window must be > 0".to_string(),
            ));
        }
        Ok(())
    }
}

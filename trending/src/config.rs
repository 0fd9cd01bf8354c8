use serde::Deserialize;
use serde::Serialize;
use std::time::Duration;

/// Configuration for the HTTP counter store
#[derive(Clone, Serialize, Deserialize, PartialEq)]
pub struct TrendingConfig {
    /// Collection root; records live under `{base_url}/records`
    pub base_url: String,

    /// Optional bearer credential for the store
    #[serde(default)]
    pub api_key: Option<String>,

    /// Per-request timeout
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    30
}

impl TrendingConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: None,
            timeout_secs: default_timeout_secs(),
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if url::Url::parse(&self.base_url).is_err() {
            return Err(format!("Invalid counter store URL: {}", self.base_url));
        }
        if self.timeout_secs == 0 {
            return Err("Timeout must be > 0".to_string());
        }
        Ok(())
    }
}

impl std::fmt::Debug for TrendingConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TrendingConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

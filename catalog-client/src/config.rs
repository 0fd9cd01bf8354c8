use moviescope_protocol::DEFAULT_IMAGE_BASE_URL;
use serde::Deserialize;
use serde::Serialize;
use std::time::Duration;

/// Configuration for the catalog client
#[derive(Clone, Serialize, Deserialize, PartialEq)]
pub struct CatalogConfig {
    /// API root, e.g. `https://api.themoviedb.org/3`
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Prefix joined with poster paths
    #[serde(default = "default_image_base_url")]
    pub image_base_url: String,

    /// Bearer credential sent with every request
    #[serde(default)]
    pub api_key: String,

    /// Per-request timeout
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Upper bound applied to the page count reported by the catalog
    #[serde(default = "default_max_total_pages")]
    pub max_total_pages: u32,
}

fn default_base_url() -> String {
    "https://api.themoviedb.org/3".to_string()
}

fn default_image_base_url() -> String {
    DEFAULT_IMAGE_BASE_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_max_total_pages() -> u32 {
    500
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            image_base_url: default_image_base_url(),
            api_key: String::new(),
            timeout_secs: default_timeout_secs(),
            max_total_pages: default_max_total_pages(),
        }
    }
}

impl CatalogConfig {
    pub fn with_api_key(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            ..Default::default()
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if url::Url::parse(&self.base_url).is_err() {
            return Err(format!("Invalid catalog base URL: {}", self.base_url));
        }
        if self.api_key.trim().is_empty() {
            return Err("Catalog API key is empty".to_string());
        }
        if self.timeout_secs == 0 {
            return Err("Timeout must be > 0".to_string());
        }
        if self.max_total_pages == 0 {
            return Err("Max total pages must be > 0".to_string());
        }
        Ok(())
    }
}

impl std::fmt::Debug for CatalogConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogConfig")
            .field("base_url", &self.base_url)
            .field("image_base_url", &self.image_base_url)
            .field("api_key", &"<redacted>")
            .field("timeout_secs", &self.timeout_secs)
            .field("max_total_pages", &self.max_total_pages)
            .finish()
    }
}

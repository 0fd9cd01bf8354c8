use crate::config::ConfigError;
use moviescope_catalog_client::CatalogError;
use moviescope_trending::TrendingError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("search session has stopped")]
    Closed,

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    #[error("Trending error: {0}")]
    Trending(#[from] TrendingError),
}

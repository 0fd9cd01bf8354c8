//! HTTP client for the movie catalog: paginated discover/search listings and
//! per-movie details.

mod client;
mod config;
mod error;

pub use client::CatalogClient;
pub use config::CatalogConfig;
pub use error::CatalogError;
pub use error::GENERIC_DETAILS_ERROR;
pub use error::GENERIC_FETCH_ERROR;
pub use error::UPSTREAM_FALLBACK_ERROR;
pub use error::Result;

use async_trait::async_trait;
use moviescope_protocol::Query;
use moviescope_protocol::SearchResult;

/// Source of paginated movie listings.
///
/// An empty query selects the popularity-sorted discovery feed.
#[async_trait]
pub trait Catalog: Send + Sync {
    async fn fetch(&self, query: &Query, page: u32) -> Result<SearchResult>;
}

//! Data types shared by the catalog client, the trending aggregator and the
//! search session.

pub mod catalog;
pub mod details;
pub mod query;
pub mod trending;

pub use catalog::CatalogPage;
pub use catalog::MovieSummary;
pub use catalog::SearchResult;
pub use catalog::UpstreamStatus;
pub use details::CastMember;
pub use details::Credits;
pub use details::Genre;
pub use details::MovieDetails;
pub use details::MovieWithCast;
pub use query::Query;
pub use query::normalize_query;
pub use trending::NewTrendingRecord;
pub use trending::TrendingEntry;
pub use trending::TrendingRecordList;
pub use trending::TrendingUpdate;

/// Image base used for poster URLs when no override is configured.
pub const DEFAULT_IMAGE_BASE_URL: &str = "https://image.tmdb.org/t/p/w500";

/// Placeholder shown by front-ends when a movie has no poster.
pub const NO_POSTER_PLACEHOLDER: &str = "/no-poster.png";

/// Builds an absolute poster URL from a catalog poster path.
pub fn poster_url(image_base_url: &str, poster_path: Option<&str>) -> Option<String> {
    let path = poster_path.map(str::trim).filter(|p| !p.is_empty())?;
    let base = image_base_url.trim_end_matches('/');
    if path.starts_with('/') {
        Some(format!("{base}{path}"))
    } else {
        Some(format!("{base}/{path}"))
    }
}

use serde::Deserialize;
use serde::Serialize;
use serde_with::skip_serializing_none;

/// A counter-store record: how often a normalized query produced results,
/// plus a snapshot of the first movie it returned.
#[skip_serializing_none]
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct TrendingEntry {
    #[serde(rename = "$id")]
    pub record_id: String,
    #[serde(rename = "searchTerm")]
    pub query: String,
    #[serde(rename = "count")]
    pub hit_count: u64,
    #[serde(default)]
    pub movie_id: Option<u64>,
    #[serde(default)]
    pub poster_url: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
}

impl TrendingEntry {
    /// True when the representative movie snapshot is incomplete.
    pub fn needs_backfill(&self) -> bool {
        self.movie_id.is_none()
            || self.title.as_deref().is_none_or(str::is_empty)
            || self.poster_url.is_none()
    }
}

#[skip_serializing_none]
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct NewTrendingRecord {
    #[serde(rename = "searchTerm")]
    pub query: String,
    #[serde(rename = "count")]
    pub hit_count: u64,
    pub movie_id: u64,
    pub poster_url: Option<String>,
    pub title: String,
}

/// Partial update. Absent fields are left untouched by the store.
#[skip_serializing_none]
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct TrendingUpdate {
    #[serde(rename = "count")]
    pub hit_count: u64,
    pub movie_id: Option<u64>,
    pub poster_url: Option<String>,
    pub title: Option<String>,
}

/// Body of a list-by-filter response.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TrendingRecordList {
    pub total: Option<u64>,
    pub documents: Vec<TrendingEntry>,
}

use serde::Deserialize;
use serde::Serialize;
use serde_with::skip_serializing_none;

/// One entry of a discover or search page.
///
/// Only `id`, `title` and `poster_path` are read by the pipeline; the rest is
/// carried through for display.
#[skip_serializing_none]
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct MovieSummary {
    pub id: u64,
    pub title: String,
    pub poster_path: Option<String>,
    pub popularity: Option<f64>,
    pub vote_average: Option<f64>,
    pub release_date: Option<String>,
    pub original_language: Option<String>,
    pub overview: Option<String>,
}

/// Application-level failure markers that may appear in an otherwise
/// successful HTTP response.
///
/// Two shapes are recognised: the legacy `"Response": "False"` marker with an
/// `"Error"` text, and `"success": false` with a `"status_message"`.
#[skip_serializing_none]
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct UpstreamStatus {
    #[serde(rename = "Response")]
    pub response: Option<String>,
    #[serde(rename = "Error")]
    pub error: Option<String>,
    pub success: Option<bool>,
    pub status_message: Option<String>,
}

impl UpstreamStatus {
    pub fn is_failure(&self) -> bool {
        self.response
            .as_deref()
            .is_some_and(|flag| flag.eq_ignore_ascii_case("false"))
            || self.success == Some(false)
    }

    pub fn failure_message(&self) -> Option<&str> {
        self.error
            .as_deref()
            .or(self.status_message.as_deref())
            .map(str::trim)
            .filter(|msg| !msg.is_empty())
    }
}

/// Raw body of a discover/search response.
#[skip_serializing_none]
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CatalogPage {
    pub page: Option<u32>,
    pub results: Option<Vec<MovieSummary>>,
    pub total_pages: Option<u32>,
    pub total_results: Option<u64>,
    #[serde(flatten)]
    pub status: UpstreamStatus,
}

impl CatalogPage {
    /// Converts a successful body into a [`SearchResult`], capping the page
    /// count at `max_total_pages`.
    pub fn into_result(self, max_total_pages: u32) -> SearchResult {
        let total_pages = self
            .total_pages
            .filter(|pages| *pages > 0)
            .unwrap_or(1)
            .min(max_total_pages.max(1));
        SearchResult {
            items: self.results.unwrap_or_default(),
            total_pages,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct SearchResult {
    pub items: Vec<MovieSummary>,
    pub total_pages: u32,
}

impl SearchResult {
    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            total_pages: 1,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl Default for SearchResult {
    fn default() -> Self {
        Self::empty()
    }
}

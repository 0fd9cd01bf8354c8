//! Search state machine. Owns the active query and page and decides which
//! catalog responses may land.
//!
//! Every dispatched request gets a fresh id. A response is applied only when
//! its id is still the latest one, so an older request resolving late can
//! never overwrite newer results.

use crate::pagination::PaginationState;
use crate::pagination::clamp_page;
use moviescope_catalog_client::CatalogError;
use moviescope_protocol::MovieSummary;
use moviescope_protocol::Query;
use moviescope_protocol::SearchResult;
use moviescope_protocol::TrendingEntry;
use serde::Serialize;

pub type RequestId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchStatus {
    Idle,
    Loading,
    Success,
    Failed,
}

/// One catalog call the session should perform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    pub id: RequestId,
    pub query: Query,
    pub page: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOutcome {
    Applied,
    /// A newer request was dispatched; the response was dropped.
    Stale,
}

#[derive(Debug, Clone)]
pub struct SearchState {
    status: SearchStatus,
    query: Query,
    page: u32,
    total_pages: Option<u32>,
    items: Vec<MovieSummary>,
    error_message: Option<String>,
    latest_request: RequestId,
    discarded_responses: u64,
    window: u32,
}

impl Default for SearchState {
    fn default() -> Self {
        Self::new(crate::pagination::DEFAULT_WINDOW)
    }
}

impl SearchState {
    pub fn new(window: u32) -> Self {
        Self {
            status: SearchStatus::Idle,
            query: Query::empty(),
            page: 1,
            total_pages: None,
            items: Vec::new(),
            error_message: None,
            latest_request: 0,
            discarded_responses: 0,
            window,
        }
    }

    pub fn status(&self) -> SearchStatus {
        self.status
    }

    pub fn query(&self) -> &Query {
        &self.query
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn total_pages(&self) -> Option<u32> {
        self.total_pages
    }

    pub fn items(&self) -> &[MovieSummary] {
        &self.items
    }

    pub fn is_latest(&self, id: RequestId) -> bool {
        id == self.latest_request
    }

    /// Makes `query` the active query and requests its first page.
    ///
    /// Returns `None` when the query is already active and its last fetch is
    /// loading or succeeded. Re-submitting a query whose fetch failed is a
    /// retry.
    pub fn begin_query(&mut self, query: Query) -> Option<SearchRequest> {
        let unchanged = query == self.query
            && matches!(self.status, SearchStatus::Loading | SearchStatus::Success);
        if unchanged {
            return None;
        }
        if query != self.query {
            self.total_pages = None;
        }
        Some(self.dispatch(query, 1))
    }

    /// Requests another page of the active query, clamped into the known
    /// page range. Until the active query has reported a page count only
    /// page 1 is reachable.
    pub fn begin_page(&mut self, page: u32) -> SearchRequest {
        let page = clamp_page(page, self.total_pages.unwrap_or(1));
        let query = self.query.clone();
        self.dispatch(query, page)
    }

    fn dispatch(&mut self, query: Query, page: u32) -> SearchRequest {
        self.latest_request += 1;
        self.status = SearchStatus::Loading;
        self.error_message = None;
        self.query = query.clone();
        self.page = page;
        SearchRequest {
            id: self.latest_request,
            query,
            page,
        }
    }

    pub fn apply(
        &mut self,
        request: &SearchRequest,
        outcome: Result<SearchResult, CatalogError>,
    ) -> ApplyOutcome {
        if !self.is_latest(request.id) {
            self.discarded_responses += 1;
            return ApplyOutcome::Stale;
        }
        match outcome {
            Ok(result) => {
                let total = result.total_pages.max(1);
                self.status = SearchStatus::Success;
                self.total_pages = Some(total);
                self.page = clamp_page(request.page, total);
                self.items = result.items;
                self.error_message = None;
            }
            Err(err) => {
                self.status = SearchStatus::Failed;
                self.items.clear();
                self.error_message = Some(err.user_message());
            }
        }
        ApplyOutcome::Applied
    }

    /// Query and first movie of the current results when they should count
    /// toward the trending leaderboard.
    pub fn hit_candidate(&self) -> Option<(&Query, &MovieSummary)> {
        if self.status != SearchStatus::Success || self.query.is_empty() {
            return None;
        }
        self.items.first().map(|movie| (&self.query, movie))
    }

    pub fn snapshot(&self, trending: &[TrendingEntry]) -> SessionSnapshot {
        let total_pages = self.total_pages.unwrap_or(1);
        SessionSnapshot {
            status: self.status,
            query: self.query.clone(),
            page: self.page,
            total_pages,
            items: self.items.clone(),
            error_message: self.error_message.clone(),
            trending: trending.to_vec(),
            pagination: PaginationState::derive_with_window(self.page, total_pages, self.window),
            request_id: self.latest_request,
            discarded_responses: self.discarded_responses,
        }
    }
}

/// Everything the presentation layer renders.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionSnapshot {
    pub status: SearchStatus,
    pub query: Query,
    pub page: u32,
    pub total_pages: u32,
    pub items: Vec<MovieSummary>,
    pub error_message: Option<String>,
    pub trending: Vec<TrendingEntry>,
    pub pagination: PaginationState,
    /// Id of the latest dispatched request, 0 before the first one.
    pub request_id: RequestId,
    /// Responses dropped because a newer request had been dispatched.
    pub discarded_responses: u64,
}

impl Default for SessionSnapshot {
    fn default() -> Self {
        SearchState::default().snapshot(&[])
    }
}

impl SessionSnapshot {
    /// Successful fetch with nothing to show ("no movies found").
    pub fn is_empty_result(&self) -> bool {
        self.status == SearchStatus::Success && self.items.is_empty()
    }

    pub fn is_loading(&self) -> bool {
        self.status == SearchStatus::Loading
    }
}

use async_trait::async_trait;
use moviescope_catalog_client::Catalog;
use moviescope_catalog_client::CatalogError;
use moviescope_core::SearchSession;
use moviescope_core::SessionConfig;
use moviescope_core::SessionHandle;
use moviescope_core::SessionSnapshot;
use moviescope_protocol::MovieSummary;
use moviescope_protocol::Query;
use moviescope_protocol::SearchResult;
use moviescope_trending::CounterStore;
use moviescope_trending::MemoryCounterStore;
use moviescope_trending::TrendingAggregator;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::sync::oneshot;

pub const IMAGES: &str = "http://img.test/w500";

/// A catalog call parked until the test decides how it resolves.
pub struct PendingFetch {
    pub query: Query,
    pub page: u32,
    respond: oneshot::Sender<Result<SearchResult, CatalogError>>,
}

impl PendingFetch {
    pub fn resolve(self, outcome: Result<SearchResult, CatalogError>) {
        let _ = self.respond.send(outcome);
    }

    pub fn succeed(self, result: SearchResult) {
        self.resolve(Ok(result));
    }
}

/// Catalog whose calls complete only when the test resolves them, in any
/// order.
pub struct GatedCatalog {
    calls: mpsc::UnboundedSender<PendingFetch>,
}

#[async_trait]
impl Catalog for GatedCatalog {
    async fn fetch(&self, query: &Query, page: u32) -> moviescope_catalog_client::Result<SearchResult> {
        let (respond, outcome) = oneshot::channel();
        self.calls
            .send(PendingFetch {
                query: query.clone(),
                page,
                respond,
            })
            .map_err(|_| CatalogError::Transport("test harness gone".to_string()))?;
        outcome
            .await
            .unwrap_or_else(|_| Err(CatalogError::Transport("fetch abandoned".to_string())))
    }
}

pub struct Harness {
    pub handle: SessionHandle,
    pub fetches: mpsc::UnboundedReceiver<PendingFetch>,
    pub store: Arc<MemoryCounterStore>,
}

impl Harness {
    pub async fn next_fetch(&mut self) -> PendingFetch {
        tokio::time::timeout(Duration::from_secs(10), self.fetches.recv())
            .await
            .expect("timed out waiting for a catalog call")
            .expect("catalog dropped")
    }

    pub async fn wait_for(
        &self,
        predicate: impl FnMut(&SessionSnapshot) -> bool,
    ) -> SessionSnapshot {
        tokio::time::timeout(Duration::from_secs(10), self.handle.wait_for(predicate))
            .await
            .expect("timed out waiting for snapshot")
            .expect("session closed")
    }

    pub async fn wait_for_writes(&self, expected: usize) {
        tokio::time::timeout(Duration::from_secs(10), async {
            while self.store.writes().await < expected {
                tokio::task::yield_now().await;
            }
        })
        .await
        .expect("timed out waiting for trending writes");
    }
}

pub fn start_with_store(store: Arc<MemoryCounterStore>) -> Harness {
    start_with_counters(store.clone(), store)
}

/// Runs hits through `counters` while `store` stays inspectable.
pub fn start_with_counters(
    counters: Arc<dyn CounterStore>,
    store: Arc<MemoryCounterStore>,
) -> Harness {
    let (calls, fetches) = mpsc::unbounded_channel();
    let aggregator = TrendingAggregator::new(counters, IMAGES);
    let handle = SearchSession::spawn(
        Arc::new(GatedCatalog { calls }),
        Some(aggregator),
        SessionConfig::default(),
    );
    Harness {
        handle,
        fetches,
        store,
    }
}

pub fn start() -> Harness {
    start_with_store(Arc::new(MemoryCounterStore::new()))
}

pub fn movies(tag: u64, count: u64) -> Vec<MovieSummary> {
    (0..count)
        .map(|n| MovieSummary {
            id: tag * 1000 + n,
            title: format!("Movie {tag}/{n}"),
            poster_path: Some(format!("/{tag}-{n}.jpg")),
            ..Default::default()
        })
        .collect()
}

pub fn page_of(tag: u64, count: u64, total_pages: u32) -> SearchResult {
    SearchResult {
        items: movies(tag, count),
        total_pages,
    }
}

pub async fn settle() {
    for _ in 0..16 {
        tokio::task::yield_now().await;
    }
}

use crate::CounterStore;
use crate::error::Result;
use crate::error::TrendingError;
use async_trait::async_trait;
use moviescope_protocol::NewTrendingRecord;
use moviescope_protocol::TrendingEntry;
use moviescope_protocol::TrendingUpdate;
use moviescope_protocol::normalize_query;
use std::cmp::Reverse;
use tokio::sync::Mutex;

/// In-process counter store for tests. Keeps insertion order and counts
/// write operations.
#[derive(Debug, Default)]
pub struct MemoryCounterStore {
    inner: Mutex<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    records: Vec<TrendingEntry>,
    next_id: u64,
    writes: usize,
    failing: bool,
}

impl Inner {
    fn check(&self) -> Result<()> {
        if self.failing {
            return Err(TrendingError::Transport("counter store unavailable".to_string()));
        }
        Ok(())
    }
}

impl MemoryCounterStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a record as if another client had written it.
    pub async fn insert(&self, entry: TrendingEntry) {
        self.inner.lock().await.records.push(entry);
    }

    pub async fn records(&self) -> Vec<TrendingEntry> {
        self.inner.lock().await.records.clone()
    }

    /// Number of successful `create` and `update` calls.
    pub async fn writes(&self) -> usize {
        self.inner.lock().await.writes
    }

    /// Makes every subsequent call fail with a transport error.
    pub async fn set_failing(&self, failing: bool) {
        self.inner.lock().await.failing = failing;
    }
}

#[async_trait]
impl CounterStore for MemoryCounterStore {
    async fn find_by_query(&self, normalized_query: &str) -> Result<Vec<TrendingEntry>> {
        let inner = self.inner.lock().await;
        inner.check()?;
        Ok(inner
            .records
            .iter()
            .filter(|entry| normalize_query(&entry.query) == normalized_query)
            .cloned()
            .collect())
    }

    async fn create(&self, record: NewTrendingRecord) -> Result<TrendingEntry> {
        let mut inner = self.inner.lock().await;
        inner.check()?;
        inner.next_id += 1;
        let entry = TrendingEntry {
            record_id: format!("mem-{}", inner.next_id),
            query: record.query,
            hit_count: record.hit_count,
            movie_id: Some(record.movie_id),
            poster_url: record.poster_url,
            title: Some(record.title),
        };
        inner.records.push(entry.clone());
        inner.writes += 1;
        Ok(entry)
    }

    async fn update(&self, record_id: &str, update: TrendingUpdate) -> Result<TrendingEntry> {
        let mut inner = self.inner.lock().await;
        inner.check()?;
        let entry = inner
            .records
            .iter_mut()
            .find(|entry| entry.record_id == record_id)
            .ok_or_else(|| TrendingError::NotFound(record_id.to_string()))?;
        entry.hit_count = update.hit_count;
        if let Some(movie_id) = update.movie_id {
            entry.movie_id = Some(movie_id);
        }
        if let Some(poster_url) = update.poster_url {
            entry.poster_url = Some(poster_url);
        }
        if let Some(title) = update.title {
            entry.title = Some(title);
        }
        let updated = entry.clone();
        inner.writes += 1;
        Ok(updated)
    }

    async fn list_top(&self, limit: usize) -> Result<Vec<TrendingEntry>> {
        let inner = self.inner.lock().await;
        inner.check()?;
        let mut records = inner.records.clone();
        records.sort_by_key(|entry| Reverse(entry.hit_count));
        records.truncate(limit);
        Ok(records)
    }
}

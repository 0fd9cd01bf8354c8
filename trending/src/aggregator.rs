use crate::CounterStore;
use crate::error::Result;
use crate::error::TrendingError;
use moviescope_protocol::MovieSummary;
use moviescope_protocol::NewTrendingRecord;
use moviescope_protocol::Query;
use moviescope_protocol::TrendingEntry;
use moviescope_protocol::TrendingUpdate;
use moviescope_protocol::poster_url;
use std::cmp::Reverse;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::debug;

/// Read-then-upsert wrapper over a [`CounterStore`]. Holds no counts of its
/// own.
///
/// Clones share one write lock, so hits recorded through the same aggregator
/// run their read and write one at a time.
#[derive(Clone)]
pub struct TrendingAggregator {
    store: Arc<dyn CounterStore>,
    image_base_url: String,
    write_lock: Arc<Mutex<()>>,
}

impl TrendingAggregator {
    pub fn new(store: Arc<dyn CounterStore>, image_base_url: impl Into<String>) -> Self {
        Self {
            store,
            image_base_url: image_base_url.into(),
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Counts one successful search for `query`, using `sample` as the
    /// representative movie when the record is created or incomplete.
    ///
    /// When several records share the normalized query (two clients created
    /// one concurrently) the oldest is incremented so every client converges
    /// on the same record.
    pub async fn record_hit(&self, query: &Query, sample: &MovieSummary) -> Result<TrendingEntry> {
        if query.is_empty() {
            return Err(TrendingError::EmptyQuery);
        }
        let key = query.normalized();
        let poster = poster_url(&self.image_base_url, sample.poster_path.as_deref());

        let _guard = self.write_lock.lock().await;
        let existing = self.store.find_by_query(&key).await?.into_iter().next();
        match existing {
            Some(entry) => {
                let mut update = TrendingUpdate {
                    hit_count: entry.hit_count.saturating_add(1),
                    ..Default::default()
                };
                if entry.needs_backfill() {
                    update.movie_id = entry.movie_id.or(Some(sample.id));
                    update.title = entry
                        .title
                        .filter(|title| !title.is_empty())
                        .or_else(|| Some(sample.title.clone()));
                    update.poster_url = entry.poster_url.or(poster);
                }
                debug!(
                    "incrementing trending record {} for {key:?} to {}",
                    entry.record_id, update.hit_count
                );
                self.store.update(&entry.record_id, update).await
            }
            None => {
                debug!("creating trending record for {key:?}");
                self.store
                    .create(NewTrendingRecord {
                        query: key,
                        hit_count: 1,
                        movie_id: sample.id,
                        poster_url: poster,
                        title: sample.title.clone(),
                    })
                    .await
            }
        }
    }

    /// Leaderboard ordered by descending count; ties keep store order.
    pub async fn top_entries(&self, limit: usize) -> Result<Vec<TrendingEntry>> {
        if limit == 0 {
            return Ok(Vec::new());
        }
        let mut entries = self.store.list_top(limit).await?;
        entries.sort_by_key(|entry| Reverse(entry.hit_count));
        entries.truncate(limit);
        Ok(entries)
    }
}

/*!
# Trending searches

Aggregates successful searches into a shared leaderboard kept in an external
counter store.

```text
search succeeded (query, first movie)
  └─> re-read record for normalized query
        ├─> found:   update count + 1 (backfill snapshot if incomplete)
        └─> missing: create record with count 1
```

The store is shared by independent clients and offers no locking, so
concurrent increments may be lost. Every write starts from a fresh read.
*/

mod aggregator;
mod config;
mod error;
mod http_store;
#[cfg(any(test, feature = "test-support"))]
mod memory;

pub use aggregator::TrendingAggregator;
pub use config::TrendingConfig;
pub use error::Result;
pub use error::TrendingError;
pub use http_store::HttpCounterStore;
#[cfg(any(test, feature = "test-support"))]
pub use memory::MemoryCounterStore;

use async_trait::async_trait;
use moviescope_protocol::NewTrendingRecord;
use moviescope_protocol::TrendingEntry;
use moviescope_protocol::TrendingUpdate;

/// Shared counter store holding one record per normalized query.
#[async_trait]
pub trait CounterStore: Send + Sync {
    /// Records whose query equals `normalized_query`, in insertion order.
    async fn find_by_query(&self, normalized_query: &str) -> Result<Vec<TrendingEntry>>;

    async fn create(&self, record: NewTrendingRecord) -> Result<TrendingEntry>;

    async fn update(&self, record_id: &str, update: TrendingUpdate) -> Result<TrendingEntry>;

    /// Highest counts first; ties keep insertion order.
    async fn list_top(&self, limit: usize) -> Result<Vec<TrendingEntry>>;
}

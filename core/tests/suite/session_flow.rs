use super::support::Harness;
use super::support::movies;
use super::support::page_of;
use super::support::settle;
use super::support::start;
use super::support::start_with_counters;
use super::support::start_with_store;
use async_trait::async_trait;
use moviescope_catalog_client::CatalogError;
use moviescope_catalog_client::GENERIC_FETCH_ERROR;
use moviescope_core::SearchStatus;
use moviescope_protocol::NewTrendingRecord;
use moviescope_protocol::TrendingEntry;
use moviescope_protocol::TrendingUpdate;
use moviescope_trending::CounterStore;
use moviescope_trending::MemoryCounterStore;
use pretty_assertions::assert_eq;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::error::TryRecvError;
use tokio::time::Instant;
use tokio::time::advance;

async fn finish_discover(harness: &mut Harness, total_pages: u32) {
    let initial = harness.next_fetch().await;
    assert_eq!(initial.query.as_str(), "");
    assert_eq!(initial.page, 1);
    initial.succeed(page_of(0, 20, total_pages));
    harness
        .wait_for(|s| s.status == SearchStatus::Success && s.query.is_empty())
        .await;
}

#[tokio::test]
async fn batman_search_then_page_three() {
    let mut harness = start();
    finish_discover(&mut harness, 500).await;

    harness.handle.set_query("batman").expect("set query");
    let fetch = harness.next_fetch().await;
    assert_eq!((fetch.query.as_str(), fetch.page), ("batman", 1));
    fetch.succeed(page_of(1, 20, 5));
    let snapshot = harness
        .wait_for(|s| s.status == SearchStatus::Success && s.query.as_str() == "batman")
        .await;
    assert_eq!(snapshot.items.len(), 20);
    assert_eq!(snapshot.total_pages, 5);
    assert_eq!(snapshot.page, 1);
    assert_eq!(snapshot.pagination.visible_pages, vec![1, 2, 3, 4, 5]);

    harness.handle.set_page(3).expect("set page");
    let fetch = harness.next_fetch().await;
    assert_eq!((fetch.query.as_str(), fetch.page), ("batman", 3));
    fetch.succeed(page_of(3, 20, 5));
    let snapshot = harness
        .wait_for(|s| s.status == SearchStatus::Success && s.page == 3)
        .await;
    assert_eq!(snapshot.query.as_str(), "batman");
    assert_eq!(snapshot.items, movies(3, 20));

    harness.wait_for_writes(2).await;
    let records = harness.store.records().await;
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].query, "batman");
    assert_eq!(records[0].hit_count, 2);
    assert_eq!(records[0].movie_id, Some(1000));
}

#[tokio::test]
async fn newest_page_wins_regardless_of_resolution_order() {
    let mut harness = start();
    finish_discover(&mut harness, 10).await;

    for page in [2, 3, 4] {
        harness.handle.set_page(page).expect("set page");
    }
    let mut pending = Vec::new();
    for _ in 0..3 {
        pending.push(harness.next_fetch().await);
    }
    pending.sort_by_key(|fetch| fetch.page);
    let [two, three, four] = <[_; 3]>::try_from(pending).ok().expect("three fetches");
    assert_eq!((two.page, three.page, four.page), (2, 3, 4));

    four.succeed(page_of(4, 20, 10));
    harness
        .wait_for(|s| s.status == SearchStatus::Success && s.page == 4)
        .await;

    two.succeed(page_of(2, 20, 10));
    three.resolve(Err(CatalogError::Transport("connection reset".to_string())));
    let snapshot = harness.wait_for(|s| s.discarded_responses == 2).await;
    assert_eq!(snapshot.status, SearchStatus::Success);
    assert_eq!(snapshot.page, 4);
    assert_eq!(snapshot.items, movies(4, 20));
    assert_eq!(snapshot.error_message, None);
}

#[tokio::test]
async fn earlier_query_resolving_late_is_ignored() {
    let mut harness = start();
    finish_discover(&mut harness, 10).await;

    harness.handle.set_query("bat").expect("set query");
    let bat = harness.next_fetch().await;
    harness.handle.set_query("batman").expect("set query");
    let batman = harness.next_fetch().await;

    batman.succeed(page_of(2, 4, 1));
    bat.succeed(page_of(1, 20, 9));
    let snapshot = harness
        .wait_for(|s| s.discarded_responses == 1 && s.status == SearchStatus::Success)
        .await;
    assert_eq!(snapshot.query.as_str(), "batman");
    assert_eq!(snapshot.items, movies(2, 4));
    assert_eq!(snapshot.total_pages, 1);
}

#[tokio::test]
async fn query_change_resets_page() {
    let mut harness = start();
    finish_discover(&mut harness, 10).await;

    harness.handle.set_page(3).expect("set page");
    harness.next_fetch().await.succeed(page_of(3, 20, 10));
    harness.wait_for(|s| s.page == 3 && !s.is_loading()).await;

    harness.handle.set_query("superman").expect("set query");
    let fetch = harness.next_fetch().await;
    assert_eq!((fetch.query.as_str(), fetch.page), ("superman", 1));
    fetch.succeed(page_of(5, 20, 7));
    let snapshot = harness
        .wait_for(|s| s.query.as_str() == "superman" && !s.is_loading())
        .await;
    assert_eq!(snapshot.page, 1);
}

#[tokio::test]
async fn empty_results_show_no_movies_and_record_nothing() {
    let mut harness = start();
    finish_discover(&mut harness, 500).await;

    harness.handle.set_query("qwxzqwxz").expect("set query");
    harness.next_fetch().await.succeed(page_of(0, 0, 0));
    let snapshot = harness
        .wait_for(|s| s.query.as_str() == "qwxzqwxz" && !s.is_loading())
        .await;
    assert!(snapshot.is_empty_result());
    assert_eq!(snapshot.total_pages, 1);

    // A later hit proves the earlier searches were never counted.
    harness.handle.set_query("heat").expect("set query");
    harness.next_fetch().await.succeed(page_of(1, 3, 1));
    harness.wait_for_writes(1).await;
    settle().await;
    let records = harness.store.records().await;
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].query, "heat");
}

#[tokio::test]
async fn empty_discover_feed_is_an_empty_success() {
    let mut harness = start();
    harness.next_fetch().await.succeed(page_of(0, 0, 0));
    let snapshot = harness
        .wait_for(|s| s.status == SearchStatus::Success)
        .await;
    assert!(snapshot.query.is_empty());
    assert!(snapshot.is_empty_result());
    assert_eq!(snapshot.error_message, None);
    settle().await;
    assert_eq!(harness.store.writes().await, 0);
}

#[tokio::test]
async fn transport_failure_shows_generic_message() {
    let mut harness = start();
    finish_discover(&mut harness, 10).await;

    harness.handle.set_query("heat").expect("set query");
    harness
        .next_fetch()
        .await
        .resolve(Err(CatalogError::Transport("dns failure".to_string())));
    let snapshot = harness
        .wait_for(|s| s.status == SearchStatus::Failed)
        .await;
    assert_eq!(snapshot.error_message.as_deref(), Some(GENERIC_FETCH_ERROR));
    assert!(snapshot.items.is_empty());

    harness.handle.set_query("heat").expect("retry");
    let retry = harness.next_fetch().await;
    assert_eq!((retry.query.as_str(), retry.page), ("heat", 1));
    retry.succeed(page_of(1, 2, 1));
    let snapshot = harness
        .wait_for(|s| s.status == SearchStatus::Success && s.query.as_str() == "heat")
        .await;
    assert_eq!(snapshot.error_message, None);
}

#[tokio::test]
async fn upstream_message_is_shown_verbatim() {
    let mut harness = start();
    harness
        .next_fetch()
        .await
        .resolve(Err(CatalogError::Upstream(Some(
            "Invalid API key: You must be granted a valid key.".to_string(),
        ))));
    let snapshot = harness
        .wait_for(|s| s.status == SearchStatus::Failed)
        .await;
    assert_eq!(
        snapshot.error_message.as_deref(),
        Some("Invalid API key: You must be granted a valid key.")
    );
}

#[tokio::test]
async fn trending_loads_at_start_in_count_order() {
    let store = Arc::new(MemoryCounterStore::new());
    for (id, query, count) in [("a", "alien", 3), ("b", "batman", 11), ("c", "dune", 7)] {
        store
            .insert(TrendingEntry {
                record_id: id.to_string(),
                query: query.to_string(),
                hit_count: count,
                movie_id: Some(1),
                poster_url: None,
                title: Some(query.to_string()),
            })
            .await;
    }
    let harness = start_with_store(store);

    let snapshot = harness.wait_for(|s| !s.trending.is_empty()).await;
    let queries: Vec<&str> = snapshot
        .trending
        .iter()
        .map(|entry| entry.query.as_str())
        .collect();
    assert_eq!(queries, vec!["batman", "dune", "alien"]);
}

#[tokio::test]
async fn trending_outage_does_not_affect_search() {
    let store = Arc::new(MemoryCounterStore::new());
    store.set_failing(true).await;
    let mut harness = start_with_store(store);
    finish_discover(&mut harness, 10).await;

    harness.handle.set_query("batman").expect("set query");
    harness.next_fetch().await.succeed(page_of(1, 20, 5));
    let snapshot = harness
        .wait_for(|s| s.status == SearchStatus::Success && s.query.as_str() == "batman")
        .await;
    assert!(snapshot.trending.is_empty());
    assert_eq!(snapshot.items.len(), 20);

    harness.handle.refresh_trending().expect("refresh");
    harness.handle.set_page(2).expect("set page");
    assert_eq!(harness.next_fetch().await.page, 2);
}

#[tokio::test(start_paused = true)]
async fn typing_is_debounced_into_a_single_search() {
    let mut harness = start();
    finish_discover(&mut harness, 10).await;

    let started = Instant::now();
    for raw in ["b", "ba", "bat", "batman"] {
        harness.handle.observe_input(raw).expect("input");
        settle().await;
        advance(Duration::from_millis(100)).await;
    }
    advance(Duration::from_millis(600)).await;
    settle().await;
    assert!(matches!(harness.fetches.try_recv(), Err(TryRecvError::Empty)));

    let fetch = harness.next_fetch().await;
    assert_eq!((fetch.query.as_str(), fetch.page), ("batman", 1));
    assert!(started.elapsed() >= Duration::from_millis(300 + 750));
}

#[tokio::test(start_paused = true)]
async fn dropping_the_handle_cancels_pending_input() {
    let mut harness = start();
    finish_discover(&mut harness, 10).await;

    harness.handle.observe_input("alien").expect("input");
    settle().await;
    let Harness {
        handle,
        mut fetches,
        ..
    } = harness;
    drop(handle);
    settle().await;
    advance(Duration::from_secs(2)).await;
    settle().await;

    assert!(!matches!(fetches.try_recv(), Ok(_)));
}

/// Counter store whose reads take a while to come back.
struct SlowReads {
    inner: Arc<MemoryCounterStore>,
}

#[async_trait]
impl CounterStore for SlowReads {
    async fn find_by_query(
        &self,
        normalized_query: &str,
    ) -> moviescope_trending::Result<Vec<TrendingEntry>> {
        let found = self.inner.find_by_query(normalized_query).await;
        tokio::time::sleep(Duration::from_millis(50)).await;
        found
    }

    async fn create(&self, record: NewTrendingRecord) -> moviescope_trending::Result<TrendingEntry> {
        self.inner.create(record).await
    }

    async fn update(
        &self,
        record_id: &str,
        update: TrendingUpdate,
    ) -> moviescope_trending::Result<TrendingEntry> {
        self.inner.update(record_id, update).await
    }

    async fn list_top(&self, limit: usize) -> moviescope_trending::Result<Vec<TrendingEntry>> {
        self.inner.list_top(limit).await
    }
}

#[tokio::test]
async fn back_to_back_successes_each_count_a_hit() {
    let store = Arc::new(MemoryCounterStore::new());
    store
        .insert(TrendingEntry {
            record_id: "seed".to_string(),
            query: "batman".to_string(),
            hit_count: 10,
            movie_id: Some(268),
            poster_url: Some("http://img.test/w500/268.jpg".to_string()),
            title: Some("Batman".to_string()),
        })
        .await;
    let slow = Arc::new(SlowReads {
        inner: store.clone(),
    });
    let mut harness = start_with_counters(slow, store);
    finish_discover(&mut harness, 10).await;

    harness.handle.set_query("batman").expect("set query");
    harness.next_fetch().await.succeed(page_of(1, 20, 5));
    harness
        .wait_for(|s| s.status == SearchStatus::Success && s.query.as_str() == "batman")
        .await;
    harness.handle.set_page(2).expect("set page");
    harness.next_fetch().await.succeed(page_of(2, 20, 5));
    harness
        .wait_for(|s| s.status == SearchStatus::Success && s.page == 2)
        .await;

    harness.wait_for_writes(2).await;
    let records = harness.store.records().await;
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].hit_count, 12);
}

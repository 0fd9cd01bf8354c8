use moviescope_async_utils::Debouncer;
use moviescope_protocol::Query;
use std::time::Duration;
use tokio::sync::mpsc;

/// Default quiet interval between the last keystroke and the search.
pub const QUIET_INTERVAL: Duration = Duration::from_millis(750);

/// Turns raw text-box input into stabilized queries.
///
/// Raw input is compared untrimmed, so typing a trailing space restarts the
/// timer, but the emitted [`Query`] is trimmed.
pub struct QueryDebouncer {
    inner: Debouncer<String>,
}

/// Receiving side of a [`QueryDebouncer`].
pub struct StabilizedQueries {
    rx: mpsc::UnboundedReceiver<String>,
}

impl QueryDebouncer {
    pub fn new(quiet: Duration) -> (Self, StabilizedQueries) {
        let (inner, rx) = Debouncer::new(quiet);
        (Self { inner }, StabilizedQueries { rx })
    }

    pub fn observe(&mut self, raw: impl Into<String>) {
        self.inner.observe(raw.into());
    }

    pub fn cancel(&mut self) {
        self.inner.cancel();
    }

    pub fn is_pending(&self) -> bool {
        self.inner.is_pending()
    }
}

impl StabilizedQueries {
    /// Next stabilized query, or `None` once the debouncer is gone.
    pub async fn recv(&mut self) -> Option<Query> {
        self.rx.recv().await.map(Query::new)
    }
}

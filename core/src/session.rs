use crate::config::Config;
use crate::config::SessionConfig;
use crate::debounce::QueryDebouncer;
use crate::debounce::StabilizedQueries;
use crate::error::SessionError;
use crate::state::ApplyOutcome;
use crate::state::SearchRequest;
use crate::state::SearchState;
use crate::state::SessionSnapshot;
use moviescope_catalog_client::Catalog;
use moviescope_catalog_client::CatalogClient;
use moviescope_catalog_client::CatalogError;
use moviescope_protocol::Query;
use moviescope_protocol::SearchResult;
use moviescope_protocol::TrendingEntry;
use moviescope_trending::HttpCounterStore;
use moviescope_trending::TrendingAggregator;
use moviescope_trending::TrendingError;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::sync::watch;
use tracing::debug;
use tracing::info;
use tracing::warn;

/// Entry point for starting a search session.
pub struct SearchSession;

impl SearchSession {
    /// Starts the session actor on the current tokio runtime.
    ///
    /// The session immediately loads the discovery feed (empty query,
    /// page 1) and, when an aggregator is present, the trending leaderboard.
    /// It runs until every [`SessionHandle`] has been dropped.
    pub fn spawn(
        catalog: Arc<dyn Catalog>,
        aggregator: Option<TrendingAggregator>,
        config: SessionConfig,
    ) -> SessionHandle {
        info!(
            "starting search session: debounce={}ms trending={}",
            config.debounce_ms,
            aggregator.is_some()
        );
        let (commands_tx, commands_rx) = mpsc::unbounded_channel();
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let (debouncer, stabilized) = QueryDebouncer::new(config.debounce_interval());
        let state = SearchState::new(config.pagination_window);
        let (snapshots_tx, snapshots_rx) = watch::channel(state.snapshot(&[]));

        let actor = SessionActor {
            catalog,
            aggregator,
            config,
            state,
            trending: Vec::new(),
            debouncer,
            snapshots: snapshots_tx,
            events: events_tx,
        };
        tokio::spawn(actor.run(commands_rx, events_rx, stabilized));

        SessionHandle {
            commands: commands_tx,
            snapshots: snapshots_rx,
        }
    }

    /// Builds the HTTP catalog and counter-store clients from `config` and
    /// starts a session over them.
    pub fn from_config(config: &Config) -> Result<SessionHandle, SessionError> {
        config.validate()?;
        let catalog = CatalogClient::new(&config.catalog)?;
        let aggregator = match &config.trending {
            Some(trending) => {
                let store = HttpCounterStore::new(trending)?;
                Some(TrendingAggregator::new(
                    Arc::new(store),
                    config.catalog.image_base_url.clone(),
                ))
            }
            None => None,
        };
        Ok(Self::spawn(
            Arc::new(catalog),
            aggregator,
            config.session.clone(),
        ))
    }
}

/// Cloneable front end of a running session.
#[derive(Clone)]
pub struct SessionHandle {
    commands: mpsc::UnboundedSender<Command>,
    snapshots: watch::Receiver<SessionSnapshot>,
}

#[derive(Debug)]
enum Command {
    Input(String),
    SetQuery(String),
    SetPage(u32),
    RefreshTrending,
}

enum Event {
    Fetched {
        request: SearchRequest,
        outcome: Result<SearchResult, CatalogError>,
    },
    Trending(Result<Vec<TrendingEntry>, TrendingError>),
}

impl SessionHandle {
    /// Feeds raw text-box content. The query only changes once the input has
    /// been stable for the debounce interval.
    pub fn observe_input(&self, raw: impl Into<String>) -> Result<(), SessionError> {
        self.send(Command::Input(raw.into()))
    }

    /// Sets the active query immediately, bypassing the debouncer.
    pub fn set_query(&self, raw: impl Into<String>) -> Result<(), SessionError> {
        self.send(Command::SetQuery(raw.into()))
    }

    pub fn set_page(&self, page: u32) -> Result<(), SessionError> {
        self.send(Command::SetPage(page))
    }

    pub fn refresh_trending(&self) -> Result<(), SessionError> {
        self.send(Command::RefreshTrending)
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        self.snapshots.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.snapshots.clone()
    }

    /// Waits until a published snapshot satisfies `predicate`.
    pub async fn wait_for(
        &self,
        predicate: impl FnMut(&SessionSnapshot) -> bool,
    ) -> Result<SessionSnapshot, SessionError> {
        let mut rx = self.subscribe();
        let snapshot = rx
            .wait_for(predicate)
            .await
            .map_err(|_| SessionError::Closed)?;
        Ok(snapshot.clone())
    }

    fn send(&self, command: Command) -> Result<(), SessionError> {
        self.commands
            .send(command)
            .map_err(|_| SessionError::Closed)
    }
}

struct SessionActor {
    catalog: Arc<dyn Catalog>,
    aggregator: Option<TrendingAggregator>,
    config: SessionConfig,
    state: SearchState,
    trending: Vec<TrendingEntry>,
    debouncer: QueryDebouncer,
    snapshots: watch::Sender<SessionSnapshot>,
    events: mpsc::UnboundedSender<Event>,
}

impl SessionActor {
    async fn run(
        mut self,
        mut commands: mpsc::UnboundedReceiver<Command>,
        mut events: mpsc::UnboundedReceiver<Event>,
        mut stabilized: StabilizedQueries,
    ) {
        let initial = self.state.begin_page(1);
        self.dispatch(initial);
        self.load_trending();

        loop {
            tokio::select! {
                command = commands.recv() => match command {
                    Some(command) => self.handle_command(command),
                    None => break,
                },
                Some(query) = stabilized.recv() => self.set_query(query),
                Some(event) = events.recv() => self.handle_event(event),
            }
        }
        self.debouncer.cancel();
        debug!("search session stopped");
    }

    fn handle_command(&mut self, command: Command) {
        match command {
            Command::Input(raw) => self.debouncer.observe(raw),
            Command::SetQuery(raw) => {
                self.debouncer.cancel();
                self.set_query(Query::new(raw));
            }
            Command::SetPage(page) => {
                let request = self.state.begin_page(page);
                self.dispatch(request);
            }
            Command::RefreshTrending => self.load_trending(),
        }
    }

    fn set_query(&mut self, query: Query) {
        match self.state.begin_query(query) {
            Some(request) => self.dispatch(request),
            None => debug!("query {:?} already active", self.state.query().as_str()),
        }
    }

    fn dispatch(&mut self, request: SearchRequest) {
        debug!(
            "fetch #{} query={:?} page={}",
            request.id,
            request.query.as_str(),
            request.page
        );
        self.publish();

        let catalog = Arc::clone(&self.catalog);
        let events = self.events.clone();
        tokio::spawn(async move {
            let outcome = catalog.fetch(&request.query, request.page).await;
            let _ = events.send(Event::Fetched { request, outcome });
        });
    }

    fn load_trending(&self) {
        let Some(aggregator) = self.aggregator.clone() else {
            return;
        };
        let limit = self.config.trending_limit;
        let events = self.events.clone();
        tokio::spawn(async move {
            let result = aggregator.top_entries(limit).await;
            let _ = events.send(Event::Trending(result));
        });
    }

    fn handle_event(&mut self, event: Event) {
        match event {
            Event::Fetched { request, outcome } => {
                if let Err(err) = &outcome {
                    warn!("fetch #{} failed: {err}", request.id);
                }
                match self.state.apply(&request, outcome) {
                    ApplyOutcome::Stale => {
                        debug!("discarding stale response for fetch #{}", request.id);
                    }
                    ApplyOutcome::Applied => self.record_hit(),
                }
                self.publish();
            }
            Event::Trending(Ok(entries)) => {
                self.trending = entries;
                self.publish();
            }
            Event::Trending(Err(err)) => {
                warn!("failed to load trending searches: {err}");
                self.trending.clear();
                self.publish();
            }
        }
    }

    fn record_hit(&self) {
        let Some(aggregator) = self.aggregator.clone() else {
            return;
        };
        let Some((query, sample)) = self.state.hit_candidate() else {
            return;
        };
        let query = query.clone();
        let sample = sample.clone();
        tokio::spawn(async move {
            match aggregator.record_hit(&query, &sample).await {
                Ok(entry) => info!(
                    "trending count for {:?} is now {}",
                    entry.query, entry.hit_count
                ),
                Err(err) => warn!(
                    "failed to record trending hit for {:?}: {err}",
                    query.as_str()
                ),
            }
        });
    }

    fn publish(&self) {
        self.snapshots
            .send_replace(self.state.snapshot(&self.trending));
    }
}

/*!
# Movie search session

Turns keystrokes and page clicks into catalog requests and keeps a single,
observable view of the results.

```text
raw input
  └─> QueryDebouncer (750 ms quiet interval)
        └─> SearchSession actor ──> Catalog::fetch(query, page)
              │                          └─> result applied only if it is the
              │                              latest dispatched request
              ├─> watch::Receiver<SessionSnapshot> (presentation layer)
              └─> TrendingAggregator::record_hit (fire-and-forget)
```
*/

pub mod config;
mod debounce;
mod error;
pub mod pagination;
mod session;
pub mod state;

pub use config::API_KEY_ENV_VAR;
pub use config::Config;
pub use config::ConfigError;
pub use config::SessionConfig;
pub use debounce::QUIET_INTERVAL;
pub use debounce::QueryDebouncer;
pub use debounce::StabilizedQueries;
pub use error::SessionError;
pub use pagination::PaginationState;
pub use session::SearchSession;
pub use session::SessionHandle;
pub use state::ApplyOutcome;
pub use state::SearchRequest;
pub use state::SearchState;
pub use state::SearchStatus;
pub use state::SessionSnapshot;

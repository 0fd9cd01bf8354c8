use thiserror::Error;

/// Shown for transport failures and non-success HTTP statuses.
pub const GENERIC_FETCH_ERROR: &str = "Error fetching movies. Please try again later.";

/// Shown when the catalog signals a failure without a message.
pub const UPSTREAM_FALLBACK_ERROR: &str = "Failed to fetch movie data.";

/// Shown when loading a single movie's details fails in transport.
pub const GENERIC_DETAILS_ERROR: &str = "Error fetching movie data";

#[derive(Error, Debug)]
pub enum CatalogError {
    /// The call could not complete, returned a non-success status, or the
    /// body could not be decoded.
    #[error("catalog transport error: {0}")]
    Transport(String),

    /// HTTP succeeded but the body carries a failure marker.
    #[error("catalog reported a failure: {}", .0.as_deref().unwrap_or("no message"))]
    Upstream(Option<String>),

    #[error("invalid catalog configuration: {0}")]
    Config(String),
}

impl CatalogError {
    /// Text safe to show to a user. Transport details are never exposed.
    pub fn user_message(&self) -> String {
        match self {
            CatalogError::Transport(_) | CatalogError::Config(_) => GENERIC_FETCH_ERROR.to_string(),
            CatalogError::Upstream(message) => message
                .clone()
                .unwrap_or_else(|| UPSTREAM_FALLBACK_ERROR.to_string()),
        }
    }

    /// Like [`user_message`](Self::user_message), for the details view.
    pub fn details_user_message(&self) -> String {
        match self {
            CatalogError::Transport(_) | CatalogError::Config(_) => {
                GENERIC_DETAILS_ERROR.to_string()
            }
            CatalogError::Upstream(_) => self.user_message(),
        }
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, CatalogError::Transport(_))
    }
}

impl From<reqwest::Error> for CatalogError {
    fn from(err: reqwest::Error) -> Self {
        CatalogError::Transport(err.to_string())
    }
}

impl From<url::ParseError> for CatalogError {
    fn from(err: url::ParseError) -> Self {
        CatalogError::Config(err.to_string())
    }
}

impl From<reqwest::header::InvalidHeaderValue> for CatalogError {
    fn from(err: reqwest::header::InvalidHeaderValue) -> Self {
        CatalogError::Config(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, CatalogError>;

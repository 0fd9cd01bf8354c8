use thiserror::Error;

#[derive(Error, Debug)]
pub enum TrendingError {
    #[error("counter store transport error: {0}")]
    Transport(String),

    #[error("counter store record not found: {0}")]
    NotFound(String),

    #[error("empty queries are not recorded")]
    EmptyQuery,

    #[error("invalid counter store configuration: {0}")]
    Config(String),
}

impl From<reqwest::Error> for TrendingError {
    fn from(err: reqwest::Error) -> Self {
        TrendingError::Transport(err.to_string())
    }
}

impl From<url::ParseError> for TrendingError {
    fn from(err: url::ParseError) -> Self {
        TrendingError::Config(err.to_string())
    }
}

impl From<reqwest::header::InvalidHeaderValue> for TrendingError {
    fn from(err: reqwest::header::InvalidHeaderValue) -> Self {
        TrendingError::Config(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, TrendingError>;

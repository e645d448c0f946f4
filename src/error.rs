//! Error type returned by the search client.

use thiserror::Error;

pub type Result<T, E = SearchError> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum SearchError {
    /// Missing credential or an unusable query. Raised before any request is sent.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A single failed attempt: HTTP error status, connect failure, timeout, etc.
    /// Always retried by the client.
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The retry budget was spent without a successful response.
    #[error("Search service unavailable after {attempts} attempts: {last_error}")]
    RetriesExhausted {
        attempts: usize,
        #[source]
        last_error: Box<SearchError>,
    },

    /// The service answered but the body was not the expected JSON.
    #[error("Failed to decode search response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl SearchError {
    /// Whether the retry loop should try again after this error.
    pub fn is_transient(&self) -> bool {
        matches!(self, SearchError::Transport(_))
    }
}

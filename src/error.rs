//! Error types shared by the collector and the store.

use thiserror::Error;

/// Errors raised while collecting or reading statistics.
#[derive(Debug, Error)]
pub enum StatsError {
    /// The API credential environment variable is not set
    #[error("YouTube API key not found, set the {0} environment variable")]
    MissingCredential(&'static str),

    /// The API returned no item for the requested video
    #[error("could not find video with id {0}")]
    VideoNotFound(String),

    /// Transport failure or undecodable response body
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with a non-success status (quota, bad key, ...)
    #[error("api error: HTTP {status}: {message}")]
    Api { status: u16, message: String },

    /// A counter was present but not an integer
    #[error("invalid {field} value {value:?}")]
    InvalidCounter { field: &'static str, value: String },

    /// Malformed base URL in settings
    #[error("invalid api url: {0}")]
    Url(#[from] url::ParseError),

    /// SQLite read/write failure
    #[error("store error: {0}")]
    Store(#[from] rusqlite::Error),

    /// Blocking store task panicked or was cancelled
    #[error("store task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

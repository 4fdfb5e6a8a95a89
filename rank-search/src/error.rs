//! Error types for the rank-search crate.
//!
//! All errors use stable string messages suitable for display to users
//! and programmatic handling. The API credential never appears in
//! error messages.

/// Errors that can occur while harvesting accounts from the search API.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    /// An HTTP request to the search API failed (transport or status).
    #[error("HTTP error: {0}")]
    Http(String),

    /// The API answered but reported errors instead of data.
    #[error("API error: {0}")]
    Api(String),

    /// Failed to decode the search API response body.
    #[error("parse error: {0}")]
    Parse(String),

    /// Invalid harvest configuration.
    #[error("config error: {0}")]
    Config(String),

    /// A page request kept failing until the retry budget ran out.
    /// Fatal for the whole run.
    #[error("page request failed after {attempts} attempts: {last_error}")]
    RetriesExhausted {
        /// Consecutive failed attempts on the page that gave up.
        attempts: u32,
        /// The failure from the final attempt.
        #[source]
        last_error: Box<SearchError>,
    },
}

/// Convenience type alias for rank-search results.
pub type Result<T> = std::result::Result<T, SearchError>;

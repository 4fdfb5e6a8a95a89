//! Shared HTTP client for search API requests.
//!
//! Provides a configured [`reqwest::Client`] with the configured timeout,
//! a fixed User-Agent (GitHub rejects requests without one) and gzip
//! decompression.

use std::time::Duration;

use crate::config::HarvestConfig;
use crate::error::SearchError;

/// Build a [`reqwest::Client`] configured for the search API.
///
/// # Errors
///
/// Returns [`SearchError::Http`] if the client cannot be constructed.
pub fn build_client(config: &HarvestConfig) -> Result<reqwest::Client, SearchError> {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(config.timeout_seconds))
        .user_agent(config.user_agent.clone())
        .redirect(reqwest::redirect::Policy::limited(5))
        .build()
        .map_err(|e| SearchError::Http(format!("failed to build HTTP client: {e}")))
}

//! Harvest configuration with sensible defaults.
//!
//! [`HarvestConfig`] controls the record cap, page size, pacing and retry
//! behaviour of one search run. The defaults are tuned for GitHub's
//! GraphQL search endpoint, which serves at most 1000 results per query.

use serde::{Deserialize, Serialize};

use crate::error::SearchError;

/// Public GitHub GraphQL endpoint.
pub const DEFAULT_API_URL: &str = "https://api.github.com/graphql";

/// GitHub rejects `first` values above 100.
pub const MAX_PAGE_SIZE: u32 = 100;

/// Configuration for a single harvest run.
///
/// Use [`Default::default()`] for sensible defaults, or construct with
/// field overrides for custom behaviour.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HarvestConfig {
    /// GraphQL endpoint the page requests are POSTed to.
    pub api_url: String,
    /// Hard cap on fetched records. A safety bound, not a business rule.
    pub max_records: usize,
    /// Records requested per page (`first` argument), at most [`MAX_PAGE_SIZE`].
    pub page_size: u32,
    /// Fixed pause between successful page fetches while more pages remain.
    pub page_delay_ms: u64,
    /// Consecutive failures on a page after which the run is aborted.
    pub max_retries: u32,
    /// Backoff base: the n-th consecutive failure waits `base * 2^n`.
    pub backoff_base_ms: u64,
    /// Upper bound on a single backoff wait.
    pub backoff_cap_ms: u64,
    /// Per-request HTTP timeout in seconds.
    pub timeout_seconds: u64,
    /// User-Agent sent with every request. GitHub requires one.
    pub user_agent: String,
}

impl Default for HarvestConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_owned(),
            max_records: 1000,
            page_size: MAX_PAGE_SIZE,
            page_delay_ms: 1000,
            max_retries: 5,
            backoff_base_ms: 1000,
            backoff_cap_ms: 30_000,
            timeout_seconds: 30,
            user_agent: concat!("nepal-rank/", env!("CARGO_PKG_VERSION")).to_owned(),
        }
    }
}

impl HarvestConfig {
    /// Validates this configuration, returning an error if any field is invalid.
    ///
    /// Checks:
    /// - `max_records` must be greater than 0
    /// - `page_size` must be in `1..=100`
    /// - `max_retries` must be greater than 0
    /// - `timeout_seconds` must be greater than 0
    /// - `backoff_base_ms` must be <= `backoff_cap_ms`
    /// - `api_url` must be an absolute http(s) URL
    pub fn validate(&self) -> Result<(), SearchError> {
        if self.max_records == 0 {
            return Err(SearchError::Config(
                "max_records must be greater than 0".into(),
            ));
        }
        if self.page_size == 0 || self.page_size > MAX_PAGE_SIZE {
            return Err(SearchError::Config(format!(
                "page_size must be between 1 and {MAX_PAGE_SIZE}"
            )));
        }
        if self.max_retries == 0 {
            return Err(SearchError::Config(
                "max_retries must be greater than 0".into(),
            ));
        }
        if self.timeout_seconds == 0 {
            return Err(SearchError::Config(
                "timeout_seconds must be greater than 0".into(),
            ));
        }
        if self.backoff_base_ms > self.backoff_cap_ms {
            return Err(SearchError::Config(
                "backoff_base_ms must be <= backoff_cap_ms".into(),
            ));
        }
        let parsed = url::Url::parse(&self.api_url)
            .map_err(|e| SearchError::Config(format!("api_url is not a valid URL: {e}")))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(SearchError::Config(format!(
                "api_url must use http or https, got {}",
                parsed.scheme()
            )));
        }
        Ok(())
    }
}

//! Harvest orchestrator: cursor pagination, dedup, retry with backoff.
//!
//! This module walks the search API page by page, drops usernames it has
//! already seen, retries failed pages with exponential backoff and stops
//! at the configured record cap.

pub mod backoff;
pub mod dedup;
pub mod search;

pub use backoff::{backoff_delay, FetchState, RetryDecision, RetryState};
pub use search::{FetchProgress, SearchClient};

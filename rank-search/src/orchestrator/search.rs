//! Paginated search client: cursor walk, dedup, cap, pacing and retry.
//!
//! One [`SearchClient::fetch_all`] call is one run. All run state (cursor,
//! seen usernames, retry counter, progress) lives on the client and is
//! reset at the start of each run.

use std::time::Duration;

use crate::config::HarvestConfig;
use crate::error::SearchError;
use crate::query::build_query;
use crate::source::PageSource;
use crate::types::{AccountRecord, SearchCriteria};

use super::backoff::{FetchState, RetryDecision, RetryState};
use super::dedup::SeenUsers;

/// Diagnostic counters for the current run. Not part of the data contract.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FetchProgress {
    /// Pages fetched successfully.
    pub pages: u32,
    /// User nodes received, duplicates included.
    pub fetched: usize,
    /// Distinct records kept.
    pub unique: usize,
    /// Failed page requests, recovered or not.
    pub failures: u32,
    /// Consecutive failures on the page currently being fetched.
    pub retry_count: u32,
    pub state: FetchState,
    /// Total matches the API reported on the last page.
    pub reported_total: u64,
}

/// Stateful client for one harvest run against a [`PageSource`].
pub struct SearchClient<S> {
    source: S,
    config: HarvestConfig,
    retry: RetryState,
    seen: SeenUsers,
    progress: FetchProgress,
}

impl<S: PageSource> SearchClient<S> {
    pub fn new(source: S, config: HarvestConfig) -> Self {
        let retry = RetryState::new(
            config.max_retries,
            config.backoff_base_ms,
            config.backoff_cap_ms,
        );
        Self {
            source,
            config,
            retry,
            seen: SeenUsers::new(),
            progress: FetchProgress::default(),
        }
    }

    /// Snapshot of the run's progress counters.
    pub fn progress(&self) -> FetchProgress {
        FetchProgress {
            retry_count: self.retry.retry_count(),
            failures: self.retry.total_failures(),
            state: self.retry.state(),
            ..self.progress
        }
    }

    /// Fetch every account matching `criteria`, up to `max_records`.
    ///
    /// # Pipeline
    ///
    /// 1. Build the query string from `criteria`
    /// 2. Request the page after the current cursor
    /// 3. On failure, back off and retry the same page; give up after
    ///    `max_retries` consecutive failures
    /// 4. On success, keep first-seen usernames, advance the cursor
    /// 5. Pause `page_delay_ms` if another page will be requested
    ///
    /// The result holds at most one record per username, in first-seen
    /// order, and never more than `max_records` records.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::RetriesExhausted`] when a page keeps failing.
    /// That aborts the whole run; nothing fetched so far is returned.
    pub async fn fetch_all(
        &mut self,
        criteria: &SearchCriteria,
    ) -> Result<Vec<AccountRecord>, SearchError> {
        self.reset();

        let query = build_query(criteria);
        let cap = self.config.max_records;
        tracing::debug!(%query, source = self.source.name(), cap, "starting user search");

        let mut records: Vec<AccountRecord> = Vec::new();
        let mut cursor: Option<String> = None;
        let mut has_next_page = true;

        while has_next_page && self.under_cap(records.len()) {
            self.retry.begin_attempt();
            let outcome = self
                .source
                .fetch_page(&query, cursor.as_deref(), self.config.page_size)
                .await;

            let page = match outcome {
                Ok(page) => page,
                Err(err) => match self.retry.record_failure() {
                    RetryDecision::GiveUp { attempts } => {
                        tracing::error!(attempts, error = %err, "giving up on page request");
                        return Err(SearchError::RetriesExhausted {
                            attempts,
                            last_error: Box::new(err),
                        });
                    }
                    RetryDecision::Wait(wait) => {
                        tracing::warn!(
                            attempt = self.retry.retry_count(),
                            max = self.config.max_retries,
                            wait_ms = wait.as_millis() as u64,
                            error = %err,
                            "page request failed, retrying"
                        );
                        tokio::time::sleep(wait).await;
                        continue;
                    }
                },
            };

            self.retry.record_success();
            self.progress.pages += 1;
            self.progress.fetched += page.nodes.len();
            self.progress.reported_total = page.total_count;

            for node in page.nodes {
                if records.len() >= cap {
                    break;
                }
                if !self.seen.insert(&node.login) {
                    tracing::trace!(login = %node.login, "skipping duplicate user");
                    continue;
                }
                records.push(AccountRecord::from_node(node));
            }
            self.progress.unique = records.len();

            has_next_page = page.has_next_page;
            cursor = page.end_cursor;
            if has_next_page && cursor.is_none() {
                tracing::warn!("API reported another page without a cursor, stopping");
                has_next_page = false;
            }

            tracing::info!(
                fetched = self.progress.fetched,
                unique = records.len(),
                page = self.progress.pages,
                "fetched users so far"
            );

            if has_next_page && self.under_cap(records.len()) {
                tokio::time::sleep(Duration::from_millis(self.config.page_delay_ms)).await;
            }
        }

        tracing::info!(total = records.len(), "search complete");
        Ok(records)
    }

    fn under_cap(&self, kept: usize) -> bool {
        let cap = self.config.max_records;
        self.progress.fetched < cap && kept < cap
    }

    fn reset(&mut self) {
        self.retry = RetryState::new(
            self.config.max_retries,
            self.config.backoff_base_ms,
            self.config.backoff_cap_ms,
        );
        self.seen = SeenUsers::new();
        self.progress = FetchProgress::default();
    }
}

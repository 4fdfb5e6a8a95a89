//! # rank-search
//!
//! Harvests GitHub user profiles and contribution statistics for a
//! location-bounded search.
//!
//! ## Design
//!
//! - One cursor-paginated GraphQL search per run, pages requested sequentially
//! - Users deduplicated by login, first occurrence wins
//! - Hard cap on fetched records
//! - Fixed pause between pages; exponential backoff on failed pages
//! - A page that keeps failing aborts the run
//!
//! ## Security
//!
//! - The API token is only ever sent as a bearer header
//! - The token never appears in logs or error messages
//! - The search query is logged at debug level only

pub mod config;
pub mod error;
pub mod http;
pub mod orchestrator;
pub mod query;
pub mod source;
pub mod sources;
pub mod types;

pub use config::HarvestConfig;
pub use error::{Result, SearchError};
pub use orchestrator::{FetchProgress, SearchClient};
pub use source::PageSource;
pub use sources::GitHubGraphQl;
pub use types::{AccountRecord, SearchCriteria, SearchPage, UserNode};

/// Harvest every GitHub user matching `criteria`.
///
/// Builds a [`GitHubGraphQl`] source authenticated with `token` and runs
/// one [`SearchClient::fetch_all`] pass over it.
///
/// # Errors
///
/// Returns [`SearchError::Config`] if `config` is invalid or the token is
/// blank, and [`SearchError::RetriesExhausted`] if a page keeps failing.
///
/// # Examples
///
/// ```no_run
/// # async fn example() -> rank_search::Result<()> {
/// let config = rank_search::HarvestConfig::default();
/// let criteria = rank_search::SearchCriteria::default();
/// let users = rank_search::harvest(&criteria, &config, "ghp_token").await?;
/// for user in &users {
///     println!("{}: {} commits", user.username, user.commit_count);
/// }
/// # Ok(())
/// # }
/// ```
pub async fn harvest(
    criteria: &SearchCriteria,
    config: &HarvestConfig,
    token: &str,
) -> Result<Vec<AccountRecord>> {
    config.validate()?;
    let source = GitHubGraphQl::new(config, token)?;
    SearchClient::new(source, config.clone())
        .fetch_all(criteria)
        .await
}

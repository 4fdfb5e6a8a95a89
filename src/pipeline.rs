//! One ranking run: credential check → harvest → rank → publish.
//!
//! Any failure aborts the remaining steps. Run metadata is the last
//! artifact written, so a run that fails part-way never leaves a
//! `metadata.json` describing it.

use chrono::Utc;
use rank_search::{FetchProgress, GitHubGraphQl, PageSource, SearchClient};

use crate::artifacts::{ArtifactReport, ArtifactWriter, RunMetadata};
use crate::config::{RankConfig, TOKEN_ENV};
use crate::error::{RankError, Result};
use crate::ranking::{self, RankedRecord};

/// How a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// The search matched nobody. Nothing was written.
    NoResults,
    /// Artifacts for every ranked account were written.
    Published,
}

/// What a run reports back to its caller.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub outcome: RunOutcome,
    pub total_users: usize,
    /// The first `summary_size` entries of the ranking.
    pub top: Vec<RankedRecord>,
    /// `None` when nothing was written.
    pub report: Option<ArtifactReport>,
    pub progress: FetchProgress,
}

/// Run the pipeline against the GitHub GraphQL API.
///
/// # Errors
///
/// Returns [`RankError::Config`] without touching the network if `token`
/// is missing or blank or the configuration is invalid. Failing to build
/// the HTTP client, harvest failures and write failures are returned as-is.
pub async fn run(config: &RankConfig, token: Option<&str>) -> Result<RunSummary> {
    let token = match token.map(str::trim) {
        Some(t) if !t.is_empty() => t,
        _ => {
            return Err(RankError::Config(format!(
                "{TOKEN_ENV} environment variable is required"
            )));
        }
    };
    config.validate()?;

    let source = GitHubGraphQl::new(&config.harvest, token)?;
    execute(config, source).await
}

/// Run the pipeline against any page source.
pub async fn run_with_source<S: PageSource>(config: &RankConfig, source: S) -> Result<RunSummary> {
    config.validate()?;
    execute(config, source).await
}

/// Harvest, rank and publish with an already validated config.
async fn execute<S: PageSource>(config: &RankConfig, source: S) -> Result<RunSummary> {
    let mut client = SearchClient::new(source, config.harvest.clone());
    let records = client.fetch_all(&config.criteria).await?;
    let progress = client.progress();

    if records.is_empty() {
        tracing::info!("no users found matching criteria");
        return Ok(RunSummary {
            outcome: RunOutcome::NoResults,
            total_users: 0,
            top: Vec::new(),
            report: None,
            progress,
        });
    }

    let ranked = ranking::rank(&records);
    let top = ranking::top(&ranked, config.summary_size).to_vec();

    let metadata = RunMetadata {
        generated_at: Utc::now(),
        total_users: ranked.len(),
        locations: config.criteria.locations.clone(),
        min_followers: config.criteria.min_followers,
    };
    let report = ArtifactWriter::new(&config.output_dir)
        .with_badge_label(config.badge_label.clone())
        .write_all(&ranked, &metadata)?;

    Ok(RunSummary {
        outcome: RunOutcome::Published,
        total_users: ranked.len(),
        top,
        report: Some(report),
        progress,
    })
}

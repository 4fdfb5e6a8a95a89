//! CLI binary for nepal-rank.
//!
//! Reads the API token from `GITHUB_TOKEN`, runs one ranking pass and
//! exits non-zero with a diagnostic if the run fails. All logging goes
//! to stderr.

use std::path::PathBuf;

use clap::Parser;
use nepal_rank::config::{TOKEN_ENV, preset_locations};
use nepal_rank::{RankConfig, RunOutcome, RunSummary};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Rank GitHub users from Nepal and publish JSON rankings and badges.
#[derive(Parser)]
#[command(name = "nepal-rank", version, about)]
struct Cli {
    /// Path to TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// GitHub API token.
    #[arg(long, env = TOKEN_ENV, hide_env_values = true)]
    token: Option<String>,

    /// Directory the `data/` and `badges/` trees are written under.
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Maximum number of users to consider.
    #[arg(long)]
    consider: Option<usize>,

    /// Number of top users to show in the summary.
    #[arg(long)]
    amount: Option<usize>,

    /// Location to search (repeatable). Replaces the configured locations.
    #[arg(short, long = "location")]
    locations: Vec<String>,

    /// Named location preset, e.g. `nepal` for the country and its cities.
    #[arg(long, conflicts_with = "locations")]
    preset: Option<String>,

    /// Location to exclude (repeatable).
    #[arg(long = "exclude-location")]
    exclude_locations: Vec<String>,

    /// Only consider users with at least this many followers.
    #[arg(long)]
    min_followers: Option<u32>,
}

impl Cli {
    /// Load the config file (or defaults) and apply flag overrides.
    fn into_config(self) -> anyhow::Result<(RankConfig, Option<String>)> {
        let mut config = match self.config {
            Some(ref path) => RankConfig::from_file(path)?,
            None => RankConfig::default(),
        };

        if let Some(dir) = self.output_dir {
            config.output_dir = dir;
        }
        if let Some(consider) = self.consider {
            config.harvest.max_records = consider;
        }
        if let Some(amount) = self.amount {
            config.summary_size = amount;
        }
        if let Some(name) = self.preset {
            config.criteria.locations = preset_locations(&name)
                .ok_or_else(|| anyhow::anyhow!("unknown location preset: {name}"))?;
        } else if !self.locations.is_empty() {
            config.criteria.locations = self.locations;
        }
        if !self.exclude_locations.is_empty() {
            config.criteria.exclude_locations = self.exclude_locations;
        }
        if let Some(min) = self.min_followers {
            config.criteria.min_followers = min;
        }

        Ok((config, self.token))
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("nepal_rank=info,rank_search=info")),
        )
        .init();

    let (config, token) = Cli::parse().into_config()?;

    info!(locations = ?config.criteria.locations, "starting GitHub user ranking");
    let summary = nepal_rank::pipeline::run(&config, token.as_deref())
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "ranking run failed");
            anyhow::anyhow!("nepal-rank failed: {e}")
        })?;

    report(&summary);
    Ok(())
}

fn report(summary: &RunSummary) {
    match summary.outcome {
        RunOutcome::NoResults => info!("no users found matching criteria, nothing written"),
        RunOutcome::Published => {
            info!(total = summary.total_users, "top {} users:", summary.top.len());
            for entry in &summary.top {
                info!(
                    "  #{}: {} ({} commits)",
                    entry.rank, entry.record.username, entry.record.commit_count
                );
            }
            if let Some(ref report) = summary.report {
                info!(
                    accounts = report.accounts,
                    rankings = %report.rankings.display(),
                    "generation complete"
                );
            }
        }
    }
}

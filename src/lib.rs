//! nepal-rank: ranks GitHub users from Nepal by contribution activity.
//!
//! One run harvests matching users through [`rank_search`], ranks them and
//! publishes static JSON for the rankings web page:
//! GitHub search → dedup → rank → `data/` + `badges/`
//!
//! # Architecture
//!
//! - **Harvest**: cursor-paginated GraphQL search with retry (`rank-search` crate)
//! - **Ranking**: stable sort on commits, contributions, followers
//! - **Artifacts**: rankings, per-user detail, Shields.io badges, run metadata
//! - **Pipeline**: sequences the above and reports a [`RunSummary`]

pub mod artifacts;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod ranking;

pub use artifacts::{ArtifactReport, ArtifactWriter, BadgeTier, RunMetadata};
pub use config::RankConfig;
pub use error::{RankError, Result};
pub use pipeline::{RunOutcome, RunSummary};
pub use ranking::{RankedRecord, rank};

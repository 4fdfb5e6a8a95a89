//! Deterministic ranking of harvested accounts.
//!
//! Sort key, highest first: commits, then total contributions, then
//! followers. Ties on all three keep their input order (stable sort), and
//! every account gets its own rank: `1..=N`, no gaps, no shared ranks.

use std::cmp::Reverse;

use rank_search::AccountRecord;
use serde::{Deserialize, Serialize};

/// An account with its position in the ranking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankedRecord {
    /// 1-based rank.
    pub rank: u32,
    pub record: AccountRecord,
}

/// Rank `records` without modifying them.
pub fn rank(records: &[AccountRecord]) -> Vec<RankedRecord> {
    let mut sorted: Vec<&AccountRecord> = records.iter().collect();
    // `sort_by_key` is stable.
    sorted.sort_by_key(|r| {
        Reverse((
            r.commit_count,
            r.total_contribution_count,
            r.follower_count,
        ))
    });

    sorted
        .into_iter()
        .zip(1u32..)
        .map(|(record, rank)| RankedRecord {
            rank,
            record: record.clone(),
        })
        .collect()
}

/// The first `n` entries of a ranking.
pub fn top(ranked: &[RankedRecord], n: usize) -> &[RankedRecord] {
    &ranked[..n.min(ranked.len())]
}

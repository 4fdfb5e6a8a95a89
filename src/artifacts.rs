//! Static JSON artifacts for the presentation layer.
//!
//! Layout under the output root:
//!
//! ```text
//! data/rankings.json          every account, rank ascending
//! data/users/<username>.json  one detail document per account
//! badges/<username>.json      one Shields.io endpoint document per account
//! data/metadata.json          run metadata, written last
//! ```
//!
//! Writes are fail-fast with no rollback: files written before an error
//! stay on disk. Metadata is only written once every per-account file
//! succeeded, so its presence marks a complete run.

use std::path::{Path, PathBuf};

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Serialize, Serializer};

use crate::error::{RankError, Result};
use crate::ranking::RankedRecord;

/// Entry in `data/rankings.json`. Field names are what the web page reads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RankingEntry<'a> {
    pub rank: u32,
    pub username: &'a str,
    pub name: &'a str,
    pub avatar_url: &'a str,
    pub commits: u64,
    pub public_contributions: i64,
    pub all_contributions: u64,
    pub followers: u64,
}

impl<'a> From<&'a RankedRecord> for RankingEntry<'a> {
    fn from(ranked: &'a RankedRecord) -> Self {
        let r = &ranked.record;
        Self {
            rank: ranked.rank,
            username: &r.username,
            name: &r.display_name,
            avatar_url: &r.avatar_url,
            commits: r.commit_count,
            public_contributions: r.public_contribution_count,
            all_contributions: r.total_contribution_count,
            followers: r.follower_count,
        }
    }
}

/// `data/users/<username>.json`: the ranking entry plus organizations.
#[derive(Debug, Clone, Serialize)]
pub struct UserDocument<'a> {
    #[serde(flatten)]
    pub entry: RankingEntry<'a>,
    pub organizations: &'a [String],
}

/// Badge colour by rank bracket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BadgeTier {
    /// Top 10.
    BrightGreen,
    /// 11 to 50.
    Green,
    /// 51 to 100.
    Blue,
    /// Everyone else.
    LightGrey,
}

impl BadgeTier {
    pub fn for_rank(rank: u32) -> Self {
        match rank {
            0..=10 => Self::BrightGreen,
            11..=50 => Self::Green,
            51..=100 => Self::Blue,
            _ => Self::LightGrey,
        }
    }
}

/// `badges/<username>.json`, in Shields.io's endpoint schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BadgeDocument<'a> {
    pub schema_version: u8,
    pub label: &'a str,
    pub message: String,
    pub color: BadgeTier,
}

impl<'a> BadgeDocument<'a> {
    pub fn new(label: &'a str, rank: u32) -> Self {
        Self {
            schema_version: 1,
            label,
            message: format!("#{rank}"),
            color: BadgeTier::for_rank(rank),
        }
    }
}

/// Describes one completed run. `data/metadata.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunMetadata {
    #[serde(serialize_with = "iso_millis")]
    pub generated_at: DateTime<Utc>,
    pub total_users: usize,
    pub locations: Vec<String>,
    pub min_followers: u32,
}

fn iso_millis<S: Serializer>(at: &DateTime<Utc>, s: S) -> std::result::Result<S::Ok, S::Error> {
    s.serialize_str(&at.to_rfc3339_opts(SecondsFormat::Millis, true))
}

/// What a successful [`ArtifactWriter::write_all`] produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactReport {
    pub rankings: PathBuf,
    pub metadata: PathBuf,
    /// Accounts with both a detail and a badge document.
    pub accounts: usize,
}

/// Writes the artifact tree under one output root.
#[derive(Debug, Clone)]
pub struct ArtifactWriter {
    root: PathBuf,
    badge_label: String,
}

impl ArtifactWriter {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            badge_label: "Nepal Rank".to_owned(),
        }
    }

    pub fn with_badge_label(mut self, label: impl Into<String>) -> Self {
        self.badge_label = label.into();
        self
    }

    pub fn data_dir(&self) -> PathBuf {
        self.root.join("data")
    }

    pub fn users_dir(&self) -> PathBuf {
        self.data_dir().join("users")
    }

    pub fn badges_dir(&self) -> PathBuf {
        self.root.join("badges")
    }

    /// Create `data/`, `data/users/` and `badges/`. Existing directories are fine.
    pub fn prepare_dirs(&self) -> Result<()> {
        for dir in [self.data_dir(), self.users_dir(), self.badges_dir()] {
            std::fs::create_dir_all(&dir).map_err(|e| RankError::Write {
                path: dir.clone(),
                message: format!("failed to create directory: {e}"),
            })?;
        }
        Ok(())
    }

    pub fn write_rankings(&self, ranked: &[RankedRecord]) -> Result<PathBuf> {
        let entries: Vec<RankingEntry<'_>> = ranked.iter().map(RankingEntry::from).collect();
        let path = self.data_dir().join("rankings.json");
        write_json(&path, &entries)?;
        Ok(path)
    }

    /// Write the detail and badge documents for one account.
    pub fn write_account(&self, ranked: &RankedRecord) -> Result<()> {
        let file_name = account_file_name(&ranked.record.username)?;

        let detail = UserDocument {
            entry: RankingEntry::from(ranked),
            organizations: &ranked.record.organizations,
        };
        write_json(&self.users_dir().join(&file_name), &detail)?;

        let badge = BadgeDocument::new(&self.badge_label, ranked.rank);
        write_json(&self.badges_dir().join(&file_name), &badge)
    }

    pub fn write_metadata(&self, metadata: &RunMetadata) -> Result<PathBuf> {
        let path = self.data_dir().join("metadata.json");
        write_json(&path, metadata)?;
        Ok(path)
    }

    /// Write every artifact, metadata last. Stops at the first failure.
    pub fn write_all(
        &self,
        ranked: &[RankedRecord],
        metadata: &RunMetadata,
    ) -> Result<ArtifactReport> {
        self.prepare_dirs()?;

        let rankings = self.write_rankings(ranked)?;
        tracing::info!(path = %rankings.display(), "wrote rankings");

        for entry in ranked {
            self.write_account(entry)?;
        }
        tracing::info!(count = ranked.len(), "wrote user and badge files");

        let metadata = self.write_metadata(metadata)?;
        tracing::info!(path = %metadata.display(), "wrote metadata");

        Ok(ArtifactReport {
            rankings,
            metadata,
            accounts: ranked.len(),
        })
    }
}

/// `<username>.json`, refusing names that would escape the target directory.
fn account_file_name(username: &str) -> Result<String> {
    let unsafe_name = username.is_empty()
        || username.starts_with('.')
        || username.contains(['/', '\\', '\0']);
    if unsafe_name {
        return Err(RankError::Write {
            path: PathBuf::from(username),
            message: "username is not a safe file name".into(),
        });
    }
    Ok(format!("{username}.json"))
}

fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).map_err(|e| RankError::Write {
        path: path.to_path_buf(),
        message: format!("failed to serialize: {e}"),
    })?;
    std::fs::write(path, json).map_err(|e| RankError::Write {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ranking::rank;
    use rank_search::AccountRecord;
    use serde_json::Value;

    fn record(username: &str, commits: u64) -> AccountRecord {
        AccountRecord {
            username: username.to_owned(),
            display_name: format!("{username} name"),
            avatar_url: format!("https://avatars.example/{username}"),
            follower_count: 4,
            commit_count: commits,
            public_contribution_count: -2,
            total_contribution_count: commits * 3,
            organizations: vec!["acme".into(), "acme".into()],
        }
    }

    fn metadata(total: usize) -> RunMetadata {
        RunMetadata {
            generated_at: DateTime::parse_from_rfc3339("2026-10-16T08:30:00Z")
                .expect("timestamp")
                .with_timezone(&Utc),
            total_users: total,
            locations: vec!["Nepal".into()],
            min_followers: 0,
        }
    }

    fn read(path: &Path) -> Value {
        let text = std::fs::read_to_string(path).expect("read");
        serde_json::from_str(&text).expect("json")
    }

    #[test]
    fn tiers_follow_rank_brackets() {
        let tiers: Vec<BadgeTier> = [1, 10, 11, 50, 51, 100, 101]
            .into_iter()
            .map(BadgeTier::for_rank)
            .collect();
        assert_eq!(
            tiers,
            vec![
                BadgeTier::BrightGreen,
                BadgeTier::BrightGreen,
                BadgeTier::Green,
                BadgeTier::Green,
                BadgeTier::Blue,
                BadgeTier::Blue,
                BadgeTier::LightGrey,
            ]
        );
        let distinct: std::collections::HashSet<_> = tiers.into_iter().collect();
        assert_eq!(distinct.len(), 4);
    }

    #[test]
    fn badge_document_shape() {
        let badge = serde_json::to_value(BadgeDocument::new("Nepal Rank", 42)).expect("json");
        assert_eq!(
            badge,
            serde_json::json!({
                "schemaVersion": 1,
                "label": "Nepal Rank",
                "message": "#42",
                "color": "green"
            })
        );
    }

    #[test]
    fn metadata_timestamp_is_iso_8601() {
        let value = serde_json::to_value(metadata(3)).expect("json");
        assert_eq!(value["generatedAt"], "2026-10-16T08:30:00.000Z");
        assert_eq!(value["totalUsers"], 3);
        assert_eq!(value["minFollowers"], 0);
        assert_eq!(value["locations"][0], "Nepal");
    }

    #[test]
    fn write_all_produces_full_tree() {
        let dir = tempfile::tempdir().expect("tempdir");
        let ranked = rank(&[record("ram", 3), record("sita", 9)]);
        let writer = ArtifactWriter::new(dir.path());

        let report = writer.write_all(&ranked, &metadata(2)).expect("write");
        assert_eq!(report.accounts, 2);

        let rankings = read(&report.rankings);
        let entries = rankings.as_array().expect("array");
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0]["username"], "sita");
        assert_eq!(entries[0]["rank"], 1);
        assert_eq!(entries[0]["name"], "sita name");
        assert_eq!(entries[0]["commits"], 9);
        assert_eq!(entries[0]["allContributions"], 27);
        assert_eq!(entries[0]["publicContributions"], -2);
        assert_eq!(entries[0]["followers"], 4);
        assert!(entries[0].get("organizations").is_none());

        let detail = read(&dir.path().join("data/users/ram.json"));
        assert_eq!(detail["rank"], 2);
        assert_eq!(detail["avatarUrl"], "https://avatars.example/ram");
        assert_eq!(detail["organizations"], serde_json::json!(["acme", "acme"]));

        let badge = read(&dir.path().join("badges/ram.json"));
        assert_eq!(badge["message"], "#2");
        assert_eq!(badge["color"], "brightgreen");

        let meta = read(&report.metadata);
        assert_eq!(meta["totalUsers"], 2);
    }

    #[test]
    fn output_is_pretty_printed() {
        let dir = tempfile::tempdir().expect("tempdir");
        let writer = ArtifactWriter::new(dir.path());
        writer.prepare_dirs().expect("dirs");
        let path = writer.write_metadata(&metadata(0)).expect("write");
        let text = std::fs::read_to_string(path).expect("read");
        assert!(text.contains("\n  \"generatedAt\""));
    }

    #[test]
    fn prepare_dirs_is_idempotent() {
        let dir = tempfile::tempdir().expect("tempdir");
        let writer = ArtifactWriter::new(dir.path());
        writer.prepare_dirs().expect("first");
        writer.prepare_dirs().expect("second");
        assert!(writer.users_dir().is_dir());
        assert!(writer.badges_dir().is_dir());
    }

    #[test]
    fn custom_badge_label_used() {
        let dir = tempfile::tempdir().expect("tempdir");
        let writer = ArtifactWriter::new(dir.path()).with_badge_label("Kathmandu Rank");
        writer.prepare_dirs().expect("dirs");
        let ranked = rank(&[record("hari", 1)]);
        writer.write_account(&ranked[0]).expect("write");
        let badge = read(&dir.path().join("badges/hari.json"));
        assert_eq!(badge["label"], "Kathmandu Rank");
    }

    #[test]
    fn unsafe_username_fails_fast_and_skips_metadata() {
        let dir = tempfile::tempdir().expect("tempdir");
        let ranked = rank(&[record("good", 5), record("../evil", 1)]);
        let writer = ArtifactWriter::new(dir.path());

        let err = writer.write_all(&ranked, &metadata(2)).unwrap_err();
        assert!(matches!(err, RankError::Write { .. }));

        // Files written before the failure stay; metadata never appears.
        assert!(dir.path().join("data/rankings.json").exists());
        assert!(dir.path().join("data/users/good.json").exists());
        assert!(!dir.path().join("data/metadata.json").exists());
    }

    #[test]
    fn unwritable_root_is_write_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let blocker = dir.path().join("occupied");
        std::fs::write(&blocker, "not a directory").expect("write");

        let err = ArtifactWriter::new(&blocker).prepare_dirs().unwrap_err();
        match err {
            RankError::Write { path, .. } => assert!(path.starts_with(&blocker)),
            other => panic!("expected Write error, got {other:?}"),
        }
    }
}

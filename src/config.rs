//! Configuration types for a ranking run.

use std::path::{Path, PathBuf};

use rank_search::{HarvestConfig, SearchCriteria};
use serde::{Deserialize, Serialize};

use crate::error::{RankError, Result};

/// Environment variable the API token is read from.
pub const TOKEN_ENV: &str = "GITHUB_TOKEN";

/// Top-level configuration for one ranking run.
///
/// The API token is deliberately not part of this struct so it can never
/// end up in a config file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RankConfig {
    /// Root directory the `data/` and `badges/` trees are written under.
    pub output_dir: PathBuf,
    /// How many top-ranked accounts the run summary carries.
    pub summary_size: usize,
    /// Label shown on the left half of every badge.
    pub badge_label: String,
    /// What to search for.
    pub criteria: SearchCriteria,
    /// Paging, pacing and retry settings.
    pub harvest: HarvestConfig,
}

impl Default for RankConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("."),
            summary_size: 5,
            badge_label: "Nepal Rank".to_owned(),
            criteria: SearchCriteria::default(),
            harvest: HarvestConfig::default(),
        }
    }
}

impl RankConfig {
    /// Load configuration from a TOML file, falling back to defaults for missing fields.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content)
            .map_err(|e| RankError::Config(format!("{}: {e}", path.display())))
    }

    /// Validates the run configuration, including the harvest settings.
    pub fn validate(&self) -> Result<()> {
        if self.badge_label.trim().is_empty() {
            return Err(RankError::Config("badge_label must not be empty".into()));
        }
        self.harvest
            .validate()
            .map_err(|e| RankError::Config(e.to_string()))
    }
}

/// Named location presets.
///
/// `nepal` covers the country name plus the largest cities, since many
/// profiles only list a city.
pub fn preset_locations(name: &str) -> Option<Vec<String>> {
    let locations: &[&str] = match name.to_ascii_lowercase().as_str() {
        "nepal" => &[
            "nepal",
            "kathmandu",
            "pokhara",
            "lalitpur",
            "bharatpur",
            "birgunj",
            "biratnagar",
            "janakpur",
            "ghorahi",
        ],
        _ => return None,
    };
    Some(locations.iter().map(|s| (*s).to_owned()).collect())
}

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use serde_json::Value;

use crate::events::MatchId;

pub const DEFAULT_DATA_DIR: &str = "data/statsbomb_open_data";
pub const RAW_BASE_URL: &str = "https://raw.githubusercontent.com/statsbomb/open-data/master/data";

/// Directory layout of a local StatsBomb open-data mirror.
#[derive(Debug, Clone)]
pub struct OpenDataLayout {
    root: PathBuf,
}

impl OpenDataLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn competitions_path(&self) -> PathBuf {
        self.root.join("competitions.json")
    }

    pub fn matches_path(&self, competition_id: u32, season_id: u32) -> PathBuf {
        self.root
            .join("matches")
            .join(format!("{competition_id}_{season_id}.json"))
    }

    pub fn events_dir(&self) -> PathBuf {
        self.root.join("events")
    }

    pub fn events_path(&self, match_id: MatchId) -> PathBuf {
        self.events_dir().join(format!("{match_id}.json"))
    }

    pub fn lineups_path(&self, match_id: MatchId) -> PathBuf {
        self.root.join("lineups").join(format!("{match_id}.json"))
    }
}

pub fn competitions_url() -> String {
    format!("{RAW_BASE_URL}/competitions.json")
}

pub fn matches_url(competition_id: u32, season_id: u32) -> String {
    format!("{RAW_BASE_URL}/matches/{competition_id}/{season_id}.json")
}

pub fn events_url(match_id: MatchId) -> String {
    format!("{RAW_BASE_URL}/events/{match_id}.json")
}

pub fn lineups_url(match_id: MatchId) -> String {
    format!("{RAW_BASE_URL}/lineups/{match_id}.json")
}

pub fn load_match_ids(path: &Path) -> Result<Vec<MatchId>> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("read matches file {}", path.display()))?;
    parse_match_ids_json(&raw).with_context(|| format!("parse matches file {}", path.display()))
}

/// `match_id` of every entry, in file order. Entries without a numeric id are
/// skipped.
pub fn parse_match_ids_json(raw: &str) -> Result<Vec<MatchId>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Ok(Vec::new());
    }
    let root: Value = serde_json::from_str(trimmed).context("invalid matches json")?;
    let Some(entries) = root.as_array() else {
        return Err(anyhow!("matches json is not an array"));
    };
    Ok(entries
        .iter()
        .filter_map(|m| m.get("match_id").and_then(Value::as_u64))
        .collect())
}

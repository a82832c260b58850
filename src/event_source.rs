use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::events::{MatchEvents, MatchId, parse_match_events_json};
use crate::open_data::OpenDataLayout;

/// Supplies one match's decoded events. `Ok(None)` means the match has no
/// event file, which callers treat as "no events" rather than a failure.
pub trait EventSource: Sync {
    fn fetch_events(&self, match_id: MatchId) -> Result<Option<MatchEvents>>;
}

/// Reads `<dir>/<match_id>.json` files from a local open-data mirror.
#[derive(Debug, Clone)]
pub struct DirEventSource {
    dir: PathBuf,
}

impl DirEventSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn from_layout(layout: &OpenDataLayout) -> Self {
        Self::new(layout.events_dir())
    }
}

impl EventSource for DirEventSource {
    fn fetch_events(&self, match_id: MatchId) -> Result<Option<MatchEvents>> {
        let path = self.dir.join(format!("{match_id}.json"));
        let raw = match fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) => {
                return Err(err).with_context(|| format!("read events {}", path.display()));
            }
        };
        parse_match_events_json(&raw)
            .with_context(|| format!("parse events {}", path.display()))
            .map(Some)
    }
}

/// Raw event JSON held in memory, keyed by match id.
#[derive(Debug, Clone, Default)]
pub struct MemoryEventSource {
    matches: HashMap<MatchId, String>,
}

impl MemoryEventSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, match_id: MatchId, raw_json: impl Into<String>) {
        self.matches.insert(match_id, raw_json.into());
    }

    pub fn with_match(mut self, match_id: MatchId, raw_json: impl Into<String>) -> Self {
        self.insert(match_id, raw_json);
        self
    }
}

impl EventSource for MemoryEventSource {
    fn fetch_events(&self, match_id: MatchId) -> Result<Option<MatchEvents>> {
        let Some(raw) = self.matches.get(&match_id) else {
            return Ok(None);
        };
        parse_match_events_json(raw)
            .with_context(|| format!("parse events for match {match_id}"))
            .map(Some)
    }
}

use std::collections::HashSet;

use unicode_normalization::UnicodeNormalization;

use crate::season::TeamSeasonRow;

pub const DEFAULT_TARGET_TEAMS: &[&str] = &[
    "Barcelona",
    "Real Madrid",
    "Atletico Madrid",
    "Manchester City",
    "Bayern Munich",
    "Paris S-G",
];

/// Matching key for a team name: NFKD-decomposed with every non-ASCII code
/// point dropped, so "Atlético Madrid" and "Atletico Madrid" compare equal.
pub fn normalize_name(name: Option<&str>) -> String {
    let Some(name) = name else {
        return String::new();
    };
    name.nfkd().filter(char::is_ascii).collect()
}

/// Allow-list of teams, compared by normalized name.
#[derive(Debug, Clone, Default)]
pub struct TargetTeams {
    keys: HashSet<String>,
}

impl TargetTeams {
    pub fn new<S: AsRef<str>>(names: impl IntoIterator<Item = S>) -> Self {
        let keys = names
            .into_iter()
            .map(|n| normalize_name(Some(n.as_ref().trim())))
            .filter(|k| !k.is_empty())
            .collect();
        Self { keys }
    }

    pub fn defaults() -> Self {
        Self::new(DEFAULT_TARGET_TEAMS.iter().copied())
    }

    /// Parses a `,`/`;` separated list, e.g. from an environment variable.
    pub fn parse_list(raw: &str) -> Self {
        Self::new(raw.split([',', ';']))
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn contains_key(&self, normalized: &str) -> bool {
        self.keys.contains(normalized)
    }

    pub fn matches(&self, row: &TeamSeasonRow) -> bool {
        self.contains_key(&row.team_normalized)
    }
}

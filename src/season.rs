use std::collections::BTreeMap;

use serde::Serialize;
use tracing::warn;

use crate::events::MatchId;
use crate::match_stats::{MatchSummary, MatchTeamStats};
use crate::metrics::TeamMetrics;
use crate::team_names::normalize_name;

/// What one match contributed to a team's season totals. Kept per match so
/// a match seen by two partial tables is only counted once when they merge.
#[derive(Debug, Clone, Default, PartialEq)]
struct MatchContribution {
    stats: MatchTeamStats,
    possession_share: Option<f64>,
}

/// Running season totals for one team, keyed by its display name in
/// [`SeasonTable`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TeamSeasonTotals {
    pub stats: MatchTeamStats,
    pub possession_share_sum: f64,
    pub possession_share_samples: u32,
    contributions: BTreeMap<MatchId, MatchContribution>,
}

impl TeamSeasonTotals {
    pub fn matches_played(&self) -> u32 {
        self.contributions.len() as u32
    }

    /// Match ids folded for this team, ascending.
    pub fn match_ids(&self) -> impl Iterator<Item = MatchId> + '_ {
        self.contributions.keys().copied()
    }

    /// Mean of the per-match samples; NaN when no match had a usable duration.
    pub fn possession_share(&self) -> f64 {
        crate::metrics::ratio(
            self.possession_share_sum,
            f64::from(self.possession_share_samples),
        )
    }

    /// Adds one match; returns `false` and leaves the totals untouched when
    /// the match is already folded.
    fn add(&mut self, match_id: MatchId, contribution: MatchContribution) -> bool {
        if self.contributions.contains_key(&match_id) {
            return false;
        }
        self.stats.absorb(&contribution.stats);
        if let Some(share) = contribution.possession_share {
            self.possession_share_sum += share;
            self.possession_share_samples += 1;
        }
        self.contributions.insert(match_id, contribution);
        true
    }

    fn merge(&mut self, team: &str, other: TeamSeasonTotals) {
        let mut overlap = 0usize;
        for (match_id, contribution) in other.contributions {
            if !self.add(match_id, contribution) {
                overlap += 1;
            }
        }
        if overlap > 0 {
            warn!(team, overlap, "matches already folded for team; ignoring");
        }
    }
}

/// Per-team season fold. Merging is associative and commutative, so partial
/// tables built on separate threads can be combined in any order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SeasonTable {
    teams: BTreeMap<String, TeamSeasonTotals>,
}

impl SeasonTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_matches<'a>(summaries: impl IntoIterator<Item = &'a MatchSummary>) -> Self {
        let mut table = Self::new();
        for summary in summaries {
            table.add_match(summary);
        }
        table
    }

    pub fn add_match(&mut self, summary: &MatchSummary) {
        for record in &summary.teams {
            let totals = self.teams.entry(record.team.clone()).or_default();
            let contribution = MatchContribution {
                stats: record.stats.clone(),
                possession_share: record.possession_share,
            };
            if !totals.add(summary.match_id, contribution) {
                warn!(
                    match_id = summary.match_id,
                    team = %record.team,
                    "match already folded for team; ignoring"
                );
            }
        }
    }

    pub fn merge(mut self, other: SeasonTable) -> SeasonTable {
        for (team, totals) in other.teams {
            match self.teams.get_mut(&team) {
                Some(existing) => existing.merge(&team, totals),
                None => {
                    self.teams.insert(team, totals);
                }
            }
        }
        self
    }

    pub fn get(&self, team: &str) -> Option<&TeamSeasonTotals> {
        self.teams.get(team)
    }

    pub fn len(&self) -> usize {
        self.teams.len()
    }

    pub fn is_empty(&self) -> bool {
        self.teams.is_empty()
    }

    pub fn teams(&self) -> impl Iterator<Item = (&str, &TeamSeasonTotals)> {
        self.teams.iter().map(|(name, totals)| (name.as_str(), totals))
    }

    /// Final rows, sorted by team name.
    pub fn into_rows(self) -> Vec<TeamSeasonRow> {
        self.teams
            .into_iter()
            .map(|(team, totals)| TeamSeasonRow::from_totals(team, &totals))
            .collect()
    }
}

/// One team across the whole season: raw sums, derived rates and the
/// matching key for allow-list filtering.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TeamSeasonRow {
    pub team: String,
    pub team_normalized: String,
    pub matches_played: u32,
    #[serde(flatten)]
    pub totals: MatchTeamStats,
    pub possession_share_sum: f64,
    pub possession_share_samples: u32,
    pub possession_share: f64,
    #[serde(flatten)]
    pub metrics: TeamMetrics,
}

impl TeamSeasonRow {
    pub fn from_totals(team: String, totals: &TeamSeasonTotals) -> Self {
        let matches_played = totals.matches_played();
        Self {
            team_normalized: normalize_name(Some(&team)),
            team,
            matches_played,
            totals: totals.stats.clone(),
            possession_share_sum: totals.possession_share_sum,
            possession_share_samples: totals.possession_share_samples,
            possession_share: totals.possession_share(),
            metrics: TeamMetrics::derive(&totals.stats, matches_played),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::match_stats::MatchTeamRecord;

    fn summary(match_id: MatchId, teams: &[(&str, u32, Option<f64>)]) -> MatchSummary {
        MatchSummary {
            match_id,
            total_duration: 0.0,
            skipped_no_team: 0,
            teams: teams
                .iter()
                .map(|(team, shots, share)| MatchTeamRecord {
                    team: team.to_string(),
                    stats: MatchTeamStats {
                        shots: *shots,
                        ..Default::default()
                    },
                    possession_share: *share,
                })
                .collect(),
        }
    }

    #[test]
    fn possession_averages_only_valid_samples() {
        let table = SeasonTable::from_matches(&[
            summary(1, &[("Girona", 3, Some(0.6))]),
            summary(2, &[("Girona", 1, None)]),
            summary(3, &[("Girona", 2, Some(0.4))]),
        ]);
        let girona = table.get("Girona").unwrap();
        assert_eq!(girona.matches_played(), 3);
        assert_eq!(girona.possession_share_samples, 2);
        assert!((girona.possession_share() - 0.5).abs() < 1e-12);
        assert_eq!(girona.stats.shots, 6);
    }

    #[test]
    fn no_valid_samples_gives_nan_share() {
        let table = SeasonTable::from_matches(&[summary(1, &[("Cadiz", 0, None)])]);
        assert!(table.get("Cadiz").unwrap().possession_share().is_nan());
    }

    #[test]
    fn refolding_a_match_is_ignored() {
        let m = summary(9, &[("Huesca", 4, Some(0.5))]);
        let mut table = SeasonTable::new();
        table.add_match(&m);
        table.add_match(&m);
        let huesca = table.get("Huesca").unwrap();
        assert_eq!(huesca.matches_played(), 1);
        assert_eq!(huesca.stats.shots, 4);
        assert_eq!(huesca.possession_share_samples, 1);
    }

    #[test]
    fn merging_tables_that_share_a_match_counts_it_once() {
        let shared = summary(9, &[("Huesca", 4, Some(0.5))]);
        let left = SeasonTable::from_matches(&[shared.clone()]);
        let right = SeasonTable::from_matches(&[
            shared,
            summary(10, &[("Huesca", 1, Some(0.3))]),
        ]);

        let merged = left.merge(right);
        let huesca = merged.get("Huesca").unwrap();
        assert_eq!(huesca.matches_played(), 2);
        assert_eq!(huesca.match_ids().collect::<Vec<_>>(), vec![9, 10]);
        assert_eq!(huesca.stats.shots, 5);
        assert_eq!(huesca.possession_share_samples, 2);
        assert!((huesca.possession_share() - 0.4).abs() < 1e-12);

        let mut refolded = SeasonTable::new();
        refolded.add_match(&summary(9, &[("Huesca", 4, Some(0.5))]));
        refolded.add_match(&summary(9, &[("Huesca", 4, Some(0.5))]));
        let twice = SeasonTable::from_matches(&[summary(9, &[("Huesca", 4, Some(0.5))])])
            .merge(SeasonTable::from_matches(&[summary(9, &[("Huesca", 4, Some(0.5))])]));
        assert_eq!(twice, refolded);
    }

    #[test]
    fn merge_is_order_independent() {
        let a = SeasonTable::from_matches(&[summary(
            1,
            &[("Granada", 2, Some(0.3)), ("Villarreal", 5, Some(0.7))],
        )]);
        let b = SeasonTable::from_matches(&[summary(2, &[("Granada", 1, Some(0.5))])]);
        let ab = a.clone().merge(b.clone());
        let ba = b.merge(a);
        assert_eq!(ab, ba);
        assert_eq!(ab.len(), 2);
        assert_eq!(ab.get("Granada").unwrap().matches_played(), 2);
    }

    #[test]
    fn rows_are_sorted_and_never_fabricated() {
        let rows = SeasonTable::from_matches(&[summary(
            1,
            &[("Real Sociedad", 1, None), ("Athletic Club", 2, None)],
        )])
        .into_rows();
        let names = rows.iter().map(|r| r.team.as_str()).collect::<Vec<_>>();
        assert_eq!(names, vec!["Athletic Club", "Real Sociedad"]);
        assert!(SeasonTable::new().into_rows().is_empty());
    }
}

use std::collections::HashMap;

use serde::Serialize;
use tracing::debug;

use crate::events::{Event, EventKind, MatchId, Point};
use crate::spatial::MoveFlags;

/// Raw counters and sums for one team within one match, or summed over a
/// season when folded by [`crate::season::SeasonTable`].
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MatchTeamStats {
    pub shots: u32,
    pub goals: u32,
    pub xg: f64,
    pub passes: u32,
    pub passes_completed: u32,
    pub pressures: u32,
    pub tackles: u32,
    pub interceptions: u32,
    pub fouls: u32,
    pub dribbles: u32,
    pub dribbles_success: u32,
    pub carries: u32,
    pub progressive_passes: u32,
    pub progressive_carries: u32,
    pub final_third_entries: u32,
    pub box_entries: u32,
    pub possession_secs: f64,
}

impl MatchTeamStats {
    pub fn record(&mut self, event: &Event) {
        let start_x = event.location.map(|p| p.x);
        match &event.kind {
            EventKind::Shot { outcome, xg } => {
                self.shots += 1;
                if outcome.as_deref() == Some("Goal") {
                    self.goals += 1;
                }
                self.xg += xg.unwrap_or(0.0);
            }
            EventKind::Pass {
                outcome,
                end_location,
            } => {
                self.passes += 1;
                if outcome.is_none() {
                    self.passes_completed += 1;
                }
                let flags = move_flags(start_x, *end_location);
                if flags.progressive {
                    self.progressive_passes += 1;
                }
                self.record_entries(flags);
            }
            EventKind::Pressure => self.pressures += 1,
            EventKind::Tackle => self.tackles += 1,
            EventKind::Interception => self.interceptions += 1,
            EventKind::FoulCommitted => self.fouls += 1,
            EventKind::Dribble { outcome } => {
                self.dribbles += 1;
                if outcome.as_deref() == Some("Complete") {
                    self.dribbles_success += 1;
                }
            }
            EventKind::Carry { end_location } => {
                self.carries += 1;
                let flags = move_flags(start_x, *end_location);
                if flags.progressive {
                    self.progressive_carries += 1;
                }
                self.record_entries(flags);
            }
            EventKind::Other(_) => {}
        }
        if let Some(secs) = event.duration {
            self.possession_secs += secs;
        }
    }

    fn record_entries(&mut self, flags: MoveFlags) {
        if flags.final_third_entry {
            self.final_third_entries += 1;
        }
        if flags.box_entry {
            self.box_entries += 1;
        }
    }

    /// Field-wise sum, used when folding matches into a season.
    pub fn absorb(&mut self, other: &MatchTeamStats) {
        self.shots += other.shots;
        self.goals += other.goals;
        self.xg += other.xg;
        self.passes += other.passes;
        self.passes_completed += other.passes_completed;
        self.pressures += other.pressures;
        self.tackles += other.tackles;
        self.interceptions += other.interceptions;
        self.fouls += other.fouls;
        self.dribbles += other.dribbles;
        self.dribbles_success += other.dribbles_success;
        self.carries += other.carries;
        self.progressive_passes += other.progressive_passes;
        self.progressive_carries += other.progressive_carries;
        self.final_third_entries += other.final_third_entries;
        self.box_entries += other.box_entries;
        self.possession_secs += other.possession_secs;
    }
}

fn move_flags(start_x: Option<f64>, end: Option<Point>) -> MoveFlags {
    MoveFlags::classify(start_x, end.map(|p| p.x), end.map(|p| p.y))
}

#[derive(Debug, Clone, PartialEq)]
pub struct MatchTeamRecord {
    pub team: String,
    pub stats: MatchTeamStats,
    /// Share of the match's summed event duration. `None` when the match
    /// recorded no duration at all.
    pub possession_share: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MatchSummary {
    pub match_id: MatchId,
    pub total_duration: f64,
    pub skipped_no_team: usize,
    /// Sorted by team name.
    pub teams: Vec<MatchTeamRecord>,
}

pub fn accumulate_match(match_id: MatchId, events: &[Event]) -> MatchSummary {
    let mut per_team: HashMap<&str, MatchTeamStats> = HashMap::new();
    let mut total_duration = 0.0;
    let mut skipped_no_team = 0usize;

    for event in events {
        let Some(team) = event.team_name.as_deref() else {
            skipped_no_team += 1;
            continue;
        };
        per_team.entry(team).or_default().record(event);
        if let Some(secs) = event.duration {
            total_duration += secs;
        }
    }

    let mut teams = per_team
        .into_iter()
        .map(|(team, stats)| {
            // No sample at all when the match recorded no duration.
            let possession_share =
                (total_duration > 0.0).then(|| stats.possession_secs / total_duration);
            MatchTeamRecord {
                team: team.to_string(),
                stats,
                possession_share,
            }
        })
        .collect::<Vec<_>>();
    teams.sort_by(|a, b| a.team.cmp(&b.team));

    debug!(
        match_id,
        teams = teams.len(),
        total_duration,
        skipped_no_team,
        "accumulated match"
    );

    MatchSummary {
        match_id,
        total_duration,
        skipped_no_team,
        teams,
    }
}

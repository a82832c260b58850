use serde::Serialize;

use crate::match_stats::MatchTeamStats;

/// `num / den`, or NaN when `den` is zero.
pub fn ratio(num: f64, den: f64) -> f64 {
    if den == 0.0 { f64::NAN } else { num / den }
}

fn per(num: u32, den: u32) -> f64 {
    ratio(f64::from(num), f64::from(den))
}

/// Rates derived from season sums. Per-match values divide by matches played;
/// efficiency values divide by the relevant attempt count.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TeamMetrics {
    pub shots_per_match: f64,
    pub goals_per_match: f64,
    pub xg_per_match: f64,
    pub pass_completion: f64,
    pub pressures_per_match: f64,
    pub tackles_per_match: f64,
    pub interceptions_per_match: f64,
    pub fouls_per_match: f64,
    pub dribbles_per_match: f64,
    pub dribble_success: f64,
    pub carries_per_match: f64,
    pub progressive_passes_per_match: f64,
    pub progressive_carries_per_match: f64,
    pub final_third_entries_per_match: f64,
    pub box_entries_per_match: f64,
    pub xg_per_shot: f64,
    pub goals_per_shot: f64,
}

impl TeamMetrics {
    pub fn derive(stats: &MatchTeamStats, matches_played: u32) -> Self {
        let matches = f64::from(matches_played);
        Self {
            shots_per_match: per(stats.shots, matches_played),
            goals_per_match: per(stats.goals, matches_played),
            xg_per_match: ratio(stats.xg, matches),
            pass_completion: per(stats.passes_completed, stats.passes),
            pressures_per_match: per(stats.pressures, matches_played),
            tackles_per_match: per(stats.tackles, matches_played),
            interceptions_per_match: per(stats.interceptions, matches_played),
            fouls_per_match: per(stats.fouls, matches_played),
            dribbles_per_match: per(stats.dribbles, matches_played),
            dribble_success: per(stats.dribbles_success, stats.dribbles),
            carries_per_match: per(stats.carries, matches_played),
            progressive_passes_per_match: per(stats.progressive_passes, matches_played),
            progressive_carries_per_match: per(stats.progressive_carries, matches_played),
            final_third_entries_per_match: per(stats.final_third_entries, matches_played),
            box_entries_per_match: per(stats.box_entries, matches_played),
            xg_per_shot: ratio(stats.xg, f64::from(stats.shots)),
            goals_per_shot: per(stats.goals, stats.shots),
        }
    }

    /// Column labels, in the order [`TeamMetrics::values`] returns them.
    pub const LABELS: [&'static str; 17] = [
        "Shots_per_match",
        "Goals_per_match",
        "xG_per_match",
        "Pass_Completion",
        "Pressures_per_match",
        "Tackles_per_match",
        "Interceptions_per_match",
        "Fouls_per_match",
        "Dribbles_per_match",
        "Dribble_Success",
        "Carries_per_match",
        "Progressive_Passes_per_match",
        "Progressive_Carries_per_match",
        "FinalThird_Entries_per_match",
        "Box_Entries_per_match",
        "xG_per_shot",
        "Goals_per_shot",
    ];

    pub fn values(&self) -> [f64; 17] {
        [
            self.shots_per_match,
            self.goals_per_match,
            self.xg_per_match,
            self.pass_completion,
            self.pressures_per_match,
            self.tackles_per_match,
            self.interceptions_per_match,
            self.fouls_per_match,
            self.dribbles_per_match,
            self.dribble_success,
            self.carries_per_match,
            self.progressive_passes_per_match,
            self.progressive_carries_per_match,
            self.final_third_entries_per_match,
            self.box_entries_per_match,
            self.xg_per_shot,
            self.goals_per_shot,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_attempts_are_undefined_not_zero() {
        let stats = MatchTeamStats {
            pressures: 12,
            ..Default::default()
        };
        let m = TeamMetrics::derive(&stats, 2);
        assert!(m.pass_completion.is_nan());
        assert!(m.dribble_success.is_nan());
        assert!(m.xg_per_shot.is_nan());
        assert!(m.goals_per_shot.is_nan());
        assert_eq!(m.pressures_per_match, 6.0);
        assert_eq!(m.shots_per_match, 0.0);
    }

    #[test]
    fn rates_use_their_own_denominators() {
        let stats = MatchTeamStats {
            shots: 20,
            goals: 4,
            xg: 3.0,
            passes: 800,
            passes_completed: 680,
            dribbles: 10,
            dribbles_success: 7,
            ..Default::default()
        };
        let m = TeamMetrics::derive(&stats, 4);
        assert_eq!(m.shots_per_match, 5.0);
        assert_eq!(m.goals_per_match, 1.0);
        assert_eq!(m.xg_per_match, 0.75);
        assert!((m.pass_completion - 0.85).abs() < 1e-12);
        assert!((m.dribble_success - 0.7).abs() < 1e-12);
        assert_eq!(m.xg_per_shot, 0.15);
        assert_eq!(m.goals_per_shot, 0.2);
    }

    #[test]
    fn nan_propagates_through_arithmetic() {
        let undefined = ratio(3.0, 0.0);
        assert!((undefined * 100.0).is_nan());
        assert!(ratio(0.0, 0.0).is_nan());
    }
}

use statsbomb_team_stats::events::{Event, EventKind, MatchId, Point};
use statsbomb_team_stats::match_stats::{MatchSummary, accumulate_match};
use statsbomb_team_stats::season::{SeasonTable, TeamSeasonTotals};

const TEAMS: &[&str] = &["Barcelona", "Real Madrid", "Sevilla", "Villarreal"];

/// Deterministic pseudo-random event stream: every match features two teams,
/// mixes every event kind and leaves some optional fields empty.
fn synthetic_match(match_id: MatchId) -> Vec<Event> {
    let home = TEAMS[(match_id as usize) % TEAMS.len()];
    let away = TEAMS[(match_id as usize + 1) % TEAMS.len()];
    let mut state = match_id.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
    let mut next = move |bound: u64| {
        state = state
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        (state >> 33) % bound
    };

    let mut events = Vec::new();
    for i in 0..120u64 {
        let team = match next(10) {
            0 => None,
            1..=5 => Some(home),
            _ => Some(away),
        };
        let start = Point {
            x: next(120) as f64,
            y: next(80) as f64,
        };
        let end = Point {
            x: next(120) as f64,
            y: next(80) as f64,
        };
        let kind = match i % 10 {
            0 => EventKind::Shot {
                outcome: (next(4) == 0).then(|| "Goal".to_string()),
                xg: (next(3) > 0).then(|| next(100) as f64 / 200.0),
            },
            1 | 2 => EventKind::Pass {
                outcome: (next(5) == 0).then(|| "Incomplete".to_string()),
                end_location: (next(8) > 0).then_some(end),
            },
            3 => EventKind::Pressure,
            4 => EventKind::Tackle,
            5 => EventKind::Interception,
            6 => EventKind::FoulCommitted,
            7 => EventKind::Dribble {
                outcome: Some(if next(2) == 0 { "Complete" } else { "Incomplete" }.to_string()),
            },
            8 => EventKind::Carry {
                end_location: Some(end),
            },
            _ => EventKind::Other("Ball Receipt*".to_string()),
        };
        events.push(Event {
            team_name: team.map(str::to_string),
            kind,
            duration: (next(6) > 0).then(|| next(40) as f64 / 10.0),
            location: (next(10) > 0).then_some(start),
        });
    }
    events
}

fn summaries(ids: impl IntoIterator<Item = MatchId>) -> Vec<MatchSummary> {
    ids.into_iter()
        .map(|id| accumulate_match(id, &synthetic_match(id)))
        .collect()
}

fn assert_same_totals(team: &str, a: &TeamSeasonTotals, b: &TeamSeasonTotals) {
    let (x, y) = (&a.stats, &b.stats);
    let ints = [
        (x.shots, y.shots),
        (x.goals, y.goals),
        (x.passes, y.passes),
        (x.passes_completed, y.passes_completed),
        (x.pressures, y.pressures),
        (x.tackles, y.tackles),
        (x.interceptions, y.interceptions),
        (x.fouls, y.fouls),
        (x.dribbles, y.dribbles),
        (x.dribbles_success, y.dribbles_success),
        (x.carries, y.carries),
        (x.progressive_passes, y.progressive_passes),
        (x.progressive_carries, y.progressive_carries),
        (x.final_third_entries, y.final_third_entries),
        (x.box_entries, y.box_entries),
    ];
    for (idx, (l, r)) in ints.iter().enumerate() {
        assert_eq!(l, r, "{team}: counter #{idx} differs");
    }
    assert!((x.xg - y.xg).abs() < 1e-9, "{team}: xg differs");
    assert!((x.possession_secs - y.possession_secs).abs() < 1e-9);
    assert!(a.match_ids().eq(b.match_ids()));
    assert_eq!(a.possession_share_samples, b.possession_share_samples);
    assert!((a.possession_share_sum - b.possession_share_sum).abs() < 1e-9);
}

#[test]
fn partitioned_folds_add_up_to_the_full_fold() {
    let all = summaries(1..=24);
    let full = SeasonTable::from_matches(&all);

    for split in [0usize, 1, 7, 12, 24] {
        let (left, right) = all.split_at(split);
        let merged = SeasonTable::from_matches(left).merge(SeasonTable::from_matches(right));
        assert_eq!(merged.len(), full.len());
        for (team, totals) in full.teams() {
            let other = merged.get(team).expect("team should survive the merge");
            assert_same_totals(team, totals, other);
        }
    }

    // Interleaved partition.
    let evens = all.iter().filter(|s| s.match_id % 2 == 0);
    let odds = all.iter().filter(|s| s.match_id % 2 == 1);
    let merged = SeasonTable::from_matches(odds).merge(SeasonTable::from_matches(evens));
    for (team, totals) in full.teams() {
        assert_same_totals(team, totals, merged.get(team).expect("team present"));
    }
}

#[test]
fn possession_shares_stay_within_unit_interval() {
    let all = summaries(1..=40);
    for summary in &all {
        let mut sum = 0.0;
        for record in &summary.teams {
            if let Some(share) = record.possession_share {
                assert!(summary.total_duration > 0.0);
                assert!((0.0..=1.0).contains(&share), "share {share} out of range");
                sum += share;
            }
        }
        if summary.total_duration > 0.0 {
            assert!((sum - 1.0).abs() < 1e-9);
        }
    }

    for row in SeasonTable::from_matches(&all).into_rows() {
        assert!(row.possession_share_samples <= row.matches_played);
        assert!(
            row.possession_share.is_nan() || (0.0..=1.0).contains(&row.possession_share),
            "{}: {}",
            row.team,
            row.possession_share
        );
    }
}

#[test]
fn matches_without_durations_do_not_dilute_possession() {
    let timed = vec![
        Event {
            team_name: Some("Getafe".to_string()),
            kind: EventKind::Pressure,
            duration: Some(3.0),
            location: None,
        },
        Event {
            team_name: Some("Levante".to_string()),
            kind: EventKind::Pressure,
            duration: Some(1.0),
            location: None,
        },
    ];
    let untimed = vec![Event {
        team_name: Some("Getafe".to_string()),
        kind: EventKind::Tackle,
        duration: None,
        location: None,
    }];
    let table = SeasonTable::from_matches(&[
        accumulate_match(10, &timed),
        accumulate_match(11, &untimed),
    ]);
    let getafe = table.get("Getafe").expect("Getafe present");
    assert_eq!(getafe.matches_played(), 2);
    assert_eq!(getafe.possession_share_samples, 1);
    assert_eq!(getafe.possession_share(), 0.75);
}

#[test]
fn team_without_passes_has_undefined_completion() {
    let events = vec![Event {
        team_name: Some("Cadiz".to_string()),
        kind: EventKind::Interception,
        duration: Some(2.0),
        location: None,
    }];
    let rows = SeasonTable::from_matches(&[accumulate_match(5, &events)]).into_rows();
    assert_eq!(rows.len(), 1);
    let cadiz = &rows[0];
    assert_eq!(cadiz.totals.passes, 0);
    assert!(cadiz.metrics.pass_completion.is_nan());
    assert!(cadiz.metrics.dribble_success.is_nan());
    assert_eq!(cadiz.metrics.interceptions_per_match, 1.0);
    assert_eq!(cadiz.possession_share, 1.0);
}

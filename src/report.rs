use std::collections::HashSet;

use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::event_source::EventSource;
use crate::events::{EventError, MatchId};
use crate::match_stats::{MatchSummary, accumulate_match};
use crate::season::{SeasonTable, TeamSeasonRow};
use crate::team_names::TargetTeams;

pub const DEFAULT_PARALLELISM: usize = 4;
pub const MAX_PARALLELISM: usize = 32;

#[derive(Debug, Clone, Copy)]
pub struct ReportOptions {
    pub parallelism: usize,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            parallelism: DEFAULT_PARALLELISM,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MatchFailure {
    pub match_id: MatchId,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RejectedEvent {
    pub match_id: MatchId,
    pub error: EventError,
}

#[derive(Debug, Clone, Default)]
pub struct TeamReport {
    /// Sorted by team name.
    pub rows: Vec<TeamSeasonRow>,
    pub matches_requested: usize,
    pub matches_loaded: usize,
    pub missing_matches: Vec<MatchId>,
    pub failed_matches: Vec<MatchFailure>,
    pub rejected_events: Vec<RejectedEvent>,
}

impl TeamReport {
    pub fn targets<'a>(&'a self, targets: &TargetTeams) -> Vec<&'a TeamSeasonRow> {
        self.rows.iter().filter(|row| targets.matches(row)).collect()
    }

    pub fn row(&self, team: &str) -> Option<&TeamSeasonRow> {
        self.rows.iter().find(|row| row.team == team)
    }
}

/// Folds every listed match from `source` into per-team season rows.
///
/// Matches are loaded and accumulated in parallel; each worker folds into its
/// own [`SeasonTable`] and the partial tables are merged at the end. A match
/// without an event file, or one that fails to load, contributes nothing and
/// the rest of the run carries on.
pub fn build_team_report<S>(
    source: &S,
    match_ids: &[MatchId],
    options: &ReportOptions,
) -> TeamReport
where
    S: EventSource + ?Sized,
{
    let ids = dedup_ids(match_ids);
    let pool = build_pool(options.parallelism);
    let partial = with_pool(&pool, || {
        ids.par_iter()
            .map(|match_id| (*match_id, load_match(source, *match_id)))
            .fold(PartialReport::default, |mut acc, (match_id, loaded)| {
                acc.absorb(match_id, loaded);
                acc
            })
            .reduce(PartialReport::default, PartialReport::merge)
    });

    let report = partial.finish(ids.len());
    info!(
        requested = report.matches_requested,
        loaded = report.matches_loaded,
        missing = report.missing_matches.len(),
        failed = report.failed_matches.len(),
        rejected_events = report.rejected_events.len(),
        teams = report.rows.len(),
        "team report built"
    );
    report
}

/// Single-threaded variant of [`build_team_report`], used where a thread pool
/// is unwanted (benches, tiny inputs).
pub fn build_team_report_sequential<S>(source: &S, match_ids: &[MatchId]) -> TeamReport
where
    S: EventSource + ?Sized,
{
    let ids = dedup_ids(match_ids);
    let mut acc = PartialReport::default();
    for match_id in &ids {
        acc.absorb(*match_id, load_match(source, *match_id));
    }
    acc.finish(ids.len())
}

enum LoadedMatch {
    Summary(MatchSummary, Vec<EventError>),
    Missing,
    Failed(String),
}

fn load_match<S>(source: &S, match_id: MatchId) -> LoadedMatch
where
    S: EventSource + ?Sized,
{
    match source.fetch_events(match_id) {
        Ok(Some(parsed)) => {
            let summary = accumulate_match(match_id, &parsed.events);
            LoadedMatch::Summary(summary, parsed.rejected)
        }
        Ok(None) => {
            debug!(match_id, "no event file; skipping match");
            LoadedMatch::Missing
        }
        Err(err) => {
            warn!(match_id, "failed to load events: {err:#}");
            LoadedMatch::Failed(format!("{err:#}"))
        }
    }
}

#[derive(Default)]
struct PartialReport {
    table: SeasonTable,
    loaded: usize,
    missing: Vec<MatchId>,
    failed: Vec<MatchFailure>,
    rejected: Vec<RejectedEvent>,
}

impl PartialReport {
    fn absorb(&mut self, match_id: MatchId, loaded: LoadedMatch) {
        match loaded {
            LoadedMatch::Summary(summary, rejected) => {
                self.loaded += 1;
                self.table.add_match(&summary);
                for error in rejected {
                    warn!(match_id, "skipping malformed event: {error}");
                    self.rejected.push(RejectedEvent { match_id, error });
                }
            }
            LoadedMatch::Missing => self.missing.push(match_id),
            LoadedMatch::Failed(message) => self.failed.push(MatchFailure { match_id, message }),
        }
    }

    fn merge(mut self, other: PartialReport) -> PartialReport {
        self.table = self.table.merge(other.table);
        self.loaded += other.loaded;
        self.missing.extend(other.missing);
        self.failed.extend(other.failed);
        self.rejected.extend(other.rejected);
        self
    }

    fn finish(mut self, requested: usize) -> TeamReport {
        self.missing.sort_unstable();
        self.failed.sort_by_key(|f| f.match_id);
        self.rejected.sort_by_key(|r| (r.match_id, r.error.index()));
        TeamReport {
            rows: self.table.into_rows(),
            matches_requested: requested,
            matches_loaded: self.loaded,
            missing_matches: self.missing,
            failed_matches: self.failed,
            rejected_events: self.rejected,
        }
    }
}

fn dedup_ids(ids: &[MatchId]) -> Vec<MatchId> {
    let mut seen = HashSet::new();
    let mut out = Vec::with_capacity(ids.len());
    for id in ids {
        if seen.insert(*id) {
            out.push(*id);
        }
    }
    out
}

fn build_pool(parallelism: usize) -> Option<rayon::ThreadPool> {
    rayon::ThreadPoolBuilder::new()
        .num_threads(parallelism.clamp(1, MAX_PARALLELISM))
        .build()
        .ok()
}

fn with_pool<T>(pool: &Option<rayon::ThreadPool>, action: impl FnOnce() -> T + Send) -> T
where
    T: Send,
{
    if let Some(pool) = pool.as_ref() {
        pool.install(action)
    } else {
        action()
    }
}

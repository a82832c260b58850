use std::fs;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use once_cell::sync::OnceCell;
use reqwest::blocking::Client;
use reqwest::header::USER_AGENT;
use tracing::{debug, info, warn};

use crate::events::MatchId;
use crate::open_data::{self, OpenDataLayout};

const REQUEST_TIMEOUT_SECS: u64 = 60;

static CLIENT: OnceCell<Client> = OnceCell::new();

pub fn http_client() -> Result<&'static Client> {
    CLIENT.get_or_try_init(|| {
        Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .context("failed to build http client")
    })
}

/// Downloads `url` into `dest` through a temp file, creating parent directories.
pub fn download(client: &Client, url: &str, dest: &Path) -> Result<()> {
    let resp = client
        .get(url)
        .header(USER_AGENT, "statsbomb_team_stats")
        .send()
        .with_context(|| format!("request failed: {url}"))?;
    let status = resp.status();
    if !status.is_success() {
        return Err(anyhow!("http {status}: {url}"));
    }
    let body = resp.bytes().context("failed reading body")?;

    if let Some(dir) = dest.parent() {
        fs::create_dir_all(dir).with_context(|| format!("create {}", dir.display()))?;
    }
    let tmp = dest.with_extension("json.tmp");
    fs::write(&tmp, &body).with_context(|| format!("write {}", tmp.display()))?;
    fs::rename(&tmp, dest).with_context(|| format!("swap {}", dest.display()))?;
    debug!(url, bytes = body.len(), "downloaded");
    Ok(())
}

#[derive(Debug, Clone, Copy, Default)]
pub struct FetchPlan {
    pub events: bool,
    pub lineups: bool,
    pub limit_matches: Option<usize>,
}

impl FetchPlan {
    /// Match ids to fetch, in matches-file order, cut to `limit_matches`.
    pub fn select(&self, mut match_ids: Vec<MatchId>) -> Vec<MatchId> {
        if let Some(limit) = self.limit_matches {
            match_ids.truncate(limit);
        }
        match_ids
    }
}

#[derive(Debug, Clone, Default)]
pub struct FetchSummary {
    pub matches_total: usize,
    pub downloaded: usize,
    pub already_present: usize,
    pub errors: Vec<String>,
}

pub fn ensure_competitions(client: &Client, layout: &OpenDataLayout) -> Result<bool> {
    let path = layout.competitions_path();
    if path.exists() {
        return Ok(false);
    }
    download(client, &open_data::competitions_url(), &path)?;
    Ok(true)
}

/// Downloads the season's matches file, then per-match files named by `plan`
/// that are not on disk yet. A failed per-match download is recorded and the
/// loop moves on.
pub fn fetch_season(
    client: &Client,
    layout: &OpenDataLayout,
    competition_id: u32,
    season_id: u32,
    plan: FetchPlan,
) -> Result<FetchSummary> {
    let matches_path = layout.matches_path(competition_id, season_id);
    download(
        client,
        &open_data::matches_url(competition_id, season_id),
        &matches_path,
    )?;
    let match_ids = plan.select(open_data::load_match_ids(&matches_path)?);

    let mut summary = FetchSummary {
        matches_total: match_ids.len(),
        ..Default::default()
    };
    if plan.events {
        for match_id in &match_ids {
            fetch_missing(
                client,
                &open_data::events_url(*match_id),
                &layout.events_path(*match_id),
                *match_id,
                &mut summary,
            );
        }
    }
    if plan.lineups {
        for match_id in &match_ids {
            fetch_missing(
                client,
                &open_data::lineups_url(*match_id),
                &layout.lineups_path(*match_id),
                *match_id,
                &mut summary,
            );
        }
    }
    info!(
        competition_id,
        season_id,
        matches = summary.matches_total,
        downloaded = summary.downloaded,
        present = summary.already_present,
        errors = summary.errors.len(),
        "season fetch finished"
    );
    Ok(summary)
}

fn fetch_missing(
    client: &Client,
    url: &str,
    dest: &Path,
    match_id: MatchId,
    summary: &mut FetchSummary,
) {
    if dest.exists() {
        summary.already_present += 1;
        return;
    }
    match download(client, url, dest) {
        Ok(()) => summary.downloaded += 1,
        Err(err) => {
            warn!(match_id, "download failed: {err:#}");
            summary.errors.push(format!("match {match_id}: {err:#}"));
        }
    }
}

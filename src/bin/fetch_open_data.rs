use std::path::PathBuf;

use anyhow::{Result, bail};
use clap::Parser;

use statsbomb_team_stats::config::ENV_DATA_DIR;
use statsbomb_team_stats::fetch::{FetchPlan, ensure_competitions, fetch_season, http_client};
use statsbomb_team_stats::logging::init_tracing;
use statsbomb_team_stats::open_data::{DEFAULT_DATA_DIR, OpenDataLayout};

/// Downloads StatsBomb open-data files into a local mirror.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Output directory
    #[arg(long, env = ENV_DATA_DIR, default_value = DEFAULT_DATA_DIR)]
    out: PathBuf,

    /// Competition to download matches (and optionally events) for
    #[arg(long)]
    competition_id: Option<u32>,

    /// Season id, required with --competition-id
    #[arg(long)]
    season_id: Option<u32>,

    /// Download per-match event files
    #[arg(long)]
    events: bool,

    /// Download per-match lineup files
    #[arg(long)]
    lineups: bool,

    /// Only the first N matches (for quick tests)
    #[arg(long)]
    limit_matches: Option<usize>,
}

fn main() -> Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");
    init_tracing();

    let args = Args::parse();
    let layout = OpenDataLayout::new(&args.out);
    let client = http_client()?;

    if ensure_competitions(client, &layout)? {
        println!("Saved competitions to {}", layout.competitions_path().display());
    }

    let Some(competition_id) = args.competition_id else {
        println!(
            "Use --competition-id and --season-id to fetch matches, \
             and --events/--lineups for deeper data."
        );
        return Ok(());
    };
    let Some(season_id) = args.season_id else {
        bail!("--season-id is required when --competition-id is provided");
    };

    let plan = FetchPlan {
        events: args.events,
        lineups: args.lineups,
        limit_matches: args.limit_matches,
    };
    let summary = fetch_season(client, &layout, competition_id, season_id, plan)?;

    println!(
        "Saved matches to {}",
        layout.matches_path(competition_id, season_id).display()
    );
    println!(
        "Matches: {} (downloaded {}, already present {})",
        summary.matches_total, summary.downloaded, summary.already_present
    );
    if !summary.errors.is_empty() {
        println!("  errors: {}", summary.errors.len());
        for err in summary.errors.iter().take(6) {
            println!("   - {err}");
        }
    }
    Ok(())
}

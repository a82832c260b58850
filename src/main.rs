use anyhow::{Result, bail};
use clap::Parser;

use statsbomb_team_stats::config::{ReportArgs, ReportConfig};
use statsbomb_team_stats::event_source::DirEventSource;
use statsbomb_team_stats::events::MatchId;
use statsbomb_team_stats::export;
use statsbomb_team_stats::logging::init_tracing;
use statsbomb_team_stats::open_data;
use statsbomb_team_stats::report::{TeamReport, build_team_report};
use statsbomb_team_stats::team_names::TargetTeams;

const WORKBOOK_FILE: &str = "statsbomb_team_stats.xlsx";
const JSON_FILE: &str = "statsbomb_team_stats.json";
const TARGETS_JSON_FILE: &str = "statsbomb_team_stats_targets.json";

/// Builds per-team season stats from a local StatsBomb open-data mirror.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    #[command(flatten)]
    report: ReportArgs,

    /// Explicit match ids; the season's matches file is not read when given
    #[arg(long, value_delimiter = ',')]
    match_ids: Vec<MatchId>,

    /// Also write the rows as JSON
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");
    init_tracing();

    let args = Args::parse();
    let cfg = ReportConfig::from_args(&args.report);

    let match_ids = if args.match_ids.is_empty() {
        open_data::load_match_ids(&cfg.matches_path())?
    } else {
        args.match_ids.clone()
    };
    if match_ids.is_empty() {
        bail!("no match ids to process");
    }

    let source = DirEventSource::from_layout(&cfg.layout());
    let report = build_team_report(&source, &match_ids, &cfg.report_options());
    if report.rows.is_empty() {
        bail!(
            "no data found in events under {} ({} matches requested, {} missing)",
            cfg.layout().events_dir().display(),
            report.matches_requested,
            report.missing_matches.len()
        );
    }

    let workbook_path = cfg.out_dir.join(WORKBOOK_FILE);
    let exported = export::export_workbook(&workbook_path, &report, &cfg.targets)?;
    if args.json {
        export::export_json(&cfg.out_dir.join(JSON_FILE), &report.rows)?;
        export::export_json(
            &cfg.out_dir.join(TARGETS_JSON_FILE),
            report.targets(&cfg.targets),
        )?;
    }

    print_summary(&report, &cfg.targets);
    println!(
        "Saved {} ({} teams, {} targets)",
        workbook_path.display(),
        exported.teams,
        exported.target_teams
    );
    Ok(())
}

fn print_summary(report: &TeamReport, targets: &TargetTeams) {
    println!("Team report complete");
    println!(
        "Matches: {}/{} loaded, {} missing, {} failed",
        report.matches_loaded,
        report.matches_requested,
        report.missing_matches.len(),
        report.failed_matches.len()
    );
    if !report.rejected_events.is_empty() {
        println!("Rejected events: {}", report.rejected_events.len());
        for rejected in report.rejected_events.iter().take(6) {
            println!("   - match {}: {}", rejected.match_id, rejected.error);
        }
    }
    for failed in report.failed_matches.iter().take(6) {
        println!("   - match {} failed: {}", failed.match_id, failed.message);
    }

    let rows = report.targets(targets);
    if rows.is_empty() {
        println!("No target teams present");
        return;
    }
    println!(
        "{:<20} {:>3} {:>6} {:>6} {:>6} {:>6} {:>6}",
        "Team", "MP", "xG/m", "G/m", "Pass%", "Poss%", "PPr/m"
    );
    for row in rows {
        let m = &row.metrics;
        println!(
            "{:<20} {:>3} {:>6} {:>6} {:>6} {:>6} {:>6}",
            row.team,
            row.matches_played,
            fmt_rate(m.xg_per_match, 1.0),
            fmt_rate(m.goals_per_match, 1.0),
            fmt_rate(m.pass_completion, 100.0),
            fmt_rate(row.possession_share, 100.0),
            fmt_rate(m.progressive_passes_per_match, 1.0),
        );
    }
}

fn fmt_rate(value: f64, scale: f64) -> String {
    let scaled = value * scale;
    if scaled.is_nan() {
        "n/a".to_string()
    } else {
        format!("{scaled:.2}")
    }
}

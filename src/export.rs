use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;
use rust_xlsxwriter::{Workbook, Worksheet};

use crate::metrics::TeamMetrics;
use crate::report::TeamReport;
use crate::season::TeamSeasonRow;
use crate::team_names::TargetTeams;

pub struct ExportSummary {
    pub teams: usize,
    pub target_teams: usize,
}

/// Header row shared by every team sheet; order matches [`row_cells`].
pub fn header() -> Vec<&'static str> {
    let mut out = vec![
        "Team",
        "Team_Normalized",
        "Matches",
        "Shots",
        "Goals",
        "xG",
        "Passes",
        "Passes_Completed",
        "Possession_Secs",
        "Possession_Share_Sum",
        "Possession_Share_Count",
        "Pressures",
        "Tackles",
        "Interceptions",
        "Fouls",
        "Dribbles",
        "Dribbles_Success",
        "Carries",
        "Progressive_Passes",
        "Progressive_Carries",
        "FinalThird_Entries",
        "Box_Entries",
    ];
    out.extend(TeamMetrics::LABELS);
    out.push("Possession_Share");
    out
}

pub enum Cell {
    Text(String),
    Number(f64),
}

pub fn row_cells(row: &TeamSeasonRow) -> Vec<Cell> {
    let t = &row.totals;
    let mut out = vec![
        Cell::Text(row.team.clone()),
        Cell::Text(row.team_normalized.clone()),
        Cell::Number(f64::from(row.matches_played)),
        Cell::Number(f64::from(t.shots)),
        Cell::Number(f64::from(t.goals)),
        Cell::Number(t.xg),
        Cell::Number(f64::from(t.passes)),
        Cell::Number(f64::from(t.passes_completed)),
        Cell::Number(t.possession_secs),
        Cell::Number(row.possession_share_sum),
        Cell::Number(f64::from(row.possession_share_samples)),
        Cell::Number(f64::from(t.pressures)),
        Cell::Number(f64::from(t.tackles)),
        Cell::Number(f64::from(t.interceptions)),
        Cell::Number(f64::from(t.fouls)),
        Cell::Number(f64::from(t.dribbles)),
        Cell::Number(f64::from(t.dribbles_success)),
        Cell::Number(f64::from(t.carries)),
        Cell::Number(f64::from(t.progressive_passes)),
        Cell::Number(f64::from(t.progressive_carries)),
        Cell::Number(f64::from(t.final_third_entries)),
        Cell::Number(f64::from(t.box_entries)),
    ];
    out.extend(row.metrics.values().into_iter().map(Cell::Number));
    out.push(Cell::Number(row.possession_share));
    out
}

pub fn export_workbook(
    path: &Path,
    report: &TeamReport,
    targets: &TargetTeams,
) -> Result<ExportSummary> {
    let target_rows = report.targets(targets);

    let mut workbook = Workbook::new();
    {
        let sheet = workbook.add_worksheet();
        sheet.set_name("TeamStats")?;
        write_team_rows(sheet, report.rows.iter())?;
    }
    {
        let sheet = workbook.add_worksheet();
        sheet.set_name("Targets")?;
        write_team_rows(sheet, target_rows.iter().copied())?;
    }
    {
        let sheet = workbook.add_worksheet();
        sheet.set_name("Run")?;
        write_run_sheet(sheet, report)?;
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).ok();
    }
    workbook
        .save(path)
        .with_context(|| format!("failed writing workbook to {}", path.display()))?;

    Ok(ExportSummary {
        teams: report.rows.len(),
        target_teams: target_rows.len(),
    })
}

/// Rows as a JSON array; undefined metrics serialize as `null`.
pub fn export_json<'a>(
    path: &Path,
    rows: impl IntoIterator<Item = &'a TeamSeasonRow>,
) -> Result<()> {
    let rows = rows.into_iter().collect::<Vec<_>>();
    let json = serde_json::to_string_pretty(&rows).context("serialize team rows")?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).ok();
    }
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, json).with_context(|| format!("write {}", tmp.display()))?;
    fs::rename(&tmp, path).with_context(|| format!("swap {}", path.display()))?;
    Ok(())
}

fn write_team_rows<'a>(
    worksheet: &mut Worksheet,
    rows: impl Iterator<Item = &'a TeamSeasonRow>,
) -> Result<()> {
    for (col_idx, label) in header().iter().enumerate() {
        worksheet
            .write_string(0, col_idx as u16, *label)
            .with_context(|| format!("write header cell {col_idx}"))?;
    }
    for (idx, row) in rows.enumerate() {
        let row_idx = (idx + 1) as u32;
        for (col_idx, cell) in row_cells(row).iter().enumerate() {
            let written = match cell {
                Cell::Text(value) => worksheet.write_string(row_idx, col_idx as u16, value),
                // Undefined rates stay blank.
                Cell::Number(value) if !value.is_finite() => continue,
                Cell::Number(value) => worksheet.write_number(row_idx, col_idx as u16, *value),
            };
            written.with_context(|| format!("write cell ({row_idx},{col_idx})"))?;
        }
    }
    Ok(())
}

fn write_run_sheet(worksheet: &mut Worksheet, report: &TeamReport) -> Result<()> {
    let rows = [
        ("Generated (UTC)", Utc::now().format("%Y-%m-%d %H:%M:%S").to_string()),
        ("Matches requested", report.matches_requested.to_string()),
        ("Matches loaded", report.matches_loaded.to_string()),
        ("Matches missing", report.missing_matches.len().to_string()),
        ("Matches failed", report.failed_matches.len().to_string()),
        ("Events rejected", report.rejected_events.len().to_string()),
        ("Teams", report.rows.len().to_string()),
    ];
    for (row_idx, (label, value)) in rows.iter().enumerate() {
        worksheet
            .write_string(row_idx as u32, 0, *label)
            .and_then(|ws| ws.write_string(row_idx as u32, 1, value))
            .with_context(|| format!("write run row {row_idx}"))?;
    }
    Ok(())
}

use std::path::PathBuf;

use crate::open_data::{DEFAULT_DATA_DIR, OpenDataLayout};
use crate::report::{DEFAULT_PARALLELISM, MAX_PARALLELISM, ReportOptions};
use crate::team_names::TargetTeams;

pub const ENV_DATA_DIR: &str = "STATSBOMB_DATA_DIR";
pub const ENV_COMPETITION_ID: &str = "STATSBOMB_COMPETITION_ID";
pub const ENV_SEASON_ID: &str = "STATSBOMB_SEASON_ID";
pub const ENV_TARGET_TEAMS: &str = "TARGET_TEAMS";
pub const ENV_PARALLELISM: &str = "REPORT_PARALLELISM";
pub const ENV_OUT_DIR: &str = "REPORT_OUT_DIR";

/// La Liga 2020/2021 in the open-data release.
pub const DEFAULT_COMPETITION_ID: u32 = 11;
pub const DEFAULT_SEASON_ID: u32 = 90;

#[derive(Debug, Clone)]
pub struct ReportConfig {
    pub data_dir: PathBuf,
    pub competition_id: u32,
    pub season_id: u32,
    pub targets: TargetTeams,
    pub parallelism: usize,
    pub out_dir: PathBuf,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            competition_id: DEFAULT_COMPETITION_ID,
            season_id: DEFAULT_SEASON_ID,
            targets: TargetTeams::defaults(),
            parallelism: DEFAULT_PARALLELISM,
            out_dir: PathBuf::from("."),
        }
    }
}

/// Report flags; each falls back to its environment variable, then to the
/// built-in default.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct ReportArgs {
    /// Root of the open-data mirror
    #[arg(long, env = ENV_DATA_DIR)]
    pub data_dir: Option<PathBuf>,

    #[arg(long, env = ENV_COMPETITION_ID)]
    pub competition_id: Option<u32>,

    #[arg(long, env = ENV_SEASON_ID)]
    pub season_id: Option<u32>,

    /// Comma or semicolon separated target teams
    #[arg(long, env = ENV_TARGET_TEAMS)]
    pub targets: Option<String>,

    /// Worker threads for match processing
    #[arg(long, env = ENV_PARALLELISM)]
    pub parallelism: Option<usize>,

    /// Output directory
    #[arg(long, env = ENV_OUT_DIR)]
    pub out_dir: Option<PathBuf>,
}

impl ReportConfig {
    /// Resolves parsed flags against the defaults. A target list with no
    /// usable names keeps the default targets.
    pub fn from_args(args: &ReportArgs) -> Self {
        let mut cfg = Self::default();
        if let Some(dir) = &args.data_dir {
            cfg.data_dir = dir.clone();
        }
        if let Some(id) = args.competition_id {
            cfg.competition_id = id;
        }
        if let Some(id) = args.season_id {
            cfg.season_id = id;
        }
        if let Some(raw) = args.targets.as_deref() {
            let targets = TargetTeams::parse_list(raw);
            if !targets.is_empty() {
                cfg.targets = targets;
            }
        }
        if let Some(n) = args.parallelism {
            cfg.parallelism = n.clamp(1, MAX_PARALLELISM);
        }
        if let Some(dir) = &args.out_dir {
            cfg.out_dir = dir.clone();
        }
        cfg
    }

    pub fn layout(&self) -> OpenDataLayout {
        OpenDataLayout::new(&self.data_dir)
    }

    pub fn matches_path(&self) -> PathBuf {
        self.layout().matches_path(self.competition_id, self.season_id)
    }

    pub fn report_options(&self) -> ReportOptions {
        ReportOptions {
            parallelism: self.parallelism,
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;

    #[derive(Parser)]
    struct Cli {
        #[command(flatten)]
        report: ReportArgs,
    }

    #[test]
    fn defaults_when_unset() {
        let cfg = ReportConfig::from_args(&ReportArgs::default());
        assert_eq!(cfg.competition_id, 11);
        assert_eq!(cfg.season_id, 90);
        assert_eq!(cfg.parallelism, DEFAULT_PARALLELISM);
        assert_eq!(
            cfg.matches_path(),
            PathBuf::from("data/statsbomb_open_data/matches/11_90.json")
        );
        assert!(cfg.targets.contains_key("Paris S-G"));
    }

    #[test]
    fn flags_override_defaults_and_parallelism_is_clamped() {
        let cli = Cli::try_parse_from([
            "team_report",
            "--data-dir",
            "/tmp/sb",
            "--competition-id",
            "16",
            "--targets",
            "Liverpool;Atlético Madrid",
            "--parallelism",
            "500",
        ])
        .unwrap();
        let cfg = ReportConfig::from_args(&cli.report);
        assert_eq!(cfg.data_dir, PathBuf::from("/tmp/sb"));
        assert_eq!(cfg.competition_id, 16);
        assert_eq!(cfg.season_id, DEFAULT_SEASON_ID);
        assert_eq!(cfg.targets.len(), 2);
        assert!(cfg.targets.contains_key("Atletico Madrid"));
        assert_eq!(cfg.parallelism, MAX_PARALLELISM);
        assert_eq!(cfg.out_dir, PathBuf::from("."));
    }

    #[test]
    fn blank_target_list_keeps_defaults() {
        let args = ReportArgs {
            targets: Some(" ; , ".to_string()),
            parallelism: Some(0),
            ..Default::default()
        };
        let cfg = ReportConfig::from_args(&args);
        assert_eq!(cfg.targets.len(), TargetTeams::defaults().len());
        assert_eq!(cfg.parallelism, 1);
    }

    #[test]
    fn unparseable_flag_is_rejected() {
        assert!(Cli::try_parse_from(["team_report", "--season-id", "nope"]).is_err());
    }
}

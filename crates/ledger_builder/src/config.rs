//! Run configuration.

use chrono::{Datelike, NaiveDate, Utc};
use ld_core::SeasonType;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

pub const DEFAULT_LEDGER_PATH: &str = "legacy_drives_cache.json";
pub const DEFAULT_NAME_MAP_PATH: &str = "qb_name_cache.json";

/// Environment overrides read by the CLI
pub const LEDGER_PATH_ENV: &str = "LD_LEDGER_PATH";
pub const NAME_MAP_PATH_ENV: &str = "LD_NAME_MAP_PATH";
pub const PBP_PATH_ENV: &str = "LD_PBP_PATH";

/// Which season types are ingested from the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SeasonTypeFilter {
    #[default]
    All,
    Regular,
    Post,
}

impl SeasonTypeFilter {
    pub fn matches(self, season_type: SeasonType) -> bool {
        match self {
            SeasonTypeFilter::All => true,
            SeasonTypeFilter::Regular => season_type == SeasonType::Regular,
            SeasonTypeFilter::Post => season_type == SeasonType::Post,
        }
    }
}

impl FromStr for SeasonTypeFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(SeasonTypeFilter::All),
            "reg" | "regular" => Ok(SeasonTypeFilter::Regular),
            "post" | "postseason" => Ok(SeasonTypeFilter::Post),
            other => Err(format!("unknown season type '{}' (expected all, reg or post)", other)),
        }
    }
}

impl fmt::Display for SeasonTypeFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SeasonTypeFilter::All => "all",
            SeasonTypeFilter::Regular => "reg",
            SeasonTypeFilter::Post => "post",
        })
    }
}

/// NFL season a date belongs to. January and February games finish the
/// previous calendar year's season.
pub fn season_for_date(date: NaiveDate) -> i32 {
    if date.month() <= 2 {
        date.year() - 1
    } else {
        date.year()
    }
}

pub fn current_season() -> i32 {
    season_for_date(Utc::now().date_naive())
}

#[derive(Debug, Clone, PartialEq)]
pub struct RunConfig {
    pub ledger_path: PathBuf,
    pub name_map_path: PathBuf,
    /// CSV file or directory of `play_by_play_<season>.csv` files
    pub source_path: Option<PathBuf>,
    pub current_season: i32,
    pub season_type_filter: SeasonTypeFilter,
    /// Where to write the JSON report, if anywhere
    pub report_path: Option<PathBuf>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            ledger_path: PathBuf::from(DEFAULT_LEDGER_PATH),
            name_map_path: PathBuf::from(DEFAULT_NAME_MAP_PATH),
            source_path: None,
            current_season: current_season(),
            season_type_filter: SeasonTypeFilter::All,
            report_path: None,
        }
    }
}

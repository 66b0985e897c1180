//! Ledger Builder Library
//!
//! Batch job around `ld_core`: reads play-by-play CSV exports, classifies the
//! games the ledger has not seen yet, persists the updated snapshots and
//! hands the leaderboard report to renderers.

pub mod config;
pub mod run;
pub mod source;

pub use config::{current_season, season_for_date, RunConfig, SeasonTypeFilter};
pub use run::{leaderboard_only, run, write_report, RunContext, RunSummary};
pub use source::{read_plays, CsvPlaySource, Fetched, ParseStats, PlaySource};

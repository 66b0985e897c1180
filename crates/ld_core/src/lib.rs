//! # ld_core - Legacy Drive Ledger
//!
//! Turns raw play-by-play rows into a durable ledger of "legacy drive"
//! opportunities and reduces that ledger into per-quarterback leaderboards.
//!
//! ## Pipeline
//! - `segment` - group plays into drives, pick Q4/OT opportunity drive starts
//! - `resolve` - attribute each drive to a quarterback (or a team placeholder)
//! - `classify` - era-aware success/failure rules
//! - `pipeline` - per-candidate glue producing `ClassifiedDrive`s
//! - `ledger` - incremental cache state, merge protocol and JSON store
//! - `leaderboard` / `present` / `report` - downstream views

pub mod classify;
pub mod detail;
pub mod error;
pub mod leaderboard;
pub mod ledger;
pub mod models;
pub mod names;
pub mod pipeline;
pub mod present;
pub mod report;
pub mod resolve;
pub mod segment;

#[cfg(test)]
pub(crate) mod testing;

pub use classify::{classify, DriveFacts, Outcome};
pub use error::{LedgerError, Result};
pub use leaderboard::{build_leaderboard, LeaderboardRecord};
pub use ledger::{seasons_to_load, LedgerState, MergeStats, NewGames};
pub use models::{
    ClassifiedDrive, DriveResult, LegacyDriveRow, Opportunity, Period, PlayEvent, SeasonType,
};
pub use names::{ObservedNames, PlayerNameMap};
pub use pipeline::process_new_games;
pub use report::{build_report, LeaderboardReport};
pub use resolve::{is_placeholder, NameSources, ResolvedPlayer};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// Incremental ledger for legacy drive opportunities
// JSON snapshots, rewritten in full at the end of a run

pub mod migration;
pub mod state;
pub mod store;

pub use migration::ledger_from_value;
pub use state::{seasons_to_load, LedgerState, MergeStats, NewGames};
pub use store::{load_ledger, load_name_map, save_ledger, save_name_map};

/// `last_season_processed` of a fresh ledger.
pub const DEFAULT_LAST_SEASON: i32 = 2000;

//! Domain types: raw play rows and the persisted ledger records.

pub mod opportunity;
pub mod play;

pub use opportunity::{ClassifiedDrive, DriveResult, LegacyDriveRow, Opportunity, Period};
pub use play::{PlayEvent, SeasonType};

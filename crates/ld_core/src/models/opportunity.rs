use super::play::SeasonType;
use serde::{Deserialize, Serialize};

/// Outcome of an opportunity drive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DriveResult {
    #[serde(rename = "W")]
    Win,
    #[serde(rename = "L")]
    Loss,
}

impl DriveResult {
    pub fn is_win(&self) -> bool {
        matches!(self, DriveResult::Win)
    }
}

/// Game period a drive started in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Period {
    Q4,
    OT,
    /// Unrecognised period label from an older snapshot
    #[serde(other)]
    Other,
}

/// Minimal persisted form of an opportunity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Opportunity {
    pub qb_id: String,
    pub result: DriveResult,
    /// Older snapshots predate this field; they were regular-season only.
    #[serde(default)]
    pub season_type: SeasonType,
}

/// Display-oriented record for one opportunity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegacyDriveRow {
    #[serde(default)]
    pub season_type: SeasonType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub qb_id: Option<String>,
    pub qb_name: Option<String>,
    pub season: Option<i32>,
    pub week: Option<i32>,
    /// Postseason round (WC/DIV/CC/SB)
    pub week_label: Option<String>,
    pub away_team: Option<String>,
    pub home_team: Option<String>,
    #[serde(default)]
    pub game_id: String,
    pub period: Period,
    /// e.g. `"down 6"`
    pub start_score_diff: Option<String>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub final_down: Option<String>,
    pub final_ydstogo: Option<String>,
    pub final_play: Option<String>,
    pub end_team_score: i32,
    pub end_opp_score: i32,
    pub result: DriveResult,
    pub reason: String,
}

/// An opportunity together with its detail row. Always produced and merged
/// as a pair.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassifiedDrive {
    pub opportunity: Opportunity,
    pub row: LegacyDriveRow,
}

impl ClassifiedDrive {
    pub fn game_id(&self) -> &str {
        &self.row.game_id
    }
}

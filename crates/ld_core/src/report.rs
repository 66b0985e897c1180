//! Hand-off for renderers: ranked leaderboards plus ordered detail rows.

use crate::leaderboard::{build_leaderboard, LeaderboardRecord};
use crate::ledger::LedgerState;
use crate::models::{LegacyDriveRow, SeasonType};
use crate::names::PlayerNameMap;
use crate::present::{chronological, recent, split_by_season_type};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardReport {
    pub generated_at: String,
    pub current_season: i32,
    pub regular: Vec<LeaderboardRecord>,
    pub postseason: Vec<LeaderboardRecord>,
    pub regular_rows: Vec<LegacyDriveRow>,
    pub postseason_rows: Vec<LegacyDriveRow>,
    pub recent_rows: Vec<LegacyDriveRow>,
}

pub fn build_report(
    ledger: &LedgerState,
    names: &PlayerNameMap,
    current_season: i32,
    generated_at: DateTime<Utc>,
) -> LeaderboardReport {
    let regular = build_leaderboard(ledger.opportunities_for(SeasonType::Regular), names);
    let postseason = build_leaderboard(ledger.opportunities_for(SeasonType::Post), names);
    let (regular_rows, postseason_rows) =
        split_by_season_type(chronological(&ledger.legacydrive_rows));

    LeaderboardReport {
        generated_at: generated_at.to_rfc3339(),
        current_season,
        regular,
        postseason,
        regular_rows,
        postseason_rows,
        recent_rows: recent(&ledger.legacydrive_rows, current_season),
    }
}

impl LeaderboardReport {
    pub fn leaderboard(&self, season_type: SeasonType) -> &[LeaderboardRecord] {
        match season_type {
            SeasonType::Regular => &self.regular,
            SeasonType::Post => &self.postseason,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ClassifiedDrive, DriveResult, Opportunity, Period};
    use crate::ledger::NewGames;
    use chrono::TimeZone;
    use std::collections::BTreeSet;

    fn classified(game: &str, qb: &str, season_type: SeasonType, result: DriveResult) -> ClassifiedDrive {
        ClassifiedDrive {
            opportunity: Opportunity { qb_id: qb.to_string(), result, season_type },
            row: LegacyDriveRow {
                season_type,
                qb_id: Some(qb.to_string()),
                qb_name: Some(qb.to_string()),
                season: Some(2022),
                week: Some(if season_type == SeasonType::Post { 19 } else { 4 }),
                week_label: None,
                away_team: Some("BUF".to_string()),
                home_team: Some("MIA".to_string()),
                game_id: game.to_string(),
                period: Period::Q4,
                start_score_diff: Some("down 2".to_string()),
                start_time: Some("01:30".to_string()),
                end_time: Some("00:05".to_string()),
                final_down: None,
                final_ydstogo: None,
                final_play: None,
                end_team_score: 0,
                end_opp_score: 0,
                result,
                reason: String::new(),
            },
        }
    }

    #[test]
    fn test_report_splits_by_season_type() {
        let mut ledger = LedgerState::new();
        ledger.merge_new_games(NewGames {
            drives: vec![
                classified("p1", "QB1", SeasonType::Post, DriveResult::Win),
                classified("r1", "QB1", SeasonType::Regular, DriveResult::Loss),
                classified("r2", "QB2", SeasonType::Regular, DriveResult::Win),
                classified("r3", "TEAM_MIA", SeasonType::Regular, DriveResult::Win),
            ],
            game_ids: BTreeSet::new(),
        });
        let mut names = PlayerNameMap::new();
        names.insert("QB1", "J.Allen");

        let at = Utc.with_ymd_and_hms(2024, 10, 1, 12, 0, 0).unwrap();
        let report = build_report(&ledger, &names, 2024, at);

        assert_eq!(report.generated_at, "2024-10-01T12:00:00+00:00");
        assert_eq!(report.regular.len(), 2);
        assert_eq!(report.regular[0].player_id, "QB2");
        assert_eq!(report.postseason.len(), 1);
        assert_eq!(report.leaderboard(SeasonType::Post)[0].player_name, "J.Allen");
        assert_eq!(report.regular_rows.len(), 3);
        assert_eq!(report.postseason_rows.len(), 1);
        assert_eq!(report.recent_rows.len(), 4);
        assert_eq!(report.recent_rows[0].game_id, "p1");
    }
}

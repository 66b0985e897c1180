//! Display ordering of `LegacyDriveRow`s.
//!
//! Two views: the full chronological listing (oldest first) and the recent
//! activity listing (newest first, limited to the last few seasons). A start
//! clock that is not `mm:ss` sorts after every valid clock in both views; the
//! chronological view uses `-1` as its sentinel, the recent view `999999`.

use crate::models::{LegacyDriveRow, Period, SeasonType};
use std::cmp::Reverse;

/// The recent view covers `current_season - RECENT_SEASONS ..= current_season`.
pub const RECENT_SEASONS: i32 = 4;

const CHRONOLOGICAL_MALFORMED_CLOCK: i32 = -1;
const RECENT_MALFORMED_CLOCK: i32 = 999_999;

pub fn period_order(period: Period) -> u8 {
    match period {
        Period::Q4 => 4,
        Period::OT => 5,
        Period::Other => 99,
    }
}

/// `"mm:ss"` as seconds.
pub fn clock_seconds(clock: Option<&str>) -> Option<i32> {
    let (minutes, seconds) = clock?.split_once(':')?;
    let minutes: i32 = minutes.trim().parse().ok()?;
    let seconds: i32 = seconds.trim().parse().ok()?;
    minutes.checked_mul(60)?.checked_add(seconds)
}

fn season_type_order(season_type: SeasonType) -> u8 {
    match season_type {
        SeasonType::Regular => 0,
        SeasonType::Post => 1,
    }
}

type ChronologicalKey<'a> = (u8, i32, i32, &'a str, u8, Reverse<i32>);

fn chronological_key(row: &LegacyDriveRow) -> ChronologicalKey<'_> {
    (
        season_type_order(row.season_type),
        row.season.unwrap_or(0),
        row.week.unwrap_or(0),
        row.game_id.as_str(),
        period_order(row.period),
        // later clock first within a period
        Reverse(clock_seconds(row.start_time.as_deref()).unwrap_or(CHRONOLOGICAL_MALFORMED_CLOCK)),
    )
}

/// REG before POST, then season, week, game, period (Q4, OT, other), then
/// start clock descending.
pub fn sort_chronological(rows: &mut [LegacyDriveRow]) {
    rows.sort_by(|a, b| chronological_key(a).cmp(&chronological_key(b)));
}

pub fn chronological(rows: &[LegacyDriveRow]) -> Vec<LegacyDriveRow> {
    let mut sorted = rows.to_vec();
    sort_chronological(&mut sorted);
    sorted
}

type RecentKey<'a> = (Reverse<i32>, Reverse<i32>, &'a str, Reverse<u8>, i32);

fn recent_key(row: &LegacyDriveRow) -> RecentKey<'_> {
    let period_rank = match row.period {
        Period::OT => 2,
        Period::Q4 => 1,
        Period::Other => 0,
    };
    (
        Reverse(row.season.unwrap_or(0)),
        Reverse(row.week.unwrap_or(0)),
        row.game_id.as_str(),
        Reverse(period_rank),
        clock_seconds(row.start_time.as_deref()).unwrap_or(RECENT_MALFORMED_CLOCK),
    )
}

/// Rows from the last [`RECENT_SEASONS`] seasons, newest season and week
/// first. Within a game OT rows come before Q4 rows and clocks ascend.
pub fn recent(rows: &[LegacyDriveRow], current_season: i32) -> Vec<LegacyDriveRow> {
    let min_season = current_season - RECENT_SEASONS;
    let mut recent: Vec<LegacyDriveRow> = rows
        .iter()
        .filter(|r| r.season.unwrap_or(0) >= min_season)
        .cloned()
        .collect();
    recent.sort_by(|a, b| recent_key(a).cmp(&recent_key(b)));
    recent
}

/// Splits rows into (regular season, postseason), keeping their order.
pub fn split_by_season_type(
    rows: Vec<LegacyDriveRow>,
) -> (Vec<LegacyDriveRow>, Vec<LegacyDriveRow>) {
    rows.into_iter().partition(|r| r.season_type == SeasonType::Regular)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DriveResult;

    fn row(season: i32, week: i32, game_id: &str, period: Period, start: &str) -> LegacyDriveRow {
        LegacyDriveRow {
            season_type: SeasonType::Regular,
            qb_id: Some("QB1".to_string()),
            qb_name: Some("QB One".to_string()),
            season: Some(season),
            week: Some(week),
            week_label: None,
            away_team: Some("NE".to_string()),
            home_team: Some("NYJ".to_string()),
            game_id: game_id.to_string(),
            period,
            start_score_diff: Some("down 3".to_string()),
            start_time: Some(start.to_string()),
            end_time: None,
            final_down: None,
            final_ydstogo: None,
            final_play: None,
            end_team_score: 0,
            end_opp_score: 0,
            result: DriveResult::Win,
            reason: String::new(),
        }
    }

    fn starts(rows: &[LegacyDriveRow]) -> Vec<String> {
        rows.iter()
            .map(|r| format!("{}:{}", r.game_id, r.start_time.as_deref().unwrap_or("")))
            .collect()
    }

    #[test]
    fn test_clock_seconds() {
        assert_eq!(clock_seconds(Some("02:30")), Some(150));
        assert_eq!(clock_seconds(Some("10:00")), Some(600));
        assert_eq!(clock_seconds(Some("2:5")), Some(125));
        assert_eq!(clock_seconds(Some("garbage")), None);
        assert_eq!(clock_seconds(Some("a:b")), None);
        assert_eq!(clock_seconds(Some("99999999:00")), None);
        assert_eq!(clock_seconds(Some("00:2147483647")), Some(i32::MAX));
        assert_eq!(clock_seconds(Some("01:2147483647")), None);
        assert_eq!(clock_seconds(None), None);
    }

    #[test]
    fn test_chronological_order() {
        let mut post = row(2014, 18, "a", Period::Q4, "01:00");
        post.season_type = SeasonType::Post;
        let rows = vec![
            post,
            row(2015, 2, "b", Period::OT, "10:00"),
            row(2015, 2, "b", Period::Q4, "00:40"),
            row(2015, 2, "b", Period::Q4, "02:50"),
            row(2015, 1, "c", Period::Q4, "01:00"),
        ];
        let sorted = chronological(&rows);
        assert_eq!(starts(&sorted), vec!["c:01:00", "b:02:50", "b:00:40", "b:10:00", "a:01:00"]);
    }

    #[test]
    fn test_overflowing_clock_sorts_as_malformed() {
        let rows = vec![
            row(2015, 1, "g", Period::Q4, "99999999:00"),
            row(2015, 1, "g", Period::Q4, "01:00"),
        ];
        assert_eq!(starts(&chronological(&rows)), vec!["g:01:00", "g:99999999:00"]);
        assert_eq!(starts(&recent(&rows, 2015)), vec!["g:01:00", "g:99999999:00"]);
    }

    #[test]
    fn test_chronological_malformed_clock_sorts_last() {
        let rows = vec![
            row(2015, 1, "g", Period::Q4, "??"),
            row(2015, 1, "g", Period::Q4, "00:01"),
            row(2015, 1, "g", Period::Q4, "02:00"),
        ];
        assert_eq!(starts(&chronological(&rows)), vec!["g:02:00", "g:00:01", "g:??"]);
    }

    #[test]
    fn test_recent_view() {
        let rows = vec![
            row(2019, 10, "old", Period::Q4, "01:00"),
            row(2021, 3, "x", Period::Q4, "02:00"),
            row(2023, 5, "y", Period::Q4, "??"),
            row(2023, 5, "y", Period::Q4, "02:00"),
            row(2023, 5, "y", Period::Q4, "00:40"),
            row(2023, 5, "y", Period::OT, "08:00"),
            row(2023, 7, "z", Period::Q4, "01:00"),
        ];
        let recent = recent(&rows, 2024);
        assert_eq!(
            starts(&recent),
            vec!["z:01:00", "y:08:00", "y:00:40", "y:02:00", "y:??", "x:02:00"]
        );
    }

    #[test]
    fn test_split_keeps_order() {
        let mut post = row(2015, 19, "p", Period::OT, "10:00");
        post.season_type = SeasonType::Post;
        let rows = vec![row(2015, 1, "r1", Period::Q4, "01:00"), post, row(2015, 2, "r2", Period::Q4, "01:00")];
        let (reg, post) = split_by_season_type(rows);
        assert_eq!(reg.iter().map(|r| r.game_id.as_str()).collect::<Vec<_>>(), vec!["r1", "r2"]);
        assert_eq!(post.len(), 1);
    }
}

//! Fixture builders shared by unit tests.

use crate::models::{PlayEvent, SeasonType};

/// A Q4 play for `KC` (offense) vs `DEN` in a 2015 regular-season game.
pub(crate) fn play(game_id: &str, drive: u32, play_id: u32) -> PlayEvent {
    PlayEvent {
        game_id: game_id.to_string(),
        season: Some(2015),
        week: Some(5),
        season_type: SeasonType::Regular,
        home_team: Some("DEN".to_string()),
        away_team: Some("KC".to_string()),
        qtr: 4,
        drive: Some(drive),
        play_id,
        posteam: Some("KC".to_string()),
        defteam: Some("DEN".to_string()),
        ..Default::default()
    }
}

/// Sets the clock fields from seconds left in the quarter. Q4 and OT are the
/// last period played, so game and quarter clocks agree.
pub(crate) fn at_clock(mut play: PlayEvent, quarter_seconds: i32) -> PlayEvent {
    play.quarter_seconds_remaining = Some(quarter_seconds);
    play.game_seconds_remaining = Some(quarter_seconds);
    play.time = Some(format!("{:02}:{:02}", quarter_seconds / 60, quarter_seconds % 60));
    play
}

pub(crate) fn with_score(mut play: PlayEvent, offense: i32, defense: i32) -> PlayEvent {
    play.posteam_score = Some(offense);
    play.defteam_score = Some(defense);
    play
}

pub(crate) fn with_post_score(mut play: PlayEvent, offense: i32, defense: i32) -> PlayEvent {
    play.posteam_score_post = Some(offense);
    play.defteam_score_post = Some(defense);
    play
}

//! Era-aware success/failure rules for opportunity drives.
//!
//! Dispatch order is period, then era, then OT rank:
//!
//! | period | era                         | win when                          |
//! |--------|-----------------------------|-----------------------------------|
//! | Q4     | any                         | drive ends tied or leading        |
//! | OT     | POST < 2010 / REG < 2012    | offense scores a TD or made FG    |
//! | OT     | modern, 1st OT drive        | offense scores a TD               |
//! | OT     | modern, later OT drives     | drive ends strictly leading       |

use crate::models::{DriveResult, Period, PlayEvent, SeasonType};
use std::cmp::Reverse;

/// First postseason with the modified overtime rule.
pub const POST_OT_RULE_SEASON: i32 = 2010;
/// First regular season with the modified overtime rule.
pub const REG_OT_RULE_SEASON: i32 = 2012;
/// Q4 drives starting at or under this clock only count when they succeed.
pub const LATE_LOSS_CUTOFF_SECONDS: i32 = 30;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub result: DriveResult,
    pub reason: String,
}

impl Outcome {
    fn new(result: DriveResult, reason: impl Into<String>) -> Self {
        Self { result, reason: reason.into() }
    }
}

/// Everything the rules need about one drive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DriveFacts {
    pub period: Period,
    pub season_type: SeasonType,
    pub season: Option<i32>,
    pub ot_rank: u32,
    pub touchdown: bool,
    pub field_goal: bool,
    pub end_team_score: i32,
    pub end_opp_score: i32,
}

/// Final game state of a drive.
#[derive(Debug, Clone, Copy)]
pub struct DriveEnd<'a> {
    /// Play the end scores were read from
    pub last_play: &'a PlayEvent,
    pub team_score: i32,
    pub opp_score: i32,
}

/// Orders a drive latest play first: ascending clock remaining, then
/// descending `play_id`. The game clock is used when the drive carries one.
pub fn latest_first<'a>(drive: &[&'a PlayEvent]) -> Vec<&'a PlayEvent> {
    let use_game_clock = drive.iter().any(|p| p.game_seconds_remaining.is_some());
    let clock = |p: &PlayEvent| {
        if use_game_clock {
            p.game_seconds_remaining
        } else {
            p.quarter_seconds_remaining
        }
    };

    let mut ordered = drive.to_vec();
    // Plays without a clock reading sort after every timed play
    ordered.sort_by_key(|p| (clock(*p).is_none(), clock(*p), Reverse(p.play_id)));
    ordered
}

/// Forward fill then backward fill.
fn fill(values: &mut [Option<i32>]) {
    let mut last = None;
    for v in values.iter_mut() {
        match v {
            Some(x) => last = Some(*x),
            None => *v = last,
        }
    }
    let mut next = None;
    for v in values.iter_mut().rev() {
        match v {
            Some(x) => next = Some(*x),
            None => *v = next,
        }
    }
}

/// End-of-drive scores from a latest-first drive, or `None` when no play
/// carries both post-play scores.
pub fn drive_end<'a>(ordered: &[&'a PlayEvent]) -> Option<DriveEnd<'a>> {
    let mut team: Vec<Option<i32>> = ordered.iter().map(|p| p.posteam_score_post).collect();
    let mut opp: Vec<Option<i32>> = ordered.iter().map(|p| p.defteam_score_post).collect();
    fill(&mut team);
    fill(&mut opp);

    let first = *ordered.first()?;
    if let (Some(team_score), Some(opp_score)) = (team[0], opp[0]) {
        return Some(DriveEnd { last_play: first, team_score, opp_score });
    }

    (0..ordered.len()).find_map(|i| match (team[i], opp[i]) {
        (Some(team_score), Some(opp_score)) => {
            Some(DriveEnd { last_play: ordered[i], team_score, opp_score })
        }
        _ => None,
    })
}

type TeamField = fn(&PlayEvent) -> Option<&str>;

fn scoring_team(play: &PlayEvent) -> Option<&str> {
    play.td_team.as_deref()
}

fn offense_team(play: &PlayEvent) -> Option<&str> {
    play.posteam.as_deref()
}

/// Which team a scoring play belongs to, most precise field first.
const ATTRIBUTION: [TeamField; 2] = [scoring_team, offense_team];

/// Whether a scoring play counts for `offense`. With no team field to
/// compare against, any score counts.
pub fn attributable(play: &PlayEvent, offense: Option<&str>) -> bool {
    let Some(offense) = offense else {
        return true;
    };
    match ATTRIBUTION.iter().find_map(|field| field(play)) {
        Some(team) => team == offense,
        None => true,
    }
}

pub fn touchdown_by(drive: &[&PlayEvent], offense: Option<&str>) -> bool {
    drive.iter().any(|p| p.is_touchdown() && attributable(p, offense))
}

pub fn field_goal_by(drive: &[&PlayEvent], offense: Option<&str>) -> bool {
    drive.iter().any(|p| p.is_field_goal_made() && attributable(p, offense))
}

/// Label of the pre-rule-change overtime era a drive falls in, if any.
fn legacy_overtime_era(season_type: SeasonType, season: Option<i32>) -> Option<&'static str> {
    let season = season?;
    match season_type {
        SeasonType::Post if season < POST_OT_RULE_SEASON => Some("POST pre-2010"),
        SeasonType::Regular if season < REG_OT_RULE_SEASON => Some("REG pre-2012"),
        _ => None,
    }
}

pub fn classify(facts: &DriveFacts) -> Outcome {
    use DriveResult::{Loss, Win};

    if facts.period != Period::OT {
        return if facts.end_team_score >= facts.end_opp_score {
            Outcome::new(Win, "Q4: drive ended tied or leading (Success)")
        } else {
            Outcome::new(Loss, "Q4: drive ended still trailing (Failure)")
        };
    }

    if let Some(era) = legacy_overtime_era(facts.season_type, facts.season) {
        return if facts.touchdown || facts.field_goal {
            Outcome::new(Win, format!("OT ({}): FG/TD scored on drive (Success)", era))
        } else {
            Outcome::new(Loss, format!("OT ({}): no FG/TD scored on drive (Failure)", era))
        };
    }

    if facts.ot_rank == 1 {
        return if facts.touchdown {
            Outcome::new(Win, "OT (1st drive): TD scored (Success)")
        } else {
            Outcome::new(Loss, "OT (1st drive): no TD (FG or no score) (Failure)")
        };
    }

    if facts.end_team_score > facts.end_opp_score {
        Outcome::new(Win, format!("OT (drive {}): ended leading (Success)", facts.ot_rank))
    } else {
        Outcome::new(Loss, format!("OT (drive {}): ended not leading (Failure)", facts.ot_rank))
    }
}

/// Q4 drives starting with 0:30 or less only count when they succeed.
pub fn is_suppressed_late_loss(
    period: Period,
    start_quarter_seconds: Option<i32>,
    result: DriveResult,
) -> bool {
    period == Period::Q4
        && result == DriveResult::Loss
        && start_quarter_seconds.is_some_and(|s| s <= LATE_LOSS_CUTOFF_SECONDS)
}

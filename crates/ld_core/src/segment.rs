//! Drive segmentation and opportunity selection.
//!
//! Plays are split into Q4 (`qtr == 4`) and OT (`qtr >= 5`), grouped by
//! `(game_id, drive)`, and each group's first play by `play_id` is the
//! drive-start row. Q4 starts qualify inside the late-deficit window; every
//! OT start qualifies and is ranked within its game.

use crate::models::{Period, PlayEvent};
use std::collections::BTreeMap;

/// Latest quarter clock (seconds) at which a Q4 drive start still qualifies.
pub const Q4_WINDOW_SECONDS: i32 = 180;
/// Offense-minus-defense score range for a Q4 start.
pub const Q4_MIN_DIFF: i32 = -8;
pub const Q4_MAX_DIFF: i32 = -1;

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DriveKey {
    pub game_id: String,
    pub drive: u32,
}

/// Plays of one period grouped into drives, each ordered by `play_id`.
#[derive(Debug, Default)]
pub struct PeriodDrives<'a> {
    drives: BTreeMap<DriveKey, Vec<&'a PlayEvent>>,
}

impl<'a> PeriodDrives<'a> {
    fn push(&mut self, play: &'a PlayEvent) {
        // Plays outside any drive (end of quarter, timeouts) are not grouped
        let Some(drive) = play.drive else {
            return;
        };
        let key = DriveKey { game_id: play.game_id.clone(), drive };
        self.drives.entry(key).or_default().push(play);
    }

    fn finish(&mut self) {
        for plays in self.drives.values_mut() {
            plays.sort_by_key(|p| p.play_id);
        }
    }

    pub fn get(&self, key: &DriveKey) -> Option<&[&'a PlayEvent]> {
        self.drives.get(key).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.drives.len()
    }

    pub fn is_empty(&self) -> bool {
        self.drives.is_empty()
    }

    /// Drive-start rows in `(game_id, drive)` order.
    pub fn starts(&self) -> impl Iterator<Item = (&DriveKey, &'a PlayEvent)> + '_ {
        self.drives.iter().filter_map(|(key, plays)| plays.first().map(|p| (key, *p)))
    }
}

/// A drive start that passed the situational filter.
#[derive(Debug, Clone)]
pub struct Candidate<'a> {
    pub key: DriveKey,
    pub period: Period,
    /// 1-based rank among the game's OT drives; `None` for Q4
    pub ot_rank: Option<u32>,
    /// Snapshot of the drive-start row (score, clock, teams, season)
    pub start: &'a PlayEvent,
    pub score_diff: Option<i32>,
}

#[derive(Debug, Default)]
pub struct Segmentation<'a> {
    pub q4: PeriodDrives<'a>,
    pub ot: PeriodDrives<'a>,
    /// Q4 candidates by `(game_id, drive)`, then OT candidates by
    /// `(game_id, qtr, play_id)`
    pub candidates: Vec<Candidate<'a>>,
}

impl<'a> Segmentation<'a> {
    pub fn drives(&self, period: Period) -> Option<&PeriodDrives<'a>> {
        match period {
            Period::Q4 => Some(&self.q4),
            Period::OT => Some(&self.ot),
            Period::Other => None,
        }
    }

    /// Full play group for a candidate; `None` when the data is inconsistent.
    pub fn drive_plays(&self, candidate: &Candidate<'a>) -> Option<&[&'a PlayEvent]> {
        self.drives(candidate.period)?.get(&candidate.key)
    }
}

/// Whether a Q4 drive-start row falls in the late-deficit window.
pub fn in_q4_window(start: &PlayEvent) -> bool {
    let in_clock = start
        .quarter_seconds_remaining
        .is_some_and(|s| (0..=Q4_WINDOW_SECONDS).contains(&s));
    let in_deficit = start.score_diff().is_some_and(|d| (Q4_MIN_DIFF..=Q4_MAX_DIFF).contains(&d));
    in_clock && in_deficit
}

pub fn segment<'a, I>(plays: I) -> Segmentation<'a>
where
    I: IntoIterator<Item = &'a PlayEvent>,
{
    let mut seg = Segmentation::default();
    for play in plays {
        match play.qtr {
            4 => seg.q4.push(play),
            q if q >= 5 => seg.ot.push(play),
            _ => {}
        }
    }
    seg.q4.finish();
    seg.ot.finish();

    let mut candidates: Vec<Candidate<'a>> = seg
        .q4
        .starts()
        .filter(|(_, start)| in_q4_window(start))
        .map(|(key, start)| Candidate {
            key: key.clone(),
            period: Period::Q4,
            ot_rank: None,
            start,
            score_diff: start.score_diff(),
        })
        .collect();

    let mut ot_starts: Vec<(&DriveKey, &'a PlayEvent)> = seg.ot.starts().collect();
    ot_starts.sort_by(|(ka, a), (kb, b)| {
        (&ka.game_id, a.qtr, a.play_id).cmp(&(&kb.game_id, b.qtr, b.play_id))
    });

    let mut rank = 0u32;
    let mut current_game: Option<&str> = None;
    for (key, start) in ot_starts {
        if current_game != Some(key.game_id.as_str()) {
            current_game = Some(key.game_id.as_str());
            rank = 0;
        }
        rank += 1;
        candidates.push(Candidate {
            key: key.clone(),
            period: Period::OT,
            ot_rank: Some(rank),
            start,
            score_diff: start.score_diff(),
        });
    }

    seg.candidates = candidates;
    seg
}

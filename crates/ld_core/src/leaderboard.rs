//! Per-player win/loss records.

use crate::models::Opportunity;
use crate::names::PlayerNameMap;
use crate::resolve::is_placeholder;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardRecord {
    pub player_id: String,
    pub player_name: String,
    pub wins: u32,
    pub losses: u32,
    pub decisions: u32,
    /// Percentage rounded to one decimal
    pub win_pct: f64,
}

impl LeaderboardRecord {
    fn new(player_id: &str, player_name: &str, wins: u32, losses: u32) -> Self {
        let decisions = wins + losses;
        Self {
            player_id: player_id.to_string(),
            player_name: player_name.to_string(),
            wins,
            losses,
            decisions,
            win_pct: win_pct(wins, decisions),
        }
    }
}

pub fn win_pct(wins: u32, decisions: u32) -> f64 {
    if decisions == 0 {
        return 0.0;
    }
    (f64::from(wins) / f64::from(decisions) * 1000.0).round() / 10.0
}

/// Wins descending, then losses ascending, then win percentage descending.
pub fn ranking(a: &LeaderboardRecord, b: &LeaderboardRecord) -> Ordering {
    b.wins
        .cmp(&a.wins)
        .then(a.losses.cmp(&b.losses))
        .then(b.win_pct.total_cmp(&a.win_pct))
}

/// Ranks the players behind `opportunities`, which should already be
/// restricted to one season type. Team placeholders are left out.
pub fn build_leaderboard<'a, I>(opportunities: I, names: &PlayerNameMap) -> Vec<LeaderboardRecord>
where
    I: IntoIterator<Item = &'a Opportunity>,
{
    let mut tally: BTreeMap<&str, (u32, u32)> = BTreeMap::new();
    for opp in opportunities {
        if is_placeholder(&opp.qb_id) {
            continue;
        }
        let entry = tally.entry(opp.qb_id.as_str()).or_default();
        if opp.result.is_win() {
            entry.0 += 1;
        } else {
            entry.1 += 1;
        }
    }

    let mut records: Vec<LeaderboardRecord> = tally
        .into_iter()
        .filter(|(_, (wins, losses))| wins + losses > 0)
        .map(|(id, (wins, losses))| LeaderboardRecord::new(id, names.display_name(id), wins, losses))
        .collect();

    records.sort_by(ranking);
    records
}

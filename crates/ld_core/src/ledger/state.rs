use super::DEFAULT_LAST_SEASON;
use crate::models::{ClassifiedDrive, LegacyDriveRow, Opportunity, SeasonType};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Persisted ledger snapshot.
///
/// `processed_games` only grows and `last_season_processed` never decreases.
/// Opportunities and rows are appended in pairs and never rewritten.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerState {
    pub opportunities: Vec<Opportunity>,
    pub processed_games: BTreeSet<String>,
    pub last_season_processed: i32,
    pub legacydrive_rows: Vec<LegacyDriveRow>,
    /// RFC 3339 time of the last rewrite
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<String>,
}

impl Default for LedgerState {
    fn default() -> Self {
        Self::new()
    }
}

/// Output of classifying a batch of newly seen games.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewGames {
    pub drives: Vec<ClassifiedDrive>,
    /// Every game id the batch covered, with or without opportunities
    pub game_ids: BTreeSet<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeStats {
    pub appended: usize,
    /// Drives of games the ledger had already processed
    pub skipped_drives: usize,
    pub new_games: usize,
    pub skipped_games: usize,
}

/// Seasons to fetch this run. Catch-up mode re-fetches the last processed
/// season in case it was incomplete.
pub fn seasons_to_load(last_season_processed: i32, current_season: i32) -> Vec<i32> {
    if last_season_processed < current_season - 1 {
        (last_season_processed..=current_season).collect()
    } else {
        vec![current_season]
    }
}

impl LedgerState {
    pub fn new() -> Self {
        Self {
            opportunities: Vec::new(),
            processed_games: BTreeSet::new(),
            last_season_processed: DEFAULT_LAST_SEASON,
            legacydrive_rows: Vec::new(),
            last_updated: None,
        }
    }

    pub fn is_processed(&self, game_id: &str) -> bool {
        self.processed_games.contains(game_id)
    }

    /// Game ids in `observed` the ledger has not processed yet.
    pub fn unprocessed<'a, I>(&self, observed: I) -> BTreeSet<String>
    where
        I: IntoIterator<Item = &'a str>,
    {
        observed
            .into_iter()
            .filter(|id| !self.is_processed(id))
            .map(str::to_string)
            .collect()
    }

    /// Appends the batch and records its games as processed. Drives of games
    /// already in `processed_games` are ignored, so merging the same batch
    /// twice leaves the ledger unchanged.
    pub fn merge_new_games(&mut self, batch: NewGames) -> MergeStats {
        let mut stats = MergeStats::default();
        let mut merged_games: BTreeSet<String> = BTreeSet::new();

        for drive in batch.drives {
            if self.is_processed(drive.game_id()) {
                stats.skipped_drives += 1;
                continue;
            }
            merged_games.insert(drive.row.game_id.clone());
            self.opportunities.push(drive.opportunity);
            self.legacydrive_rows.push(drive.row);
            stats.appended += 1;
        }

        merged_games.extend(batch.game_ids);
        for game_id in merged_games {
            if self.processed_games.insert(game_id) {
                stats.new_games += 1;
            } else {
                stats.skipped_games += 1;
            }
        }

        stats
    }

    /// Moves `last_season_processed` forward after a merge.
    ///
    /// - newest loaded season before `current_season`: that season is settled
    /// - catch-up that reached `current_season`: `current_season - 1` is settled
    /// - steady state (current season only): unchanged
    pub fn advance_last_season(&mut self, seasons_loaded: &[i32], current_season: i32) {
        let Some(&newest) = seasons_loaded.last() else {
            return;
        };
        let settled = if newest < current_season {
            Some(newest)
        } else if seasons_loaded.len() > 1 {
            Some(current_season - 1)
        } else {
            None
        };
        if let Some(season) = settled {
            self.last_season_processed = self.last_season_processed.max(season);
        }
    }

    pub fn touch(&mut self, now: DateTime<Utc>) {
        self.last_updated = Some(now.to_rfc3339());
    }

    pub fn opportunities_for(
        &self,
        season_type: SeasonType,
    ) -> impl Iterator<Item = &Opportunity> + '_ {
        self.opportunities.iter().filter(move |o| o.season_type == season_type)
    }

    pub fn is_empty(&self) -> bool {
        self.opportunities.is_empty()
    }
}

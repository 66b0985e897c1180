//! Play-by-play sources.
//!
//! The CSV source reads the public play-by-play export layout: either one
//! file holding many seasons, or a directory of `play_by_play_<season>.csv`
//! files. Columns are matched by header name.

use crate::config::SeasonTypeFilter;
use anyhow::{Context, Result};
use ld_core::PlayEvent;
use std::collections::BTreeSet;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

/// CSV parsing statistics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParseStats {
    pub total_rows: u32,
    pub parsed: u32,
    pub failed: u32,
    /// Parsed rows outside the requested seasons or season type
    pub filtered: u32,
}

impl ParseStats {
    fn absorb(&mut self, other: ParseStats) {
        self.total_rows += other.total_rows;
        self.parsed += other.parsed;
        self.failed += other.failed;
        self.filtered += other.filtered;
    }
}

#[derive(Debug, Clone, Default)]
pub struct Fetched {
    pub plays: Vec<PlayEvent>,
    pub stats: ParseStats,
}

/// Bulk provider of play rows for a set of seasons.
///
/// An empty result means the source had nothing for those seasons; errors
/// are reserved for sources that exist but cannot be read.
pub trait PlaySource {
    fn fetch(&self, seasons: &[i32], filter: SeasonTypeFilter) -> Result<Fetched>;
}

impl PlaySource for Vec<PlayEvent> {
    fn fetch(&self, seasons: &[i32], filter: SeasonTypeFilter) -> Result<Fetched> {
        let wanted: BTreeSet<i32> = seasons.iter().copied().collect();
        let plays: Vec<PlayEvent> = self
            .iter()
            .filter(|p| keep(p, Some(&wanted), filter))
            .cloned()
            .collect();
        let stats = ParseStats {
            total_rows: self.len() as u32,
            parsed: plays.len() as u32,
            failed: 0,
            filtered: (self.len() - plays.len()) as u32,
        };
        Ok(Fetched { plays, stats })
    }
}

#[derive(Debug, Clone)]
pub struct CsvPlaySource {
    path: PathBuf,
}

impl CsvPlaySource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn season_file(dir: &Path, season: i32) -> PathBuf {
        dir.join(format!("play_by_play_{}.csv", season))
    }
}

impl PlaySource for CsvPlaySource {
    fn fetch(&self, seasons: &[i32], filter: SeasonTypeFilter) -> Result<Fetched> {
        if self.path.is_dir() {
            let mut fetched = Fetched::default();
            for &season in seasons {
                let file = Self::season_file(&self.path, season);
                if !file.is_file() {
                    log::warn!("No play-by-play file for season {}: {}", season, file.display());
                    continue;
                }
                let (plays, stats) = read_plays_file(&file, None, filter)?;
                log::debug!("Season {}: {} rows from {}", season, plays.len(), file.display());
                fetched.plays.extend(plays);
                fetched.stats.absorb(stats);
            }
            return Ok(fetched);
        }

        if !self.path.exists() {
            log::warn!("Play-by-play source not found: {}", self.path.display());
            return Ok(Fetched::default());
        }

        let wanted: BTreeSet<i32> = seasons.iter().copied().collect();
        let (plays, stats) = read_plays_file(&self.path, Some(&wanted), filter)?;
        Ok(Fetched { plays, stats })
    }
}

fn read_plays_file(
    path: &Path,
    seasons: Option<&BTreeSet<i32>>,
    filter: SeasonTypeFilter,
) -> Result<(Vec<PlayEvent>, ParseStats)> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open CSV file: {}", path.display()))?;
    let (plays, stats) = read_plays(file, seasons, filter)
        .with_context(|| format!("Failed to read CSV file: {}", path.display()))?;

    if stats.failed > 0 {
        log::warn!(
            "{}: skipped {} of {} rows that could not be parsed",
            path.display(),
            stats.failed,
            stats.total_rows
        );
    }
    Ok((plays, stats))
}

/// Parses play rows from CSV text with a header row. Rows without a game id,
/// play id or quarter are counted as failed and skipped.
pub fn read_plays<R: Read>(
    reader: R,
    seasons: Option<&BTreeSet<i32>>,
    filter: SeasonTypeFilter,
) -> Result<(Vec<PlayEvent>, ParseStats)> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    // fail early on an unreadable header instead of counting every row
    reader.headers().context("Failed to read CSV header")?;

    let mut plays = Vec::new();
    let mut stats = ParseStats::default();

    for (index, record) in reader.deserialize::<PlayEvent>().enumerate() {
        stats.total_rows += 1;
        // header is line 1
        let line = index + 2;
        match record {
            Ok(play) if play.game_id.trim().is_empty() => {
                stats.failed += 1;
                log::debug!("Line {}: missing game_id", line);
            }
            Ok(play) => {
                if keep(&play, seasons, filter) {
                    stats.parsed += 1;
                    plays.push(play);
                } else {
                    stats.filtered += 1;
                }
            }
            Err(e) => {
                stats.failed += 1;
                log::debug!("Line {}: {}", line, e);
            }
        }
    }

    Ok((plays, stats))
}

fn keep(play: &PlayEvent, seasons: Option<&BTreeSet<i32>>, filter: SeasonTypeFilter) -> bool {
    let season_ok = match seasons {
        Some(wanted) => play.season.is_some_and(|s| wanted.contains(&s)),
        None => true,
    };
    season_ok && filter.matches(play.season_type)
}

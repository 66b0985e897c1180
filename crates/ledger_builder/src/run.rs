//! One batch run: load → fetch → classify new games → merge → persist → report.

use crate::config::RunConfig;
use crate::source::PlaySource;
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use ld_core::ledger::{load_ledger, load_name_map, save_ledger, save_name_map};
use ld_core::{
    build_report, process_new_games, seasons_to_load, LeaderboardReport, LedgerState,
    NameSources, ObservedNames, PlayerNameMap,
};
use std::fs;
use std::path::Path;

/// Ledger and name map owned by a single run.
#[derive(Debug, Clone, Default)]
pub struct RunContext {
    pub ledger: LedgerState,
    pub names: PlayerNameMap,
}

impl RunContext {
    pub fn load(config: &RunConfig) -> Result<Self> {
        let ledger = load_ledger(&config.ledger_path).with_context(|| {
            format!("Failed to load ledger: {}", config.ledger_path.display())
        })?;
        let names = load_name_map(&config.name_map_path).with_context(|| {
            format!("Failed to load name map: {}", config.name_map_path.display())
        })?;

        log::info!(
            "Loaded {} cached opportunities from {} games",
            ledger.opportunities.len(),
            ledger.processed_games.len()
        );
        log::info!("Last season fully processed: {}", ledger.last_season_processed);
        Ok(Self { ledger, names })
    }

    /// Rewrites both snapshots in full.
    pub fn persist(&mut self, config: &RunConfig, now: DateTime<Utc>) -> Result<()> {
        self.ledger.touch(now);
        save_ledger(&config.ledger_path, &self.ledger).with_context(|| {
            format!("Failed to save ledger: {}", config.ledger_path.display())
        })?;
        save_name_map(&config.name_map_path, &self.names).with_context(|| {
            format!("Failed to save name map: {}", config.name_map_path.display())
        })?;
        Ok(())
    }

    pub fn report(&self, current_season: i32, now: DateTime<Utc>) -> Option<LeaderboardReport> {
        if self.ledger.is_empty() {
            log::info!("No legacy drive opportunities found.");
            return None;
        }
        Some(build_report(&self.ledger, &self.names, current_season, now))
    }
}

#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    pub seasons_loaded: Vec<i32>,
    pub rows_fetched: usize,
    pub new_games: usize,
    pub new_opportunities: usize,
    pub total_opportunities: usize,
    /// Whether the snapshots were rewritten
    pub persisted: bool,
    pub report: Option<LeaderboardReport>,
}

pub fn run<S: PlaySource + ?Sized>(config: &RunConfig, source: &S) -> Result<RunSummary> {
    let mut ctx = RunContext::load(config)?;

    let seasons = seasons_to_load(ctx.ledger.last_season_processed, config.current_season);
    match (seasons.first(), seasons.last()) {
        (Some(first), Some(last)) if seasons.len() > 1 => {
            log::info!("Loading seasons {}-{} to catch up", first, last)
        }
        _ => log::info!("Only loading current season: {}", config.current_season),
    }

    let fetched = source.fetch(&seasons, config.season_type_filter)?;
    let mut summary = RunSummary {
        seasons_loaded: seasons.clone(),
        rows_fetched: fetched.plays.len(),
        total_opportunities: ctx.ledger.opportunities.len(),
        ..RunSummary::default()
    };

    if fetched.plays.is_empty() {
        log::info!("No play-by-play rows returned. Nothing to do.");
        return Ok(summary);
    }

    let new_games = ctx
        .ledger
        .unprocessed(fetched.plays.iter().map(|p| p.game_id.as_str()));
    log::info!("Found {} new games to process", new_games.len());

    // names seen anywhere in the fetched rows, not only in new games
    let observed = ObservedNames::from_plays(&fetched.plays);
    observed.merge_into(&mut ctx.names);

    if new_games.is_empty() {
        log::info!("No new games to process. Using cached data only.");
    } else {
        let sources = NameSources { quarterbacks: &observed.quarterbacks, passers: &ctx.names };
        let batch = process_new_games(&fetched.plays, &new_games, &sources);
        let stats = ctx.ledger.merge_new_games(batch);
        ctx.ledger.advance_last_season(&seasons, config.current_season);
        ctx.persist(config, Utc::now())?;

        summary.new_games = stats.new_games;
        summary.new_opportunities = stats.appended;
        summary.persisted = true;
        log::info!(
            "Processed {} new games. Total opportunities: {}",
            stats.new_games,
            ctx.ledger.opportunities.len()
        );
    }

    summary.total_opportunities = ctx.ledger.opportunities.len();
    summary.report = ctx.report(config.current_season, Utc::now());
    if let (Some(report), Some(path)) = (&summary.report, &config.report_path) {
        write_report(path, report)?;
    }
    Ok(summary)
}

/// Builds the report from the cached ledger alone, without touching the source.
pub fn leaderboard_only(config: &RunConfig) -> Result<Option<LeaderboardReport>> {
    let ctx = RunContext::load(config)?;
    let report = ctx.report(config.current_season, Utc::now());
    if let (Some(report), Some(path)) = (&report, &config.report_path) {
        write_report(path, report)?;
    }
    Ok(report)
}

pub fn write_report(path: &Path, report: &LeaderboardReport) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create output directory: {}", parent.display()))?;
    }
    let json = serde_json::to_string_pretty(report).context("Failed to serialize report")?;
    fs::write(path, json)
        .with_context(|| format!("Failed to write report: {}", path.display()))?;
    log::info!("Report written to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SeasonTypeFilter;
    use crate::source::CsvPlaySource;
    use ld_core::{DriveResult, PlayEvent};
    use tempfile::TempDir;

    const HEADER: &str = "game_id,season,week,season_type,home_team,away_team,qtr,drive,play_id,posteam,defteam,quarter_seconds_remaining,game_seconds_remaining,time,posteam_score,defteam_score,posteam_score_post,defteam_score_post,play_type,desc,down,ydstogo,qb_id,qb,pass_attempt,passer_id,passer,touchdown,td_team,field_goal_result";

    /// KC trails DEN 14-20 with 2:30 left and ties it; DEN then kneels.
    const GAME_2015: &[&str] = &[
        "2015_05_KC_DEN,2015,5,REG,DEN,KC,4,20,3000,KC,DEN,150,150,02:30,14,20,14,20,pass,A.Smith pass short left,1,10,QB1,A.Smith,1,QB1,A.Smith,0,,",
        "2015_05_KC_DEN,2015,5,REG,DEN,KC,4,20,3050,KC,DEN,10,10,00:10,14,20,20,20,pass,A.Smith pass to T.Kelce TOUCHDOWN,3,7,QB1,A.Smith,1,QB1,A.Smith,1,KC,",
        "2015_05_KC_DEN,2015,5,REG,DEN,KC,4,21,3100,DEN,KC,5,5,00:05,20,20,20,20,qb_kneel,P.Manning kneels,1,10,QB2,P.Manning,0,,,0,,",
    ];

    /// KC trails by 3 with 1:00 left and fails.
    const GAME_2016: &[&str] = &[
        "2016_02_KC_HOU,2016,2,REG,HOU,KC,4,18,2000,KC,HOU,60,60,01:00,17,20,17,20,pass,A.Smith pass incomplete,1,10,QB1,A.Smith,1,QB1,A.Smith,0,,",
        "2016_02_KC_HOU,2016,2,REG,HOU,KC,4,18,2010,KC,HOU,40,40,00:40,17,20,17,20,pass,A.Smith pass intercepted,2,10,QB1,A.Smith,1,QB1,A.Smith,0,,",
    ];

    fn write_csv(path: &Path, rows: &[&str]) {
        let mut text = String::from(HEADER);
        for row in rows {
            text.push('\n');
            text.push_str(row);
        }
        text.push('\n');
        fs::write(path, text).unwrap();
    }

    fn config(dir: &TempDir, current_season: i32) -> RunConfig {
        RunConfig {
            ledger_path: dir.path().join("legacy_drives_cache.json"),
            name_map_path: dir.path().join("qb_name_cache.json"),
            source_path: Some(dir.path().join("pbp.csv")),
            current_season,
            season_type_filter: SeasonTypeFilter::All,
            report_path: Some(dir.path().join("out").join("report.json")),
        }
    }

    fn csv_source(config: &RunConfig) -> CsvPlaySource {
        CsvPlaySource::new(config.source_path.clone().unwrap())
    }

    #[test]
    fn test_first_run_builds_and_persists_ledger() -> Result<()> {
        let dir = TempDir::new()?;
        let config = config(&dir, 2015);
        write_csv(config.source_path.as_ref().unwrap(), GAME_2015);

        let summary = run(&config, &csv_source(&config))?;
        assert_eq!(summary.seasons_loaded, (2000..=2015).collect::<Vec<_>>());
        assert_eq!(summary.rows_fetched, 3);
        assert_eq!(summary.new_games, 1);
        assert_eq!(summary.new_opportunities, 1);
        assert!(summary.persisted);

        let ledger = load_ledger(&config.ledger_path)?;
        assert_eq!(ledger.last_season_processed, 2014);
        assert_eq!(ledger.opportunities[0].qb_id, "QB1");
        assert_eq!(ledger.opportunities[0].result, DriveResult::Win);
        assert_eq!(ledger.legacydrive_rows[0].reason, "Q4: drive ended tied or leading (Success)");
        assert!(ledger.last_updated.is_some());

        let names = load_name_map(&config.name_map_path)?;
        assert_eq!(names.get("QB1"), Some("A.Smith"));
        assert_eq!(names.get("QB2"), Some("P.Manning"));

        let report = summary.report.unwrap();
        assert_eq!(report.regular[0].player_name, "A.Smith");
        assert_eq!(report.regular[0].wins, 1);
        assert!(report.postseason.is_empty());
        assert!(config.report_path.as_ref().unwrap().exists());
        Ok(())
    }

    #[test]
    fn test_rerun_without_new_games_leaves_snapshot_untouched() -> Result<()> {
        let dir = TempDir::new()?;
        let config = config(&dir, 2015);
        write_csv(config.source_path.as_ref().unwrap(), GAME_2015);
        run(&config, &csv_source(&config))?;
        let before = fs::read(&config.ledger_path)?;

        let summary = run(&config, &csv_source(&config))?;
        assert_eq!(summary.seasons_loaded, vec![2015]);
        assert_eq!(summary.new_games, 0);
        assert!(!summary.persisted);
        assert_eq!(summary.total_opportunities, 1);
        assert_eq!(fs::read(&config.ledger_path)?, before);
        Ok(())
    }

    #[test]
    fn test_next_season_appends_without_touching_old_entries() -> Result<()> {
        let dir = TempDir::new()?;
        let first = config(&dir, 2015);
        let pbp = first.source_path.clone().unwrap();
        write_csv(&pbp, GAME_2015);
        run(&first, &csv_source(&first))?;
        let old = load_ledger(&first.ledger_path)?;

        let mut rows = GAME_2015.to_vec();
        rows.extend_from_slice(GAME_2016);
        write_csv(&pbp, &rows);
        let second = RunConfig { current_season: 2016, ..first.clone() };
        let summary = run(&second, &csv_source(&second))?;

        assert_eq!(summary.seasons_loaded, vec![2014, 2015, 2016]);
        assert_eq!(summary.new_games, 1);
        let ledger = load_ledger(&second.ledger_path)?;
        assert_eq!(ledger.opportunities[0], old.opportunities[0]);
        assert_eq!(ledger.legacydrive_rows[0], old.legacydrive_rows[0]);
        assert_eq!(ledger.opportunities[1].result, DriveResult::Loss);
        assert_eq!(ledger.processed_games.len(), 2);
        assert_eq!(ledger.last_season_processed, 2015);

        let report = summary.report.unwrap();
        assert_eq!((report.regular[0].wins, report.regular[0].losses), (1, 1));
        assert_eq!(report.regular[0].win_pct, 50.0);
        Ok(())
    }

    #[test]
    fn test_empty_source_does_nothing() -> Result<()> {
        let dir = TempDir::new()?;
        let config = config(&dir, 2024);
        let summary = run(&config, &Vec::<PlayEvent>::new())?;
        assert_eq!(summary.rows_fetched, 0);
        assert!(!summary.persisted);
        assert!(summary.report.is_none());
        assert!(!config.ledger_path.exists());
        Ok(())
    }

    #[test]
    fn test_leaderboard_only_reads_cache() -> Result<()> {
        let dir = TempDir::new()?;
        let config = config(&dir, 2015);
        assert!(leaderboard_only(&config)?.is_none());

        write_csv(config.source_path.as_ref().unwrap(), GAME_2015);
        run(&config, &csv_source(&config))?;
        fs::remove_file(config.source_path.as_ref().unwrap())?;

        let report = leaderboard_only(&config)?.unwrap();
        assert_eq!(report.regular.len(), 1);
        assert_eq!(report.recent_rows.len(), 1);
        Ok(())
    }
}

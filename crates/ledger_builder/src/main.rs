//! Ledger Builder CLI
//!
//! `run` updates the ledger from play-by-play CSV and prints the leaderboards;
//! `leaderboard` prints them from the cached ledger alone.

#[cfg(feature = "cli")]
use anyhow::Result;
#[cfg(feature = "cli")]
use clap::{Args, Parser, Subcommand};
#[cfg(feature = "cli")]
use ld_core::{LeaderboardRecord, LeaderboardReport};
#[cfg(feature = "cli")]
use ledger_builder::config::{
    DEFAULT_LEDGER_PATH, DEFAULT_NAME_MAP_PATH, LEDGER_PATH_ENV, NAME_MAP_PATH_ENV, PBP_PATH_ENV,
};
#[cfg(feature = "cli")]
use ledger_builder::{current_season, CsvPlaySource, RunConfig, SeasonTypeFilter};
#[cfg(feature = "cli")]
use std::path::PathBuf;

#[cfg(feature = "cli")]
#[derive(Parser)]
#[command(name = "ledger_builder")]
#[command(about = "Maintain the legacy drive ledger and its leaderboards", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[cfg(feature = "cli")]
#[derive(Args)]
struct Common {
    /// Ledger snapshot (JSON)
    #[arg(long, env = LEDGER_PATH_ENV, default_value = DEFAULT_LEDGER_PATH)]
    ledger: PathBuf,

    /// Player name map (JSON)
    #[arg(long, env = NAME_MAP_PATH_ENV, default_value = DEFAULT_NAME_MAP_PATH)]
    names: PathBuf,

    /// Season treated as in progress (defaults to today's season)
    #[arg(long)]
    season: Option<i32>,

    /// Write the full report as JSON
    #[arg(long)]
    report: Option<PathBuf>,

    /// Leaderboard rows to print per season type
    #[arg(long, default_value = "10")]
    top: usize,
}

#[cfg(feature = "cli")]
#[derive(Subcommand)]
enum Commands {
    /// Process new games and update the ledger
    Run {
        #[command(flatten)]
        common: Common,

        /// CSV file, or directory of play_by_play_<season>.csv files
        #[arg(long, env = PBP_PATH_ENV)]
        pbp: PathBuf,

        /// Season types to ingest: all, reg or post
        #[arg(long, default_value = "all")]
        season_type: SeasonTypeFilter,
    },

    /// Print leaderboards from the cached ledger
    Leaderboard {
        #[command(flatten)]
        common: Common,
    },
}

#[cfg(feature = "cli")]
impl Common {
    fn config(&self) -> RunConfig {
        RunConfig {
            ledger_path: self.ledger.clone(),
            name_map_path: self.names.clone(),
            source_path: None,
            current_season: self.season.unwrap_or_else(current_season),
            season_type_filter: SeasonTypeFilter::All,
            report_path: self.report.clone(),
        }
    }
}

#[cfg(feature = "cli")]
fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run { common, pbp, season_type } => {
            let config = RunConfig {
                source_path: Some(pbp.clone()),
                season_type_filter: season_type,
                ..common.config()
            };
            println!("🏈 Updating legacy drive ledger...");
            println!("   Source:  {}", pbp.display());
            println!("   Ledger:  {}", config.ledger_path.display());
            println!("   Season:  {}", config.current_season);

            let summary = ledger_builder::run(&config, &CsvPlaySource::new(pbp))?;

            println!("\n✅ Run complete");
            println!("   Rows fetched:      {}", summary.rows_fetched);
            println!("   New games:         {}", summary.new_games);
            println!("   New opportunities: {}", summary.new_opportunities);
            println!("   Total:             {}", summary.total_opportunities);
            println!("   Snapshot updated:  {}", if summary.persisted { "yes" } else { "no" });

            if let Some(report) = &summary.report {
                print_report(report, common.top);
            }
        }

        Commands::Leaderboard { common } => {
            let config = common.config();
            match ledger_builder::leaderboard_only(&config)? {
                Some(report) => print_report(&report, common.top),
                None => println!("Ledger at {} is empty.", config.ledger_path.display()),
            }
        }
    }

    Ok(())
}

#[cfg(feature = "cli")]
fn print_report(report: &LeaderboardReport, top: usize) {
    print_board("Regular season", &report.regular, top);
    print_board("Postseason", &report.postseason, top);
    println!(
        "\n   Drives: {} REG, {} POST, {} in the last five seasons",
        report.regular_rows.len(),
        report.postseason_rows.len(),
        report.recent_rows.len()
    );
}

#[cfg(feature = "cli")]
fn print_board(title: &str, records: &[LeaderboardRecord], top: usize) {
    println!("\n📊 {} ({} QBs)", title, records.len());
    for (rank, r) in records.iter().take(top).enumerate() {
        println!(
            "   {:>3}. {:<24} {:>3}-{:<3} {:>5.1}%",
            rank + 1,
            r.player_name,
            r.wins,
            r.losses,
            r.win_pct
        );
    }
}

#[cfg(not(feature = "cli"))]
fn main() {
    eprintln!("ledger_builder CLI is not available. Enable the 'cli' feature to use it.");
    std::process::exit(1);
}

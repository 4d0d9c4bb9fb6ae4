//! Self-play matches between mosaic search agents.
//!
//! Plays a series of games between two agent configurations and reports
//! wins and mean scores, optionally writing every game to a JSON file.
//! Games run in parallel; each decision inside a game stays on one thread.

mod config;
mod play;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use config::{MatchConfig, ModeArg, Overrides};
use play::{play_game, GameRecord, MatchSummary};
use rayon::prelude::*;
use serde::Serialize;
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;
use std::time::Instant;
use tracing::info;

/// Mosaic search agent self-play tool.
#[derive(Parser)]
#[command(name = "mosaic-selfplay")]
#[command(about = "Play matches between MCTS and minimax mosaic agents")]
struct Cli {
    /// Log level used when RUST_LOG is not set.
    #[arg(long, default_value = "info", global = true)]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

/// Agent settings shared by every subcommand.
#[derive(clap::Args, Clone, Debug, Default)]
struct AgentArgs {
    /// TOML file with [first] and [second] agent tables.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Search mode of the first agent.
    #[arg(long, value_enum)]
    first_mode: Option<ModeArg>,

    /// Search mode of the second agent.
    #[arg(long, value_enum)]
    second_mode: Option<ModeArg>,

    /// Per-move time limit for both agents, in milliseconds.
    #[arg(long)]
    time_limit_ms: Option<u64>,

    /// Cap on MCTS iterations per move for both agents.
    #[arg(long)]
    iterations: Option<u32>,
}

impl AgentArgs {
    fn resolve(&self) -> Result<MatchConfig> {
        let mut config = MatchConfig::load(self.config.as_deref())?;
        config.apply(&Overrides {
            first_mode: self.first_mode,
            second_mode: self.second_mode,
            time_limit_ms: self.time_limit_ms,
            iterations: self.iterations,
        });
        config.validate()?;
        Ok(config)
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Play a match between the two agents.
    Play {
        #[command(flatten)]
        agents: AgentArgs,

        /// Number of games to play.
        #[arg(short, long, default_value = "10")]
        games: usize,

        /// Random seed for reproducibility.
        #[arg(long, default_value = "42")]
        seed: u64,

        /// Keep each agent in its seat instead of alternating who moves first.
        #[arg(long)]
        fixed_seats: bool,

        /// Write the summary and game records to this JSON file.
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Include every move in the JSON records.
        #[arg(long)]
        record_moves: bool,
    },

    /// Print the effective agent configuration as TOML.
    ShowConfig {
        #[command(flatten)]
        agents: AgentArgs,
    },
}

/// Everything written by `--output`.
#[derive(Serialize)]
struct MatchReport<'a> {
    config: &'a MatchConfig,
    summary: MatchSummary,
    records: &'a [GameRecord],
}

fn init_tracing(level: &str) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

/// Seed for game `index` of a match.
fn game_seed(seed: u64, index: usize) -> u64 {
    seed.wrapping_add(index as u64 * 1000)
}

/// Play `games` games in parallel, alternating seats unless `fixed_seats`.
fn run_match(
    config: &MatchConfig,
    games: usize,
    seed: u64,
    fixed_seats: bool,
    record_moves: bool,
) -> Result<Vec<GameRecord>> {
    (0..games)
        .into_par_iter()
        .map(|i| {
            let swap = !fixed_seats && i % 2 == 1;
            play_game(&config.first, &config.second, game_seed(seed, i), swap, record_moves)
                .with_context(|| format!("game {i} failed"))
        })
        .collect()
}

fn cmd_play(
    agents: &AgentArgs,
    games: usize,
    seed: u64,
    fixed_seats: bool,
    output: Option<PathBuf>,
    record_moves: bool,
) -> Result<()> {
    let config = agents.resolve()?;
    info!(
        games,
        seed,
        first = ?config.first.mode,
        second = ?config.second.mode,
        "starting match"
    );

    let start = Instant::now();
    let records = run_match(&config, games, seed, fixed_seats, record_moves)?;
    let summary = MatchSummary::from_records(&records);
    let elapsed = start.elapsed();

    println!("Played {} games in {:.2}s", summary.games, elapsed.as_secs_f64());
    println!(
        "first  ({:?}): {} wins, mean score {:.1}",
        config.first.mode, summary.first_wins, summary.first_mean_score
    );
    println!(
        "second ({:?}): {} wins, mean score {:.1}",
        config.second.mode, summary.second_wins, summary.second_mean_score
    );
    println!("draws: {}", summary.draws);

    if let Some(path) = output {
        let file = File::create(&path)
            .with_context(|| format!("Failed to create file: {}", path.display()))?;
        let report = MatchReport {
            config: &config,
            summary,
            records: &records,
        };
        serde_json::to_writer_pretty(BufWriter::new(file), &report)
            .with_context(|| format!("Failed to write report to {}", path.display()))?;
        println!("Report saved to {}", path.display());
    }

    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli.log_level);

    match cli.command {
        Commands::Play {
            agents,
            games,
            seed,
            fixed_seats,
            output,
            record_moves,
        } => cmd_play(&agents, games, seed, fixed_seats, output, record_moves),

        Commands::ShowConfig { agents } => {
            let config = agents.resolve()?;
            print!("{}", config.to_toml()?);
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use mosaic_mcts::SearchMode;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_play_overrides() {
        let cli = Cli::try_parse_from([
            "mosaic-selfplay",
            "play",
            "--games",
            "4",
            "--first-mode",
            "light",
            "--second-mode",
            "minimax",
            "--iterations",
            "30",
        ])
        .unwrap();

        let Commands::Play { agents, games, .. } = cli.command else {
            panic!("expected play");
        };
        assert_eq!(games, 4);
        let config = agents.resolve().unwrap();
        assert_eq!(config.first.mode, SearchMode::MctsLight);
        assert_eq!(config.second.mode, SearchMode::Minimax);
        assert_eq!(config.first.max_iterations, Some(30));
    }

    #[test]
    fn test_missing_config_file_is_an_error() {
        let agents = AgentArgs {
            config: Some(PathBuf::from("/nonexistent/agents.toml")),
            ..AgentArgs::default()
        };
        let err = agents.resolve().unwrap_err();
        assert!(format!("{err:#}").contains("Failed to read config file"));
    }

    #[test]
    fn test_run_match_alternates_seats() {
        let config = MatchConfig {
            first: mosaic_mcts::SearchConfig::with_iterations(10),
            second: mosaic_mcts::SearchConfig {
                max_iterations: Some(10),
                ..mosaic_mcts::SearchConfig::light()
            },
        };
        let records = run_match(&config, 2, 11, false, false).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].first_seat, play::AgentLabel::First);
        assert_eq!(records[1].first_seat, play::AgentLabel::Second);
        assert_eq!(records[1].seed, game_seed(11, 1));
    }
}

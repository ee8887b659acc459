//! hexrealm CLI - Command-line interface for generating, playing and watching hexrealm games.

// Allow print in the CLI binary
#![allow(clippy::print_stdout, clippy::print_stderr)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

mod cli;

use clap::{Parser, Subcommand};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// hexrealm - A deterministic hex-grid territory simulation
#[derive(Parser, Debug)]
#[command(name = "hexrealm")]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Play a single game with default allocations
    Run {
        #[command(flatten)]
        game: cli::GameArgs,

        /// Random seed (default: random)
        #[arg(short, long)]
        seed: Option<u64>,

        /// Output format: text or json
        #[arg(short, long, default_value = "text")]
        format: cli::OutputFormat,

        /// Print every round's conquests
        #[arg(short, long)]
        verbose: bool,
    },

    /// Generate terrain and print the map
    Map {
        #[command(flatten)]
        game: cli::GameArgs,

        /// Random seed (default: random)
        #[arg(short, long)]
        seed: Option<u64>,
    },

    /// Run many seeded games in parallel and aggregate statistics
    Batch {
        #[command(flatten)]
        game: cli::GameArgs,

        /// Number of games to run (default: 1000)
        #[arg(short, long, default_value = "1000")]
        games: u64,

        /// Starting seed (increments for each game)
        #[arg(short, long)]
        seed: Option<u64>,

        /// Parallel threads (default: CPU count)
        #[arg(short = 'j', long)]
        threads: Option<usize>,

        /// Output format: text, json, or csv
        #[arg(short, long, default_value = "text")]
        format: cli::BatchFormat,

        /// Show progress bar
        #[arg(long)]
        progress: bool,
    },

    /// Interactive TUI to play or watch a game
    Watch {
        #[command(flatten)]
        game: cli::GameArgs,

        /// Random seed
        #[arg(short, long)]
        seed: Option<u64>,

        /// Auto-play delay in milliseconds (default: 500)
        #[arg(long, default_value = "500")]
        speed: u64,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let result = match args.command {
        Commands::Run {
            game,
            seed,
            format,
            verbose,
        } => cli::run::execute(&game, seed, format, verbose),

        Commands::Map { game, seed } => cli::map::execute(&game, seed),

        Commands::Batch {
            game,
            games,
            seed,
            threads,
            format,
            progress,
        } => cli::batch::execute(&game, games, seed, threads, format, progress),

        Commands::Watch { game, seed, speed } => cli::watch::execute(&game, seed, speed),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_parse_batch() {
        let args = Args::try_parse_from(["hexrealm", "batch", "--games", "10", "--cols", "12", "-f", "csv"]).unwrap();
        match args.command {
            Commands::Batch { games, format, .. } => {
                assert_eq!(games, 10);
                assert_eq!(format, cli::BatchFormat::Csv);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }
}

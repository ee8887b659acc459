//! CLI command implementations for hexrealm.

pub(crate) mod batch;
pub(crate) mod map;
pub(crate) mod run;
pub(crate) mod watch;

mod output;

use clap::{Args, ValueEnum};
use hexrealm::game::LandStrategy;
use hexrealm::{ConfigError, GameConfig, GameError, TerrainError};
use std::error::Error;
use std::fmt;
use std::path::PathBuf;

/// Output format for the `run` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    /// Human-readable text output.
    Text,
    /// Machine-readable JSON output.
    Json,
}

/// Output format for the `batch` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum BatchFormat {
    /// Human-readable text output.
    Text,
    /// Machine-readable JSON output.
    Json,
    /// CSV format.
    Csv,
}

/// Land growth strategy selectable from the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum LandKind {
    /// Most- or least-bordered choices by biased coin (see `--coast-par`, `--neighbor-par`).
    Biased,
    /// Uniformly random coast tile and water neighbor.
    Uniform,
    /// Random coast tile, then least- or most-bordered water neighbor (see `--probability`).
    Bordered,
}

/// Game settings shared by every command. Flags override `--config`.
#[derive(Args, Debug, Clone)]
pub(crate) struct GameArgs {
    /// JSON config file to start from
    #[arg(long)]
    config: Option<PathBuf>,

    /// Grid columns
    #[arg(long)]
    cols: Option<u16>,

    /// Grid rows
    #[arg(long)]
    rows: Option<u16>,

    /// Fraction of the grid that becomes land, in (0, 1]
    #[arg(long)]
    proportion: Option<f64>,

    /// Land growth strategy
    #[arg(long, value_enum)]
    land: Option<LandKind>,

    /// Coast tile bias for the biased strategy, in [0, 1]
    #[arg(long, default_value = "0")]
    coast_par: f64,

    /// Water neighbor bias for the biased strategy, in [0, 1]
    #[arg(long, default_value = "0")]
    neighbor_par: f64,

    /// Chance of the least-bordered neighbor for the bordered strategy
    #[arg(long, default_value = "0.5")]
    probability: f64,

    /// Number of players (1-8)
    #[arg(short, long)]
    players: Option<usize>,

    /// Rounds to play
    #[arg(short, long)]
    rounds: Option<u32>,
}

impl GameArgs {
    /// Build the effective config: file (or defaults), then flag overrides.
    pub(crate) fn resolve(&self) -> Result<GameConfig, CliError> {
        let mut config = match &self.config {
            Some(path) => GameConfig::from_file(path)?,
            None => GameConfig::default(),
        };
        if let Some(cols) = self.cols {
            config.cols = cols;
        }
        if let Some(rows) = self.rows {
            config.rows = rows;
        }
        if let Some(proportion) = self.proportion {
            config.proportion = proportion;
        }
        if let Some(kind) = self.land {
            config.land = match kind {
                LandKind::Biased => LandStrategy::Biased {
                    coast_par: self.coast_par,
                    neighbor_par: self.neighbor_par,
                },
                LandKind::Uniform => LandStrategy::Uniform,
                LandKind::Bordered => LandStrategy::Bordered {
                    probability: self.probability,
                },
            };
        }
        if let Some(players) = self.players {
            config.players = players;
        }
        if let Some(rounds) = self.rounds {
            config.rounds = rounds;
        }
        config.validate()?;
        Ok(config)
    }
}

/// Use the given seed, or derive one from the clock.
pub(crate) fn resolve_seed(seed: Option<u64>) -> u64 {
    seed.unwrap_or_else(|| {
        use std::time::{SystemTime, UNIX_EPOCH};
        #[allow(clippy::cast_possible_truncation)]
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(42)
    })
}

/// CLI error type.
#[derive(Debug)]
pub(crate) struct CliError {
    message: String,
}

impl CliError {
    /// Create a new CLI error.
    pub(crate) fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl Error for CliError {}

impl From<std::io::Error> for CliError {
    fn from(e: std::io::Error) -> Self {
        Self::new(e.to_string())
    }
}

impl From<GameError> for CliError {
    fn from(e: GameError) -> Self {
        Self::new(e.to_string())
    }
}

impl From<ConfigError> for CliError {
    fn from(e: ConfigError) -> Self {
        Self::new(e.to_string())
    }
}

impl From<TerrainError> for CliError {
    fn from(e: TerrainError) -> Self {
        Self::new(e.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        Self::new(format!("JSON serialization failed: {e}"))
    }
}

//! Error types for the simulation.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::game::PlayerId;
use crate::hex::Offset;

/// Grid construction errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GridError {
    /// A dimension is zero.
    #[error("grid must have at least one column and one row, got {cols}x{rows}")]
    Empty {
        /// Requested columns.
        cols: u16,
        /// Requested rows.
        rows: u16,
    },
    /// A dimension exceeds the supported maximum.
    #[error("grid {cols}x{rows} exceeds the maximum side of {max}")]
    TooLarge {
        /// Requested columns.
        cols: u16,
        /// Requested rows.
        rows: u16,
        /// Largest accepted side.
        max: u16,
    },
}

/// Terrain generation errors.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum TerrainError {
    /// The land proportion is not in `(0, 1]`.
    #[error("land proportion {0} must be in (0, 1]")]
    InvalidProportion(f64),
    /// A biasing parameter is not in `[0, 1]`.
    #[error("{name} = {value} must be in [0, 1]")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// Offending value.
        value: f64,
    },
    /// The proportion rounds down to zero land tiles.
    #[error("proportion {proportion} of {tiles} tiles yields no land")]
    NoLand {
        /// Requested proportion.
        proportion: f64,
        /// Tile count.
        tiles: usize,
    },
    /// Terrain was already generated on this grid.
    #[error("terrain has already been generated")]
    AlreadyGenerated,
    /// No coast tile is left to grow from.
    #[error("coastline exhausted after {placed} of {target} land tiles")]
    CoastExhausted {
        /// Land tiles placed so far.
        placed: usize,
        /// Requested land tiles.
        target: usize,
    },
}

/// Configuration loading errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The document is not valid JSON for a game configuration.
    #[error("failed to parse game config: {0}")]
    Parse(#[from] serde_json::Error),
    /// The file could not be read.
    #[error("failed to read game config from {path:?}: {source}")]
    Read {
        /// File that failed.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: io::Error,
    },
    /// A field is out of range.
    #[error("invalid config field `{field}`: {reason}")]
    Invalid {
        /// Field name.
        field: &'static str,
        /// What is wrong.
        reason: String,
    },
}

/// Errors from game commands and setup.
///
/// Every rejected command leaves the session untouched.
#[derive(Debug, Error)]
pub enum GameError {
    /// Grid construction failed.
    #[error(transparent)]
    Grid(#[from] GridError),
    /// Terrain generation failed.
    #[error(transparent)]
    Terrain(#[from] TerrainError),
    /// Configuration is invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// Player count out of range.
    #[error("player count {count} must be between 1 and {max}")]
    PlayerCount {
        /// Requested players.
        count: usize,
        /// Maximum supported.
        max: usize,
    },
    /// Players were requested before any land exists.
    #[error("cannot seed players on a grid without land")]
    NoLand,
    /// Players have already been seeded.
    #[error("players have already been seeded")]
    AlreadySeeded,
    /// No such player.
    #[error("unknown player {0}")]
    UnknownPlayer(PlayerId),
    /// Coordinate outside the grid.
    #[error("no tile at {0}")]
    NoSuchTile(Offset),
    /// Target is water.
    #[error("tile {0} is water")]
    Water(Offset),
    /// Target is not owned by the acting player.
    #[error("tile {coord} is not owned by player {player}")]
    NotOwned {
        /// Target tile.
        coord: Offset,
        /// Acting player.
        player: PlayerId,
    },
    /// Player already influences the tile.
    #[error("player {player} already influences {coord}")]
    AlreadyInfluenced {
        /// Target tile.
        coord: Offset,
        /// Acting player.
        player: PlayerId,
    },
    /// Allocation outside the available resources.
    #[error("cannot allocate {requested} to military out of {available} resources")]
    Allocation {
        /// Military share requested.
        requested: f64,
        /// Resources available.
        available: f64,
    },
    /// A command arrived for a player whose turn it is not.
    #[error("it is player {active}'s turn, not player {player}'s")]
    NotActive {
        /// Player named by the command.
        player: PlayerId,
        /// Player whose turn it is.
        active: PlayerId,
    },
    /// The active player already allocated this turn.
    #[error("player {0} has already allocated resources this turn")]
    AlreadyAllocated(PlayerId),
}

/// Result type for game operations.
pub type GameResult<T> = Result<T, GameError>;

//! Game layer for hexrealm.
//!
//! Implements the simulation rules on top of the hex coordinate system:
//! - Grid of tiles with fixed odd-r adjacency
//! - Connected terrain generation from the grid center
//! - Per-tile influence and ownership arbitration
//! - Round-end expansion and conquest
//! - Sessions that cycle player turns

mod grid;
mod influence;
mod invariants;
mod player;
mod session;
mod terrain;
mod tile;
mod tile_set;
mod turn;

pub use grid::{EVEN_NEIGHBORS, Grid, MAX_DIMENSION, ODD_NEIGHBORS, neighbor_offsets};
pub use invariants::{InvariantViolation, assert_invariants, check_invariants};
pub use player::{MAX_PLAYERS, PLAYER_COLORS, Player, PlayerId, Scores};
pub use session::{Command, RoundReport, Session, Standing};
pub use terrain::{Land, LandStrategy, TerrainParams, biased_flip};
pub use tile::{InfluenceRecord, Terrain, Tile};
pub use tile_set::TileSet;
pub use turn::{ConquestOutcome, EXPANSION_DIVISOR, attack_odds};

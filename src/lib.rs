// Allow unwrap and unreadable literals in tests (test code is not production)
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::unreadable_literal))]
//! hexrealm: a deterministic territorial simulation on a hexagonal grid.
//!
//! Land grows as one connected mass from the grid center. Players are seeded
//! on land, project influence that decays with distance from home, take
//! ownership by out-influencing rivals, and push their borders by conquest.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────┐
//! │   Session (turn cycle, commands)    │
//! ├─────────────────────────────────────┤
//! │  Turn engine (expansion, conquest)  │
//! ├─────────────────────────────────────┤
//! │  Influence & ownership arbitration  │
//! ├─────────────────────────────────────┤
//! │  Grid, tiles, terrain generation    │
//! ├─────────────────────────────────────┤
//! │  Hex coordinates and viewport math  │
//! └─────────────────────────────────────┘
//! ```
//!
//! Every random choice is drawn from an injected [`rand::Rng`], so a
//! [`Session`] built from the same config and seed replays exactly.

pub mod config;
pub mod error;
pub mod game;
pub mod hex;
pub mod render;
pub mod view;

pub use config::GameConfig;
pub use error::{ConfigError, GameError, GameResult, GridError, TerrainError};

// Re-export key game types at crate root for convenience
pub use game::{Command, ConquestOutcome, Grid, Player, PlayerId, RoundReport, Session, Tile};
pub use hex::{Cube, Offset};
pub use view::{DisplayInfo, Viewport};

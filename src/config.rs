//! Game configuration.
//!
//! Every field has a default, so a JSON document only needs the fields it
//! overrides:
//!
//! ```json
//! { "cols": 40, "rows": 24, "players": 4, "land": { "kind": "uniform" } }
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::game::{EXPANSION_DIVISOR, LandStrategy, MAX_DIMENSION, MAX_PLAYERS, Scores, TerrainParams};

/// Settings for one session.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Grid columns.
    pub cols: u16,
    /// Grid rows.
    pub rows: u16,
    /// Fraction of the grid that becomes land.
    pub proportion: f64,
    /// Land growth strategy.
    pub land: LandStrategy,
    /// Number of players.
    pub players: usize,
    /// Rounds to play in batch and headless runs.
    pub rounds: u32,
    /// Expansion claims `ceil(culture / expansion_divisor)` tiles per round.
    pub expansion_divisor: f64,
    /// Culture each player starts with.
    pub starting_culture: f64,
    /// Military each player starts with.
    pub starting_military: f64,
}

impl Default for GameConfig {
    fn default() -> Self {
        let scores = Scores::default();
        Self {
            cols: 25,
            rows: 15,
            proportion: 0.35,
            land: LandStrategy::default(),
            players: 2,
            rounds: 50,
            expansion_divisor: EXPANSION_DIVISOR,
            starting_culture: scores.culture,
            starting_military: scores.military,
        }
    }
}

impl GameConfig {
    /// Parse a JSON document. Missing fields take their defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the document is not valid JSON for this type.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load and validate a JSON config file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or a field is
    /// out of range.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_json_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Terrain parameters derived from this config.
    #[must_use]
    pub const fn terrain(&self) -> TerrainParams {
        TerrainParams {
            proportion: self.proportion,
            strategy: self.land,
        }
    }

    /// Starting scores derived from this config.
    #[must_use]
    pub const fn scores(&self) -> Scores {
        Scores {
            culture: self.starting_culture,
            military: self.starting_military,
        }
    }

    /// Range-check every field.
    ///
    /// # Errors
    ///
    /// Returns the first invalid field found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        fn invalid(field: &'static str, reason: impl Into<String>) -> ConfigError {
            ConfigError::Invalid {
                field,
                reason: reason.into(),
            }
        }

        for (field, value) in [("cols", self.cols), ("rows", self.rows)] {
            if value == 0 || value > MAX_DIMENSION {
                return Err(invalid(field, format!("{value} is not in 1..={MAX_DIMENSION}")));
            }
        }
        self.terrain()
            .target(usize::from(self.cols) * usize::from(self.rows))
            .map_err(|e| invalid("land", e.to_string()))?;
        if self.players == 0 || self.players > MAX_PLAYERS {
            return Err(invalid(
                "players",
                format!("{} is not in 1..={MAX_PLAYERS}", self.players),
            ));
        }
        if !(self.expansion_divisor.is_finite() && self.expansion_divisor > 0.0) {
            return Err(invalid(
                "expansion_divisor",
                format!("{} must be positive", self.expansion_divisor),
            ));
        }
        for (field, value) in [
            ("starting_culture", self.starting_culture),
            ("starting_military", self.starting_military),
        ] {
            if !(value.is_finite() && value >= 0.0) {
                return Err(invalid(field, format!("{value} must be finite and non-negative")));
            }
        }
        Ok(())
    }
}

//! Terrain generation.
//!
//! Land grows from the tile nearest the grid center, one tile at a time, by
//! converting a water neighbor of some coast tile. Every new land tile touches
//! existing land, so the land mass is always connected.
//!
//! The default [`LandStrategy::Biased`] picks both the coast tile and the
//! water neighbor from either the most- or least-bordered candidates (border
//! count = remaining water neighbors), using a biased coin per choice.

use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use crate::error::TerrainError;
use crate::game::{Grid, Terrain, TileSet};
use crate::hex::Offset;

/// How the next land tile is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LandStrategy {
    /// Max/min-bordered coast tile, then max/min-bordered water neighbor.
    ///
    /// Each parameter in `[0, 1]` skews its coin flip: 0.5 is fair, higher
    /// favors the most-bordered candidates, lower the least-bordered.
    Biased {
        /// Bias for the coast tile choice.
        coast_par: f64,
        /// Bias for the water neighbor choice.
        neighbor_par: f64,
    },
    /// Uniformly random coast tile, uniformly random water neighbor.
    Uniform,
    /// Uniformly random coast tile; with `probability` take its least-bordered
    /// water neighbor, otherwise its most-bordered one.
    Bordered {
        /// Chance of choosing the least-bordered neighbor.
        probability: f64,
    },
}

impl Default for LandStrategy {
    fn default() -> Self {
        Self::Biased {
            coast_par: 0.0,
            neighbor_par: 0.0,
        }
    }
}

impl LandStrategy {
    fn validate(self) -> Result<(), TerrainError> {
        let check = |name: &'static str, value: f64| {
            if (0.0..=1.0).contains(&value) {
                Ok(())
            } else {
                Err(TerrainError::InvalidParameter { name, value })
            }
        };
        match self {
            Self::Biased {
                coast_par,
                neighbor_par,
            } => {
                check("coast_par", coast_par)?;
                check("neighbor_par", neighbor_par)
            }
            Self::Uniform => Ok(()),
            Self::Bordered { probability } => check("probability", probability),
        }
    }
}

/// Terrain generation parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TerrainParams {
    /// Fraction of the grid to turn into land, in `(0, 1]`.
    pub proportion: f64,
    /// Growth strategy.
    pub strategy: LandStrategy,
}

impl Default for TerrainParams {
    fn default() -> Self {
        Self {
            proportion: 0.35,
            strategy: LandStrategy::default(),
        }
    }
}

impl TerrainParams {
    /// Number of land tiles these parameters produce on a grid of `tiles` cells.
    ///
    /// # Errors
    ///
    /// Returns an error if a parameter is out of range or the target is zero.
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_precision_loss,
        clippy::cast_sign_loss
    )]
    pub fn target(&self, tiles: usize) -> Result<usize, TerrainError> {
        if !(self.proportion > 0.0 && self.proportion <= 1.0) {
            return Err(TerrainError::InvalidProportion(self.proportion));
        }
        self.strategy.validate()?;
        let target = (tiles as f64 * self.proportion).floor() as usize;
        if target == 0 {
            return Err(TerrainError::NoLand {
                proportion: self.proportion,
                tiles,
            });
        }
        Ok(target)
    }
}

/// Result of terrain generation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Land {
    tiles: Vec<Offset>,
    coast: TileSet,
}

impl Land {
    /// Land tiles in the order they were created; the first is the seed.
    #[must_use]
    pub fn tiles(&self) -> &[Offset] {
        &self.tiles
    }

    /// Land tiles that still touch water.
    #[must_use]
    pub fn coast(&self) -> &TileSet {
        &self.coast
    }

    /// Number of land tiles.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    /// Whether no land exists.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }
}

/// Coin flip skewed by `par`: a uniform draw is pushed toward 1 (par > 0.5)
/// or 0 (par < 0.5) before thresholding at 0.5.
///
/// `true` selects the most-bordered candidates.
pub fn biased_flip<R: Rng + ?Sized>(rng: &mut R, par: f64) -> bool {
    let draw: f64 = rng.gen_range(0.0..1.0);
    draw + (par - 0.5) * draw.max(1.0 - draw) >= 0.5
}

impl Grid {
    /// Grow a connected land mass covering `floor(cols * rows * proportion)`
    /// tiles, seeded at the grid center.
    ///
    /// # Errors
    ///
    /// Returns an error if the parameters are invalid, terrain already exists,
    /// or the coastline runs out before the target is met.
    pub fn generate_terrain<R: Rng + ?Sized>(
        &mut self,
        params: &TerrainParams,
        rng: &mut R,
    ) -> Result<&Land, TerrainError> {
        if !self.land.is_empty() {
            return Err(TerrainError::AlreadyGenerated);
        }
        let target = params.target(self.tiles().len())?;

        let mut land = Land::default();
        self.set_land(self.center(), &mut land);

        let mut retries = 0usize;
        while land.len() < target {
            if land.coast.is_empty() {
                return Err(TerrainError::CoastExhausted {
                    placed: land.len(),
                    target,
                });
            }
            match self.next_land(params.strategy, &land.coast, rng) {
                Some(next) => self.set_land(next, &mut land),
                None => {
                    // Retry without consuming budget.
                    retries += 1;
                }
            }
        }

        tracing::debug!(
            target: "hexrealm::terrain",
            land = land.len(),
            coast = land.coast.len(),
            retries,
            "terrain.generated"
        );

        self.land = land;
        Ok(&self.land)
    }

    /// Convert `coord` to land and update border counts and the coastline.
    fn set_land(&mut self, coord: Offset, land: &mut Land) {
        let tile = self.at_mut(coord);
        tile.set_terrain(Terrain::Land);
        let touches_water = tile.border_count() > 0;
        let neighbors = tile.neighbors().to_vec();

        land.tiles.push(coord);
        if touches_water {
            land.coast.insert(coord);
        }

        for n in neighbors {
            let neighbor = self.at_mut(n);
            neighbor.border_count = neighbor.border_count.saturating_sub(1);
            if neighbor.border_count == 0 {
                land.coast.remove(n);
            }
        }
    }

    fn water_neighbors(&self, coord: Offset) -> Vec<Offset> {
        self.at(coord)
            .neighbors()
            .iter()
            .copied()
            .filter(|&n| !self.at(n).is_land())
            .collect()
    }

    fn next_land<R: Rng + ?Sized>(
        &self,
        strategy: LandStrategy,
        coast: &TileSet,
        rng: &mut R,
    ) -> Option<Offset> {
        match strategy {
            LandStrategy::Biased {
                coast_par,
                neighbor_par,
            } => {
                let chosen = self.pick_bordered(coast.as_slice(), coast_par, rng)?;
                let water = self.water_neighbors(chosen);
                self.pick_bordered(&water, neighbor_par, rng)
            }
            LandStrategy::Uniform => {
                let chosen = *coast.as_slice().choose(rng)?;
                self.water_neighbors(chosen).choose(rng).copied()
            }
            LandStrategy::Bordered { probability } => {
                let chosen = *coast.as_slice().choose(rng)?;
                let water = self.water_neighbors(chosen);
                let least = water.iter().copied().min_by_key(|&n| self.at(n).border_count());
                // max_by_key keeps the last maximum; scan manually to keep the first.
                let mut most: Option<Offset> = None;
                for &n in &water {
                    if most.is_none_or(|m| self.at(n).border_count() > self.at(m).border_count()) {
                        most = Some(n);
                    }
                }
                if rng.gen_bool(probability) { least } else { most }
            }
        }
    }

    /// Split `candidates` into the most- and least-bordered subsets, pick one
    /// tile uniformly from each, and let a biased flip choose between them.
    fn pick_bordered<R: Rng + ?Sized>(
        &self,
        candidates: &[Offset],
        par: f64,
        rng: &mut R,
    ) -> Option<Offset> {
        let counts = candidates.iter().map(|&c| self.at(c).border_count());
        let max = counts.clone().max()?;
        let min = counts.min()?;

        let most: Vec<Offset> = candidates
            .iter()
            .copied()
            .filter(|&c| self.at(c).border_count() == max)
            .collect();
        let least: Vec<Offset> = candidates
            .iter()
            .copied()
            .filter(|&c| self.at(c).border_count() == min)
            .collect();

        let most_pick = most.choose(rng).copied();
        let least_pick = least.choose(rng).copied();

        if biased_flip(rng, par) {
            most_pick
        } else {
            least_pick
        }
    }
}

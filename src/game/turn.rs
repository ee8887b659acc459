//! Round-end passes and player actions.
//!
//! Expansion grows each player's sphere peacefully; conquest pushes each
//! player's border one tile toward their flag, by force when the target is
//! held by someone else. Flags and resource allocation are the two actions a
//! player takes during their own turn.

use rand::Rng;
use serde::Serialize;

use crate::error::{GameError, GameResult};
use crate::game::{Grid, PlayerId};
use crate::hex::Offset;

/// Default divisor for the expansion pace `ceil(culture / divisor)`.
pub const EXPANSION_DIVISOR: f64 = 5.0;

/// What happened when one player attempted conquest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ConquestOutcome {
    /// An unowned tile was taken without a fight.
    Claimed {
        /// Acting player.
        player: PlayerId,
        /// Captured tile.
        tile: Offset,
    },
    /// A tile was taken from another player.
    Won {
        /// Acting player.
        player: PlayerId,
        /// Captured tile.
        tile: Offset,
        /// Previous owner.
        from: PlayerId,
    },
    /// The defender held the tile.
    Repelled {
        /// Acting player.
        player: PlayerId,
        /// Contested tile.
        tile: Offset,
        /// Defending owner.
        by: PlayerId,
    },
    /// No owned border tile or no eligible target.
    Skipped {
        /// Acting player.
        player: PlayerId,
    },
}

impl ConquestOutcome {
    /// The player who attempted the conquest.
    #[must_use]
    pub const fn player(&self) -> PlayerId {
        match *self {
            Self::Claimed { player, .. }
            | Self::Won { player, .. }
            | Self::Repelled { player, .. }
            | Self::Skipped { player } => player,
        }
    }

    /// Whether a tile changed hands.
    #[must_use]
    pub const fn captured(&self) -> bool {
        matches!(self, Self::Claimed { .. } | Self::Won { .. })
    }
}

/// Chance an attacker with `attack` military takes a tile defended with
/// `defense`. Even odds when both are zero.
#[must_use]
pub fn attack_odds(attack: f64, defense: f64) -> f64 {
    let total = attack + defense;
    if total > 0.0 { attack / total } else { 0.5 }
}

/// First item with the strictly smallest key.
fn first_min_by<T: Copy>(items: impl IntoIterator<Item = T>, mut key: impl FnMut(T) -> f64) -> Option<T> {
    let mut best: Option<(T, f64)> = None;
    for item in items {
        let k = key(item);
        if best.is_none_or(|(_, b)| k < b) {
            best = Some((item, k));
        }
    }
    best.map(|(item, _)| item)
}

impl Grid {
    /// Peaceful expansion for every player, followed by one influence update.
    ///
    /// Each player with border tiles claims up to `ceil(culture / divisor)`
    /// tiles, always growing from the border tile nearest their home toward
    /// the unclaimed neighbor nearest their home. Returns the number of tiles
    /// claimed.
    ///
    /// # Errors
    ///
    /// Propagates claim failures, which indicate corrupted relationship sets.
    pub fn expand(&mut self, divisor: f64) -> GameResult<usize> {
        let mut claimed = 0usize;

        for idx in 0..self.players.len() {
            let player = &self.players[idx];
            let id = player.id;
            let Some(home) = player.home() else {
                continue;
            };
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            let steps = (player.culture / divisor).ceil().max(0.0) as usize;

            for _ in 0..steps {
                let border = &self.players[idx].border_tiles;
                let Some(from) = first_min_by(border.iter(), |c| {
                    self.at(c).influence_of(id).map_or(f64::INFINITY, |r| f64::from(r.seed_distance))
                }) else {
                    break;
                };

                let home_cube = self.at(home).cube();
                let candidates = self
                    .at(from)
                    .neighbors()
                    .iter()
                    .copied()
                    .filter(|&n| {
                        let tile = self.at(n);
                        tile.is_land() && !tile.is_influenced_by(id)
                    });
                let Some(target) =
                    first_min_by(candidates, |n| f64::from(self.at(n).cube().distance(home_cube)))
                else {
                    break;
                };

                self.set_influence(target, id)?;
                claimed += 1;
            }
        }

        self.update_influence();
        tracing::debug!(target: "hexrealm::turn", claimed, "expansion.completed");
        Ok(claimed)
    }

    /// One conquest attempt per player, in seating order.
    ///
    /// The attempt starts from the player's owned border tile nearest their
    /// flag (or home, without a flag) and targets that tile's non-owned land
    /// neighbor nearest the same anchor. Unowned targets are taken outright;
    /// owned ones fall with probability [`attack_odds`].
    ///
    /// # Errors
    ///
    /// Propagates claim failures, which indicate corrupted relationship sets.
    pub fn conquer<R: Rng + ?Sized>(&mut self, rng: &mut R) -> GameResult<Vec<ConquestOutcome>> {
        let mut outcomes = Vec::with_capacity(self.players.len());

        for idx in 0..self.players.len() {
            let player = &self.players[idx];
            let id = player.id;
            let Some(anchor) = player.flag().or_else(|| player.home()) else {
                outcomes.push(ConquestOutcome::Skipped { player: id });
                continue;
            };

            let Some(from) = first_min_by(player.owned_border_tiles.iter(), |c| c.euclidean_distance(anchor))
            else {
                outcomes.push(ConquestOutcome::Skipped { player: id });
                continue;
            };

            let candidates = self.at(from).neighbors().iter().copied().filter(|&n| {
                let tile = self.at(n);
                tile.is_land() && tile.owner() != Some(id)
            });
            let Some(target) = first_min_by(candidates, |n| n.euclidean_distance(anchor)) else {
                outcomes.push(ConquestOutcome::Skipped { player: id });
                continue;
            };

            let outcome = match self.at(target).owner() {
                None => {
                    self.capture(target, id)?;
                    ConquestOutcome::Claimed { player: id, tile: target }
                }
                Some(defender) => {
                    let attack = self.players[idx].military;
                    let defense = self.players[usize::from(defender)].military;
                    let threshold = 1.0 - attack_odds(attack, defense);
                    let roll: f64 = rng.gen_range(0.0..1.0);
                    tracing::debug!(
                        target: "hexrealm::turn",
                        attacker = id,
                        defender,
                        tile = %target,
                        roll,
                        threshold,
                        "conquest.roll"
                    );
                    if roll > threshold {
                        self.capture(target, id)?;
                        ConquestOutcome::Won {
                            player: id,
                            tile: target,
                            from: defender,
                        }
                    } else {
                        ConquestOutcome::Repelled {
                            player: id,
                            tile: target,
                            by: defender,
                        }
                    }
                }
            };
            outcomes.push(outcome);
        }

        Ok(outcomes)
    }

    /// Give `coord` to `player`, registering them as an influencer first if
    /// needed and lifting their influence to the tile's current maximum so
    /// arbitration keeps the capture.
    fn capture(&mut self, coord: Offset, player: PlayerId) -> GameResult<()> {
        if !self.at(coord).is_influenced_by(player) {
            self.set_influence(coord, player)?;
        }
        let tile = self.at_mut(coord);
        let max = tile.strongest_influencer().map_or(0.0, |(_, max)| max);
        if let Some(record) = tile.influence_of_mut(player) {
            record.influence = record.influence.max(max);
        }
        self.set_owner(coord, player);
        Ok(())
    }

    /// Move `player`'s flag to `coord`.
    ///
    /// # Errors
    ///
    /// Returns an error if the player or tile does not exist, the tile is
    /// water, or the player does not own it.
    pub fn place_flag(&mut self, player: PlayerId, coord: Offset) -> GameResult<()> {
        let idx = self.player_index(player)?;
        let tile = self.get(coord).ok_or(GameError::NoSuchTile(coord))?;
        if !tile.is_land() {
            return Err(GameError::Water(coord));
        }
        if tile.owner() != Some(player) {
            return Err(GameError::NotOwned { coord, player });
        }

        if let Some(old) = self.players[idx].flag.take() {
            self.at_mut(old).flag_holder = None;
        }
        self.at_mut(coord).flag_holder = Some(player);
        self.players[idx].flag = Some(coord);

        tracing::debug!(target: "hexrealm::turn", player, %coord, "flag.placed");
        Ok(())
    }

    /// Split `player`'s resources: `military` to military, the rest to culture.
    ///
    /// # Errors
    ///
    /// Returns an error if the player does not exist or `military` is not
    /// within `[0, resources]`.
    pub fn allocate(&mut self, player: PlayerId, military: f64) -> GameResult<()> {
        let idx = self.player_index(player)?;
        let available = self.players[idx].resources();
        if !(military >= 0.0 && military <= available) {
            return Err(GameError::Allocation {
                requested: military,
                available,
            });
        }
        self.players[idx].invest(military, available - military);
        Ok(())
    }

    /// Default allocation: half of `player`'s resources to each score.
    ///
    /// # Errors
    ///
    /// Returns an error if the player does not exist.
    pub fn grant_resources(&mut self, player: PlayerId) -> GameResult<()> {
        let idx = self.player_index(player)?;
        let half = self.players[idx].resources() / 2.0;
        self.players[idx].invest(half, half);
        Ok(())
    }
}

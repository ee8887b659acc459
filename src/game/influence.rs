//! Influence and ownership.
//!
//! Players project influence onto land tiles. Each round the influence on
//! every tile in a player's sphere grows with their culture and shrinks with
//! distance from their home seed; ownership of a tile then goes to whichever
//! influencer holds the most, earliest claimant first on ties.
//!
//! All relationship caches (`sphere`, `border_tiles`, `owned_tiles`,
//! `owned_border_tiles`) are updated here and nowhere else.

use rand::Rng;
use rand::seq::SliceRandom;

use crate::error::{GameError, GameResult};
use crate::game::{Grid, InfluenceRecord, MAX_PLAYERS, Player, PlayerId, Scores};
use crate::hex::Offset;

impl Grid {
    /// Create `count` players, each seeded on a land tile chosen uniformly at
    /// random. Seeds are drawn independently and may coincide.
    ///
    /// # Errors
    ///
    /// Returns an error if `count` is out of range, the grid has no land, or
    /// players already exist.
    pub fn set_players<R: Rng + ?Sized>(
        &mut self,
        count: usize,
        scores: Scores,
        rng: &mut R,
    ) -> GameResult<()> {
        if count == 0 || count > MAX_PLAYERS {
            return Err(GameError::PlayerCount {
                count,
                max: MAX_PLAYERS,
            });
        }
        if self.land.is_empty() {
            return Err(GameError::NoLand);
        }
        if !self.players.is_empty() {
            return Err(GameError::AlreadySeeded);
        }

        for _ in 0..count {
            let home = *self.land.tiles().choose(rng).ok_or(GameError::NoLand)?;
            self.add_player(home, scores)?;
        }
        Ok(())
    }

    /// Add one player with their home seed at `home`.
    ///
    /// # Errors
    ///
    /// Returns an error if the grid is full of players or `home` is not land.
    pub fn add_player(&mut self, home: Offset, scores: Scores) -> GameResult<PlayerId> {
        if self.players.len() >= MAX_PLAYERS {
            return Err(GameError::PlayerCount {
                count: self.players.len() + 1,
                max: MAX_PLAYERS,
            });
        }
        let tile = self.get(home).ok_or(GameError::NoSuchTile(home))?;
        if !tile.is_land() {
            return Err(GameError::Water(home));
        }

        #[allow(clippy::cast_possible_truncation)]
        let id = self.players.len() as PlayerId;
        self.players.push(Player::new(id, scores));
        self.set_influence(home, id)?;

        tracing::debug!(
            target: "hexrealm::influence",
            player = id,
            %home,
            "player.seeded"
        );
        Ok(id)
    }

    pub(crate) fn player_index(&self, player: PlayerId) -> GameResult<usize> {
        let idx = usize::from(player);
        if idx < self.players.len() {
            Ok(idx)
        } else {
            Err(GameError::UnknownPlayer(player))
        }
    }

    /// Add `coord` to `player`'s sphere with an initial influence of 1.
    ///
    /// The first tile a player claims becomes their home seed.
    ///
    /// # Errors
    ///
    /// Returns an error if the player or tile does not exist, the tile is
    /// water, or the player already influences it.
    pub fn set_influence(&mut self, coord: Offset, player: PlayerId) -> GameResult<()> {
        let idx = self.player_index(player)?;
        let tile = self.get(coord).ok_or(GameError::NoSuchTile(coord))?;
        if !tile.is_land() {
            return Err(GameError::Water(coord));
        }
        if tile.is_influenced_by(player) {
            return Err(GameError::AlreadyInfluenced { coord, player });
        }

        let home = self.players[idx].home().unwrap_or(coord);
        let seed_distance = tile.cube().distance(self.at(home).cube());
        let neighbors = tile.neighbors().to_vec();

        let mut potential_growth = 0u8;
        for n in neighbors {
            let neighbor = self.at_mut(n);
            if !neighbor.is_land() {
                continue;
            }
            let Some(record) = neighbor.influence_of_mut(player) else {
                potential_growth += 1;
                continue;
            };
            record.potential_growth = record.potential_growth.saturating_sub(1);
            if record.potential_growth == 0 {
                self.players[idx].border_tiles.remove(n);
            }
        }

        self.at_mut(coord).push_influencer(
            player,
            InfluenceRecord {
                influence: 1.0,
                seed_distance,
                potential_growth,
            },
        );
        let owner = &mut self.players[idx];
        owner.sphere.insert(coord);
        if potential_growth > 0 {
            owner.border_tiles.insert(coord);
        }
        Ok(())
    }

    /// Accrue influence for every player, then arbitrate ownership of every
    /// influenced tile.
    ///
    /// Accrual adds `culture / (seed_distance + 1)` to each sphere tile.
    /// Arbitration gives unowned tiles to their first influencer, then hands
    /// any tile whose owner is out-influenced to the strongest influencer.
    pub fn update_influence(&mut self) {
        let culture: Vec<f64> = self.players.iter().map(|p| p.culture).collect();

        for coord in self.coords() {
            for (id, record) in self.at_mut(coord).influence_records_mut() {
                record.influence += culture[usize::from(*id)] / f64::from(record.seed_distance + 1);
            }
        }

        let mut transfers = 0usize;
        for coord in self.coords() {
            let tile = self.at(coord);
            let Some((strongest, max)) = tile.strongest_influencer() else {
                continue;
            };
            let owner = match tile.owner() {
                Some(owner) => owner,
                None => {
                    let Some(first) = tile.influencers().next() else {
                        continue;
                    };
                    self.set_owner(coord, first);
                    first
                }
            };
            let held = self
                .at(coord)
                .influence_of(owner)
                .map_or(f64::NEG_INFINITY, |record| record.influence);
            if held < max {
                self.set_owner(coord, strongest);
                transfers += 1;
            }
        }

        tracing::trace!(target: "hexrealm::influence", transfers, "influence.updated");
    }

    /// Transfer ownership of `coord` to `new_owner`, keeping both players'
    /// owned and owned-border sets and every neighbor's growth count in step.
    ///
    /// Callers guarantee the tile is land and `new_owner` influences it.
    pub(crate) fn set_owner(&mut self, coord: Offset, new_owner: PlayerId) {
        let tile = self.at(coord);
        let previous = tile.owner();
        if previous == Some(new_owner) {
            return;
        }
        debug_assert!(tile.is_land(), "{coord} is water");
        let neighbors = tile.neighbors().to_vec();

        if let Some(prev) = previous {
            let player = &mut self.players[usize::from(prev)];
            player.owned_tiles.remove(coord);
            player.owned_border_tiles.remove(coord);
        }

        let mut growth = 0u8;
        for n in neighbors {
            let neighbor = self.at_mut(n);
            if !neighbor.is_land() {
                continue;
            }
            let neighbor_owner = neighbor.owner;
            if neighbor_owner == Some(new_owner) {
                neighbor.owned_potential_growth = neighbor.owned_potential_growth.saturating_sub(1);
                if neighbor.owned_potential_growth == 0 {
                    self.players[usize::from(new_owner)].owned_border_tiles.remove(n);
                }
                continue;
            }
            growth += 1;
            if let Some(prev) = previous.filter(|&p| neighbor_owner == Some(p)) {
                // Losing this tile opens a frontier for the previous owner.
                neighbor.owned_potential_growth += 1;
                self.players[usize::from(prev)].owned_border_tiles.insert(n);
            }
        }

        let tile = self.at_mut(coord);
        tile.owner = Some(new_owner);
        tile.owned_potential_growth = growth;
        // A flag falls with the tile it stands on.
        if let Some(prev) = tile.flag_holder.take_if(|holder| Some(*holder) == previous) {
            self.players[usize::from(prev)].flag = None;
        }

        let player = &mut self.players[usize::from(new_owner)];
        player.owned_tiles.insert(coord);
        if growth > 0 {
            player.owned_border_tiles.insert(coord);
        }

        tracing::trace!(
            target: "hexrealm::influence",
            %coord,
            from = ?previous,
            to = new_owner,
            "tile.owner_changed"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{LandStrategy, TerrainParams, check_invariants};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    /// A fully land grid: uniform growth at proportion 1 covers every tile.
    fn land_grid(cols: u16, rows: u16) -> Grid {
        let mut grid = Grid::new(cols, rows).unwrap();
        let params = TerrainParams {
            proportion: 1.0,
            strategy: LandStrategy::Uniform,
        };
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        grid.generate_terrain(&params, &mut rng).unwrap();
        grid
    }

    #[test]
    fn test_seed_claim_sets_home_and_border() {
        let mut grid = land_grid(7, 7);
        let home = Offset::new(3, 3);
        let id = grid.add_player(home, Scores::default()).unwrap();

        let record = grid.get(home).unwrap().influence_of(id).copied().unwrap();
        assert_eq!(record.seed_distance, 0);
        assert_eq!(record.potential_growth, 6);
        assert!((record.influence - 1.0).abs() < f64::EPSILON);

        let player = grid.player(id).unwrap();
        assert_eq!(player.home(), Some(home));
        assert!(player.border_tiles().contains(home));
    }

    #[test]
    fn test_claim_decrements_neighbor_growth() {
        let mut grid = land_grid(7, 7);
        let home = Offset::new(3, 3);
        let id = grid.add_player(home, Scores::default()).unwrap();
        let next = grid.get(home).unwrap().neighbors()[0];
        grid.set_influence(next, id).unwrap();

        let home_record = grid.get(home).unwrap().influence_of(id).copied().unwrap();
        assert_eq!(home_record.potential_growth, 5);
        let next_record = grid.get(next).unwrap().influence_of(id).copied().unwrap();
        assert_eq!(next_record.seed_distance, 1);
        assert_eq!(next_record.potential_growth, 5);
        assert!(check_invariants(&grid).is_empty());
    }

    #[test]
    fn test_enclosed_tile_leaves_border() {
        let mut grid = land_grid(7, 7);
        let home = Offset::new(3, 3);
        let id = grid.add_player(home, Scores::default()).unwrap();
        for n in grid.get(home).unwrap().neighbors().to_vec() {
            grid.set_influence(n, id).unwrap();
        }
        let player = grid.player(id).unwrap();
        assert!(!player.border_tiles().contains(home));
        assert_eq!(player.sphere().len(), 7);
        assert_eq!(player.border_tiles().len(), 6);
    }

    #[test]
    fn test_set_influence_rejections() {
        let mut grid = Grid::new(5, 5).unwrap();
        grid.players.push(Player::new(0, Scores::default()));
        assert!(matches!(
            grid.set_influence(Offset::new(1, 1), 0),
            Err(GameError::Water(_))
        ));
        assert!(matches!(
            grid.set_influence(Offset::new(9, 1), 0),
            Err(GameError::NoSuchTile(_))
        ));
        assert!(matches!(
            grid.set_influence(Offset::new(1, 1), 4),
            Err(GameError::UnknownPlayer(4))
        ));

        let mut grid = land_grid(5, 5);
        let id = grid.add_player(Offset::new(2, 2), Scores::default()).unwrap();
        assert!(matches!(
            grid.set_influence(Offset::new(2, 2), id),
            Err(GameError::AlreadyInfluenced { .. })
        ));
    }

    #[test]
    fn test_update_influence_owns_seed() {
        let mut grid = land_grid(5, 5);
        let home = Offset::new(2, 2);
        let id = grid.add_player(home, Scores::default()).unwrap();
        grid.update_influence();

        let tile = grid.get(home).unwrap();
        assert_eq!(tile.owner(), Some(id));
        assert_eq!(tile.owned_potential_growth(), 6);
        assert!((tile.influence_of(id).unwrap().influence - 2.0).abs() < 1e-12);
        assert!(grid.player(id).unwrap().owned_border_tiles().contains(home));
        assert!(tile.is_home_of_owner());
    }

    #[test]
    fn test_accrual_decays_with_distance() {
        let mut grid = land_grid(7, 7);
        let home = Offset::new(3, 3);
        let id = grid.add_player(home, Scores { culture: 3.0, military: 1.0 }).unwrap();
        let next = grid.get(home).unwrap().neighbors()[2];
        grid.set_influence(next, id).unwrap();
        grid.update_influence();

        let at_home = grid.get(home).unwrap().influence_of(id).unwrap().influence;
        let at_next = grid.get(next).unwrap().influence_of(id).unwrap().influence;
        assert!((at_home - 4.0).abs() < 1e-12);
        assert!((at_next - 2.5).abs() < 1e-12);
    }

    #[test]
    fn test_first_claimant_wins_ties() {
        let mut grid = land_grid(7, 7);
        let a = grid.add_player(Offset::new(2, 3), Scores::default()).unwrap();
        let b = grid.add_player(Offset::new(4, 3), Scores::default()).unwrap();
        let middle = Offset::new(3, 3);
        grid.set_influence(middle, a).unwrap();
        grid.set_influence(middle, b).unwrap();
        grid.update_influence();
        assert_eq!(grid.get(middle).unwrap().owner(), Some(a));
    }

    #[test]
    fn test_stronger_culture_takes_over() {
        let mut grid = land_grid(7, 7);
        let a = grid.add_player(Offset::new(2, 3), Scores::default()).unwrap();
        let b = grid
            .add_player(Offset::new(4, 3), Scores { culture: 4.0, military: 1.0 })
            .unwrap();
        let middle = Offset::new(3, 3);
        grid.set_influence(middle, a).unwrap();
        grid.set_influence(middle, b).unwrap();
        grid.update_influence();
        assert_eq!(grid.get(middle).unwrap().owner(), Some(b));
        assert!(grid.player(b).unwrap().owned_tiles().contains(middle));
        assert!(!grid.player(a).unwrap().owned_tiles().contains(middle));
        assert!(check_invariants(&grid).is_empty());
    }

    #[test]
    fn test_set_owner_reopens_previous_frontier() {
        let mut grid = land_grid(7, 7);
        let a = grid.add_player(Offset::new(3, 3), Scores::default()).unwrap();
        let home_neighbors = grid.get(Offset::new(3, 3)).unwrap().neighbors().to_vec();
        for &n in &home_neighbors {
            grid.set_influence(n, a).unwrap();
        }
        grid.update_influence();
        assert!(!grid.player(a).unwrap().owned_border_tiles().contains(Offset::new(3, 3)));

        let b = grid.add_player(Offset::new(0, 0), Scores::default()).unwrap();
        let lost = home_neighbors[0];
        grid.set_influence(lost, b).unwrap();
        grid.set_owner(lost, b);

        let home = grid.get(Offset::new(3, 3)).unwrap();
        assert_eq!(home.owned_potential_growth(), 1);
        assert!(grid.player(a).unwrap().owned_border_tiles().contains(Offset::new(3, 3)));
        assert!(check_invariants(&grid).is_empty());
    }

    #[test]
    fn test_set_players_validation() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut grid = Grid::new(5, 5).unwrap();
        assert!(matches!(
            grid.set_players(2, Scores::default(), &mut rng),
            Err(GameError::NoLand)
        ));
        let mut grid = land_grid(5, 5);
        assert!(matches!(
            grid.set_players(0, Scores::default(), &mut rng),
            Err(GameError::PlayerCount { .. })
        ));
        assert!(matches!(
            grid.set_players(MAX_PLAYERS + 1, Scores::default(), &mut rng),
            Err(GameError::PlayerCount { .. })
        ));
        grid.set_players(3, Scores::default(), &mut rng).unwrap();
        assert_eq!(grid.players().len(), 3);
        assert!(grid.players().iter().all(|p| p.home().is_some()));
        assert!(matches!(
            grid.set_players(1, Scores::default(), &mut rng),
            Err(GameError::AlreadySeeded)
        ));
    }
}

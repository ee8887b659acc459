//! Game invariants: sanity checks that detect bookkeeping bugs.
//!
//! The relationship sets on each player are caches of per-tile state. If any
//! check here fails, a mutation skipped part of an update.

use std::fmt;

use crate::game::{Grid, PlayerId, Tile};

/// Invariant violation error.
#[derive(Debug, Clone)]
pub struct InvariantViolation {
    /// Description of the violated invariant.
    pub message: String,
}

impl fmt::Display for InvariantViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Invariant violation: {}", self.message)
    }
}

impl std::error::Error for InvariantViolation {}

fn land_neighbors_where<'a>(grid: &'a Grid, tile: &'a Tile, pred: impl Fn(&Tile) -> bool + 'a) -> usize {
    tile.neighbors()
        .iter()
        .filter_map(|&n| grid.get(n))
        .filter(|n| n.is_land() && pred(n))
        .count()
}

/// Check all game invariants.
///
/// Returns every violation found, or an empty list if all hold.
#[must_use]
pub fn check_invariants(grid: &Grid) -> Vec<InvariantViolation> {
    let mut violations = Vec::new();
    let mut fail = |message: String| violations.push(InvariantViolation { message });

    for tile in grid.tiles() {
        let coord = tile.coord();
        let cube = tile.cube();
        if cube.x + cube.y + cube.z != 0 || cube.to_offset() != coord {
            fail(format!("Tile {coord} has inconsistent cube coordinate {cube:?}"));
        }

        if !tile.is_land() {
            if tile.owner().is_some() || tile.influencer_count() > 0 || tile.flag_holder().is_some() {
                fail(format!("Water tile {coord} is owned, influenced or flagged"));
            }
            continue;
        }

        let water = tile.neighbors().len() - land_neighbors_where(grid, tile, |_| true);
        if usize::from(tile.border_count()) != water {
            fail(format!(
                "Tile {coord} border count {} but {water} water neighbors",
                tile.border_count()
            ));
        }

        for &(id, record) in tile.influence_records() {
            let Some(player) = grid.player(id) else {
                fail(format!("Tile {coord} influenced by unknown player {id}"));
                continue;
            };
            if !record.influence.is_finite() || record.influence < 0.0 {
                fail(format!("Tile {coord} has influence {} for player {id}", record.influence));
            }
            if !player.sphere().contains(coord) {
                fail(format!("Tile {coord} influenced by player {id} but not in their sphere"));
            }
            let growth = land_neighbors_where(grid, tile, |n| !n.is_influenced_by(id));
            if usize::from(record.potential_growth) != growth {
                fail(format!(
                    "Tile {coord} potential growth {} for player {id}, expected {growth}",
                    record.potential_growth
                ));
            }
            if player.border_tiles().contains(coord) != (record.potential_growth > 0) {
                fail(format!(
                    "Tile {coord} border membership for player {id} disagrees with potential growth {}",
                    record.potential_growth
                ));
            }
        }

        if let Some(owner) = tile.owner() {
            check_owned(grid, tile, owner, &mut fail);
        }

        if let Some(holder) = tile.flag_holder() {
            if grid.player(holder).and_then(|p| p.flag()) != Some(coord) {
                fail(format!("Tile {coord} carries player {holder}'s flag but the player disagrees"));
            }
        }
    }

    for player in grid.players() {
        let id = player.id;
        for coord in player.sphere() {
            if !grid.get(coord).is_some_and(|t| t.is_influenced_by(id)) {
                fail(format!("Player {id} sphere holds {coord} which they do not influence"));
            }
        }
        for coord in player.border_tiles() {
            if !player.sphere().contains(coord) {
                fail(format!("Player {id} border tile {coord} is outside their sphere"));
            }
        }
        for coord in player.owned_tiles() {
            if grid.get(coord).and_then(Tile::owner) != Some(id) {
                fail(format!("Player {id} lists {coord} as owned but does not own it"));
            }
        }
        for coord in player.owned_border_tiles() {
            if !player.owned_tiles().contains(coord) {
                fail(format!("Player {id} owned border tile {coord} is not owned"));
            }
        }
        if let Some(flag) = player.flag() {
            let tile = grid.get(flag);
            if tile.and_then(Tile::flag_holder) != Some(id) || tile.and_then(Tile::owner) != Some(id) {
                fail(format!("Player {id} flag at {flag} is not on a tile they own and mark"));
            }
        }
    }

    violations
}

fn check_owned(grid: &Grid, tile: &Tile, owner: PlayerId, fail: &mut impl FnMut(String)) {
    let coord = tile.coord();
    if !tile.is_influenced_by(owner) {
        fail(format!("Tile {coord} owned by player {owner} who does not influence it"));
    }
    let Some(player) = grid.player(owner) else {
        fail(format!("Tile {coord} owned by unknown player {owner}"));
        return;
    };
    if !player.owned_tiles().contains(coord) {
        fail(format!("Tile {coord} missing from player {owner}'s owned tiles"));
    }
    let growth = land_neighbors_where(grid, tile, |n| n.owner() != Some(owner));
    if usize::from(tile.owned_potential_growth()) != growth {
        fail(format!(
            "Tile {coord} owned potential growth {}, expected {growth}",
            tile.owned_potential_growth()
        ));
    }
    if player.owned_border_tiles().contains(coord) != (tile.owned_potential_growth() > 0) {
        fail(format!(
            "Tile {coord} owned-border membership disagrees with owned potential growth {}",
            tile.owned_potential_growth()
        ));
    }
}

/// Assert all game invariants hold, panicking if any are violated.
///
/// Only active in debug builds. No-op in release builds.
///
/// # Panics
///
/// Panics with every violation listed if any invariant fails.
#[cfg(debug_assertions)]
pub fn assert_invariants(grid: &Grid) {
    let violations = check_invariants(grid);
    if !violations.is_empty() {
        let messages: Vec<_> = violations.iter().map(|v| v.message.as_str()).collect();
        panic!("Game invariant violations:\n  - {}", messages.join("\n  - "));
    }
}

/// No-op in release builds.
#[cfg(not(debug_assertions))]
pub fn assert_invariants(_grid: &Grid) {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Scores, TerrainParams};
    use crate::hex::Offset;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn create_valid_game() -> Grid {
        let mut grid = Grid::new(12, 10).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(17);
        grid.generate_terrain(&TerrainParams::default(), &mut rng).unwrap();
        grid.set_players(3, Scores::default(), &mut rng).unwrap();
        grid.update_influence();
        grid
    }

    fn owned_tile(grid: &Grid) -> Offset {
        grid.tiles().iter().find(|t| t.owner().is_some()).unwrap().coord()
    }

    #[test]
    fn test_valid_game_passes() {
        let grid = create_valid_game();
        let violations = check_invariants(&grid);
        assert!(violations.is_empty(), "{violations:?}");
    }

    #[test]
    fn test_empty_grid_passes() {
        let grid = Grid::new(4, 4).unwrap();
        assert!(check_invariants(&grid).is_empty());
    }

    #[test]
    fn test_owner_outside_influencers_detected() {
        let mut grid = create_valid_game();
        let water = grid.coords().find(|&c| !grid.get(c).unwrap().is_land()).unwrap();
        let land = grid
            .land()
            .tiles()
            .iter()
            .copied()
            .find(|&c| grid.get(c).unwrap().owner().is_none())
            .unwrap();
        grid.at_mut(land).owner = Some(0);
        grid.at_mut(water).owner = Some(0);

        let violations = check_invariants(&grid);
        assert!(violations.iter().any(|v| v.message.contains("does not influence it")));
        assert!(violations.iter().any(|v| v.message.contains("Water tile")));
    }

    #[test]
    fn test_stale_owned_border_detected() {
        let mut grid = create_valid_game();
        let coord = owned_tile(&grid);
        let owner = grid.get(coord).unwrap().owner().unwrap();
        grid.players[usize::from(owner)].owned_border_tiles.remove(coord);
        assert!(!check_invariants(&grid).is_empty());
    }

    #[test]
    fn test_stale_border_detected() {
        let mut grid = create_valid_game();
        let home = grid.players()[0].home().unwrap();
        grid.players[0].border_tiles.remove(home);
        let violations = check_invariants(&grid);
        assert!(violations.iter().any(|v| v.message.contains("border membership")));
    }

    #[test]
    fn test_wrong_growth_count_detected() {
        let mut grid = create_valid_game();
        let coord = owned_tile(&grid);
        grid.at_mut(coord).owned_potential_growth += 1;
        let violations = check_invariants(&grid);
        assert!(violations.iter().any(|v| v.message.contains("owned potential growth")));
    }

    #[test]
    fn test_dangling_flag_detected() {
        let mut grid = create_valid_game();
        let coord = owned_tile(&grid);
        grid.players[0].flag = Some(coord);
        let violations = check_invariants(&grid);
        assert!(violations.iter().any(|v| v.message.contains("flag")));
    }

    #[test]
    fn test_multiple_violations_all_reported() {
        let mut grid = create_valid_game();
        let coord = owned_tile(&grid);
        grid.at_mut(coord).owned_potential_growth += 1;
        grid.at_mut(coord).border_count += 1;
        grid.players[0].flag = Some(coord);
        assert!(check_invariants(&grid).len() >= 3);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "Game invariant violations")]
    fn test_assert_invariants_panics() {
        let mut grid = create_valid_game();
        let coord = owned_tile(&grid);
        grid.at_mut(coord).owned_potential_growth += 1;
        assert_invariants(&grid);
    }
}

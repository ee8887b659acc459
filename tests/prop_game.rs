//! Property-based tests for coordinates, terrain and game rounds.
//!
//! Run with: cargo test --release prop_game

#![allow(missing_docs)]
#![allow(clippy::unwrap_used)]

use std::collections::{HashSet, VecDeque};

use proptest::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use hexrealm::game::{LandStrategy, TerrainParams, check_invariants};
use hexrealm::hex::{cube_to_offset, hex_round, offset_to_cube};
use hexrealm::{GameConfig, Grid, Offset, Session, Viewport};

fn strategy() -> impl Strategy<Value = LandStrategy> {
    prop_oneof![
        (0.0..=1.0f64, 0.0..=1.0f64).prop_map(|(coast_par, neighbor_par)| LandStrategy::Biased {
            coast_par,
            neighbor_par,
        }),
        Just(LandStrategy::Uniform),
        (0.0..=1.0f64).prop_map(|probability| LandStrategy::Bordered { probability }),
    ]
}

/// Land tiles reachable from the first land tile through land neighbors.
fn reachable_land(grid: &Grid) -> usize {
    let Some(&start) = grid.land().tiles().first() else {
        return 0;
    };
    let mut seen = HashSet::from([start]);
    let mut queue = VecDeque::from([start]);
    while let Some(coord) = queue.pop_front() {
        for &n in grid.get(coord).unwrap().neighbors() {
            if grid.get(n).unwrap().is_land() && seen.insert(n) {
                queue.push_back(n);
            }
        }
    }
    seen.len()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    /// Offset -> cube -> offset is the identity.
    #[test]
    fn prop_offset_cube_round_trip(q in -500i32..500, r in -500i32..500) {
        let cube = offset_to_cube(q, r);
        prop_assert_eq!(cube.x + cube.y + cube.z, 0);
        prop_assert_eq!(cube_to_offset(cube.x, cube.y, cube.z), Offset::new(q, r));
    }

    /// Rounding any fractional cube point yields a valid cube coordinate.
    #[test]
    fn prop_hex_round_sums_to_zero(x in -100.0..100.0f64, z in -100.0..100.0f64) {
        let y = -x - z;
        let cube = hex_round(x, y, z).unwrap();
        prop_assert_eq!(cube.x + cube.y + cube.z, 0);
    }

    /// A tile's drawn center maps back to that tile, for any surface size.
    #[test]
    fn prop_pixel_to_tile_inverts_display_info(
        cols in 1u16..40,
        rows in 1u16..40,
        width in 50.0..2000.0f64,
        height in 50.0..2000.0f64,
        pick in any::<u32>(),
    ) {
        let view = Viewport::fit(width, height, cols, rows);
        let q = i32::try_from(pick % u32::from(cols)).unwrap();
        let r = i32::try_from((pick / u32::from(cols)) % u32::from(rows)).unwrap();
        let coord = Offset::new(q, r);
        let info = view.display_info(coord);
        prop_assert_eq!(view.pixel_to_offset(info.cx, info.cy), Some(coord));
        // Points well inside the hexagon land on the same tile.
        let nudge = info.radius * 0.4;
        prop_assert_eq!(view.pixel_to_offset(info.cx + nudge, info.cy - nudge), Some(coord));
    }

    /// Any pointer position resolves to a cell or to nothing, never a panic.
    #[test]
    fn prop_pixel_to_tile_total(
        px in prop_oneof![any::<f64>(), -1e15..1e15f64],
        py in prop_oneof![any::<f64>(), -1e15..1e15f64],
    ) {
        let grid = Grid::new(25, 15).unwrap();
        let view = grid.viewport(1024.0, 768.0);
        let tile = grid.pixel_to_tile(&view, px, py);
        if !(px.is_finite() && py.is_finite()) {
            prop_assert!(tile.is_none());
        }
        if let Some(tile) = tile {
            let info = view.display_info(tile.coord());
            prop_assert!((px - info.cx).hypot(py - info.cy) <= info.radius + 1e-6);
        }
    }

    /// Terrain has exactly the target land count, all of it connected.
    #[test]
    fn prop_terrain_count_and_connectivity(
        cols in 3u16..30,
        rows in 3u16..30,
        proportion in 0.15..=1.0f64,
        strategy in strategy(),
        seed in any::<u64>(),
    ) {
        let mut grid = Grid::new(cols, rows).unwrap();
        let params = TerrainParams { proportion, strategy };
        let target = params.target(grid.tiles().len()).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        grid.generate_terrain(&params, &mut rng).unwrap();

        prop_assert_eq!(grid.land().len(), target);
        prop_assert_eq!(grid.land_count(), target);
        prop_assert_eq!(reachable_land(&grid), target);
        prop_assert!(grid.get(grid.center()).unwrap().is_land());
    }

    /// Relationship caches stay consistent through any number of rounds.
    #[test]
    fn prop_invariants_hold_after_rounds(
        cols in 4u16..20,
        rows in 4u16..20,
        players in 1usize..=8,
        rounds in 1u32..15,
        culture in 0.0..20.0f64,
        military in 0.0..20.0f64,
        seed in any::<u64>(),
    ) {
        let config = GameConfig {
            cols,
            rows,
            proportion: 0.5,
            players,
            starting_culture: culture,
            starting_military: military,
            ..GameConfig::default()
        };
        let mut session = Session::new(&config, seed).unwrap();
        for _ in 0..rounds {
            session.play_round().unwrap();
            let violations = check_invariants(session.grid());
            prop_assert!(violations.is_empty(), "{:?}", violations);
        }
        let owned: usize = session.grid().players().iter().map(|p| p.owned_tiles().len()).sum();
        prop_assert!(owned <= session.grid().land().len());
    }

    /// Identical config and seed replay identically.
    #[test]
    fn prop_seed_determinism(seed in any::<u64>(), rounds in 1u32..10) {
        let config = GameConfig {
            cols: 12,
            rows: 10,
            players: 3,
            ..GameConfig::default()
        };
        let mut a = Session::new(&config, seed).unwrap();
        let mut b = Session::new(&config, seed).unwrap();
        let report_a = a.play_rounds(rounds).unwrap();
        let report_b = b.play_rounds(rounds).unwrap();

        prop_assert_eq!(report_a, report_b);
        prop_assert_eq!(a.grid().land().tiles(), b.grid().land().tiles());
        for (ta, tb) in a.grid().tiles().iter().zip(b.grid().tiles()) {
            prop_assert_eq!(ta.owner(), tb.owner());
        }
    }
}

//! Plain text rendering of grids and round results.
//!
//! The map is drawn one character per tile with odd rows shifted half a tile
//! right, matching the odd-r layout:
//!
//! ```text
//!  . . a a + .
//!   . A a b B .
//!  . . a * b .
//! ```

#![allow(clippy::format_push_string)]

use crate::game::{ConquestOutcome, Grid, PlayerId, RoundReport, Standing, Tile};

/// Glyph for water.
pub const WATER: char = '.';
/// Glyph for unowned land.
pub const UNOWNED: char = '+';
/// Glyph for a tile carrying a flag.
pub const FLAG: char = '*';

/// Glyph for tiles owned by `player`: lowercase, or uppercase on their home.
#[must_use]
pub fn player_glyph(player: PlayerId, home: bool) -> char {
    let base = if home { b'A' } else { b'a' };
    char::from(base + player % 26)
}

/// Glyph for one tile.
#[must_use]
pub fn tile_glyph(tile: &Tile) -> char {
    if !tile.is_land() {
        return WATER;
    }
    if tile.flag_holder().is_some() {
        return FLAG;
    }
    match tile.owner() {
        Some(owner) => player_glyph(owner, tile.is_home_of_owner()),
        None => UNOWNED,
    }
}

/// Draw the whole grid.
#[must_use]
pub fn render_map(grid: &Grid) -> String {
    let mut output = String::new();
    for r in 0..i32::from(grid.rows()) {
        if r & 1 == 1 {
            output.push(' ');
        }
        for q in 0..i32::from(grid.cols()) {
            if q > 0 {
                output.push(' ');
            }
            output.push(grid.tile(q, r).map_or(' ', tile_glyph));
        }
        output.push('\n');
    }
    output
}

/// Land and coast statistics for a generated grid.
#[must_use]
pub fn render_land_summary(grid: &Grid) -> String {
    let tiles = grid.tiles().len();
    let land = grid.land();
    #[allow(clippy::cast_precision_loss)]
    let share = land.len() as f64 / tiles as f64 * 100.0;
    let seed = land
        .tiles()
        .first()
        .map_or_else(|| "-".to_string(), ToString::to_string);
    format!(
        "Grid {}x{}: {} land tiles ({share:.1}%), {} on the coast, seed at {seed}\n",
        grid.cols(),
        grid.rows(),
        land.len(),
        land.coast().len(),
    )
}

/// Table of standings.
#[must_use]
pub fn render_standings(standings: &[Standing]) -> String {
    let mut output = String::from("Player      Glyph  Territory  Sphere     Culture    Military\n");
    for s in standings {
        output.push_str(&format!(
            "{:<11} {:<6} {:>9}  {:>6}  {:>10.1}  {:>10.1}\n",
            s.name,
            player_glyph(s.player, false),
            s.territory,
            s.sphere,
            s.culture,
            s.military,
        ));
    }
    output
}

/// One line per conquest attempt.
#[must_use]
pub fn render_conquest(outcome: &ConquestOutcome) -> String {
    match *outcome {
        ConquestOutcome::Claimed { player, tile } => {
            format!("player {} claimed {tile}", usize::from(player) + 1)
        }
        ConquestOutcome::Won { player, tile, from } => format!(
            "player {} took {tile} from player {}",
            usize::from(player) + 1,
            usize::from(from) + 1
        ),
        ConquestOutcome::Repelled { player, tile, by } => format!(
            "player {} was repelled at {tile} by player {}",
            usize::from(player) + 1,
            usize::from(by) + 1
        ),
        ConquestOutcome::Skipped { player } => {
            format!("player {} had nowhere to attack", usize::from(player) + 1)
        }
    }
}

/// Summary of a completed round.
#[must_use]
pub fn render_round(report: &RoundReport) -> String {
    let mut output = format!(
        "=== ROUND {} ===\nExpansion claimed {} tiles\n",
        report.round, report.expanded
    );
    for outcome in &report.conquests {
        output.push_str("  ");
        output.push_str(&render_conquest(outcome));
        output.push('\n');
    }
    output
}

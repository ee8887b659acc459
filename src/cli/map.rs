//! Map command implementation: terrain only.

use super::{CliError, GameArgs, resolve_seed};
use hexrealm::Grid;
use hexrealm::render::{render_land_summary, render_map};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Execute the map command.
///
/// # Errors
///
/// Returns an error if the config is invalid or generation fails.
pub(crate) fn execute(game: &GameArgs, seed: Option<u64>) -> Result<(), CliError> {
    let config = game.resolve()?;
    let seed = resolve_seed(seed);

    let mut grid = Grid::new(config.cols, config.rows).map_err(|e| CliError::new(e.to_string()))?;
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    grid.generate_terrain(&config.terrain(), &mut rng)?;

    println!("Seed {seed}");
    print!("{}", render_land_summary(&grid));
    println!();
    print!("{}", render_map(&grid));

    Ok(())
}

//! Run command implementation.

use super::output::{JsonRunResult, format_text};
use super::{CliError, GameArgs, OutputFormat, resolve_seed};
use hexrealm::Session;
use hexrealm::render::render_round;

/// Execute the run command.
///
/// # Errors
///
/// Returns an error if the config is invalid or the game fails to run.
pub(crate) fn execute(game: &GameArgs, seed: Option<u64>, format: OutputFormat, verbose: bool) -> Result<(), CliError> {
    let config = game.resolve()?;
    let seed = resolve_seed(seed);

    if format == OutputFormat::Text {
        println!(
            "Running {}x{} game with {} players for {} rounds (seed {seed})...",
            config.cols, config.rows, config.players, config.rounds
        );
        println!();
    }

    let mut session = Session::new(&config, seed)?;
    let mut last_conquests = Vec::new();
    for _ in 0..config.rounds {
        let report = session.play_round()?;
        if verbose && format == OutputFormat::Text {
            print!("{}", render_round(&report));
        }
        last_conquests = report.conquests;
    }

    match format {
        OutputFormat::Text => {
            if verbose {
                println!();
            }
            print!("{}", format_text(&session, seed));
        }
        OutputFormat::Json => {
            let json_result = JsonRunResult::from_session(&session, seed, last_conquests);
            let json = serde_json::to_string_pretty(&json_result)?;
            println!("{json}");
        }
    }

    Ok(())
}

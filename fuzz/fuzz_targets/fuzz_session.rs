#![no_main]

//! Session command fuzzer.
//!
//! Builds a small session from fuzzer-chosen settings, then feeds it an
//! arbitrary command stream: flags on any coordinate, allocations of any
//! amount (including NaN and negatives), turn ends from any player.
//! Rejected commands must leave standings untouched, and the relationship
//! invariants must hold after every command.

use arbitrary::Arbitrary;
use hexrealm::game::{LandStrategy, check_invariants};
use hexrealm::{Command, GameConfig, Offset, Session};
use libfuzzer_sys::fuzz_target;

/// A fuzzer-generated command.
#[derive(Arbitrary, Debug, Clone, Copy)]
enum FuzzCommand {
    PlaceFlag { player: u8, q: i8, r: i8 },
    Allocate { player: u8, military: f64 },
    EndTurn { player: u8 },
}

impl FuzzCommand {
    fn into_command(self) -> Command {
        match self {
            Self::PlaceFlag { player, q, r } => Command::PlaceFlag {
                player: player % 9,
                tile: Offset::new(i32::from(q), i32::from(r)),
            },
            Self::Allocate { player, military } => Command::Allocate {
                player: player % 9,
                military,
            },
            Self::EndTurn { player } => Command::EndTurn { player: player % 9 },
        }
    }
}

/// Structured input for session fuzzing.
#[derive(Arbitrary, Debug)]
struct SessionInput {
    cols: u8,
    rows: u8,
    players: u8,
    uniform_land: bool,
    culture: u8,
    military: u8,
    seed: u64,
    commands: Vec<FuzzCommand>,
}

fuzz_target!(|input: SessionInput| {
    let config = GameConfig {
        cols: u16::from(input.cols % 16) + 3,
        rows: u16::from(input.rows % 16) + 3,
        players: usize::from(input.players % 8) + 1,
        land: if input.uniform_land {
            LandStrategy::Uniform
        } else {
            LandStrategy::default()
        },
        starting_culture: f64::from(input.culture),
        starting_military: f64::from(input.military),
        ..GameConfig::default()
    };
    let Ok(mut session) = Session::new(&config, input.seed) else {
        return;
    };

    for command in input.commands.into_iter().take(200) {
        let before = session.standings();
        let round = session.round();
        match session.apply(command.into_command()) {
            Ok(_) => {}
            Err(_) => {
                assert_eq!(session.standings(), before, "rejected command changed standings");
                assert_eq!(session.round(), round);
            }
        }

        let violations = check_invariants(session.grid());
        assert!(violations.is_empty(), "invariants violated: {violations:?}");
    }
});

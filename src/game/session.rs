//! A game session: the grid, its random source and the turn cycle.
//!
//! Players act one at a time. The active player may move their flag and
//! allocate resources, then ends their turn. When the last player ends their
//! turn, the round-end passes run: expansion with influence accrual, then
//! conquest.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::Serialize;

use crate::config::GameConfig;
use crate::error::{GameError, GameResult};
use crate::game::{ConquestOutcome, Grid, PlayerId, assert_invariants};
use crate::hex::Offset;

/// A command from the input layer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    /// Move `player`'s flag to `tile`.
    PlaceFlag {
        /// Acting player.
        player: PlayerId,
        /// Target tile.
        tile: Offset,
    },
    /// Put `military` of `player`'s resources into military, the rest into culture.
    Allocate {
        /// Acting player.
        player: PlayerId,
        /// Military share.
        military: f64,
    },
    /// End `player`'s turn.
    EndTurn {
        /// Acting player.
        player: PlayerId,
    },
}

impl Command {
    /// The player issuing the command.
    #[must_use]
    pub const fn player(&self) -> PlayerId {
        match *self {
            Self::PlaceFlag { player, .. } | Self::Allocate { player, .. } | Self::EndTurn { player } => {
                player
            }
        }
    }
}

/// Per-player snapshot at the end of a round.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Standing {
    /// Player.
    pub player: PlayerId,
    /// Display name.
    pub name: String,
    /// Owned tiles.
    pub territory: usize,
    /// Tiles ever influenced.
    pub sphere: usize,
    /// Culture score.
    pub culture: f64,
    /// Military score.
    pub military: f64,
}

/// Summary of one completed round.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoundReport {
    /// Round number, starting at 1.
    pub round: u32,
    /// Tiles claimed by peaceful expansion.
    pub expanded: usize,
    /// Conquest attempts in seating order.
    pub conquests: Vec<ConquestOutcome>,
    /// Standings after the round.
    pub standings: Vec<Standing>,
}

/// A running game.
#[derive(Debug, Clone)]
pub struct Session<R = ChaCha8Rng> {
    grid: Grid,
    rng: R,
    expansion_divisor: f64,
    active: PlayerId,
    allocated: bool,
    round: u32,
}

impl Session<ChaCha8Rng> {
    /// Start a session whose every random choice follows from `seed`.
    ///
    /// # Errors
    ///
    /// Returns an error if the config is invalid or setup fails.
    pub fn new(config: &GameConfig, seed: u64) -> GameResult<Self> {
        Self::with_rng(config, ChaCha8Rng::seed_from_u64(seed))
    }
}

impl<R: Rng> Session<R> {
    /// Start a session drawing randomness from `rng`.
    ///
    /// Generates terrain, seeds the players and runs one influence update so
    /// every home tile is owned before the first turn.
    ///
    /// # Errors
    ///
    /// Returns an error if the config is invalid or setup fails.
    pub fn with_rng(config: &GameConfig, mut rng: R) -> GameResult<Self> {
        config.validate()?;

        let mut grid = Grid::new(config.cols, config.rows)?;
        grid.generate_terrain(&config.terrain(), &mut rng)?;
        grid.set_players(config.players, config.scores(), &mut rng)?;
        grid.update_influence();
        assert_invariants(&grid);

        tracing::info!(
            target: "hexrealm::session",
            cols = config.cols,
            rows = config.rows,
            land = grid.land().len(),
            players = config.players,
            "session.started"
        );

        Ok(Self {
            grid,
            rng,
            expansion_divisor: config.expansion_divisor,
            active: 0,
            allocated: false,
            round: 0,
        })
    }

    /// The grid, for read-only rendering and inspection.
    #[must_use]
    pub const fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Player whose turn it is.
    #[must_use]
    pub const fn active_player(&self) -> PlayerId {
        self.active
    }

    /// Whether the active player has allocated this turn.
    #[must_use]
    pub const fn has_allocated(&self) -> bool {
        self.allocated
    }

    /// Rounds completed so far.
    #[must_use]
    pub const fn round(&self) -> u32 {
        self.round
    }

    fn check_active(&self, player: PlayerId) -> GameResult<()> {
        if player == self.active {
            Ok(())
        } else {
            Err(GameError::NotActive {
                player,
                active: self.active,
            })
        }
    }

    /// Apply one command. Rejected commands change nothing.
    ///
    /// Returns the round report when the command completed a round.
    ///
    /// # Errors
    ///
    /// Returns an error if the command is not valid right now.
    pub fn apply(&mut self, command: Command) -> GameResult<Option<RoundReport>> {
        let result = self.check_active(command.player()).and_then(|()| match command {
            Command::PlaceFlag { player, tile } => self.grid.place_flag(player, tile).map(|()| None),
            Command::Allocate { player, military } => self.allocate(player, military).map(|()| None),
            Command::EndTurn { .. } => self.end_player_turn(),
        });
        if let Err(error) = &result {
            tracing::warn!(target: "hexrealm::session", ?command, %error, "command.rejected");
        }
        result
    }

    /// Move the active player's flag.
    ///
    /// # Errors
    ///
    /// Returns an error if the tile is missing, water or not owned by them.
    pub fn place_flag(&mut self, tile: Offset) -> GameResult<()> {
        self.grid.place_flag(self.active, tile)
    }

    fn allocate(&mut self, player: PlayerId, military: f64) -> GameResult<()> {
        if self.allocated {
            return Err(GameError::AlreadyAllocated(player));
        }
        self.grid.allocate(player, military)?;
        self.allocated = true;
        Ok(())
    }

    /// Allocate the active player's resources, at most once per turn.
    ///
    /// # Errors
    ///
    /// Returns an error if they already allocated or `military` is out of range.
    pub fn allocate_active(&mut self, military: f64) -> GameResult<()> {
        self.allocate(self.active, military)
    }

    /// End the active player's turn. Without an allocation they receive the
    /// default half-and-half split. After the last player the round-end
    /// passes run and their report is returned.
    ///
    /// # Errors
    ///
    /// Propagates failures from the round-end passes.
    pub fn end_player_turn(&mut self) -> GameResult<Option<RoundReport>> {
        if !self.allocated {
            self.grid.grant_resources(self.active)?;
        }
        self.allocated = false;

        let next = usize::from(self.active) + 1;
        if next < self.grid.players().len() {
            #[allow(clippy::cast_possible_truncation)]
            let next = next as PlayerId;
            self.active = next;
            return Ok(None);
        }

        self.active = 0;
        self.finish_round().map(Some)
    }

    /// Every player ends their turn with the default allocation.
    ///
    /// # Errors
    ///
    /// Propagates failures from the round-end passes.
    pub fn play_round(&mut self) -> GameResult<RoundReport> {
        loop {
            if let Some(report) = self.end_player_turn()? {
                return Ok(report);
            }
        }
    }

    /// Play `rounds` default rounds, returning the last report.
    ///
    /// # Errors
    ///
    /// Propagates failures from the round-end passes.
    pub fn play_rounds(&mut self, rounds: u32) -> GameResult<Option<RoundReport>> {
        let mut last = None;
        for _ in 0..rounds {
            last = Some(self.play_round()?);
        }
        Ok(last)
    }

    fn finish_round(&mut self) -> GameResult<RoundReport> {
        let expanded = self.grid.expand(self.expansion_divisor)?;
        let conquests = self.grid.conquer(&mut self.rng)?;
        self.round += 1;
        assert_invariants(&self.grid);

        let report = RoundReport {
            round: self.round,
            expanded,
            conquests,
            standings: self.standings(),
        };
        tracing::info!(
            target: "hexrealm::session",
            round = report.round,
            expanded,
            captured = report.conquests.iter().filter(|c| c.captured()).count(),
            "round.completed"
        );
        Ok(report)
    }

    /// Current standings in seating order.
    #[must_use]
    pub fn standings(&self) -> Vec<Standing> {
        self.grid
            .players()
            .iter()
            .map(|p| Standing {
                player: p.id,
                name: p.name.clone(),
                territory: p.owned_tiles().len(),
                sphere: p.sphere().len(),
                culture: p.culture,
                military: p.military,
            })
            .collect()
    }

    /// Player owning the most tiles, earliest seat on ties.
    #[must_use]
    pub fn leader(&self) -> Option<PlayerId> {
        let mut best: Option<(PlayerId, usize)> = None;
        for p in self.grid.players() {
            let territory = p.owned_tiles().len();
            if best.is_none_or(|(_, most)| territory > most) {
                best = Some((p.id, territory));
            }
        }
        best.map(|(id, _)| id)
    }
}

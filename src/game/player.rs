//! Player state management.

use serde::Serialize;

use crate::game::TileSet;
use crate::hex::Offset;

/// Unique identifier for a player: their index in the grid's player list.
pub type PlayerId = u8;

/// Maximum number of players in a session.
pub const MAX_PLAYERS: usize = 8;

/// Display colors, in seating order.
pub const PLAYER_COLORS: [&str; MAX_PLAYERS] = [
    "pink", "orange", "#BC8ED6", "#AAE2E3", "#FAF86B", "#E38A8A", "#8AB4E3", "#C9C9C9",
];

/// Scores a player starts with.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Scores {
    /// Culture: drives influence accrual and expansion pace.
    pub culture: f64,
    /// Military: drives conquest odds.
    pub military: f64,
}

impl Default for Scores {
    fn default() -> Self {
        Self {
            culture: 1.0,
            military: 1.0,
        }
    }
}

/// State for a single player.
///
/// The tile sets are relationship caches kept in step with tile state by the
/// grid; nothing outside the game module mutates them.
#[derive(Debug, Clone)]
pub struct Player {
    /// Unique identifier for this player.
    pub id: PlayerId,
    /// Display name.
    pub name: String,
    /// Render hint.
    pub color: String,
    /// Culture score.
    pub culture: f64,
    /// Military score.
    pub military: f64,
    pub(crate) sphere: TileSet,
    pub(crate) border_tiles: TileSet,
    pub(crate) owned_tiles: TileSet,
    pub(crate) owned_border_tiles: TileSet,
    pub(crate) flag: Option<Offset>,
}

impl Player {
    /// Create a player with default name and color for their seat.
    #[must_use]
    pub fn new(id: PlayerId, scores: Scores) -> Self {
        Self {
            id,
            name: format!("player {}", usize::from(id) + 1),
            color: PLAYER_COLORS[usize::from(id) % MAX_PLAYERS].to_string(),
            culture: scores.culture,
            military: scores.military,
            sphere: TileSet::new(),
            border_tiles: TileSet::new(),
            owned_tiles: TileSet::new(),
            owned_border_tiles: TileSet::new(),
            flag: None,
        }
    }

    /// Tiles this player has ever influenced, in claim order.
    #[must_use]
    pub fn sphere(&self) -> &TileSet {
        &self.sphere
    }

    /// Sphere tiles that still touch unclaimed land.
    #[must_use]
    pub fn border_tiles(&self) -> &TileSet {
        &self.border_tiles
    }

    /// Tiles this player owns.
    #[must_use]
    pub fn owned_tiles(&self) -> &TileSet {
        &self.owned_tiles
    }

    /// Owned tiles that touch land owned by someone else or no one.
    #[must_use]
    pub fn owned_border_tiles(&self) -> &TileSet {
        &self.owned_border_tiles
    }

    /// The tile holding this player's flag.
    #[must_use]
    pub const fn flag(&self) -> Option<Offset> {
        self.flag
    }

    /// The player's home seed: the first tile of their sphere.
    #[must_use]
    pub fn home(&self) -> Option<Offset> {
        self.sphere.first()
    }

    /// Resources available for allocation: one per owned tile.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn resources(&self) -> f64 {
        self.owned_tiles.len() as f64
    }

    /// Add military and culture.
    pub fn invest(&mut self, military: f64, culture: f64) {
        self.military += military;
        self.culture += culture;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_player_creation() {
        let player = Player::new(1, Scores::default());
        assert_eq!(player.id, 1);
        assert_eq!(player.name, "player 2");
        assert_eq!(player.color, "orange");
        assert!(player.home().is_none());
        assert!(player.flag().is_none());
        assert!((player.culture - 1.0).abs() < f64::EPSILON);
        assert!((player.military - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_home_is_first_sphere_tile() {
        let mut player = Player::new(0, Scores::default());
        player.sphere.insert(Offset::new(4, 4));
        player.sphere.insert(Offset::new(5, 4));
        assert_eq!(player.home(), Some(Offset::new(4, 4)));
    }

    #[test]
    fn test_invest() {
        let mut player = Player::new(0, Scores::default());
        player.invest(2.5, 0.5);
        assert!((player.military - 3.5).abs() < f64::EPSILON);
        assert!((player.culture - 1.5).abs() < f64::EPSILON);
    }
}

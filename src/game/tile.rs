//! Tile type and per-tile influence bookkeeping.

use serde::Serialize;

use crate::game::PlayerId;
use crate::hex::{Cube, Offset};

/// Terrain of a tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Terrain {
    /// Open water. Never influenced, owned or flagged.
    Water,
    /// Land that players can influence and own.
    Land,
}

impl Terrain {
    /// Whether this terrain can be influenced and owned.
    #[must_use]
    pub const fn is_land(self) -> bool {
        matches!(self, Terrain::Land)
    }
}

/// One player's influence on one tile.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct InfluenceRecord {
    /// Accrued influence.
    pub influence: f64,
    /// Hex distance from this tile to the player's home seed.
    pub seed_distance: u32,
    /// Land neighbors not yet in the player's sphere.
    pub potential_growth: u8,
}

/// A single hex cell.
#[derive(Debug, Clone)]
pub struct Tile {
    coord: Offset,
    cube: Cube,
    terrain: Terrain,
    pub(crate) owner: Option<PlayerId>,
    neighbors: Vec<Offset>,
    pub(crate) border_count: u8,
    /// Influencers in registration order. Index 0 is the first claimant.
    influencers: Vec<(PlayerId, InfluenceRecord)>,
    pub(crate) owned_potential_growth: u8,
    pub(crate) flag_holder: Option<PlayerId>,
}

impl Tile {
    /// Create a water tile at `(q, r)` with no neighbors, owner or influence.
    #[must_use]
    pub fn new(q: i32, r: i32) -> Self {
        let coord = Offset::new(q, r);
        Self {
            coord,
            cube: coord.to_cube(),
            terrain: Terrain::Water,
            owner: None,
            neighbors: Vec::new(),
            border_count: 0,
            influencers: Vec::new(),
            owned_potential_growth: 0,
            flag_holder: None,
        }
    }

    /// Offset coordinate (the tile's identity).
    #[must_use]
    pub const fn coord(&self) -> Offset {
        self.coord
    }

    /// Cube coordinate.
    #[must_use]
    pub const fn cube(&self) -> Cube {
        self.cube
    }

    /// Terrain type.
    #[must_use]
    pub const fn terrain(&self) -> Terrain {
        self.terrain
    }

    /// Whether the tile is land.
    #[must_use]
    pub const fn is_land(&self) -> bool {
        self.terrain.is_land()
    }

    /// Set the terrain. Border-count bookkeeping is the caller's job.
    pub fn set_terrain(&mut self, terrain: Terrain) {
        self.terrain = terrain;
    }

    /// Current owner, if any.
    #[must_use]
    pub const fn owner(&self) -> Option<PlayerId> {
        self.owner
    }

    /// Adjacent tiles in direction order.
    #[must_use]
    pub fn neighbors(&self) -> &[Offset] {
        &self.neighbors
    }

    /// Assign neighbors once; also resets the water-border count to the
    /// neighbor count.
    #[allow(clippy::cast_possible_truncation)]
    pub fn wire_neighbors(&mut self, neighbors: Vec<Offset>) {
        debug_assert!(neighbors.len() <= 6);
        self.border_count = neighbors.len() as u8;
        self.neighbors = neighbors;
    }

    /// Neighbors that were still water the last time terrain generation
    /// touched this tile.
    #[must_use]
    pub const fn border_count(&self) -> u8 {
        self.border_count
    }

    /// Land neighbors not owned by the current owner. Meaningful only when owned.
    #[must_use]
    pub const fn owned_potential_growth(&self) -> u8 {
        self.owned_potential_growth
    }

    /// Player whose flag sits on this tile.
    #[must_use]
    pub const fn flag_holder(&self) -> Option<PlayerId> {
        self.flag_holder
    }

    /// Influencing players in registration order.
    pub fn influencers(&self) -> impl Iterator<Item = PlayerId> + '_ {
        self.influencers.iter().map(|(id, _)| *id)
    }

    /// Influencing players with their records, in registration order.
    #[must_use]
    pub fn influence_records(&self) -> &[(PlayerId, InfluenceRecord)] {
        &self.influencers
    }

    /// Number of influencers.
    #[must_use]
    pub fn influencer_count(&self) -> usize {
        self.influencers.len()
    }

    /// Whether `player` has ever projected influence here.
    #[must_use]
    pub fn is_influenced_by(&self, player: PlayerId) -> bool {
        self.influencers.iter().any(|(id, _)| *id == player)
    }

    /// Record for `player`, if they influence this tile.
    #[must_use]
    pub fn influence_of(&self, player: PlayerId) -> Option<&InfluenceRecord> {
        self.influencers
            .iter()
            .find(|(id, _)| *id == player)
            .map(|(_, record)| record)
    }

    pub(crate) fn influence_of_mut(&mut self, player: PlayerId) -> Option<&mut InfluenceRecord> {
        self.influencers
            .iter_mut()
            .find(|(id, _)| *id == player)
            .map(|(_, record)| record)
    }

    pub(crate) fn influence_records_mut(&mut self) -> &mut [(PlayerId, InfluenceRecord)] {
        &mut self.influencers
    }

    /// Append a new influencer. The caller guarantees `player` is not already present.
    pub(crate) fn push_influencer(&mut self, player: PlayerId, record: InfluenceRecord) {
        debug_assert!(!self.is_influenced_by(player));
        self.influencers.push((player, record));
    }

    /// Highest influence on the tile and the first influencer holding it.
    #[must_use]
    pub fn strongest_influencer(&self) -> Option<(PlayerId, f64)> {
        let mut best: Option<(PlayerId, f64)> = None;
        for (id, record) in &self.influencers {
            match best {
                Some((_, max)) if record.influence <= max => {}
                _ => best = Some((*id, record.influence)),
            }
        }
        best
    }

    /// Whether the owner's home seed is this tile.
    #[must_use]
    pub fn is_home_of_owner(&self) -> bool {
        self.owner
            .and_then(|owner| self.influence_of(owner))
            .is_some_and(|record| record.seed_distance == 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(influence: f64) -> InfluenceRecord {
        InfluenceRecord {
            influence,
            seed_distance: 0,
            potential_growth: 0,
        }
    }

    #[test]
    fn test_new_tile_is_empty_water() {
        let tile = Tile::new(3, 5);
        assert_eq!(tile.coord(), Offset::new(3, 5));
        assert_eq!(tile.cube(), Offset::new(3, 5).to_cube());
        assert_eq!(tile.terrain(), Terrain::Water);
        assert!(tile.owner().is_none());
        assert!(tile.flag_holder().is_none());
        assert_eq!(tile.influencer_count(), 0);
        assert!(tile.neighbors().is_empty());
    }

    #[test]
    fn test_wire_neighbors_sets_border_count() {
        let mut tile = Tile::new(0, 0);
        tile.wire_neighbors(vec![Offset::new(1, 0), Offset::new(0, 1)]);
        assert_eq!(tile.border_count(), 2);
        assert_eq!(tile.neighbors().len(), 2);
    }

    #[test]
    fn test_strongest_influencer_prefers_first_on_tie() {
        let mut tile = Tile::new(0, 0);
        tile.push_influencer(2, record(3.0));
        tile.push_influencer(0, record(5.0));
        tile.push_influencer(1, record(5.0));
        assert_eq!(tile.strongest_influencer(), Some((0, 5.0)));
    }

    #[test]
    fn test_influence_lookup() {
        let mut tile = Tile::new(0, 0);
        tile.push_influencer(1, record(1.0));
        assert!(tile.is_influenced_by(1));
        assert!(!tile.is_influenced_by(0));
        if let Some(rec) = tile.influence_of_mut(1) {
            rec.influence += 2.0;
        }
        assert!((tile.influence_of(1).unwrap().influence - 3.0).abs() < 1e-12);
        assert_eq!(tile.influencers().collect::<Vec<_>>(), vec![1]);
    }

    #[test]
    fn test_home_marker() {
        let mut tile = Tile::new(0, 0);
        tile.set_terrain(Terrain::Land);
        tile.push_influencer(0, record(1.0));
        assert!(!tile.is_home_of_owner());
        tile.owner = Some(0);
        assert!(tile.is_home_of_owner());
    }
}

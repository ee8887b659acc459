//! The grid: tile arena, adjacency and lookup.

use crate::error::GridError;
use crate::game::{Land, Player, PlayerId, Tile};
use crate::hex::Offset;
use crate::view::Viewport;

/// Neighbor deltas `(dq, dr)` for tiles on even rows.
pub const EVEN_NEIGHBORS: [(i32, i32); 6] = [(1, 0), (0, -1), (-1, -1), (-1, 0), (-1, 1), (0, 1)];

/// Neighbor deltas `(dq, dr)` for tiles on odd rows (shifted right).
pub const ODD_NEIGHBORS: [(i32, i32); 6] = [(1, 0), (1, -1), (0, -1), (-1, 0), (0, 1), (1, 1)];

/// Neighbor deltas for the given row.
#[must_use]
pub const fn neighbor_offsets(row: i32) -> &'static [(i32, i32); 6] {
    if row & 1 == 1 {
        &ODD_NEIGHBORS
    } else {
        &EVEN_NEIGHBORS
    }
}

/// Largest accepted grid side.
pub const MAX_DIMENSION: u16 = 1024;

/// The master grid. Single source of truth for tiles, land and players.
#[derive(Debug, Clone)]
pub struct Grid {
    cols: u16,
    rows: u16,
    /// Tiles stored in row-major order.
    tiles: Vec<Tile>,
    pub(crate) land: Land,
    pub(crate) players: Vec<Player>,
}

impl Grid {
    /// Create an all-water grid with neighbors wired.
    ///
    /// # Errors
    ///
    /// Returns an error if either dimension is zero or above [`MAX_DIMENSION`].
    pub fn new(cols: u16, rows: u16) -> Result<Self, GridError> {
        if cols == 0 || rows == 0 {
            return Err(GridError::Empty { cols, rows });
        }
        if cols > MAX_DIMENSION || rows > MAX_DIMENSION {
            return Err(GridError::TooLarge {
                cols,
                rows,
                max: MAX_DIMENSION,
            });
        }

        let tiles = (0..i32::from(rows))
            .flat_map(|r| (0..i32::from(cols)).map(move |q| Tile::new(q, r)))
            .collect();

        let mut grid = Self {
            cols,
            rows,
            tiles,
            land: Land::default(),
            players: Vec::new(),
        };
        grid.wire_all_neighbors();
        Ok(grid)
    }

    /// Number of columns.
    #[must_use]
    pub const fn cols(&self) -> u16 {
        self.cols
    }

    /// Number of rows.
    #[must_use]
    pub const fn rows(&self) -> u16 {
        self.rows
    }

    /// All tiles in row-major order.
    #[must_use]
    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    /// Land produced by terrain generation (empty before generation).
    #[must_use]
    pub fn land(&self) -> &Land {
        &self.land
    }

    /// All players, indexed by [`PlayerId`].
    #[must_use]
    pub fn players(&self) -> &[Player] {
        &self.players
    }

    /// Look up a player.
    #[must_use]
    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players.get(usize::from(id))
    }

    /// Check if a coordinate is inside the grid.
    #[must_use]
    pub fn in_bounds(&self, coord: Offset) -> bool {
        coord.q >= 0 && coord.r >= 0 && coord.q < i32::from(self.cols) && coord.r < i32::from(self.rows)
    }

    fn index(&self, coord: Offset) -> Option<usize> {
        if self.in_bounds(coord) {
            #[allow(clippy::cast_sign_loss)]
            let idx = coord.r as usize * usize::from(self.cols) + coord.q as usize;
            Some(idx)
        } else {
            None
        }
    }

    /// Get the tile at `coord`, or `None` outside the grid.
    #[must_use]
    pub fn get(&self, coord: Offset) -> Option<&Tile> {
        self.index(coord).map(|idx| &self.tiles[idx])
    }

    /// Get the tile at column `q`, row `r`.
    #[must_use]
    pub fn tile(&self, q: i32, r: i32) -> Option<&Tile> {
        self.get(Offset::new(q, r))
    }

    #[allow(dead_code)]
    pub(crate) fn get_mut(&mut self, coord: Offset) -> Option<&mut Tile> {
        self.index(coord).map(|idx| &mut self.tiles[idx])
    }

    /// Tile at a coordinate already known to be inside the grid (neighbor
    /// lists, relationship sets).
    pub(crate) fn at(&self, coord: Offset) -> &Tile {
        debug_assert!(self.in_bounds(coord), "{coord} outside grid");
        #[allow(clippy::cast_sign_loss)]
        &self.tiles[coord.r as usize * usize::from(self.cols) + coord.q as usize]
    }

    pub(crate) fn at_mut(&mut self, coord: Offset) -> &mut Tile {
        debug_assert!(self.in_bounds(coord), "{coord} outside grid");
        #[allow(clippy::cast_sign_loss)]
        &mut self.tiles[coord.r as usize * usize::from(self.cols) + coord.q as usize]
    }

    /// Iterate over all coordinates in storage order.
    pub fn coords(&self) -> impl Iterator<Item = Offset> + use<> {
        let cols = i32::from(self.cols);
        (0..i32::from(self.rows)).flat_map(move |r| (0..cols).map(move |q| Offset::new(q, r)))
    }

    /// Tile nearest the center of the grid.
    #[must_use]
    pub fn center(&self) -> Offset {
        Offset::new(i32::from(self.cols / 2), i32::from(self.rows / 2))
    }

    fn wire_all_neighbors(&mut self) {
        for idx in 0..self.tiles.len() {
            let coord = self.tiles[idx].coord();
            let neighbors: Vec<Offset> = neighbor_offsets(coord.r)
                .iter()
                .map(|&(dq, dr)| Offset::new(coord.q + dq, coord.r + dr))
                .filter(|&c| self.in_bounds(c))
                .collect();
            self.tiles[idx].wire_neighbors(neighbors);
        }
    }

    /// Hex distance between two tiles.
    #[must_use]
    pub const fn distance(a: &Tile, b: &Tile) -> u32 {
        a.cube().distance(b.cube())
    }

    /// Straight-line offset distance between two tiles.
    #[must_use]
    pub fn euclidean_distance(a: &Tile, b: &Tile) -> f64 {
        a.coord().euclidean_distance(b.coord())
    }

    /// A viewport fitting this grid into a `width x height` surface.
    #[must_use]
    pub fn viewport(&self, width: f64, height: f64) -> Viewport {
        Viewport::fit(width, height, self.cols, self.rows)
    }

    /// Tile under surface point `(px, py)`, or `None` outside the grid.
    #[must_use]
    pub fn pixel_to_tile(&self, view: &Viewport, px: f64, py: f64) -> Option<&Tile> {
        view.pixel_to_offset(px, py).and_then(|coord| self.get(coord))
    }

    /// Tiles owned by `player`.
    pub fn tiles_owned_by(&self, player: PlayerId) -> impl Iterator<Item = &Tile> {
        self.tiles.iter().filter(move |t| t.owner() == Some(player))
    }

    /// Count land tiles.
    #[must_use]
    pub fn land_count(&self) -> usize {
        self.tiles.iter().filter(|t| t.is_land()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_creation() {
        let grid = Grid::new(25, 15).unwrap();
        assert_eq!(grid.cols(), 25);
        assert_eq!(grid.rows(), 15);
        assert_eq!(grid.tiles().len(), 375);
        assert!(grid.tiles().iter().all(|t| !t.is_land()));
    }

    #[test]
    fn test_grid_zero_size() {
        assert!(Grid::new(0, 10).is_err());
        assert!(Grid::new(10, 0).is_err());
        assert!(Grid::new(MAX_DIMENSION + 1, 10).is_err());
    }

    #[test]
    fn test_lookup_bounds() {
        let grid = Grid::new(10, 8).unwrap();
        assert!(grid.tile(0, 0).is_some());
        assert!(grid.tile(9, 7).is_some());
        assert!(grid.tile(10, 0).is_none());
        assert!(grid.tile(0, 8).is_none());
        assert!(grid.tile(-1, 3).is_none());
        assert_eq!(grid.tile(4, 5).unwrap().coord(), Offset::new(4, 5));
    }

    #[test]
    fn test_interior_tiles_have_six_neighbors() {
        let grid = Grid::new(10, 10).unwrap();
        assert_eq!(grid.tile(5, 5).unwrap().neighbors().len(), 6);
        assert_eq!(grid.tile(5, 4).unwrap().neighbors().len(), 6);
        assert_eq!(grid.tile(5, 5).unwrap().border_count(), 6);
    }

    #[test]
    fn test_corner_neighbors() {
        let grid = Grid::new(10, 10).unwrap();
        // (0, 0) is on an even row: east, south-east (0, 1) only.
        let n = grid.tile(0, 0).unwrap().neighbors();
        assert_eq!(n, &[Offset::new(1, 0), Offset::new(0, 1)]);
        // (9, 1) is on an odd row at the right edge.
        let n = grid.tile(9, 1).unwrap().neighbors();
        assert_eq!(n, &[Offset::new(9, 0), Offset::new(8, 1), Offset::new(9, 2)]);
    }

    #[test]
    fn test_neighbors_are_symmetric_and_adjacent() {
        let grid = Grid::new(7, 6).unwrap();
        for tile in grid.tiles() {
            for &n in tile.neighbors() {
                let other = grid.get(n).unwrap();
                assert_eq!(Grid::distance(tile, other), 1);
                assert!(other.neighbors().contains(&tile.coord()));
            }
        }
    }

    #[test]
    fn test_distances() {
        let grid = Grid::new(10, 10).unwrap();
        let a = grid.tile(2, 2).unwrap();
        let b = grid.tile(5, 6).unwrap();
        assert_eq!(Grid::distance(a, b), Grid::distance(b, a));
        assert_eq!(Grid::distance(a, a), 0);
        assert!((Grid::euclidean_distance(a, b) - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_pixel_to_tile() {
        let grid = Grid::new(25, 15).unwrap();
        let view = grid.viewport(1024.0, 768.0);
        let info = view.display_info(Offset::new(7, 3));
        let tile = grid.pixel_to_tile(&view, info.cx, info.cy).unwrap();
        assert_eq!(tile.coord(), Offset::new(7, 3));
        assert!(grid.pixel_to_tile(&view, -500.0, -500.0).is_none());
    }

    #[test]
    fn test_pixel_to_tile_rejects_unaddressable_points() {
        let grid = Grid::new(25, 15).unwrap();
        let view = grid.viewport(1024.0, 768.0);
        assert!(grid.pixel_to_tile(&view, 1e12, 1e12).is_none());
        assert!(grid.pixel_to_tile(&view, -1e12, 3e11).is_none());
        assert!(grid.pixel_to_tile(&view, f64::NAN, f64::NAN).is_none());
        assert!(grid.pixel_to_tile(&view, f64::NAN, 10.0).is_none());
        assert!(grid.pixel_to_tile(&view, f64::INFINITY, 10.0).is_none());
        // The origin tile is still reachable through its own center.
        let info = view.display_info(Offset::new(0, 0));
        assert_eq!(grid.pixel_to_tile(&view, info.cx, info.cy).unwrap().coord(), Offset::new(0, 0));
    }

    #[test]
    fn test_center() {
        let grid = Grid::new(25, 15).unwrap();
        assert_eq!(grid.center(), Offset::new(12, 7));
    }
}

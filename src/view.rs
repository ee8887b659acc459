//! Viewport layout for an external renderer.
//!
//! The core does not draw anything. It only exposes the math a renderer
//! needs: where a tile's center lands on a draw surface of a given size, and
//! which tile sits under a pointer position.

use serde::Serialize;

use crate::hex::{Cube, FractionalAxial, Offset};

const SQRT_3: f64 = 1.732_050_807_568_877_2;

/// Scale applied to a tile's outline so neighboring hexes leave a gap.
pub const DRAW_SCALE: f64 = 0.95;

/// Scale of the inner hexagon that marks a flag.
pub const FLAG_SCALE: f64 = 0.7;

/// Center and radius of a tile on the draw surface.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DisplayInfo {
    /// Center x in surface pixels.
    pub cx: f64,
    /// Center y in surface pixels.
    pub cy: f64,
    /// Tile radius (center to corner).
    pub radius: f64,
}

impl DisplayInfo {
    /// Corner points of the pointy-top hexagon, scaled by `scale`.
    ///
    /// Corners sit at `60° * (i + 0.5)` for `i` in `0..6`.
    #[must_use]
    pub fn corners(&self, scale: f64) -> [(f64, f64); 6] {
        let step = std::f64::consts::PI / 3.0;
        let mut points = [(0.0, 0.0); 6];
        for (i, point) in points.iter_mut().enumerate() {
            #[allow(clippy::cast_precision_loss)]
            let angle = step * (i as f64 + 0.5);
            *point = (
                self.cx + self.radius * angle.cos() * scale,
                self.cy + self.radius * angle.sin() * scale,
            );
        }
        points
    }
}

/// Layout that fits a `cols x rows` odd-r grid inside a `width x height` surface.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Viewport {
    /// Surface width.
    pub width: f64,
    /// Surface height.
    pub height: f64,
    /// Uniform tile radius.
    pub tile_radius: f64,
    /// Horizontal distance between centers in the same row.
    pub horizontal_distance: f64,
    /// Vertical distance between rows.
    pub vertical_distance: f64,
    /// X of the center of tile `(0, 0)`.
    pub offset_x: f64,
    /// Y of the center of tile `(0, 0)`.
    pub offset_y: f64,
}

impl Viewport {
    /// Fit the grid into the surface.
    ///
    /// Two radii are computed, one constrained by height and one by width;
    /// the smaller wins and the grid is centered along the other axis.
    #[must_use]
    pub fn fit(width: f64, height: f64, cols: u16, rows: u16) -> Self {
        let cols = f64::from(cols);
        let rows = f64::from(rows);

        let height_radius = height / (2.0 * (0.75 * rows + 0.25));
        let width_radius = width / (SQRT_3 * (cols + 0.5));

        let (tile_radius, mut offset_x, mut offset_y) = if height_radius < width_radius {
            let grid_width = (cols + 0.5) * SQRT_3 * height_radius;
            (height_radius, (width - grid_width) / 2.0, 0.0)
        } else {
            let grid_height = (rows - 0.25) * 2.0 * width_radius;
            (width_radius, 0.0, (height - grid_height) / 2.0)
        };

        let tile_height = 2.0 * tile_radius;
        let tile_width = 0.5 * SQRT_3 * tile_height;
        offset_x += 0.5 * tile_width;
        offset_y += 0.5 * tile_height;

        Self {
            width,
            height,
            tile_radius,
            horizontal_distance: tile_width,
            vertical_distance: 0.75 * tile_height,
            offset_x,
            offset_y,
        }
    }

    /// Center and radius of the tile at `coord`.
    #[must_use]
    pub fn display_info(&self, coord: Offset) -> DisplayInfo {
        let mut cx = self.offset_x + self.horizontal_distance * f64::from(coord.q);
        if coord.is_odd_row() {
            cx += 0.5 * self.horizontal_distance;
        }
        let cy = self.offset_y + self.vertical_distance * f64::from(coord.r);
        DisplayInfo {
            cx,
            cy,
            radius: self.tile_radius,
        }
    }

    /// Offset coordinate of the cell containing surface point `(px, py)`.
    ///
    /// The result may lie outside the grid; lookups decide whether it exists.
    /// Non-finite points, and points too far out to address, give `None`.
    #[must_use]
    pub fn pixel_to_offset(&self, px: f64, py: f64) -> Option<Offset> {
        if !(px.is_finite() && py.is_finite()) {
            return None;
        }
        FractionalAxial::from_pixel(px - self.offset_x, py - self.offset_y, self.tile_radius)
            .to_cube()
            .round()
            .map(Cube::to_offset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fit_picks_smaller_radius() {
        // Wide surface: height is the binding constraint.
        let view = Viewport::fit(2000.0, 300.0, 10, 10);
        let height_radius = 300.0 / (2.0 * (0.75 * 10.0 + 0.25));
        assert!((view.tile_radius - height_radius).abs() < 1e-9);

        // Tall surface: width binds.
        let view = Viewport::fit(300.0, 2000.0, 10, 10);
        let width_radius = 300.0 / (SQRT_3 * 10.5);
        assert!((view.tile_radius - width_radius).abs() < 1e-9);
    }

    #[test]
    fn test_odd_rows_shift_right() {
        let view = Viewport::fit(800.0, 600.0, 25, 15);
        let even = view.display_info(Offset::new(2, 2));
        let odd = view.display_info(Offset::new(2, 3));
        assert!((odd.cx - even.cx - 0.5 * view.horizontal_distance).abs() < 1e-9);
        assert!((odd.cy - even.cy - view.vertical_distance).abs() < 1e-9);
    }

    #[test]
    fn test_centers_map_back_to_their_tile() {
        let view = Viewport::fit(800.0, 600.0, 25, 15);
        for q in 0..25 {
            for r in 0..15 {
                let coord = Offset::new(q, r);
                let info = view.display_info(coord);
                assert_eq!(view.pixel_to_offset(info.cx, info.cy), Some(coord));
                // A point a third of the way toward a corner stays inside.
                let (x, y) = info.corners(1.0)[0];
                let px = info.cx + (x - info.cx) / 3.0;
                let py = info.cy + (y - info.cy) / 3.0;
                assert_eq!(view.pixel_to_offset(px, py), Some(coord));
            }
        }
    }

    #[test]
    fn test_corners_are_on_radius() {
        let info = DisplayInfo {
            cx: 10.0,
            cy: 20.0,
            radius: 4.0,
        };
        for (x, y) in info.corners(DRAW_SCALE) {
            let d = (x - 10.0).hypot(y - 20.0);
            assert!((d - 4.0 * DRAW_SCALE).abs() < 1e-9);
        }
    }
}

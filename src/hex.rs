//! Hex coordinate systems.
//!
//! Three views of the same cell, always mutually consistent:
//!
//! - [`Offset`] `(q, r)`: column/row storage key. Odd rows are shifted half a
//!   cell to the right ("odd-r" layout), so the neighbor table depends on row
//!   parity.
//! - [`Cube`] `(x, y, z)` with `x + y + z == 0`: exact distances and
//!   direction-uniform math.
//! - Axial/pixel: continuous positions used when mapping a point on a draw
//!   surface back to the cell that contains it.

use serde::{Deserialize, Serialize};

/// Offset coordinate: `q` is the column, `r` is the row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Offset {
    /// Column.
    pub q: i32,
    /// Row.
    pub r: i32,
}

impl Offset {
    /// Create a new offset coordinate.
    #[must_use]
    pub const fn new(q: i32, r: i32) -> Self {
        Self { q, r }
    }

    /// Convert to cube coordinates: `x = q - floor(r / 2)`, `z = r`, `y = -x - z`.
    #[must_use]
    pub const fn to_cube(self) -> Cube {
        let x = self.q - self.r.div_euclid(2);
        let z = self.r;
        Cube { x, y: -x - z, z }
    }

    /// Whether this cell sits on an odd (right-shifted) row.
    #[must_use]
    pub const fn is_odd_row(self) -> bool {
        self.r & 1 == 1
    }

    /// Straight-line distance between two offset coordinates.
    ///
    /// Only used for flag-proximity comparisons; hex distance is [`Cube::distance`].
    #[must_use]
    pub fn euclidean_distance(self, other: Self) -> f64 {
        let dq = f64::from(self.q - other.q);
        let dr = f64::from(self.r - other.r);
        dq.hypot(dr)
    }
}

impl std::fmt::Display for Offset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{},{}", self.q, self.r)
    }
}

/// Integer cube coordinate. Always satisfies `x + y + z == 0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cube {
    /// X axis.
    pub x: i32,
    /// Y axis.
    pub y: i32,
    /// Z axis (equal to the offset row).
    pub z: i32,
}

impl Cube {
    /// Build a cube coordinate from `x` and `z`, deriving `y`.
    #[must_use]
    pub const fn from_xz(x: i32, z: i32) -> Self {
        Self { x, y: -x - z, z }
    }

    /// Convert back to offset coordinates: `q = x + floor(z / 2)`, `r = z`.
    #[must_use]
    pub const fn to_offset(self) -> Offset {
        Offset {
            q: self.x + self.z.div_euclid(2),
            r: self.z,
        }
    }

    /// Hex (cube Manhattan) distance: `(|dx| + |dy| + |dz|) / 2`.
    #[must_use]
    pub const fn distance(self, other: Self) -> u32 {
        (self.x.abs_diff(other.x) + self.y.abs_diff(other.y) + self.z.abs_diff(other.z)) / 2
    }
}

/// Fractional axial coordinate produced by pixel conversion.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FractionalAxial {
    /// Axial column.
    pub q: f64,
    /// Axial row.
    pub r: f64,
}

impl FractionalAxial {
    /// Convert a point relative to the center of cell `(0, 0)` into fractional
    /// axial coordinates for pointy-top hexes of the given radius.
    #[must_use]
    pub fn from_pixel(px: f64, py: f64, tile_radius: f64) -> Self {
        let q = (3.0_f64.sqrt() / 3.0 * px - py / 3.0) / tile_radius;
        let r = 2.0 / 3.0 * py / tile_radius;
        Self { q, r }
    }

    /// Lift into fractional cube space (`x = q`, `z = r`).
    #[must_use]
    pub fn to_cube(self) -> FractionalCube {
        FractionalCube {
            x: self.q,
            y: -self.q - self.r,
            z: self.r,
        }
    }
}

/// Fractional cube coordinate, the input to [`FractionalCube::round`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FractionalCube {
    /// X axis.
    pub x: f64,
    /// Y axis.
    pub y: f64,
    /// Z axis.
    pub z: f64,
}

/// Largest magnitude a rounded axis may have. Keeps offset conversion clear of
/// `i32` overflow.
const ROUND_LIMIT: f64 = 1_073_741_824.0;

/// Round half toward positive infinity: `-0.5` goes to `0`, `0.5` to `1`.
fn round_half_up(v: f64) -> f64 {
    (v + 0.5).floor()
}

impl FractionalCube {
    /// Snap to the integer cube coordinate of the containing cell.
    ///
    /// Each axis is rounded half-up independently, then the axis with the
    /// largest rounding error is recomputed from the other two. Ties resolve
    /// x, then y, else z: x is recomputed only when its error is strictly the
    /// largest, and y only when it beats z.
    ///
    /// Returns `None` for non-finite input or a point too far out to address.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn round(self) -> Option<Cube> {
        let mut rx = round_half_up(self.x);
        let mut ry = round_half_up(self.y);
        let mut rz = round_half_up(self.z);
        if [rx, ry, rz].iter().any(|v| !v.is_finite() || v.abs() > ROUND_LIMIT) {
            return None;
        }

        let x_diff = (rx - self.x).abs();
        let y_diff = (ry - self.y).abs();
        let z_diff = (rz - self.z).abs();

        if x_diff > y_diff && x_diff > z_diff {
            rx = -ry - rz;
        } else if y_diff > z_diff {
            ry = -rx - rz;
        } else {
            rz = -rx - ry;
        }

        let cube = Cube {
            x: rx as i32,
            y: ry as i32,
            z: rz as i32,
        };
        debug_assert_eq!(cube.x + cube.y + cube.z, 0);
        Some(cube)
    }
}

/// Convert offset to cube coordinates.
#[must_use]
pub const fn offset_to_cube(q: i32, r: i32) -> Cube {
    Offset::new(q, r).to_cube()
}

/// Convert cube to offset coordinates.
#[must_use]
pub const fn cube_to_offset(x: i32, y: i32, z: i32) -> Offset {
    debug_assert!(x + y + z == 0);
    Cube { x, y, z }.to_offset()
}

/// Round a fractional cube coordinate to the nearest cell.
///
/// Returns `None` when the point is not finite or lies beyond addressable cells.
#[must_use]
pub fn hex_round(x: f64, y: f64, z: f64) -> Option<Cube> {
    FractionalCube { x, y, z }.round()
}

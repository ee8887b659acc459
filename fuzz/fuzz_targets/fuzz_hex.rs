#![no_main]

//! Coordinate math fuzzer.
//!
//! Offset/cube conversion must round-trip, rounding must always produce a
//! valid cube coordinate, and a tile's drawn center must map back to it.

use arbitrary::Arbitrary;
use hexrealm::hex::{cube_to_offset, hex_round, offset_to_cube};
use hexrealm::{Offset, Viewport};
use libfuzzer_sys::fuzz_target;

#[derive(Arbitrary, Debug)]
struct HexInput {
    q: i16,
    r: i16,
    x: f32,
    z: f32,
    cols: u8,
    rows: u8,
    width: u16,
    height: u16,
}

fuzz_target!(|input: HexInput| {
    let (q, r) = (i32::from(input.q), i32::from(input.r));
    let cube = offset_to_cube(q, r);
    assert_eq!(cube.x + cube.y + cube.z, 0);
    assert_eq!(cube_to_offset(cube.x, cube.y, cube.z), Offset::new(q, r));

    if input.x.is_finite() && input.z.is_finite() && input.x.abs() < 1e6 && input.z.abs() < 1e6 {
        let (x, z) = (f64::from(input.x), f64::from(input.z));
        let rounded = hex_round(x, -x - z, z).expect("bounded input rounds");
        assert_eq!(rounded.x + rounded.y + rounded.z, 0);
    }

    let cols = u16::from(input.cols % 64) + 1;
    let rows = u16::from(input.rows % 64) + 1;
    let width = f64::from(input.width.max(16));
    let height = f64::from(input.height.max(16));
    let view = Viewport::fit(width, height, cols, rows);
    let coord = Offset::new(q.rem_euclid(i32::from(cols)), r.rem_euclid(i32::from(rows)));
    let info = view.display_info(coord);
    assert_eq!(view.pixel_to_offset(info.cx, info.cy), Some(coord));
});

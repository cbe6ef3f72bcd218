//! morpho-test - Regression test framework for the morpho library
//!
//! Provides the [`RegParams`] comparison framework used by the
//! `tests/*_reg.rs` integration tests across the workspace, plus shared
//! synthetic image builders (the library has no file I/O, so every test
//! input is generated).
//!
//! # Usage
//!
//! ```
//! use morpho_test::{RegParams, two_basin_relief};
//!
//! let mut rp = RegParams::new("doc");
//! let relief = two_basin_relief(16, 8);
//! rp.compare_values(16.0, relief.width() as f64, 0.0);
//! assert!(rp.cleanup());
//! ```
//!
//! # Environment variables
//!
//! - `REGTEST_MODE`: set to "display" to print values without asserting

mod params;

pub use params::{RegParams, RegTestMode};

use morpho_core::{Image, Shape};
use rand::rngs::StdRng;
use rand::{RngExt, SeedableRng};

/// Binary 2D image with foreground at the given coordinates.
pub fn binary_from_coords(width: u32, height: u32, coords: &[(u32, u32)]) -> Image<u8> {
    let mut img = Image::new_2d(width, height).expect("non-zero extents");
    for &(x, y) in coords {
        img.set_2d(x, y, 1).expect("coordinate in bounds");
    }
    img
}

/// Binary 2D image with a filled foreground rectangle.
pub fn filled_rect(width: u32, height: u32, x0: u32, y0: u32, rw: u32, rh: u32) -> Image<u8> {
    let mut img = Image::new_2d(width, height).expect("non-zero extents");
    for y in y0..(y0 + rh) {
        for x in x0..(x0 + rw) {
            img.set_2d(x, y, 1).expect("rectangle in bounds");
        }
    }
    img
}

/// Horizontal intensity ramp, 0 at the left edge.
pub fn ramp(width: u32, height: u32) -> Image<u8> {
    let shape = Shape::new_2d(width, height).expect("non-zero extents");
    Image::from_fn(shape, |x, _y, _z| (x.min(255)) as u8)
}

/// Relief with two basins and a vertical ridge between them.
///
/// Valleys sit at x = width/4 and x = 3*width/4; the ridge crest runs at
/// the middle column. Suitable as a deterministic two-seed watershed
/// input.
pub fn two_basin_relief(width: u32, height: u32) -> Image<u8> {
    let shape = Shape::new_2d(width, height).expect("non-zero extents");
    let left = width / 4;
    let right = (3 * width) / 4;
    Image::from_fn(shape, |x, _y, _z| {
        let d = x.abs_diff(left).min(x.abs_diff(right));
        d.min(127) as u8 * 2
    })
}

/// Smooth synthetic relief built from sine/cosine waves.
///
/// `variant` selects one of two frequency sets, giving two different but
/// reproducible landscapes.
pub fn sinusoid_relief(width: u32, height: u32, variant: u32) -> Image<u8> {
    let shape = Shape::new_2d(width, height).expect("non-zero extents");
    Image::from_fn(shape, |x, y, _z| {
        let fx = x as f32;
        let fy = y as f32;
        let f = if variant == 0 {
            128.0
                + 26.3 * (0.0438 * fy).sin()
                + 33.4 * (0.0712 * fy).cos()
                + 18.6 * (0.0561 * fx).sin()
                + 23.6 * (0.0327 * fx).cos()
        } else {
            128.0
                + 26.3 * (0.0238 * fy).sin()
                + 33.4 * (0.0312 * fy).cos()
                + 18.6 * (0.0261 * fx).sin()
                + 23.6 * (0.0207 * fx).cos()
        };
        f.clamp(0.0, 255.0) as u8
    })
}

/// Uniformly random relief from a fixed seed.
pub fn random_relief(width: u32, height: u32, seed: u64) -> Image<u8> {
    let shape = Shape::new_2d(width, height).expect("non-zero extents");
    let mut rng = StdRng::seed_from_u64(seed);
    Image::from_fn(shape, |_x, _y, _z| rng.random_range(0..=255u32) as u8)
}

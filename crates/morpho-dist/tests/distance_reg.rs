//! Distance transform regression test
//!
//! Run with:
//! ```
//! cargo test -p morpho-dist --test distance_reg
//! ```

use morpho_core::Image;
use morpho_dist::{ChamferMask, ChamferWeights2D, distance_map, distance_map_float};
use morpho_test::{RegParams, filled_rect};

#[test]
fn distance_reg() {
    let mut rp = RegParams::new("distance");

    // -----------------------------------------------------------
    // Filled 5x5 square in a 7x7 background: concentric city-block
    // rings from the border inward
    // -----------------------------------------------------------
    let square = filled_rect(7, 7, 1, 1, 5, 5);
    let mask = ChamferWeights2D::CityBlock.mask();
    let dist = distance_map(&square, &mask, false).expect("city-block distance map");

    // ring structure: 16 samples at 1, 8 at 2, 1 at 3
    let count_of = |v: u16| dist.data().iter().filter(|&&d| d == v).count();
    rp.compare_values(24.0, count_of(0) as f64, 0.0);
    rp.compare_values(16.0, count_of(1) as f64, 0.0);
    rp.compare_values(8.0, count_of(2) as f64, 0.0);
    rp.compare_values(1.0, count_of(3) as f64, 0.0);
    rp.compare_values(3.0, dist.get_2d(3, 3).unwrap() as f64, 0.0);

    // -----------------------------------------------------------
    // Borgefors weights on the same square: border ring at 3,
    // diagonal-influenced interior
    // -----------------------------------------------------------
    let mask34 = ChamferWeights2D::Borgefors.mask();
    let raw = distance_map(&square, &mask34, false).expect("borgefors distance map");
    rp.compare_values(3.0, raw.get_2d(1, 1).unwrap() as f64, 0.0);
    rp.compare_values(9.0, raw.get_2d(3, 3).unwrap() as f64, 0.0);

    // normalization divides by the unit weight
    let norm = distance_map(&square, &mask34, true).expect("normalized map");
    rp.compare_values(1.0, norm.get_2d(1, 1).unwrap() as f64, 0.0);
    rp.compare_values(3.0, norm.get_2d(3, 3).unwrap() as f64, 0.0);

    // -----------------------------------------------------------
    // Float map with quasi-Euclidean weights
    // -----------------------------------------------------------
    let qe = ChamferMask::from_name("quasi-euclidean", 2).expect("named mask");
    let fdist = distance_map_float(&square, &qe, false).expect("float distance map");
    rp.compare_values(1.0, fdist.get_2d(1, 1).unwrap() as f64, 1e-6);
    rp.compare_values(2.0, fdist.get_2d(2, 2).unwrap() as f64, 1e-6);
    rp.compare_values(3.0, fdist.get_2d(3, 3).unwrap() as f64, 1e-6);

    // -----------------------------------------------------------
    // Background-only buffer maps to all zeros
    // -----------------------------------------------------------
    let empty: Image<u8> = Image::new_2d(16, 16).unwrap();
    let zeros = distance_map(&empty, &mask, false).expect("empty distance map");
    rp.compare_values(0.0, zeros.data().iter().map(|&v| v as f64).sum(), 0.0);

    // -----------------------------------------------------------
    // Monotonicity: rings never decrease moving inward from the
    // square border
    // -----------------------------------------------------------
    let mut violations = 0;
    for y in 2..5u32 {
        for x in 2..5u32 {
            let inner = dist.get_2d(x, y).unwrap();
            let outer = dist.get_2d(x - 1, y).unwrap();
            if x <= 3 && inner < outer {
                violations += 1;
            }
        }
    }
    rp.compare_values(0.0, violations as f64, 0.0);

    assert!(rp.cleanup(), "distance regression test failed");
}

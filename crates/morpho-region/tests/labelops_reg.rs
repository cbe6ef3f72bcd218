//! Label operation regression test
//!
//! Run with:
//! ```
//! cargo test -p morpho-region --test labelops_reg
//! ```

use morpho_core::Image;
use morpho_dist::ChamferWeights2D;
use morpho_region::{dilate_labels, remove_border_labels};
use morpho_test::RegParams;

#[test]
fn labelops_reg() {
    let mut rp = RegParams::new("labelops");

    // -----------------------------------------------------------
    // Label dilation: two single-sample labels with an equidistant
    // midline; the tie goes to the lower label id
    // -----------------------------------------------------------
    let mut labels: Image<i32> = Image::new_2d(9, 5).unwrap();
    labels.set_2d(2, 2, 1).unwrap();
    labels.set_2d(6, 2, 2).unwrap();

    let mask = ChamferWeights2D::CityBlock.mask();
    let grown = dilate_labels(&labels, &mask, 5.0).expect("label dilation");

    // x = 4 is the exact midline: distance 2 to both seeds
    rp.compare_values(1.0, f64::from(grown.get_2d(4, 2).unwrap()), 0.0);
    // strictly closer samples go to their side
    rp.compare_values(1.0, f64::from(grown.get_2d(3, 2).unwrap()), 0.0);
    rp.compare_values(2.0, f64::from(grown.get_2d(5, 2).unwrap()), 0.0);
    rp.compare_values(1.0, f64::from(grown.get_2d(0, 2).unwrap()), 0.0);
    rp.compare_values(2.0, f64::from(grown.get_2d(8, 2).unwrap()), 0.0);

    // original seeds never move
    rp.compare_values(1.0, f64::from(grown.get_2d(2, 2).unwrap()), 0.0);
    rp.compare_values(2.0, f64::from(grown.get_2d(6, 2).unwrap()), 0.0);

    // -----------------------------------------------------------
    // A small radius leaves the far field unassigned
    // -----------------------------------------------------------
    let tight = dilate_labels(&labels, &mask, 1.0).expect("tight dilation");
    rp.compare_values(1.0, f64::from(tight.get_2d(3, 2).unwrap()), 0.0);
    rp.compare_values(0.0, f64::from(tight.get_2d(4, 2).unwrap()), 0.0);
    rp.compare_values(
        10.0,
        tight.data().iter().filter(|&&v| v != 0).count() as f64,
        0.0,
    );

    // -----------------------------------------------------------
    // Border label removal
    // -----------------------------------------------------------
    let mut edge: Image<i32> = Image::new_2d(6, 6).unwrap();
    edge.set_2d(0, 0, 1).unwrap();
    edge.set_2d(1, 0, 1).unwrap();
    edge.set_2d(3, 3, 2).unwrap();
    let cleaned = remove_border_labels(&edge);
    rp.compare_values(0.0, f64::from(cleaned.get_2d(0, 0).unwrap()), 0.0);
    rp.compare_values(2.0, f64::from(cleaned.get_2d(3, 3).unwrap()), 0.0);

    assert!(rp.cleanup(), "labelops regression test failed");
}

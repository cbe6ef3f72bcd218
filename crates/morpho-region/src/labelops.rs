//! Label map operations
//!
//! Operations on signed 32-bit label buffers (0 = background): bounded
//! per-label dilation driven by chamfer distance maps, label extraction,
//! and removal of labels touching the image border.

use crate::conncomp::label_set;
use crate::error::{RegionError, RegionResult};
use crate::reconstruction::on_border;
use morpho_core::Image;
use morpho_dist::{ChamferMask, distance_map_float};
use std::collections::HashSet;

/// Extract one label as a binary buffer (1 where the label matches).
pub fn binarize_label(labels: &Image<i32>, label: i32) -> Image<u8> {
    let shape = labels.shape();
    Image::from_fn(shape, |x, y, z| {
        u8::from(labels.data()[shape.index(x, y, z)] == label)
    })
}

/// Reset every label that touches the image border to background.
///
/// The label-map analogue of
/// [`kill_borders`](crate::reconstruction::kill_borders): a label is
/// removed entirely as soon as any of its samples lies on the boundary
/// shell.
pub fn remove_border_labels(labels: &Image<i32>) -> Image<i32> {
    let shape = labels.shape();
    let mut doomed: HashSet<i32> = HashSet::new();
    for (i, &v) in labels.data().iter().enumerate() {
        if v > 0 {
            let (x, y, z) = shape.coords(i);
            if on_border(&shape, x, y, z) {
                doomed.insert(v);
            }
        }
    }
    let data = labels
        .data()
        .iter()
        .map(|&v| if doomed.contains(&v) { 0 } else { v })
        .collect();
    Image::from_data(shape, data).expect("shape unchanged")
}

/// Grow every label outward by up to `radius` (in normalized distance
/// units), stopping where another label grows closer.
///
/// For each label a float chamfer distance map to that label's region is
/// computed; a background sample within `radius` of at least one label is
/// assigned the label whose propagated distance is strictly smallest.
/// Labels are visited in ascending order and a claim is only replaced by a
/// strictly smaller distance, so an exact tie (the equidistant midline)
/// goes to the lowest label id. Samples already labeled in the input are
/// never overwritten.
///
/// # Errors
///
/// Fails on a negative radius or a mask dimensionality mismatch.
///
/// # Examples
///
/// ```
/// use morpho_core::Image;
/// use morpho_dist::ChamferWeights2D;
/// use morpho_region::dilate_labels;
///
/// let mut labels: Image<i32> = Image::new_2d(7, 1).unwrap();
/// labels.set_2d(1, 0, 1).unwrap();
/// labels.set_2d(5, 0, 2).unwrap();
///
/// let mask = ChamferWeights2D::CityBlock.mask();
/// let grown = dilate_labels(&labels, &mask, 5.0).unwrap();
/// // the exact midpoint tie goes to the lower label id
/// assert_eq!(grown.data(), &[1, 1, 1, 1, 2, 2, 2]);
/// ```
pub fn dilate_labels(
    labels: &Image<i32>,
    mask: &ChamferMask,
    radius: f32,
) -> RegionResult<Image<i32>> {
    if !(radius >= 0.0) {
        return Err(RegionError::InvalidParameters(format!(
            "dilation radius must be non-negative, got {radius}"
        )));
    }
    mask.check_shape(&labels.shape())?;

    let shape = labels.shape();
    let original = labels.data();
    let mut out = original.to_vec();
    let mut best = vec![f32::MAX; original.len()];

    for &label in &label_set(labels) {
        // Distance from every sample to the nearest sample of `label`:
        // the label's region acts as the background of the transform.
        let others = Image::from_fn(shape, |x, y, z| {
            u8::from(original[shape.index(x, y, z)] != label)
        });
        let dist = distance_map_float(&others, mask, true)?;
        for i in 0..original.len() {
            if original[i] != 0 {
                continue;
            }
            let d = dist.data()[i];
            if d <= radius && d < best[i] {
                best[i] = d;
                out[i] = label;
            }
        }
    }

    Ok(Image::from_data(shape, out).map_err(RegionError::Core)?)
}

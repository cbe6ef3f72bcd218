//! Label-aware distance transforms
//!
//! On a label buffer (signed 32-bit, 0 = background) the distance of a
//! sample is measured to the nearest sample carrying a *different* label or
//! background. Relaxation is restricted to same-label neighbors, so the
//! transform is effectively independent per label: each labeled region gets
//! its own internal distance-to-boundary field.

use crate::chamfer::ChamferMask;
use crate::error::DistanceResult;
use crate::transform::{DistanceOptions, run_transform};
use morpho_core::{Image, NoProgress, ProgressMonitor};

fn label_regions(labels: &Image<i32>, roi: Option<&Image<u8>>) -> Vec<i32> {
    match roi {
        None => labels.data().to_vec(),
        Some(m) => labels
            .data()
            .iter()
            .zip(m.data())
            .map(|(&v, &inside)| if inside != 0 { v } else { 0 })
            .collect(),
    }
}

fn check_inputs(
    labels: &Image<i32>,
    mask: &ChamferMask,
    roi: Option<&Image<u8>>,
) -> DistanceResult<()> {
    mask.check_shape(&labels.shape())?;
    if let Some(m) = roi {
        labels.check_same_shape(m)?;
    }
    Ok(())
}

/// Integer chamfer distance map of a label buffer.
///
/// Each labeled sample receives the chamfer distance to the nearest sample
/// with a different label or background; background samples receive 0.
/// Same overflow and normalization policy as
/// [`distance_map`](crate::distance_map).
///
/// # Errors
///
/// Fails if the mask dimensionality does not match the buffer.
pub fn label_distance_map(
    labels: &Image<i32>,
    mask: &ChamferMask,
    normalize: bool,
) -> DistanceResult<Image<u16>> {
    let opts = DistanceOptions::new().with_normalize(normalize);
    label_distance_map_with(labels, mask, &opts, &mut NoProgress)
}

/// [`label_distance_map`] with explicit options and a progress monitor.
pub fn label_distance_map_with(
    labels: &Image<i32>,
    mask: &ChamferMask,
    options: &DistanceOptions<'_>,
    monitor: &mut dyn ProgressMonitor,
) -> DistanceResult<Image<u16>> {
    check_inputs(labels, mask, options.roi)?;
    let regions = label_regions(labels, options.roi);
    run_transform(labels.shape(), &regions, mask, options.normalize, monitor)
}

/// Float chamfer distance map of a label buffer.
pub fn label_distance_map_float(
    labels: &Image<i32>,
    mask: &ChamferMask,
    normalize: bool,
) -> DistanceResult<Image<f32>> {
    let opts = DistanceOptions::new().with_normalize(normalize);
    label_distance_map_float_with(labels, mask, &opts, &mut NoProgress)
}

/// [`label_distance_map_float`] with explicit options and a progress monitor.
pub fn label_distance_map_float_with(
    labels: &Image<i32>,
    mask: &ChamferMask,
    options: &DistanceOptions<'_>,
    monitor: &mut dyn ProgressMonitor,
) -> DistanceResult<Image<f32>> {
    check_inputs(labels, mask, options.roi)?;
    let regions = label_regions(labels, options.roi);
    run_transform(labels.shape(), &regions, mask, options.normalize, monitor)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chamfer::ChamferWeights2D;
    use morpho_core::Shape;

    #[test]
    fn test_two_labels_measure_to_each_other() {
        // Row of 6: 1 1 1 2 2 2. Each label's distance stops at the
        // other label, with no background anywhere.
        let labels =
            Image::from_data(Shape::new_2d(6, 1).unwrap(), vec![1, 1, 1, 2, 2, 2]).unwrap();
        let mask = ChamferWeights2D::CityBlock.mask();
        let dist = label_distance_map(&labels, &mask, false).unwrap();
        assert_eq!(dist.data(), &[3, 2, 1, 1, 2, 3]);
    }

    #[test]
    fn test_labels_independent_of_each_other() {
        // A label fully surrounded by another is still bounded by it
        let mut labels = Image::new_with_value(Shape::new_2d(5, 5).unwrap(), 1i32);
        labels.set_2d(2, 2, 2).unwrap();
        let mask = ChamferWeights2D::CityBlock.mask();
        let dist = label_distance_map(&labels, &mask, false).unwrap();
        // The enclosed single pixel touches label 1 on every side
        assert_eq!(dist.get_2d(2, 2).unwrap(), 1);
        // Its neighbors in label 1 touch label 2
        assert_eq!(dist.get_2d(1, 2).unwrap(), 1);
        // The corner of label 1 is 4 city-block steps from the enclosed
        // pixel, the only differing sample in the buffer
        assert_eq!(dist.get_2d(0, 0).unwrap(), 4);
    }

    #[test]
    fn test_background_is_zero() {
        let labels =
            Image::from_data(Shape::new_2d(4, 1).unwrap(), vec![0, 5, 5, 0]).unwrap();
        let mask = ChamferWeights2D::CityBlock.mask();
        let dist = label_distance_map(&labels, &mask, false).unwrap();
        assert_eq!(dist.data(), &[0, 1, 1, 0]);
    }

    #[test]
    fn test_normalized_float_label_distance() {
        let labels =
            Image::from_data(Shape::new_2d(5, 1).unwrap(), vec![0, 3, 3, 3, 0]).unwrap();
        let mask = ChamferWeights2D::QuasiEuclidean.mask();
        let dist = label_distance_map_float(&labels, &mask, true).unwrap();
        assert_eq!(dist.data(), &[0.0, 1.0, 2.0, 1.0, 0.0]);
    }
}

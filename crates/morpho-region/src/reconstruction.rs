//! Geodesic reconstruction
//!
//! Iteratively grows a marker image under a mask image until nothing
//! changes. Reconstruction by dilation raises the marker as far as the
//! mask allows; reconstruction by erosion is the dual, lowering it.
//!
//! The implementation is the standard hybrid: one forward raster pass,
//! one backward raster pass that seeds a FIFO with the samples that can
//! still change, then queue propagation to the fixed point. Every update
//! is monotonic and bounded by the mask, so termination is guaranteed.
//!
//! Reference: L. Vincent, "Morphological grayscale reconstruction in image
//! analysis: applications and efficient algorithms", IEEE Trans. Image
//! Processing 2(2), 1993.

use crate::error::{RegionError, RegionResult};
use morpho_core::{
    Connectivity, Error, Flow, Image, NoProgress, ProgressMonitor, Sample,
};
use std::cmp::Ordering;
use std::collections::VecDeque;

/// How many queue pops between progress checkpoints.
const QUEUE_BATCH: usize = 4096;

/// Direction of a geodesic reconstruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconstructionMode {
    /// Grow the marker upward, clipped from above by the mask.
    /// Requires `marker <= mask` pointwise for a meaningful result.
    ByDilation,
    /// Shrink the marker downward, clipped from below by the mask.
    /// Requires `marker >= mask` pointwise for a meaningful result.
    ByErosion,
}

/// Options for geodesic reconstruction.
#[derive(Debug, Clone, Copy)]
pub struct ReconstructionOptions {
    /// Neighbor relation used for propagation.
    pub connectivity: Connectivity,
    /// Reconstruction direction.
    pub mode: ReconstructionMode,
    /// Check the marker/mask ordering before propagating.
    ///
    /// Off by default: the ordering is a documented caller responsibility
    /// and is not verified in the hot path. When enabled, a violation
    /// fails with [`RegionError::ConstraintViolation`] before any
    /// propagation starts.
    pub validate: bool,
}

impl ReconstructionOptions {
    /// Create options for the given connectivity and mode.
    pub fn new(connectivity: Connectivity, mode: ReconstructionMode) -> Self {
        Self {
            connectivity,
            mode,
            validate: false,
        }
    }

    /// Enable or disable up-front marker/mask ordering validation.
    pub fn with_validate(mut self, validate: bool) -> Self {
        self.validate = validate;
        self
    }
}

impl ReconstructionMode {
    /// Whether `candidate` improves on `current` in this direction.
    #[inline]
    fn improves<T: Sample>(self, candidate: T, current: T) -> bool {
        match self {
            Self::ByDilation => candidate.total_cmp(&current) == Ordering::Greater,
            Self::ByErosion => candidate.total_cmp(&current) == Ordering::Less,
        }
    }

    /// The more-propagated of two values (max for dilation, min for
    /// erosion).
    #[inline]
    fn further<T: Sample>(self, a: T, b: T) -> T {
        match self {
            Self::ByDilation => T::max_of(a, b),
            Self::ByErosion => T::min_of(a, b),
        }
    }

    /// Clip a propagated value to the mask bound.
    #[inline]
    fn clip<T: Sample>(self, value: T, bound: T) -> T {
        match self {
            Self::ByDilation => T::min_of(value, bound),
            Self::ByErosion => T::max_of(value, bound),
        }
    }
}

/// Geodesic reconstruction of `marker` under `mask`.
///
/// Returns a freshly allocated buffer; neither input is modified. The
/// caller must supply `marker <= mask` (dilation) or `marker >= mask`
/// (erosion) pointwise; violating this does not raise an error unless
/// [`ReconstructionOptions::validate`] is set, but the result is then
/// under- or over-constrained and generally meaningless.
///
/// # Errors
///
/// Shape or connectivity mismatch; `ConstraintViolation` when validation
/// is enabled and the ordering does not hold.
///
/// # Examples
///
/// ```
/// use morpho_core::{Connectivity, Image, Shape};
/// use morpho_region::{ReconstructionMode, ReconstructionOptions, reconstruct};
///
/// let shape = Shape::new_2d(5, 1).unwrap();
/// let marker = Image::from_data(shape, vec![0u8, 0, 9, 0, 0]).unwrap();
/// let mask = Image::from_data(shape, vec![2u8, 5, 9, 5, 0]).unwrap();
///
/// let opts = ReconstructionOptions::new(Connectivity::Four, ReconstructionMode::ByDilation);
/// let rec = reconstruct(&marker, &mask, &opts).unwrap();
/// assert_eq!(rec.data(), &[2, 5, 9, 5, 0]);
/// ```
pub fn reconstruct<T: Sample>(
    marker: &Image<T>,
    mask: &Image<T>,
    options: &ReconstructionOptions,
) -> RegionResult<Image<T>> {
    reconstruct_with_progress(marker, mask, options, &mut NoProgress)
}

/// [`reconstruct`] with a progress monitor.
///
/// Checkpoints fire after each raster pass and after each batch of queue
/// pops; on cancellation no buffer is returned.
pub fn reconstruct_with_progress<T: Sample>(
    marker: &Image<T>,
    mask: &Image<T>,
    options: &ReconstructionOptions,
    monitor: &mut dyn ProgressMonitor,
) -> RegionResult<Image<T>> {
    marker.check_same_shape(mask).map_err(RegionError::Core)?;
    options
        .connectivity
        .check_shape(&marker.shape())
        .map_err(RegionError::Core)?;

    let mode = options.mode;
    if options.validate {
        validate_ordering(marker, mask, mode)?;
    }

    let shape = marker.shape();
    let (width, height, depth) = shape.dims();
    let bound = mask.data();
    let mut result: Vec<T> = marker
        .data()
        .iter()
        .zip(bound)
        .map(|(&m, &b)| mode.clip(m, b))
        .collect();

    let forward = options.connectivity.forward_offsets();
    let backward = options.connectivity.backward_offsets();

    // Forward raster pass.
    for z in 0..depth {
        for y in 0..height {
            for x in 0..width {
                let i = shape.index(x, y, z);
                let mut v = result[i];
                for &(dx, dy, dz) in forward {
                    let nx = i64::from(x) + i64::from(dx);
                    let ny = i64::from(y) + i64::from(dy);
                    let nz = i64::from(z) + i64::from(dz);
                    if shape.contains(nx, ny, nz) {
                        let ni = shape.index(nx as u32, ny as u32, nz as u32);
                        v = mode.further(v, result[ni]);
                    }
                }
                result[i] = mode.clip(v, bound[i]);
            }
        }
    }
    if monitor.report(0.4) == Flow::Cancel {
        return Err(Error::Cancelled.into());
    }

    // Backward raster pass; seed the queue with samples whose backward
    // neighbors are still behind both them and their own mask bound,
    // i.e. propagation across them is not finished.
    let mut queue: VecDeque<usize> = VecDeque::new();
    let mut enqueued = vec![false; result.len()];
    for z in (0..depth).rev() {
        for y in (0..height).rev() {
            for x in (0..width).rev() {
                let i = shape.index(x, y, z);
                let mut v = result[i];
                for &(dx, dy, dz) in backward {
                    let nx = i64::from(x) + i64::from(dx);
                    let ny = i64::from(y) + i64::from(dy);
                    let nz = i64::from(z) + i64::from(dz);
                    if shape.contains(nx, ny, nz) {
                        let ni = shape.index(nx as u32, ny as u32, nz as u32);
                        v = mode.further(v, result[ni]);
                    }
                }
                let v = mode.clip(v, bound[i]);
                result[i] = v;
                for &(dx, dy, dz) in backward {
                    let nx = i64::from(x) + i64::from(dx);
                    let ny = i64::from(y) + i64::from(dy);
                    let nz = i64::from(z) + i64::from(dz);
                    if shape.contains(nx, ny, nz) {
                        let ni = shape.index(nx as u32, ny as u32, nz as u32);
                        if mode.improves(v, result[ni]) && mode.improves(bound[ni], result[ni]) {
                            queue.push_back(i);
                            enqueued[i] = true;
                            break;
                        }
                    }
                }
            }
        }
    }
    if monitor.report(0.8) == Flow::Cancel {
        return Err(Error::Cancelled.into());
    }

    // Queue propagation to the fixed point.
    let offsets = options.connectivity.offsets();
    let mut pops = 0usize;
    while let Some(i) = queue.pop_front() {
        enqueued[i] = false;
        pops += 1;
        if pops % QUEUE_BATCH == 0 {
            let remaining = queue.len();
            let fraction = 0.8 + 0.2 * (pops as f64 / (pops + remaining) as f64);
            if monitor.report(fraction) == Flow::Cancel {
                return Err(Error::Cancelled.into());
            }
        }
        let (x, y, z) = shape.coords(i);
        let v = result[i];
        for &(dx, dy, dz) in offsets {
            let nx = i64::from(x) + i64::from(dx);
            let ny = i64::from(y) + i64::from(dy);
            let nz = i64::from(z) + i64::from(dz);
            if !shape.contains(nx, ny, nz) {
                continue;
            }
            let ni = shape.index(nx as u32, ny as u32, nz as u32);
            let cand = mode.clip(v, bound[ni]);
            if mode.improves(cand, result[ni]) {
                result[ni] = cand;
                if !enqueued[ni] {
                    enqueued[ni] = true;
                    queue.push_back(ni);
                }
            }
        }
    }
    if monitor.report(1.0) == Flow::Cancel {
        return Err(Error::Cancelled.into());
    }

    Ok(Image::from_data(shape, result).map_err(RegionError::Core)?)
}

fn validate_ordering<T: Sample>(
    marker: &Image<T>,
    mask: &Image<T>,
    mode: ReconstructionMode,
) -> RegionResult<()> {
    let shape = marker.shape();
    for (i, (&m, &b)) in marker.data().iter().zip(mask.data()).enumerate() {
        let ok = match mode {
            ReconstructionMode::ByDilation => m.total_cmp(&b) != Ordering::Greater,
            ReconstructionMode::ByErosion => m.total_cmp(&b) != Ordering::Less,
        };
        if !ok {
            let (x, y, z) = shape.coords(i);
            let relation = match mode {
                ReconstructionMode::ByDilation => "marker <= mask",
                ReconstructionMode::ByErosion => "marker >= mask",
            };
            return Err(RegionError::ConstraintViolation(format!(
                "{relation} does not hold at ({x}, {y}, {z}): marker {m:?}, mask {b:?}"
            )));
        }
    }
    Ok(())
}

/// Whether (x, y, z) lies on the boundary shell of `shape`.
///
/// The z faces only count for genuinely 3D buffers.
pub(crate) fn on_border(shape: &morpho_core::Shape, x: u32, y: u32, z: u32) -> bool {
    x == 0
        || x == shape.width() - 1
        || y == 0
        || y == shape.height() - 1
        || (shape.depth() > 1 && (z == 0 || z == shape.depth() - 1))
}

/// Remove the part of the image reachable from its boundary.
///
/// Reconstruction by dilation with the boundary shell as the marker and
/// the image as the mask yields exactly the border-connected part, which
/// is then subtracted. On a binary buffer this deletes every component
/// touching the border; on a grayscale buffer it removes the
/// border-connected intensity structure.
pub fn kill_borders<T: Sample>(
    image: &Image<T>,
    connectivity: Connectivity,
) -> RegionResult<Image<T>> {
    connectivity.check_shape(&image.shape()).map_err(RegionError::Core)?;
    let shape = image.shape();
    let marker = Image::from_fn(shape, |x, y, z| {
        if on_border(&shape, x, y, z) {
            image.data()[shape.index(x, y, z)]
        } else {
            T::ZERO
        }
    });
    let opts = ReconstructionOptions::new(connectivity, ReconstructionMode::ByDilation);
    let reachable = reconstruct(&marker, image, &opts)?;
    let data = image
        .data()
        .iter()
        .zip(reachable.data())
        .map(|(&v, &r)| v.saturating_sub(r))
        .collect();
    Ok(Image::from_data(shape, data).map_err(RegionError::Core)?)
}

/// Fill interior holes: regions not reachable from the boundary by
/// descending propagation.
///
/// Implemented as reconstruction by erosion of a marker that is
/// [`Sample::MAX_VALUE`] everywhere except on the boundary shell, where it
/// equals the image. On a binary buffer this fills regions of 0 completely
/// surrounded by foreground.
pub fn fill_holes<T: Sample>(
    image: &Image<T>,
    connectivity: Connectivity,
) -> RegionResult<Image<T>> {
    connectivity.check_shape(&image.shape()).map_err(RegionError::Core)?;
    let shape = image.shape();
    let marker = Image::from_fn(shape, |x, y, z| {
        if on_border(&shape, x, y, z) {
            image.data()[shape.index(x, y, z)]
        } else {
            T::MAX_VALUE
        }
    });
    let opts = ReconstructionOptions::new(connectivity, ReconstructionMode::ByErosion);
    reconstruct(&marker, image, &opts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use morpho_core::Shape;
    use proptest::prelude::*;

    fn dil(connectivity: Connectivity) -> ReconstructionOptions {
        ReconstructionOptions::new(connectivity, ReconstructionMode::ByDilation)
    }

    #[test]
    fn test_reconstruct_plus_pattern() {
        // Seed in the center of a plus-shaped mask: the seed value spreads
        // along the plus, clipped by the mask.
        let mut marker: Image<u8> = Image::new_2d(5, 5).unwrap();
        marker.set_2d(2, 2, 100).unwrap();
        let mut mask: Image<u8> = Image::new_2d(5, 5).unwrap();
        for i in 0..5 {
            mask.set_2d(2, i, 150).unwrap();
            mask.set_2d(i, 2, 150).unwrap();
        }

        let rec = reconstruct(&marker, &mask, &dil(Connectivity::Four)).unwrap();
        assert_eq!(rec.get_2d(2, 2).unwrap(), 100);
        assert_eq!(rec.get_2d(2, 0).unwrap(), 100);
        assert_eq!(rec.get_2d(0, 2).unwrap(), 100);
        // Off the plus nothing is reachable
        assert_eq!(rec.get_2d(0, 0).unwrap(), 0);
    }

    #[test]
    fn test_reconstruct_respects_mask_bottleneck() {
        // A low mask value along the path caps what can pass through it
        let shape = Shape::new_2d(5, 1).unwrap();
        let marker = Image::from_data(shape, vec![9u8, 0, 0, 0, 0]).unwrap();
        let mask = Image::from_data(shape, vec![9u8, 8, 2, 8, 8]).unwrap();
        let rec = reconstruct(&marker, &mask, &dil(Connectivity::Four)).unwrap();
        assert_eq!(rec.data(), &[9, 8, 2, 2, 2]);
    }

    #[test]
    fn test_reconstruct_by_erosion_dual() {
        let shape = Shape::new_2d(5, 1).unwrap();
        let marker = Image::from_data(shape, vec![0u8, 255, 255, 255, 255]).unwrap();
        let mask = Image::from_data(shape, vec![0u8, 1, 7, 1, 0]).unwrap();
        let opts = ReconstructionOptions::new(Connectivity::Four, ReconstructionMode::ByErosion);
        let rec = reconstruct(&marker, &mask, &opts).unwrap();
        // The low marker value erodes along, held up by the mask ridge
        assert_eq!(rec.data(), &[0, 1, 7, 7, 7]);
    }

    #[test]
    fn test_backward_only_propagation_uses_queue() {
        // Seed at the raster end: the forward pass alone cannot spread it,
        // exercising the backward pass and queue.
        let shape = Shape::new_2d(6, 1).unwrap();
        let marker = Image::from_data(shape, vec![0u8, 0, 0, 0, 0, 42]).unwrap();
        let mask = Image::new_with_value(shape, 200u8);
        let rec = reconstruct(&marker, &mask, &dil(Connectivity::Four)).unwrap();
        assert!(rec.data().iter().all(|&v| v == 42));
    }

    #[test]
    fn test_snake_path_needs_queue_iterations() {
        // An S-shaped corridor forces information to flow against the
        // raster direction more than once.
        let mut mask: Image<u8> = Image::new_2d(5, 5).unwrap();
        let corridor = [
            (0, 0), (1, 0), (2, 0), (3, 0), (4, 0),
            (4, 1), (4, 2),
            (3, 2), (2, 2), (1, 2), (0, 2),
            (0, 3), (0, 4),
            (1, 4), (2, 4), (3, 4), (4, 4),
        ];
        for &(x, y) in &corridor {
            mask.set_2d(x, y, 77).unwrap();
        }
        let mut marker: Image<u8> = Image::new_2d(5, 5).unwrap();
        marker.set_2d(4, 4, 77).unwrap();
        let rec = reconstruct(&marker, &mask, &dil(Connectivity::Four)).unwrap();
        for &(x, y) in &corridor {
            assert_eq!(rec.get_2d(x, y).unwrap(), 77, "at ({x},{y})");
        }
        assert_eq!(rec.get_2d(2, 1).unwrap(), 0);
    }

    #[test]
    fn test_validate_rejects_bad_ordering() {
        let shape = Shape::new_2d(3, 1).unwrap();
        let marker = Image::from_data(shape, vec![5u8, 0, 0]).unwrap();
        let mask = Image::from_data(shape, vec![3u8, 9, 9]).unwrap();
        let opts = dil(Connectivity::Four).with_validate(true);
        assert!(matches!(
            reconstruct(&marker, &mask, &opts),
            Err(RegionError::ConstraintViolation(_))
        ));
        // Without validation the call succeeds (result is the caller's
        // problem)
        assert!(reconstruct(&marker, &mask, &dil(Connectivity::Four)).is_ok());
    }

    #[test]
    fn test_connectivity_mismatch_rejected() {
        let marker: Image<u8> = Image::new_3d(3, 3, 3).unwrap();
        let mask: Image<u8> = Image::new_3d(3, 3, 3).unwrap();
        assert!(reconstruct(&marker, &mask, &dil(Connectivity::Eight)).is_err());
    }

    #[test]
    fn test_kill_borders_binary() {
        // One component touching the border, one interior
        let mut img: Image<u8> = Image::new_2d(7, 7).unwrap();
        img.set_2d(0, 2, 1).unwrap();
        img.set_2d(1, 2, 1).unwrap();
        for y in 3..5 {
            for x in 3..5 {
                img.set_2d(x, y, 1).unwrap();
            }
        }
        let out = kill_borders(&img, Connectivity::Four).unwrap();
        assert_eq!(out.get_2d(0, 2).unwrap(), 0);
        assert_eq!(out.get_2d(1, 2).unwrap(), 0);
        assert_eq!(out.get_2d(3, 3).unwrap(), 1);
        assert_eq!(out.get_2d(4, 4).unwrap(), 1);
    }

    #[test]
    fn test_fill_holes_binary() {
        // Ring with a hole at (2,2)
        let mut img: Image<u8> = Image::new_2d(5, 5).unwrap();
        for i in 1..4 {
            img.set_2d(i, 1, 1).unwrap();
            img.set_2d(i, 3, 1).unwrap();
            img.set_2d(1, i, 1).unwrap();
            img.set_2d(3, i, 1).unwrap();
        }
        let filled = fill_holes(&img, Connectivity::Four).unwrap();
        assert_eq!(filled.get_2d(2, 2).unwrap(), 1);
        assert_eq!(filled.get_2d(0, 0).unwrap(), 0);
        assert_eq!(filled.get_2d(1, 1).unwrap(), 1);
    }

    #[test]
    fn test_cancellation() {
        let marker: Image<u8> = Image::new_2d(4, 4).unwrap();
        let mask: Image<u8> = Image::new_2d(4, 4).unwrap();
        let mut cancel_all = |_: f64| Flow::Cancel;
        let result = reconstruct_with_progress(
            &marker,
            &mask,
            &dil(Connectivity::Four),
            &mut cancel_all,
        );
        assert!(matches!(
            result,
            Err(RegionError::Core(Error::Cancelled))
        ));
    }

    proptest! {
        #[test]
        fn prop_dilation_bounded_and_idempotent(
            pairs in prop::collection::vec((0u8..=255, 0u8..=255), 36..=36)
        ) {
            let shape = Shape::new_2d(6, 6).unwrap();
            let marker_data: Vec<u8> = pairs.iter().map(|&(a, b)| a.min(b)).collect();
            let mask_data: Vec<u8> = pairs.iter().map(|&(a, b)| a.max(b)).collect();
            let marker = Image::from_data(shape, marker_data).unwrap();
            let mask = Image::from_data(shape, mask_data).unwrap();

            let opts = ReconstructionOptions::new(
                Connectivity::Eight,
                ReconstructionMode::ByDilation,
            );
            let rec = reconstruct(&marker, &mask, &opts).unwrap();

            // marker <= rec <= mask pointwise
            for ((&m, &r), &b) in marker.data().iter().zip(rec.data()).zip(mask.data()) {
                prop_assert!(m <= r);
                prop_assert!(r <= b);
            }

            // idempotence: reconstructing the result changes nothing
            let again = reconstruct(&rec, &mask, &opts).unwrap();
            prop_assert_eq!(again.data(), rec.data());
        }
    }
}

//! Chamfer distance transforms for binary buffers
//!
//! Computes, for each foreground sample, the chamfer distance to the
//! nearest background sample, using two full raster sweeps: a forward
//! sweep relaxing over the mask's forward offsets, then a backward sweep
//! relaxing over the backward offsets. Background samples (value 0, or
//! samples outside the region of interest) map to distance 0.
//!
//! # Overflow policy
//!
//! Integer accumulation saturates at `u16::MAX`, which doubles as the
//! "unreached" sentinel: a sample still at the sentinel after both sweeps
//! is disconnected from background and is reported as-is; callers may
//! treat it as infinite. The float flavor uses `f32::MAX` the same way.
//! Distances never wrap.
//!
//! Normalization, when requested, divides every non-sentinel sample by the
//! mask's unit weight after both sweeps have finished, so propagation
//! itself always works on the raw integer (or float) weight scale.

use crate::chamfer::{ChamferMask, MaskOffset};
use crate::error::DistanceResult;
use morpho_core::{Error, Flow, Image, NoProgress, ProgressMonitor, Sample, Shape};

/// Options for distance transforms.
///
/// # Examples
///
/// ```
/// use morpho_core::Image;
/// use morpho_dist::{DistanceOptions, ChamferWeights2D, distance_map_with};
/// use morpho_core::NoProgress;
///
/// let image: Image<u8> = Image::new_2d(8, 8).unwrap();
/// let mask = ChamferWeights2D::Borgefors.mask();
/// let opts = DistanceOptions::new().with_normalize(true);
/// let dist = distance_map_with(&image, &mask, &opts, &mut NoProgress).unwrap();
/// assert!(dist.data().iter().all(|&d| d == 0));
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct DistanceOptions<'a> {
    /// Divide the result by the unit weight after propagation.
    pub normalize: bool,
    /// Optional region of interest; samples outside it are treated as
    /// background.
    pub roi: Option<&'a Image<u8>>,
}

impl<'a> DistanceOptions<'a> {
    /// Create options with defaults (no normalization, no ROI).
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the normalization flag.
    pub fn with_normalize(mut self, normalize: bool) -> Self {
        self.normalize = normalize;
        self
    }

    /// Restrict the transform to a region of interest (non-zero = inside).
    pub fn with_roi(mut self, roi: &'a Image<u8>) -> Self {
        self.roi = Some(roi);
        self
    }
}

/// Distance accumulator kind: the integer or float weight scale.
pub(crate) trait ChamferWeight: Sample {
    /// Sentinel for "not yet reached / disconnected".
    const UNREACHED: Self;

    /// Weight of one mask offset on this scale.
    fn of(offset: &MaskOffset) -> Self;

    /// Unit (axis-aligned) weight of a mask on this scale.
    fn unit(mask: &ChamferMask) -> Self;

    /// Accumulate without wrapping; clamps at the sentinel.
    fn accumulate(self, weight: Self) -> Self;

    /// Elementwise normalization step.
    fn divide(self, unit: Self) -> Self;
}

impl ChamferWeight for u16 {
    const UNREACHED: Self = u16::MAX;

    #[inline]
    fn of(offset: &MaskOffset) -> Self {
        offset.weight
    }

    #[inline]
    fn unit(mask: &ChamferMask) -> Self {
        mask.unit_weight()
    }

    #[inline]
    fn accumulate(self, weight: Self) -> Self {
        self.saturating_add(weight)
    }

    #[inline]
    fn divide(self, unit: Self) -> Self {
        self / unit
    }
}

impl ChamferWeight for f32 {
    const UNREACHED: Self = f32::MAX;

    #[inline]
    fn of(offset: &MaskOffset) -> Self {
        offset.weight_f
    }

    #[inline]
    fn unit(mask: &ChamferMask) -> Self {
        mask.unit_weight_f()
    }

    #[inline]
    fn accumulate(self, weight: Self) -> Self {
        Sample::saturating_add(self, weight)
    }

    #[inline]
    fn divide(self, unit: Self) -> Self {
        self / unit
    }
}

/// Region map: 0 = background (distance source), anything else = the
/// region a sample belongs to. Binary transforms use a single region id;
/// label-aware transforms use the label value, which confines relaxation
/// to same-label neighbors.
pub(crate) fn run_transform<W: ChamferWeight>(
    shape: Shape,
    regions: &[i32],
    mask: &ChamferMask,
    normalize: bool,
    monitor: &mut dyn ProgressMonitor,
) -> DistanceResult<Image<W>> {
    let (width, height, depth) = shape.dims();
    let mut dist: Vec<W> = regions
        .iter()
        .map(|&r| if r == 0 { W::ZERO } else { W::UNREACHED })
        .collect();

    // Forward sweep, low-to-high in every axis.
    for z in 0..depth {
        for y in 0..height {
            for x in 0..width {
                let i = shape.index(x, y, z);
                let r = regions[i];
                if r == 0 {
                    continue;
                }
                dist[i] = relax(&dist, regions, shape, mask.forward_offsets(), x, y, z, r, dist[i]);
            }
        }
    }
    if monitor.report(0.5) == Flow::Cancel {
        return Err(Error::Cancelled.into());
    }

    // Backward sweep, reverse raster order.
    for z in (0..depth).rev() {
        for y in (0..height).rev() {
            for x in (0..width).rev() {
                let i = shape.index(x, y, z);
                let r = regions[i];
                if r == 0 {
                    continue;
                }
                dist[i] = relax(&dist, regions, shape, mask.backward_offsets(), x, y, z, r, dist[i]);
            }
        }
    }
    if monitor.report(1.0) == Flow::Cancel {
        return Err(Error::Cancelled.into());
    }

    if normalize {
        let unit = W::unit(mask);
        for v in &mut dist {
            // sentinel samples stay recognizable as unreachable
            if *v != W::UNREACHED {
                *v = v.divide(unit);
            }
        }
    }

    Ok(Image::from_data(shape, dist)?)
}

#[inline]
#[allow(clippy::too_many_arguments)]
fn relax<W: ChamferWeight>(
    dist: &[W],
    regions: &[i32],
    shape: Shape,
    offsets: &[MaskOffset],
    x: u32,
    y: u32,
    z: u32,
    region: i32,
    current: W,
) -> W {
    let mut best = current;
    for o in offsets {
        let nx = i64::from(x) + i64::from(o.dx);
        let ny = i64::from(y) + i64::from(o.dy);
        let nz = i64::from(z) + i64::from(o.dz);
        if !shape.contains(nx, ny, nz) {
            continue;
        }
        let ni = shape.index(nx as u32, ny as u32, nz as u32);
        let w = W::of(o);
        // A neighbor in another region (or background) is itself the
        // nearest-different sample at distance w; a same-region neighbor
        // relays its own tentative distance.
        let cand = if regions[ni] != region {
            w
        } else {
            dist[ni].accumulate(w)
        };
        if cand < best {
            best = cand;
        }
    }
    best
}

pub(crate) fn binary_regions(image: &Image<u8>, roi: Option<&Image<u8>>) -> Vec<i32> {
    match roi {
        None => image
            .data()
            .iter()
            .map(|&v| i32::from(v != 0))
            .collect(),
        Some(m) => image
            .data()
            .iter()
            .zip(m.data())
            .map(|(&v, &inside)| i32::from(v != 0 && inside != 0))
            .collect(),
    }
}

fn check_inputs<T: Sample>(
    image: &Image<T>,
    mask: &ChamferMask,
    roi: Option<&Image<u8>>,
) -> DistanceResult<()> {
    mask.check_shape(&image.shape())?;
    if let Some(m) = roi {
        image.check_same_shape(m)?;
    }
    Ok(())
}

/// Compute the integer chamfer distance map of a binary buffer.
///
/// Every non-zero sample receives the chamfer distance to the nearest
/// zero sample; zero samples receive 0. Distances are expressed in
/// multiples of [`ChamferMask::unit_weight`] unless `normalize` is set.
///
/// Samples disconnected from any background remain at the `u16::MAX`
/// sentinel; this is intentional, not an error.
///
/// # Errors
///
/// Fails if the mask dimensionality does not match the buffer.
pub fn distance_map(
    image: &Image<u8>,
    mask: &ChamferMask,
    normalize: bool,
) -> DistanceResult<Image<u16>> {
    let opts = DistanceOptions::new().with_normalize(normalize);
    distance_map_with(image, mask, &opts, &mut NoProgress)
}

/// [`distance_map`] with explicit options and a progress monitor.
///
/// The monitor is called after each raster sweep; on cancellation the
/// function returns `Cancelled` and no buffer.
pub fn distance_map_with(
    image: &Image<u8>,
    mask: &ChamferMask,
    options: &DistanceOptions<'_>,
    monitor: &mut dyn ProgressMonitor,
) -> DistanceResult<Image<u16>> {
    check_inputs(image, mask, options.roi)?;
    let regions = binary_regions(image, options.roi);
    run_transform(image.shape(), &regions, mask, options.normalize, monitor)
}

/// Compute the float chamfer distance map of a binary buffer.
///
/// Same contract as [`distance_map`] with float weights and the
/// `f32::MAX` sentinel.
pub fn distance_map_float(
    image: &Image<u8>,
    mask: &ChamferMask,
    normalize: bool,
) -> DistanceResult<Image<f32>> {
    let opts = DistanceOptions::new().with_normalize(normalize);
    distance_map_float_with(image, mask, &opts, &mut NoProgress)
}

/// [`distance_map_float`] with explicit options and a progress monitor.
pub fn distance_map_float_with(
    image: &Image<u8>,
    mask: &ChamferMask,
    options: &DistanceOptions<'_>,
    monitor: &mut dyn ProgressMonitor,
) -> DistanceResult<Image<f32>> {
    check_inputs(image, mask, options.roi)?;
    let regions = binary_regions(image, options.roi);
    run_transform(image.shape(), &regions, mask, options.normalize, monitor)
}

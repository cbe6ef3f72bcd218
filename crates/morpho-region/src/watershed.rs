//! Watershed segmentation
//!
//! Floods a grayscale relief from seeded minima, assigning each sample to
//! the catchment basin of the seed that reaches it first at the lowest
//! intensity, and marking samples where two basins meet as watershed
//! lines. The flood is driven by a priority queue keyed by (intensity,
//! insertion sequence); the explicit sequence number makes tie-breaking,
//! and therefore the whole output, deterministic and independent of the
//! queue implementation.
//!
//! Reference: L. Vincent and P. Soille, "Watersheds in digital spaces: an
//! efficient algorithm based on immersion simulations", IEEE PAMI 13(6),
//! 1991.

use crate::conncomp::label_components;
use crate::error::{RegionError, RegionResult};
use crate::minima::extended_minima;
use morpho_core::{
    Connectivity, Error, Flow, Image, NoProgress, ProgressMonitor, Sample,
};
use smallvec::SmallVec;
use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

/// Label assigned to samples where two or more basins meet.
pub const WATERSHED_LINE: i32 = -1;

/// How many queue pops between progress checkpoints.
const FLOOD_BATCH: usize = 4096;

/// Options for marker-controlled watershed flooding.
///
/// `h_min`/`h_max` bound which intensities participate: samples outside
/// the range never flood and are reported as background. The optional
/// `mask` restricts flooding to a region of interest the same way.
#[derive(Debug, Clone, Copy)]
pub struct WatershedOptions<'a, T> {
    /// Neighbor relation used for flooding.
    pub connectivity: Connectivity,
    /// Lowest participating intensity (inclusive); None = unbounded.
    pub h_min: Option<T>,
    /// Highest participating intensity (inclusive); None = unbounded.
    pub h_max: Option<T>,
    /// Optional region of interest (non-zero = inside).
    pub mask: Option<&'a Image<u8>>,
}

impl<'a, T: Sample> WatershedOptions<'a, T> {
    /// Create options with the given connectivity and no other bounds.
    pub fn new(connectivity: Connectivity) -> Self {
        Self {
            connectivity,
            h_min: None,
            h_max: None,
            mask: None,
        }
    }

    /// Bound the participating intensity range (both ends inclusive).
    pub fn with_range(mut self, h_min: T, h_max: T) -> Self {
        self.h_min = Some(h_min);
        self.h_max = Some(h_max);
        self
    }

    /// Restrict flooding to a region of interest (non-zero = inside).
    pub fn with_mask(mut self, mask: &'a Image<u8>) -> Self {
        self.mask = Some(mask);
        self
    }
}

/// One queue entry: a labeled sample waiting to flood its neighbors.
struct FloodEntry<T> {
    value: T,
    seq: u64,
    index: usize,
}

impl<T: Sample> Ord for FloodEntry<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.value
            .total_cmp(&other.value)
            .then_with(|| self.seq.cmp(&other.seq))
    }
}

impl<T: Sample> PartialOrd for FloodEntry<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T: Sample> PartialEq for FloodEntry<T> {
    fn eq(&self, other: &Self) -> bool {
        self.seq == other.seq
    }
}

impl<T: Sample> Eq for FloodEntry<T> {}

/// Marker-controlled watershed of a relief.
///
/// `markers` seeds the flood: every strictly positive label is a basin
/// seed; 0 is unlabeled. The output assigns each reachable in-range sample
/// either its basin label or [`WATERSHED_LINE`]; out-of-range, out-of-mask,
/// and unreachable samples stay 0. Once assigned, a sample is never
/// relabeled.
///
/// # Errors
///
/// Shape or connectivity mismatch between the inputs.
///
/// # Examples
///
/// ```
/// use morpho_core::{Connectivity, Image, Shape};
/// use morpho_region::{WatershedOptions, marker_watershed, WATERSHED_LINE};
///
/// let shape = Shape::new_2d(5, 1).unwrap();
/// let relief = Image::from_data(shape, vec![0u8, 1, 2, 1, 0]).unwrap();
/// let mut markers: Image<i32> = Image::new(shape);
/// markers.set_2d(0, 0, 1).unwrap();
/// markers.set_2d(4, 0, 2).unwrap();
///
/// let opts = WatershedOptions::new(Connectivity::Four);
/// let basins = marker_watershed(&relief, &markers, &opts).unwrap();
/// assert_eq!(basins.data(), &[1, 1, WATERSHED_LINE, 2, 2]);
/// ```
pub fn marker_watershed<T: Sample>(
    relief: &Image<T>,
    markers: &Image<i32>,
    options: &WatershedOptions<'_, T>,
) -> RegionResult<Image<i32>> {
    marker_watershed_with_progress(relief, markers, options, &mut NoProgress)
}

/// [`marker_watershed`] with a progress monitor.
///
/// Checkpoints fire after seeding and after each batch of queue pops; on
/// cancellation no buffer is returned.
pub fn marker_watershed_with_progress<T: Sample>(
    relief: &Image<T>,
    markers: &Image<i32>,
    options: &WatershedOptions<'_, T>,
    monitor: &mut dyn ProgressMonitor,
) -> RegionResult<Image<i32>> {
    relief.check_same_shape(markers).map_err(RegionError::Core)?;
    options
        .connectivity
        .check_shape(&relief.shape())
        .map_err(RegionError::Core)?;
    if let Some(m) = options.mask {
        relief.check_same_shape(m).map_err(RegionError::Core)?;
    }

    let shape = relief.shape();
    let heights = relief.data();
    let in_domain = |i: usize| options.mask.is_none_or(|m| m.data()[i] != 0);
    let in_range = |v: T| {
        options
            .h_min
            .is_none_or(|lo| v.total_cmp(&lo) != Ordering::Less)
            && options
                .h_max
                .is_none_or(|hi| v.total_cmp(&hi) != Ordering::Greater)
    };

    let mut out: Vec<i32> = markers.data().to_vec();
    let mut heap: BinaryHeap<Reverse<FloodEntry<T>>> = BinaryHeap::new();
    let mut seq = 0u64;

    // Seed in raster order so the insertion sequence, and with it every
    // tie-break, is a pure function of the input.
    for i in 0..out.len() {
        if out[i] > 0 {
            if in_domain(i) && in_range(heights[i]) {
                heap.push(Reverse(FloodEntry {
                    value: heights[i],
                    seq,
                    index: i,
                }));
                seq += 1;
            } else {
                // excluded seeds are reported as background
                out[i] = 0;
            }
        }
    }
    if monitor.report(0.05) == Flow::Cancel {
        return Err(Error::Cancelled.into());
    }

    let offsets = options.connectivity.offsets();
    let mut pops = 0usize;
    while let Some(Reverse(entry)) = heap.pop() {
        pops += 1;
        if pops % FLOOD_BATCH == 0 {
            let fraction = 0.05 + 0.95 * (pops as f64 / (pops + heap.len()) as f64);
            if monitor.report(fraction) == Flow::Cancel {
                return Err(Error::Cancelled.into());
            }
        }

        let basin = out[entry.index];
        debug_assert!(basin > 0, "only basin samples are ever enqueued");
        let (x, y, z) = shape.coords(entry.index);
        for &(dx, dy, dz) in offsets {
            let nx = i64::from(x) + i64::from(dx);
            let ny = i64::from(y) + i64::from(dy);
            let nz = i64::from(z) + i64::from(dz);
            if !shape.contains(nx, ny, nz) {
                continue;
            }
            let ni = shape.index(nx as u32, ny as u32, nz as u32);
            if out[ni] != 0 || !in_domain(ni) || !in_range(heights[ni]) {
                continue;
            }

            // The inherited basin must agree with every labeled neighbor
            // the sample touches; otherwise two basins meet here.
            let (cx, cy, cz) = (nx, ny, nz);
            let mut touched: SmallVec<[i32; 4]> = SmallVec::new();
            for &(ex, ey, ez) in offsets {
                let mx = cx + i64::from(ex);
                let my = cy + i64::from(ey);
                let mz = cz + i64::from(ez);
                if !shape.contains(mx, my, mz) {
                    continue;
                }
                let mi = shape.index(mx as u32, my as u32, mz as u32);
                let label = out[mi];
                if label > 0 && !touched.contains(&label) {
                    touched.push(label);
                }
            }

            if touched.len() <= 1 {
                debug_assert_eq!(touched.first().copied().unwrap_or(basin), basin);
                out[ni] = basin;
                heap.push(Reverse(FloodEntry {
                    value: heights[ni],
                    seq,
                    index: ni,
                }));
                seq += 1;
            } else {
                // Watershed lines are terminal: never enqueued, never
                // propagated from.
                out[ni] = WATERSHED_LINE;
            }
        }
    }
    if monitor.report(1.0) == Flow::Cancel {
        return Err(Error::Cancelled.into());
    }

    Ok(Image::from_data(shape, out).map_err(RegionError::Core)?)
}

/// Watershed with automatic minima extraction.
///
/// Computes the extended minima of the relief for the given `dynamic`
/// (merging minima shallower than it), labels them by connected
/// components, and floods from the result. Increasing `dynamic` cannot
/// increase the number of basins. The minima imposition happens once,
/// before flooding begins.
pub fn watershed<T: Sample>(
    relief: &Image<T>,
    dynamic: T,
    connectivity: Connectivity,
) -> RegionResult<Image<i32>> {
    let minima = extended_minima(relief, dynamic, connectivity)?;
    let markers = label_components(&minima, connectivity)?;
    marker_watershed(relief, &markers, &WatershedOptions::new(connectivity))
}

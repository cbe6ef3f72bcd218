//! Connected component analysis
//!
//! Labels connected foreground regions of a binary buffer with a two-pass
//! union-find scan, and filters components by their sample count (area in
//! 2D, volume in 3D).

use crate::error::{RegionError, RegionResult};
use morpho_core::{Connectivity, Image};
use std::collections::HashMap;

/// Disjoint-set forest over provisional labels.
struct UnionFind {
    parent: Vec<u32>,
}

impl UnionFind {
    fn new() -> Self {
        Self { parent: Vec::new() }
    }

    fn make(&mut self) -> u32 {
        let id = self.parent.len() as u32;
        self.parent.push(id);
        id
    }

    fn find(&mut self, mut id: u32) -> u32 {
        // path halving
        while self.parent[id as usize] != id {
            let grand = self.parent[self.parent[id as usize] as usize];
            self.parent[id as usize] = grand;
            id = grand;
        }
        id
    }

    fn union(&mut self, a: u32, b: u32) {
        let ra = self.find(a);
        let rb = self.find(b);
        if ra != rb {
            // smaller root wins, keeping roots raster-stable
            let (lo, hi) = if ra < rb { (ra, rb) } else { (rb, ra) };
            self.parent[hi as usize] = lo;
        }
    }
}

/// Label the connected components of a binary buffer.
///
/// Every non-zero sample is foreground. Components are numbered 1..=n in
/// raster order of their first sample; background stays 0.
///
/// # Errors
///
/// Fails when the connectivity dimensionality does not match the buffer.
///
/// # Examples
///
/// ```
/// use morpho_core::{Connectivity, Image};
/// use morpho_region::label_components;
///
/// let mut img: Image<u8> = Image::new_2d(5, 1).unwrap();
/// img.set_2d(0, 0, 1).unwrap();
/// img.set_2d(1, 0, 1).unwrap();
/// img.set_2d(3, 0, 1).unwrap();
///
/// let labels = label_components(&img, Connectivity::Four).unwrap();
/// assert_eq!(labels.data(), &[1, 1, 0, 2, 0]);
/// ```
pub fn label_components(
    binary: &Image<u8>,
    connectivity: Connectivity,
) -> RegionResult<Image<i32>> {
    connectivity
        .check_shape(&binary.shape())
        .map_err(RegionError::Core)?;
    let shape = binary.shape();
    let (width, height, depth) = shape.dims();
    let data = binary.data();
    let forward = connectivity.forward_offsets();

    // First pass: provisional labels (stored +1, 0 = background) and
    // equivalences.
    let mut provisional = vec![0u32; data.len()];
    let mut uf = UnionFind::new();
    for z in 0..depth {
        for y in 0..height {
            for x in 0..width {
                let i = shape.index(x, y, z);
                if data[i] == 0 {
                    continue;
                }
                let mut assigned: Option<u32> = None;
                for &(dx, dy, dz) in forward {
                    let nx = i64::from(x) + i64::from(dx);
                    let ny = i64::from(y) + i64::from(dy);
                    let nz = i64::from(z) + i64::from(dz);
                    if !shape.contains(nx, ny, nz) {
                        continue;
                    }
                    let ni = shape.index(nx as u32, ny as u32, nz as u32);
                    let neighbor = provisional[ni];
                    if neighbor == 0 {
                        continue;
                    }
                    match assigned {
                        None => assigned = Some(neighbor - 1),
                        Some(current) => uf.union(current, neighbor - 1),
                    }
                }
                let label = match assigned {
                    Some(l) => l,
                    None => uf.make(),
                };
                provisional[i] = label + 1;
            }
        }
    }

    // Second pass: compact roots to 1..=n in raster order of first
    // appearance.
    let mut root_to_label: HashMap<u32, i32> = HashMap::new();
    let mut next = 0i32;
    let mut out = vec![0i32; data.len()];
    for i in 0..data.len() {
        if provisional[i] == 0 {
            continue;
        }
        let root = uf.find(provisional[i] - 1);
        let label = *root_to_label.entry(root).or_insert_with(|| {
            next += 1;
            next
        });
        out[i] = label;
    }

    Ok(Image::from_data(shape, out).map_err(RegionError::Core)?)
}

/// Number of connected components in a binary buffer.
pub fn count_components(
    binary: &Image<u8>,
    connectivity: Connectivity,
) -> RegionResult<usize> {
    let labels = label_components(binary, connectivity)?;
    Ok(labels.data().iter().max().copied().unwrap_or(0).max(0) as usize)
}

/// Per-label sample counts of a label buffer.
///
/// Entry `k` holds the count of label `k + 1`; labels that do not occur
/// count 0. Background (0) and the watershed-line sentinel are ignored.
pub fn component_sizes(labels: &Image<i32>) -> Vec<usize> {
    let max = labels.data().iter().max().copied().unwrap_or(0);
    if max <= 0 {
        return Vec::new();
    }
    let mut sizes = vec![0usize; max as usize];
    for &v in labels.data() {
        if v > 0 {
            sizes[(v - 1) as usize] += 1;
        }
    }
    sizes
}

/// The sorted set of distinct positive labels present in a buffer.
pub fn label_set(labels: &Image<i32>) -> Vec<i32> {
    let mut set: Vec<i32> = labels.data().iter().copied().filter(|&v| v > 0).collect();
    set.sort_unstable();
    set.dedup();
    set
}

/// Remove small components from a binary buffer.
///
/// Components with fewer than `min_count` samples (strictly) are reset to
/// background; components at exactly the threshold are kept. The surviving
/// components keep their original sample values.
pub fn size_opening(
    binary: &Image<u8>,
    min_count: usize,
    connectivity: Connectivity,
) -> RegionResult<Image<u8>> {
    let labels = label_components(binary, connectivity)?;
    let sizes = component_sizes(&labels);
    let shape = binary.shape();
    let data = binary
        .data()
        .iter()
        .zip(labels.data())
        .map(|(&v, &label)| {
            if label > 0 && sizes[(label - 1) as usize] < min_count {
                0
            } else {
                v
            }
        })
        .collect();
    Ok(Image::from_data(shape, data).map_err(RegionError::Core)?)
}

/// Remove small labels from a label buffer.
///
/// The label-map analogue of [`size_opening`]: every positive label whose
/// total sample count is strictly below `min_count` is reset to 0.
/// Non-positive values (background, watershed lines) pass through
/// untouched.
pub fn remove_small_labels(labels: &Image<i32>, min_count: usize) -> Image<i32> {
    let mut counts: HashMap<i32, usize> = HashMap::new();
    for &v in labels.data() {
        if v > 0 {
            *counts.entry(v).or_insert(0) += 1;
        }
    }
    let shape = labels.shape();
    let data = labels
        .data()
        .iter()
        .map(|&v| {
            if v > 0 && counts[&v] < min_count {
                0
            } else {
                v
            }
        })
        .collect();
    Image::from_data(shape, data).expect("shape unchanged")
}

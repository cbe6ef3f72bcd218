//! Regional and extended minima
//!
//! A regional minimum is a connected plateau of constant value with no
//! lower neighbor. Extended minima are the regional minima of the h-minima
//! transform, which suppresses minima shallower than a dynamic `h` by
//! geodesic reconstruction, the standard pre-pass that keeps watershed
//! flooding from over-segmenting.

use crate::error::{RegionError, RegionResult};
use crate::reconstruction::{ReconstructionMode, ReconstructionOptions, reconstruct};
use morpho_core::{Connectivity, Image, Sample};
use std::cmp::Ordering;
use std::collections::VecDeque;

/// Binary mask of the regional minima of a relief.
///
/// A sample belongs to a regional minimum when its whole constant-value
/// plateau has no neighbor with a strictly smaller value. Output samples
/// are 1 on minima, 0 elsewhere.
pub fn regional_minima<T: Sample>(
    relief: &Image<T>,
    connectivity: Connectivity,
) -> RegionResult<Image<u8>> {
    connectivity
        .check_shape(&relief.shape())
        .map_err(RegionError::Core)?;
    let shape = relief.shape();
    let data = relief.data();
    let offsets = connectivity.offsets();

    let mut visited = vec![false; data.len()];
    let mut out = vec![0u8; data.len()];
    let mut queue: VecDeque<usize> = VecDeque::new();
    let mut plateau: Vec<usize> = Vec::new();

    for start in 0..data.len() {
        if visited[start] {
            continue;
        }
        let level = data[start];
        let mut is_minimum = true;
        visited[start] = true;
        queue.push_back(start);
        plateau.clear();
        plateau.push(start);

        // Flood the constant-value plateau, watching for any lower exit.
        while let Some(i) = queue.pop_front() {
            let (x, y, z) = shape.coords(i);
            for &(dx, dy, dz) in offsets {
                let nx = i64::from(x) + i64::from(dx);
                let ny = i64::from(y) + i64::from(dy);
                let nz = i64::from(z) + i64::from(dz);
                if !shape.contains(nx, ny, nz) {
                    continue;
                }
                let ni = shape.index(nx as u32, ny as u32, nz as u32);
                match data[ni].total_cmp(&level) {
                    Ordering::Less => is_minimum = false,
                    Ordering::Equal => {
                        if !visited[ni] {
                            visited[ni] = true;
                            queue.push_back(ni);
                            plateau.push(ni);
                        }
                    }
                    Ordering::Greater => {}
                }
            }
        }

        if is_minimum {
            for &i in &plateau {
                out[i] = 1;
            }
        }
    }

    Ok(Image::from_data(shape, out).map_err(RegionError::Core)?)
}

/// The h-minima transform: fill in every basin shallower than `h`.
///
/// Reconstruction by erosion of `relief + h` (saturating) under `relief`.
/// The result equals the relief except that minima with dynamic less than
/// `h` are raised to the level of their lowest saddle.
///
/// # Errors
///
/// `InvalidParameters` when `h` is negative.
pub fn h_minima<T: Sample>(
    relief: &Image<T>,
    h: T,
    connectivity: Connectivity,
) -> RegionResult<Image<T>> {
    if h.total_cmp(&T::ZERO) == Ordering::Less {
        return Err(RegionError::InvalidParameters(format!(
            "dynamic must be non-negative, got {h:?}"
        )));
    }
    let shape = relief.shape();
    let raised: Vec<T> = relief
        .data()
        .iter()
        .map(|&v| v.saturating_add(h))
        .collect();
    let marker = Image::from_data(shape, raised).map_err(RegionError::Core)?;
    let opts = ReconstructionOptions::new(connectivity, ReconstructionMode::ByErosion);
    reconstruct(&marker, relief, &opts)
}

/// Binary mask of the extended minima: regional minima of the h-minima
/// transform.
///
/// Increasing `dynamic` merges shallow minima into their neighbors, so it
/// can only reduce (never increase) the number of connected minima, and
/// with them the number of watershed basins.
pub fn extended_minima<T: Sample>(
    relief: &Image<T>,
    dynamic: T,
    connectivity: Connectivity,
) -> RegionResult<Image<u8>> {
    let flattened = h_minima(relief, dynamic, connectivity)?;
    regional_minima(&flattened, connectivity)
}

#[cfg(test)]
mod tests {
    use super::*;
    use morpho_core::Shape;

    fn row(values: &[u8]) -> Image<u8> {
        Image::from_data(Shape::new_2d(values.len() as u32, 1).unwrap(), values.to_vec())
            .unwrap()
    }

    #[test]
    fn test_regional_minima_simple() {
        let relief = row(&[5, 2, 5, 1, 5]);
        let minima = regional_minima(&relief, Connectivity::Four).unwrap();
        assert_eq!(minima.data(), &[0, 1, 0, 1, 0]);
    }

    #[test]
    fn test_regional_minima_plateau() {
        let relief = row(&[5, 3, 3, 3, 5, 4, 9]);
        let minima = regional_minima(&relief, Connectivity::Four).unwrap();
        // The 3-plateau is a minimum; the 4 next to 9 and 5 also is
        assert_eq!(minima.data(), &[0, 1, 1, 1, 0, 1, 0]);
    }

    #[test]
    fn test_regional_minima_plateau_with_lower_exit() {
        let relief = row(&[5, 3, 3, 2, 5]);
        let minima = regional_minima(&relief, Connectivity::Four).unwrap();
        // The 3-plateau drains into the 2 and is not a minimum
        assert_eq!(minima.data(), &[0, 0, 0, 1, 0]);
    }

    #[test]
    fn test_flat_relief_is_one_minimum() {
        let relief: Image<u8> = Image::new_with_value(Shape::new_2d(4, 3).unwrap(), 7);
        let minima = regional_minima(&relief, Connectivity::Eight).unwrap();
        assert!(minima.data().iter().all(|&v| v == 1));
    }

    #[test]
    fn test_h_minima_fills_shallow_basin() {
        // Basin at value 4 with depth 1 relative to its saddle (5), and a
        // deep basin at 0.
        let relief = row(&[9, 4, 5, 0, 9]);
        let flattened = h_minima(&relief, 2, Connectivity::Four).unwrap();
        // Shallow basin raised to its saddle; deep basin raised by at
        // most h but still below the saddle
        assert_eq!(flattened.data(), &[9, 5, 5, 2, 9]);
    }

    #[test]
    fn test_h_minima_rejects_negative_dynamic() {
        let relief = Image::from_data(
            Shape::new_2d(3, 1).unwrap(),
            vec![1.0f32, 0.0, 1.0],
        )
        .unwrap();
        assert!(h_minima(&relief, -1.0, Connectivity::Four).is_err());
    }

    #[test]
    fn test_extended_minima_merges_shallow() {
        // Basin at 4 has dynamic 2 (saddle 6); basin at 0 is deep
        let relief = row(&[9, 4, 6, 0, 9]);
        let low = extended_minima(&relief, 1, Connectivity::Four).unwrap();
        assert_eq!(low.data().iter().filter(|&&v| v == 1).count(), 2);

        // dynamic 2 swallows the shallow basin; only the deep one remains
        let high = extended_minima(&relief, 2, Connectivity::Four).unwrap();
        assert_eq!(high.data(), &[0, 0, 0, 1, 0]);
    }

    #[test]
    fn test_extended_minima_monotone_in_dynamic() {
        let relief = row(&[7, 2, 6, 3, 8, 1, 7, 4, 7]);
        let mut previous = usize::MAX;
        for h in [0u8, 1, 2, 3, 4, 5] {
            let minima = extended_minima(&relief, h, Connectivity::Four).unwrap();
            // count connected runs of 1s in the row
            let mut runs = 0;
            let mut inside = false;
            for &v in minima.data() {
                if v == 1 && !inside {
                    runs += 1;
                }
                inside = v == 1;
            }
            assert!(runs <= previous, "h={h}: {runs} > {previous}");
            previous = runs;
        }
    }
}

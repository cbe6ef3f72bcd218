//! morpho-dist - Chamfer masks and distance transforms
//!
//! This crate provides the distance-transform half of the morpho library:
//!
//! - **Chamfer masks** - named offset/weight tables approximating Euclidean
//!   distance in 2D and 3D ([`ChamferMask`], [`ChamferWeights2D`],
//!   [`ChamferWeights3D`])
//! - **Binary distance maps** - distance to the nearest background sample
//!   ([`distance_map`], [`distance_map_float`])
//! - **Label-aware distance maps** - per-label distance to the region
//!   boundary ([`label_distance_map`], [`label_distance_map_float`])
//!
//! # Examples
//!
//! ```
//! use morpho_core::{Image, Shape};
//! use morpho_dist::{ChamferWeights2D, distance_map};
//!
//! // A single foreground square
//! let mut img: Image<u8> = Image::new_2d(7, 7).unwrap();
//! for y in 2..5 {
//!     for x in 2..5 {
//!         img.set_2d(x, y, 1).unwrap();
//!     }
//! }
//!
//! let mask = ChamferWeights2D::Borgefors.mask();
//! let dist = distance_map(&img, &mask, true).unwrap();
//! assert_eq!(dist.get_2d(2, 2).unwrap(), 1); // boundary ring
//! assert_eq!(dist.get_2d(3, 3).unwrap(), 2); // center
//! assert_eq!(dist.get_2d(0, 0).unwrap(), 0); // background
//! ```

pub mod chamfer;
pub mod error;
pub mod label;
pub mod transform;

// Re-export core types
pub use morpho_core;

pub use chamfer::{ChamferMask, ChamferWeights2D, ChamferWeights3D, MaskOffset};
pub use error::{DistanceError, DistanceResult};
pub use label::{
    label_distance_map, label_distance_map_float, label_distance_map_float_with,
    label_distance_map_with,
};
pub use transform::{
    DistanceOptions, distance_map, distance_map_float, distance_map_float_with,
    distance_map_with,
};

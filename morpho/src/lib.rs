//! Morpho - distance fields and marker-driven segmentation for Rust
//!
//! Morpho analyzes binary and labeled 2D/3D images: it computes chamfer
//! distance fields, reconstructs images under geodesic constraints, and
//! floods grayscale reliefs into labeled catchment basins.
//!
//! # Overview
//!
//! - Chamfer distance transforms with the classic weight sets
//!   (city-block, chessboard, Borgefors, quasi-Euclidean, chess-knight,
//!   Svensson), binary and label-aware, integer and float
//! - Geodesic reconstruction by dilation and erosion, border killing,
//!   hole filling
//! - Regional/extended minima and deterministic priority-flood watershed
//! - Connected component labeling, size opening, bounded label dilation
//!
//! # Example
//!
//! ```
//! use morpho::{Connectivity, Image, Shape};
//! use morpho::region::watershed;
//!
//! let shape = Shape::new_2d(5, 1).unwrap();
//! let relief = Image::from_data(shape, vec![9u8, 0, 5, 1, 9]).unwrap();
//! let basins = watershed(&relief, 1, Connectivity::Four).unwrap();
//! assert_eq!(basins.data(), &[1, 1, -1, 2, 2]);
//! ```

// Re-export core types (primary data structures used everywhere)
pub use morpho_core::*;

// Re-export domain crates as modules to avoid name conflicts
pub use morpho_dist as dist;
pub use morpho_region as region;

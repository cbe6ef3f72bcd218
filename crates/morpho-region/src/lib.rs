//! morpho-region - Region processing for the morpho image analysis library
//!
//! This crate provides the segmentation half of the library:
//!
//! - **Geodesic reconstruction** - marker growth under a mask by dilation
//!   or erosion, plus border killing and hole filling
//! - **Minima handling** - regional minima, the h-minima transform, and
//!   extended minima for over-segmentation control
//! - **Watershed segmentation** - deterministic priority-flood of a
//!   grayscale relief from seeded minima
//! - **Connected components** - union-find labeling and size filtering
//! - **Label operations** - distance-bounded label dilation and border
//!   label removal
//!
//! # Examples
//!
//! ## Watershed with minima imposition
//!
//! ```
//! use morpho_core::{Connectivity, Image, Shape};
//! use morpho_region::watershed;
//!
//! let shape = Shape::new_2d(5, 1).unwrap();
//! let relief = Image::from_data(shape, vec![9u8, 0, 5, 1, 9]).unwrap();
//!
//! // Both valleys survive a small dynamic: two basins and a ridge line
//! let fine = watershed(&relief, 1, Connectivity::Four).unwrap();
//! assert_eq!(fine.data(), &[1, 1, -1, 2, 2]);
//!
//! // A larger dynamic merges the shallow valley into the deep one
//! let coarse = watershed(&relief, 5, Connectivity::Four).unwrap();
//! assert_eq!(coarse.data(), &[1, 1, 1, 1, 1]);
//! ```
//!
//! ## Size opening
//!
//! ```
//! use morpho_core::{Connectivity, Image};
//! use morpho_region::size_opening;
//!
//! let mut img: Image<u8> = Image::new_2d(8, 8).unwrap();
//! img.set_2d(0, 0, 1).unwrap(); // lone sample
//! for x in 3..7 {
//!     img.set_2d(x, 4, 1).unwrap(); // 4-sample bar
//! }
//! let opened = size_opening(&img, 3, Connectivity::Four).unwrap();
//! assert_eq!(opened.get_2d(0, 0).unwrap(), 0);
//! assert_eq!(opened.get_2d(4, 4).unwrap(), 1);
//! ```

pub mod conncomp;
pub mod error;
pub mod labelops;
pub mod minima;
pub mod reconstruction;
pub mod watershed;

// Re-export core types
pub use morpho_core;

pub use conncomp::{
    component_sizes, count_components, label_components, label_set, remove_small_labels,
    size_opening,
};
pub use error::{RegionError, RegionResult};
pub use labelops::{binarize_label, dilate_labels, remove_border_labels};
pub use minima::{extended_minima, h_minima, regional_minima};
pub use reconstruction::{
    ReconstructionMode, ReconstructionOptions, fill_holes, kill_borders, reconstruct,
    reconstruct_with_progress,
};
pub use watershed::{
    WATERSHED_LINE, WatershedOptions, marker_watershed, marker_watershed_with_progress,
    watershed,
};

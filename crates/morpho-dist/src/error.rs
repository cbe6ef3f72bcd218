//! Error types for morpho-dist

use thiserror::Error;

/// Errors that can occur while building chamfer masks or computing
/// distance transforms
#[derive(Debug, Error)]
pub enum DistanceError {
    /// Core library error
    #[error("core error: {0}")]
    Core(#[from] morpho_core::Error),

    /// No chamfer mask configuration goes by this name
    #[error("unknown chamfer mask: {0:?}")]
    UnknownMask(String),

    /// The configuration exists but not for the requested dimensionality
    #[error("chamfer mask {name:?} is {mask_ndims}D-only, requested for a {requested_ndims}D context")]
    DimensionalityMismatch {
        name: &'static str,
        mask_ndims: u32,
        requested_ndims: u32,
    },
}

/// Result type for distance operations
pub type DistanceResult<T> = Result<T, DistanceError>;

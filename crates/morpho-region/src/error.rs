//! Error types for morpho-region

use thiserror::Error;

/// Errors that can occur during region processing operations
#[derive(Debug, Error)]
pub enum RegionError {
    /// Core library error
    #[error("core error: {0}")]
    Core(#[from] morpho_core::Error),

    /// Distance transform error
    #[error("distance error: {0}")]
    Distance(#[from] morpho_dist::DistanceError),

    /// Marker/mask ordering violated (only detected when validation is
    /// enabled)
    #[error("constraint violation: {0}")]
    ConstraintViolation(String),

    /// Invalid parameters
    #[error("invalid parameters: {0}")]
    InvalidParameters(String),
}

/// Result type for region operations
pub type RegionResult<T> = Result<T, RegionError>;

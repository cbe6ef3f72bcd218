//! Error types for morpho-core
//!
//! Provides a unified error type for all operations in the core crate.
//! Each variant captures enough context for diagnostics without exposing
//! internal implementation details.

use thiserror::Error;

/// Morpho core error type
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid image dimensions
    #[error("invalid image dimensions: {width}x{height}x{depth}")]
    InvalidDimension { width: u32, height: u32, depth: u32 },

    /// Data length does not match the declared shape
    #[error("data length {actual} does not match shape ({expected} samples)")]
    DataLength { expected: usize, actual: usize },

    /// Two buffers that must share a shape do not
    #[error("shape mismatch: expected {}x{}x{}, got {}x{}x{}",
        .expected.0, .expected.1, .expected.2, .actual.0, .actual.1, .actual.2)]
    ShapeMismatch {
        expected: (u32, u32, u32),
        actual: (u32, u32, u32),
    },

    /// Connectivity value is not one of 4, 8, 6, 26
    #[error("invalid connectivity: {0} (expected 4, 8, 6, or 26)")]
    InvalidConnectivity(u32),

    /// Connectivity dimensionality does not match the buffer dimensionality
    #[error("{connectivity}-connectivity requires a {required}D image, got a {actual}D image")]
    ConnectivityMismatch {
        connectivity: u32,
        required: u32,
        actual: u32,
    },

    /// Index out of bounds
    #[error("index out of bounds: {index} >= {len}")]
    IndexOutOfBounds { index: usize, len: usize },

    /// Invalid parameter value
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// The progress monitor requested cancellation
    #[error("operation cancelled")]
    Cancelled,
}

/// Result type alias for morpho operations
pub type Result<T> = std::result::Result<T, Error>;

//! Chamfer masks
//!
//! A chamfer mask is a discretized local distance metric: a finite set of
//! offset vectors with strictly positive weights, used to approximate
//! Euclidean distance by local relaxation. Small masks (3x3 in 2D) are
//! cheap but angularly coarse; longer-range masks (chess-knight moves,
//! the Svensson 3-4-5-7 set in 3D) trade a larger offset radius for lower
//! angular error.
//!
//! Masks are created once per invocation from a named configuration,
//! immutable afterwards, and shared read-only across a whole transform.
//! The offset table is split into a forward half (offsets preceding the
//! current sample in raster order) and a backward half (the negated twins
//! with identical weights), matching the two raster sweeps of the
//! transform engine.
//!
//! References: G. Borgefors, "Distance transformations in digital images",
//! CVGIP 34(3), 1986; S. Svensson and G. Borgefors, "Digital distance
//! transforms in 3D images using information from neighbourhoods up to
//! 5x5x5", CVIU 88(1), 2002.

use crate::error::{DistanceError, DistanceResult};
use morpho_core::{Error, Shape};

const SQRT_2: f32 = std::f32::consts::SQRT_2;
const SQRT_3: f32 = 1.732_050_8;

/// One offset/weight pair of a chamfer mask.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MaskOffset {
    /// X displacement
    pub dx: i32,
    /// Y displacement
    pub dy: i32,
    /// Z displacement (0 for 2D masks)
    pub dz: i32,
    /// Integer weight
    pub weight: u16,
    /// Floating-point weight
    pub weight_f: f32,
}

/// Named 2D chamfer mask configurations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChamferWeights2D {
    /// Uniform weights (1,1): Chebyshev distance
    Chessboard,
    /// Weights (1,2): Manhattan distance
    CityBlock,
    /// Weights (3,4), the classic small-integer Euclidean approximation
    Borgefors,
    /// Float weights (1, sqrt 2); integer approximation (10, 14)
    QuasiEuclidean,
    /// Weights (5,7,11) including chess-knight moves
    ChessKnight,
}

/// Named 3D chamfer mask configurations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChamferWeights3D {
    /// Uniform weights (1,1,1)
    Chessboard,
    /// Weights (1,2,3)
    CityBlock,
    /// Weights (3,4,5)
    Borgefors,
    /// Float weights (1, sqrt 2, sqrt 3); integer approximation (10, 14, 17)
    QuasiEuclidean,
    /// Weights (3,4,5,7), the fourth on (1,1,2)-type offsets
    Svensson,
}

impl ChamferWeights2D {
    /// Canonical configuration name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Chessboard => "chessboard",
            Self::CityBlock => "city-block",
            Self::Borgefors => "borgefors",
            Self::QuasiEuclidean => "quasi-euclidean",
            Self::ChessKnight => "chess-knight",
        }
    }

    /// Build the immutable offset/weight table for this configuration.
    pub fn mask(self) -> ChamferMask {
        let forward = match self {
            Self::Chessboard => forward_2d_w2(1, 1, 1.0, 1.0),
            Self::CityBlock => forward_2d_w2(1, 2, 1.0, 2.0),
            Self::Borgefors => forward_2d_w2(3, 4, 3.0, 4.0),
            Self::QuasiEuclidean => forward_2d_w2(10, 14, 1.0, SQRT_2),
            Self::ChessKnight => forward_2d_w3(5, 7, 11, 5.0, 7.0, 11.0),
        };
        ChamferMask::from_forward(self.name(), 2, forward)
    }
}

impl ChamferWeights3D {
    /// Canonical configuration name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Chessboard => "chessboard",
            Self::CityBlock => "city-block",
            Self::Borgefors => "borgefors",
            Self::QuasiEuclidean => "quasi-euclidean",
            Self::Svensson => "svensson",
        }
    }

    /// Build the immutable offset/weight table for this configuration.
    pub fn mask(self) -> ChamferMask {
        let forward = match self {
            Self::Chessboard => forward_3d_w3(1, 1, 1, 1.0, 1.0, 1.0),
            Self::CityBlock => forward_3d_w3(1, 2, 3, 1.0, 2.0, 3.0),
            Self::Borgefors => forward_3d_w3(3, 4, 5, 3.0, 4.0, 5.0),
            Self::QuasiEuclidean => forward_3d_w3(10, 14, 17, 1.0, SQRT_2, SQRT_3),
            Self::Svensson => forward_3d_w4(3, 4, 5, 7),
        };
        ChamferMask::from_forward(self.name(), 3, forward)
    }
}

/// Immutable chamfer mask: offsets with integer and float weights.
///
/// Invariants upheld by construction: weights are strictly positive and
/// non-decreasing with Euclidean offset length, and every forward offset
/// has a backward twin with the same weight (symmetry under negation).
///
/// # Examples
///
/// ```
/// use morpho_dist::{ChamferMask, ChamferWeights2D};
///
/// let mask = ChamferWeights2D::Borgefors.mask();
/// assert_eq!(mask.unit_weight(), 3);
/// assert_eq!(mask.offsets().len(), 8);
///
/// // Same table via the string name
/// let named = ChamferMask::from_name("borgefors", 2).unwrap();
/// assert_eq!(named.offsets(), mask.offsets());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ChamferMask {
    name: &'static str,
    ndims: u32,
    /// Forward half first, backward half second.
    offsets: Vec<MaskOffset>,
    forward_len: usize,
    unit: u16,
    unit_f: f32,
}

impl ChamferMask {
    /// Look up a configuration by name for a 2D or 3D context.
    ///
    /// Deterministic: every call with the same name and dimensionality
    /// yields an identical table.
    ///
    /// # Errors
    ///
    /// [`DistanceError::UnknownMask`] for an unrecognized name;
    /// [`DistanceError::DimensionalityMismatch`] when the configuration
    /// exists only for the other dimensionality (chess-knight is 2D-only,
    /// svensson is 3D-only).
    pub fn from_name(name: &str, ndims: u32) -> DistanceResult<ChamferMask> {
        let lower = name.to_ascii_lowercase();
        match (lower.as_str(), ndims) {
            ("chessboard", 2) => Ok(ChamferWeights2D::Chessboard.mask()),
            ("city-block", 2) => Ok(ChamferWeights2D::CityBlock.mask()),
            ("borgefors", 2) => Ok(ChamferWeights2D::Borgefors.mask()),
            ("quasi-euclidean", 2) => Ok(ChamferWeights2D::QuasiEuclidean.mask()),
            ("chess-knight", 2) => Ok(ChamferWeights2D::ChessKnight.mask()),
            ("chessboard", 3) => Ok(ChamferWeights3D::Chessboard.mask()),
            ("city-block", 3) => Ok(ChamferWeights3D::CityBlock.mask()),
            ("borgefors", 3) => Ok(ChamferWeights3D::Borgefors.mask()),
            ("quasi-euclidean", 3) => Ok(ChamferWeights3D::QuasiEuclidean.mask()),
            ("svensson", 3) => Ok(ChamferWeights3D::Svensson.mask()),
            ("chess-knight", 3) => Err(DistanceError::DimensionalityMismatch {
                name: "chess-knight",
                mask_ndims: 2,
                requested_ndims: 3,
            }),
            ("svensson", 2) => Err(DistanceError::DimensionalityMismatch {
                name: "svensson",
                mask_ndims: 3,
                requested_ndims: 2,
            }),
            (_, 2) | (_, 3) => Err(DistanceError::UnknownMask(name.to_string())),
            _ => Err(DistanceError::Core(Error::InvalidParameter(format!(
                "ndims must be 2 or 3, got {ndims}"
            )))),
        }
    }

    fn from_forward(name: &'static str, ndims: u32, forward: Vec<MaskOffset>) -> ChamferMask {
        let forward_len = forward.len();
        let mut offsets = forward;
        for i in 0..forward_len {
            let o = offsets[i];
            offsets.push(MaskOffset {
                dx: -o.dx,
                dy: -o.dy,
                dz: -o.dz,
                weight: o.weight,
                weight_f: o.weight_f,
            });
        }
        // The unit step is the axis-aligned weight, by construction the
        // smallest in the table.
        let unit = offsets
            .iter()
            .map(|o| o.weight)
            .min()
            .expect("mask tables are never empty");
        let unit_f = offsets
            .iter()
            .map(|o| o.weight_f)
            .fold(f32::MAX, f32::min);
        ChamferMask {
            name,
            ndims,
            offsets,
            forward_len,
            unit,
            unit_f,
        }
    }

    /// Canonical configuration name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Number of spatial dimensions (2 or 3).
    pub fn ndims(&self) -> u32 {
        self.ndims
    }

    /// The full offset/weight table.
    pub fn offsets(&self) -> &[MaskOffset] {
        &self.offsets
    }

    /// Offsets preceding the current sample in raster order.
    pub fn forward_offsets(&self) -> &[MaskOffset] {
        &self.offsets[..self.forward_len]
    }

    /// Offsets following the current sample in raster order.
    pub fn backward_offsets(&self) -> &[MaskOffset] {
        &self.offsets[self.forward_len..]
    }

    /// Integer weight of the axis-aligned unit step.
    ///
    /// Integer distance maps computed without normalization are expressed
    /// in multiples of this unit; divide by it before display.
    pub fn unit_weight(&self) -> u16 {
        self.unit
    }

    /// Float weight of the axis-aligned unit step.
    pub fn unit_weight_f(&self) -> f32 {
        self.unit_f
    }

    /// Check that this mask matches the buffer dimensionality.
    ///
    /// # Errors
    ///
    /// [`DistanceError::DimensionalityMismatch`] when a 2D mask is applied
    /// to a 3D buffer or vice versa.
    pub fn check_shape(&self, shape: &Shape) -> DistanceResult<()> {
        if self.ndims != shape.ndims() {
            return Err(DistanceError::DimensionalityMismatch {
                name: self.name,
                mask_ndims: self.ndims,
                requested_ndims: shape.ndims(),
            });
        }
        Ok(())
    }
}

fn off(dx: i32, dy: i32, dz: i32, weight: u16, weight_f: f32) -> MaskOffset {
    MaskOffset {
        dx,
        dy,
        dz,
        weight,
        weight_f,
    }
}

/// 3x3 forward neighborhood: orthogonal weight `a`, diagonal weight `b`.
fn forward_2d_w2(a: u16, b: u16, af: f32, bf: f32) -> Vec<MaskOffset> {
    vec![
        off(-1, -1, 0, b, bf),
        off(0, -1, 0, a, af),
        off(1, -1, 0, b, bf),
        off(-1, 0, 0, a, af),
    ]
}

/// 5x5 forward neighborhood adding chess-knight moves with weight `c`.
fn forward_2d_w3(a: u16, b: u16, c: u16, af: f32, bf: f32, cf: f32) -> Vec<MaskOffset> {
    vec![
        off(-1, -2, 0, c, cf),
        off(1, -2, 0, c, cf),
        off(-2, -1, 0, c, cf),
        off(-1, -1, 0, b, bf),
        off(0, -1, 0, a, af),
        off(1, -1, 0, b, bf),
        off(2, -1, 0, c, cf),
        off(-1, 0, 0, a, af),
    ]
}

/// 3x3x3 forward neighborhood: face `a`, edge `b`, vertex `c`.
fn forward_3d_w3(a: u16, b: u16, c: u16, af: f32, bf: f32, cf: f32) -> Vec<MaskOffset> {
    vec![
        // z = -1 slice
        off(-1, -1, -1, c, cf),
        off(0, -1, -1, b, bf),
        off(1, -1, -1, c, cf),
        off(-1, 0, -1, b, bf),
        off(0, 0, -1, a, af),
        off(1, 0, -1, b, bf),
        off(-1, 1, -1, c, cf),
        off(0, 1, -1, b, bf),
        off(1, 1, -1, c, cf),
        // z = 0 slice
        off(-1, -1, 0, b, bf),
        off(0, -1, 0, a, af),
        off(1, -1, 0, b, bf),
        off(-1, 0, 0, a, af),
    ]
}

/// 5x5x5 forward neighborhood adding the (1,1,2)-type offsets with
/// weight `e` (Svensson-Borgefors).
fn forward_3d_w4(a: u16, b: u16, c: u16, e: u16) -> Vec<MaskOffset> {
    let ef = e as f32;
    let mut forward = vec![
        // z = -2 slice
        off(-1, -1, -2, e, ef),
        off(1, -1, -2, e, ef),
        off(-1, 1, -2, e, ef),
        off(1, 1, -2, e, ef),
        // z = -1 slice, (1,1,2) permutations first
        off(-1, -2, -1, e, ef),
        off(1, -2, -1, e, ef),
        off(-2, -1, -1, e, ef),
        off(2, -1, -1, e, ef),
        off(-2, 1, -1, e, ef),
        off(2, 1, -1, e, ef),
        off(-1, 2, -1, e, ef),
        off(1, 2, -1, e, ef),
    ];
    forward.extend(forward_3d_w3(a, b, c, a as f32, b as f32, c as f32));
    forward
}

//! Neighbor connectivity
//!
//! The neighbor relation used for propagation: 4 or 8 neighbors in 2D,
//! 6 or 26 in 3D. Each connectivity is a closed configuration with a static
//! offset table split into a "forward" half (offsets preceding the current
//! sample in raster order) and a "backward" half (the negated twins), the
//! split the raster-scan engines rely on.

use crate::error::{Error, Result};
use crate::image::Shape;

/// A neighbor offset (dx, dy, dz). 2D offsets have `dz == 0`.
pub type Offset = (i32, i32, i32);

// Offset tables are laid out forward-half first, backward-half second,
// with the backward half the negation of the forward half in reverse order.

const OFFSETS_4: [Offset; 4] = [
    (0, -1, 0),
    (-1, 0, 0),
    (1, 0, 0),
    (0, 1, 0),
];

const OFFSETS_8: [Offset; 8] = [
    (-1, -1, 0),
    (0, -1, 0),
    (1, -1, 0),
    (-1, 0, 0),
    (1, 0, 0),
    (-1, 1, 0),
    (0, 1, 0),
    (1, 1, 0),
];

const OFFSETS_6: [Offset; 6] = [
    (0, 0, -1),
    (0, -1, 0),
    (-1, 0, 0),
    (1, 0, 0),
    (0, 1, 0),
    (0, 0, 1),
];

const OFFSETS_26: [Offset; 26] = [
    // z = -1 slice
    (-1, -1, -1),
    (0, -1, -1),
    (1, -1, -1),
    (-1, 0, -1),
    (0, 0, -1),
    (1, 0, -1),
    (-1, 1, -1),
    (0, 1, -1),
    (1, 1, -1),
    // z = 0, preceding rows/samples
    (-1, -1, 0),
    (0, -1, 0),
    (1, -1, 0),
    (-1, 0, 0),
    // backward half
    (1, 0, 0),
    (-1, 1, 0),
    (0, 1, 0),
    (1, 1, 0),
    (-1, -1, 1),
    (0, -1, 1),
    (1, -1, 1),
    (-1, 0, 1),
    (0, 0, 1),
    (1, 0, 1),
    (-1, 1, 1),
    (0, 1, 1),
    (1, 1, 1),
];

/// Neighbor connectivity for propagation.
///
/// A closed set of configurations selected by value; there is no runtime
/// polymorphism beyond the table lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Connectivity {
    /// 4 orthogonal neighbors (2D)
    Four,
    /// 8 neighbors including diagonals (2D)
    Eight,
    /// 6 face neighbors (3D)
    Six,
    /// 26 face, edge, and vertex neighbors (3D)
    TwentySix,
}

impl Connectivity {
    /// Select a connectivity by its conventional numeric name.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConnectivity`] for any value other than
    /// 4, 8, 6, or 26.
    pub fn from_value(value: u32) -> Result<Self> {
        match value {
            4 => Ok(Connectivity::Four),
            8 => Ok(Connectivity::Eight),
            6 => Ok(Connectivity::Six),
            26 => Ok(Connectivity::TwentySix),
            _ => Err(Error::InvalidConnectivity(value)),
        }
    }

    /// The conventional numeric name (4, 8, 6, or 26).
    pub fn value(self) -> u32 {
        match self {
            Connectivity::Four => 4,
            Connectivity::Eight => 8,
            Connectivity::Six => 6,
            Connectivity::TwentySix => 26,
        }
    }

    /// Number of spatial dimensions this connectivity applies to.
    pub fn ndims(self) -> u32 {
        match self {
            Connectivity::Four | Connectivity::Eight => 2,
            Connectivity::Six | Connectivity::TwentySix => 3,
        }
    }

    /// The full neighbor offset table.
    pub fn offsets(self) -> &'static [Offset] {
        match self {
            Connectivity::Four => &OFFSETS_4,
            Connectivity::Eight => &OFFSETS_8,
            Connectivity::Six => &OFFSETS_6,
            Connectivity::TwentySix => &OFFSETS_26,
        }
    }

    /// Offsets preceding the current sample in raster order.
    pub fn forward_offsets(self) -> &'static [Offset] {
        let all = self.offsets();
        &all[..all.len() / 2]
    }

    /// Offsets following the current sample in raster order.
    pub fn backward_offsets(self) -> &'static [Offset] {
        let all = self.offsets();
        &all[all.len() / 2..]
    }

    /// Check that this connectivity matches the buffer dimensionality.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConnectivityMismatch`] when a 2D connectivity is
    /// used on a 3D buffer or vice versa, a fatal precondition checked at
    /// every engine entry point.
    pub fn check_shape(self, shape: &Shape) -> Result<()> {
        if self.ndims() != shape.ndims() {
            return Err(Error::ConnectivityMismatch {
                connectivity: self.value(),
                required: self.ndims(),
                actual: shape.ndims(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_value() {
        assert_eq!(Connectivity::from_value(4).unwrap(), Connectivity::Four);
        assert_eq!(
            Connectivity::from_value(26).unwrap(),
            Connectivity::TwentySix
        );
        assert!(Connectivity::from_value(5).is_err());
    }

    #[test]
    fn test_offset_counts() {
        for c in [
            Connectivity::Four,
            Connectivity::Eight,
            Connectivity::Six,
            Connectivity::TwentySix,
        ] {
            assert_eq!(c.offsets().len(), c.value() as usize);
            assert_eq!(c.forward_offsets().len(), c.offsets().len() / 2);
        }
    }

    #[test]
    fn test_backward_is_negated_forward() {
        for c in [
            Connectivity::Four,
            Connectivity::Eight,
            Connectivity::Six,
            Connectivity::TwentySix,
        ] {
            let fwd = c.forward_offsets();
            let bwd = c.backward_offsets();
            for &(dx, dy, dz) in fwd {
                assert!(
                    bwd.contains(&(-dx, -dy, -dz)),
                    "{c:?}: missing negated twin of ({dx},{dy},{dz})"
                );
            }
        }
    }

    #[test]
    fn test_forward_offsets_precede_in_raster_order() {
        for c in [
            Connectivity::Four,
            Connectivity::Eight,
            Connectivity::Six,
            Connectivity::TwentySix,
        ] {
            for &(dx, dy, dz) in c.forward_offsets() {
                // Lexicographic (z, y, x) order must place the offset
                // strictly before the origin
                assert!(
                    (dz, dy, dx) < (0, 0, 0),
                    "{c:?}: ({dx},{dy},{dz}) does not precede the origin"
                );
            }
        }
    }

    #[test]
    fn test_check_shape() {
        let s2 = Shape::new_2d(4, 4).unwrap();
        let s3 = Shape::new_3d(4, 4, 4).unwrap();
        assert!(Connectivity::Four.check_shape(&s2).is_ok());
        assert!(Connectivity::Four.check_shape(&s3).is_err());
        assert!(Connectivity::TwentySix.check_shape(&s3).is_ok());
        assert!(Connectivity::TwentySix.check_shape(&s2).is_err());
    }
}

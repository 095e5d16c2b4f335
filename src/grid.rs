//! Physical <-> voxel coordinate transforms over an axis-aligned grid
//!
//! A [`Grid`] describes a dense voxel lattice by its size, per-axis spacing
//! and the physical position of the center of voxel `(0, 0, 0)`. The
//! transforms are exact inverses up to rounding:
//!
//! ```text
//! index[i] = round((point[i] - origin[i]) / spacing[i])
//! point[i] = origin[i] + index[i] * spacing[i]
//! ```

use crate::errors::QaError;
use crate::float_types::Real;
use nalgebra::{Point3, Vector3};

/// An immutable axis-aligned voxel grid descriptor.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Grid {
    size: [usize; 3],
    spacing: Vector3<Real>,
    origin: Point3<Real>,
}

impl Grid {
    /// Build a grid descriptor, rejecting empty sizes and non-positive spacing.
    pub fn new(
        size: [usize; 3],
        spacing: Vector3<Real>,
        origin: Point3<Real>,
    ) -> Result<Self, QaError> {
        if size.iter().any(|&n| n == 0) {
            return Err(QaError::InvalidArgument(format!(
                "grid size must be positive on every axis, got {:?}",
                size
            )));
        }
        for axis in 0..3 {
            if !(spacing[axis] > 0.0) {
                return Err(QaError::InvalidArgument(format!(
                    "grid spacing must be strictly positive, got {} on axis {}",
                    spacing[axis], axis
                )));
            }
        }
        Ok(Self { size, spacing, origin })
    }

    /// Grid dimensions in voxels.
    #[inline]
    pub const fn size(&self) -> [usize; 3] {
        self.size
    }

    /// Physical units per voxel along each axis.
    #[inline]
    pub fn spacing(&self) -> Vector3<Real> {
        self.spacing
    }

    /// Physical position of the center of voxel `(0, 0, 0)`.
    #[inline]
    pub fn origin(&self) -> Point3<Real> {
        self.origin
    }

    /// Total number of voxels.
    #[inline]
    pub fn len(&self) -> usize {
        self.size[0] * self.size[1] * self.size[2]
    }

    /// A valid grid always holds at least one voxel.
    #[inline]
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Nearest-voxel index for a physical point. Out-of-range points yield
    /// out-of-range indices; bounds checking is the caller's responsibility
    /// via [`Grid::in_bounds`].
    #[inline]
    pub fn to_index(&self, point: &Point3<Real>) -> Point3<i64> {
        Point3::new(
            ((point.x - self.origin.x) / self.spacing.x).round() as i64,
            ((point.y - self.origin.y) / self.spacing.y).round() as i64,
            ((point.z - self.origin.z) / self.spacing.z).round() as i64,
        )
    }

    /// Physical position of a voxel center.
    #[inline]
    pub fn to_point(&self, index: &Point3<i64>) -> Point3<Real> {
        Point3::new(
            self.origin.x + index.x as Real * self.spacing.x,
            self.origin.y + index.y as Real * self.spacing.y,
            self.origin.z + index.z as Real * self.spacing.z,
        )
    }

    /// True iff an index lies inside the grid on every axis.
    #[inline]
    pub fn contains_index(&self, index: &Point3<i64>) -> bool {
        (0..3).all(|axis| index[axis] >= 0 && (index[axis] as usize) < self.size[axis])
    }

    /// True iff the nearest voxel index of a physical point lies inside the grid.
    #[inline]
    pub fn in_bounds(&self, point: &Point3<Real>) -> bool {
        self.contains_index(&self.to_index(point))
    }

    /// Row-major (x-fastest) flat offset of an in-bounds voxel.
    #[inline]
    pub fn linearize(&self, x: usize, y: usize, z: usize) -> usize {
        x + self.size[0] * (y + self.size[1] * z)
    }

    /// Clamp an index range `[lo, hi]` (inclusive) to the grid along one axis.
    #[inline]
    pub(crate) fn clamp_axis(&self, axis: usize, lo: i64, hi: i64) -> (usize, usize) {
        let max = (self.size[axis] - 1) as i64;
        (lo.clamp(0, max) as usize, hi.clamp(0, max) as usize)
    }
}

//! Geometric ROI placement inside phantom structures
//!
//! All placements are derived from a z-aligned [`Cylinder`]: the sphere
//! packer tiles its interior with non-overlapping spherical ROIs, the
//! cylinder builder rasterizes it directly, and the hottest-cylinder
//! locator searches a bounded neighborhood of its axis for the disk of
//! maximal integrated signal.

pub mod cylinder;
pub mod hottest;
pub mod spheres;

pub use cylinder::build_cylinder_mask;
pub use hottest::{find_hottest_cylinder, HotSearch};
pub use spheres::{pack_spheres, sphere_centers};

use crate::errors::QaError;
use crate::float_types::Real;
use crate::grid::Grid;
use nalgebra::Point3;

/// A right circular cylinder aligned with the z axis, in physical units.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Cylinder {
    pub center_x: Real,
    pub center_y: Real,
    pub start_z: Real,
    pub end_z: Real,
    pub radius: Real,
}

impl Cylinder {
    /// Build a cylinder, rejecting degenerate extents.
    pub fn new(
        center_x: Real,
        center_y: Real,
        start_z: Real,
        end_z: Real,
        radius: Real,
    ) -> Result<Self, QaError> {
        if !(end_z > start_z) {
            return Err(QaError::InvalidArgument(format!(
                "cylinder needs start_z < end_z, got {} >= {}",
                start_z, end_z
            )));
        }
        if !(radius > 0.0) {
            return Err(QaError::InvalidArgument(format!(
                "cylinder radius must be positive, got {}",
                radius
            )));
        }
        Ok(Self { center_x, center_y, start_z, end_z, radius })
    }

    /// Cylinder height along z.
    #[inline]
    pub fn length(&self) -> Real {
        self.end_z - self.start_z
    }

    /// Check that the cylinder's bounding box lies inside `grid`.
    ///
    /// The two diagonal corners at the z extremes are a sufficient proxy for
    /// the whole box on an axis-aligned grid.
    pub fn check_fits(&self, grid: &Grid) -> Result<(), QaError> {
        let corners = [
            Point3::new(
                self.center_x - self.radius,
                self.center_y - self.radius,
                self.start_z,
            ),
            Point3::new(
                self.center_x + self.radius,
                self.center_y + self.radius,
                self.end_z,
            ),
        ];
        for corner in corners {
            if !grid.in_bounds(&corner) {
                return Err(QaError::OutOfGrid { point: corner });
            }
        }
        Ok(())
    }
}

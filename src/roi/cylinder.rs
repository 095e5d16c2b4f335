//! Fixed-position cylinder rasterization

use super::Cylinder;
use crate::errors::QaError;
use crate::grid::Grid;
use crate::mask::LabelMask;
use nalgebra::Point3;

/// Rasterize `cylinder` into a binary mask (label 1) over `grid`.
///
/// Slices covering `[start_z, end_z]` are filled with the in-plane disk
/// `d ≤ radius` (closed, inclusive boundary). The same bounding-box
/// precondition as the sphere packer applies, checked before any write.
pub fn build_cylinder_mask(grid: &Grid, cylinder: &Cylinder) -> Result<LabelMask, QaError> {
    cylinder.check_fits(grid)?;

    let mut mask = LabelMask::new(*grid);
    let lo = grid.to_index(&Point3::new(
        cylinder.center_x - cylinder.radius,
        cylinder.center_y - cylinder.radius,
        cylinder.start_z,
    ));
    let hi = grid.to_index(&Point3::new(
        cylinder.center_x + cylinder.radius,
        cylinder.center_y + cylinder.radius,
        cylinder.end_z,
    ));
    let (x0, x1) = grid.clamp_axis(0, lo.x, hi.x);
    let (y0, y1) = grid.clamp_axis(1, lo.y, hi.y);
    let (z0, z1) = grid.clamp_axis(2, lo.z, hi.z);
    let r2 = cylinder.radius * cylinder.radius;
    for z in z0..=z1 {
        for y in y0..=y1 {
            for x in x0..=x1 {
                let p = grid.to_point(&Point3::new(x as i64, y as i64, z as i64));
                let dx = p.x - cylinder.center_x;
                let dy = p.y - cylinder.center_y;
                if dx * dx + dy * dy <= r2 {
                    mask.set_label(x, y, z, 1);
                }
            }
        }
    }
    Ok(mask)
}

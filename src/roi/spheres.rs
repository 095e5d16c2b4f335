//! Concentric-shell sphere packing
//!
//! Tiles the interior of a cylinder with non-overlapping spherical ROIs.
//! Spheres are stacked in axial slices one diameter (plus one z-spacing)
//! apart; within a slice they are arranged on concentric rings, outermost
//! first, each ring one diameter (plus one in-plane spacing) inside the
//! previous one.
//!
//! The ring capacity comes from the chord/angle relation for tangent
//! circles: `n` circles of radius `r` fit on a ring of radius `p` without
//! overlapping iff the half-angle between neighbors satisfies
//! `sin(π/n) ≥ r/p`, so the maximum is `n = ⌊π / asin(r/p)⌋`.

use super::Cylinder;
use crate::errors::QaError;
use crate::float_types::{Real, PI, TAU};
use crate::grid::Grid;
use crate::mask::LabelMask;
use nalgebra::{Point3, Vector3};

/// Compute the packed sphere centers for `cylinder` and `roi_radius`.
///
/// Deterministic: axial slots bottom-up, rings outermost-in, and within a
/// ring the first sphere sits at 12 o'clock with the rest following
/// clockwise. The order defines the label sequence used by
/// [`pack_spheres`].
pub fn sphere_centers(
    cylinder: &Cylinder,
    roi_radius: Real,
    spacing: Vector3<Real>,
) -> Vec<Point3<Real>> {
    let mut centers = Vec::new();
    let axial_step = 2.0 * roi_radius + spacing.z;
    let ring_step = 2.0 * roi_radius + spacing.x.max(spacing.y);

    let mut center_z = cylinder.start_z + roi_radius;
    while center_z + roi_radius < cylinder.end_z {
        let mut conc_radius = cylinder.radius;
        while conc_radius >= roi_radius {
            if roi_radius > 0.5 * conc_radius {
                // Only one sphere fits this ring; put it on the axis.
                centers.push(Point3::new(cylinder.center_x, cylinder.center_y, center_z));
            } else {
                let placement_radius = conc_radius - roi_radius;
                // asin argument can graze 1 when roi_radius == placement_radius
                let ratio = (roi_radius / placement_radius).min(1.0);
                let count = (PI / ratio.asin()).floor() as usize;
                for s in 0..count {
                    let theta = TAU * s as Real / count as Real;
                    centers.push(Point3::new(
                        cylinder.center_x - placement_radius * theta.sin(),
                        cylinder.center_y - placement_radius * theta.cos(),
                        center_z,
                    ));
                }
            }
            conc_radius -= ring_step;
        }
        center_z += axial_step;
    }
    centers
}

/// Tile non-overlapping spherical ROIs into `cylinder` and rasterize them
/// over `grid`, one unique label per sphere starting at 1.
///
/// Fails fast with [`QaError::Configuration`] / [`QaError::OutOfGrid`]
/// before any voxel is written when the ROI radius does not fit the
/// cylinder or the cylinder's bounding box leaves the grid.
pub fn pack_spheres(
    grid: &Grid,
    cylinder: &Cylinder,
    roi_radius: Real,
) -> Result<LabelMask, QaError> {
    if !(roi_radius > 0.0) {
        return Err(QaError::InvalidArgument(format!(
            "ROI radius must be positive, got {}",
            roi_radius
        )));
    }
    if roi_radius > 0.5 * cylinder.length() {
        return Err(QaError::Configuration(format!(
            "ROI radius does not fit into cylinder length: {} > {}",
            roi_radius,
            cylinder.length()
        )));
    }
    if roi_radius > cylinder.radius {
        return Err(QaError::Configuration(format!(
            "ROI radius does not fit into cylinder radius: {} > {}",
            roi_radius, cylinder.radius
        )));
    }
    cylinder.check_fits(grid)?;

    let mut mask = LabelMask::new(*grid);
    for (index, center) in sphere_centers(cylinder, roi_radius, grid.spacing()).iter().enumerate() {
        stamp_sphere(&mut mask, center, roi_radius, index as u32 + 1);
    }
    Ok(mask)
}

/// Mark every voxel whose center lies within `radius` of `center`
/// (closed ball) with `label`, scanning only the index bounding box.
/// Later stamps overwrite earlier labels where boxes intersect.
fn stamp_sphere(mask: &mut LabelMask, center: &Point3<Real>, radius: Real, label: u32) {
    let grid = *mask.grid();
    let r = Vector3::new(radius, radius, radius);
    let lo = grid.to_index(&(center - r));
    let hi = grid.to_index(&(center + r));
    let (x0, x1) = grid.clamp_axis(0, lo.x, hi.x);
    let (y0, y1) = grid.clamp_axis(1, lo.y, hi.y);
    let (z0, z1) = grid.clamp_axis(2, lo.z, hi.z);
    let r2 = radius * radius;
    for z in z0..=z1 {
        for y in y0..=y1 {
            for x in x0..=x1 {
                let p = grid.to_point(&Point3::new(x as i64, y as i64, z as i64));
                let d = p - center;
                if d.norm_squared() <= r2 {
                    mask.set_label(x, y, z, label);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cyl(cx: Real, cy: Real, z0: Real, z1: Real, r: Real) -> Cylinder {
        Cylinder::new(cx, cy, z0, z1, r).unwrap()
    }

    #[test]
    fn ring_capacity_matches_chord_relation() {
        // placement radius 5, roi radius 3: asin(3/5) = 0.6435, floor(pi/...) = 4
        let centers = sphere_centers(
            &cyl(9.0, 9.0, 1.0, 8.0, 8.0),
            3.0,
            Vector3::new(1.0, 1.0, 1.0),
        );
        assert_eq!(centers.len(), 4);
        // first sphere at 12 o'clock (negative y side of the center)
        assert_eq!(centers[0], Point3::new(9.0, 4.0, 4.0));
        assert_eq!(centers[1], Point3::new(4.0, 9.0, 4.0));
    }

    #[test]
    fn packed_spheres_never_overlap() {
        for (cylinder, roi_radius) in [
            (cyl(9.0, 9.0, 1.0, 8.0, 8.0), 3.0),
            (cyl(8.0, 8.0, 1.0, 7.0, 7.0), 1.0),
            (cyl(3.0, 3.0, 1.0, 13.0, 1.5), 0.9),
        ] {
            let centers =
                sphere_centers(&cylinder, roi_radius, Vector3::new(1.0, 1.0, 1.0));
            for i in 0..centers.len() {
                for j in i + 1..centers.len() {
                    let gap = (centers[i] - centers[j]).norm();
                    assert!(
                        gap >= 2.0 * roi_radius - 1e-9,
                        "spheres {} and {} overlap: centers {:.3} apart, radius {}",
                        i,
                        j,
                        gap,
                        roi_radius
                    );
                }
            }
        }
    }

    #[test]
    fn near_tangent_ring_falls_back_to_two_spheres() {
        // roi radius exactly half the ring radius: asin(1) = pi/2, n = 2
        let centers = sphere_centers(
            &cyl(0.0, 0.0, 0.0, 10.0, 4.0),
            2.0,
            Vector3::new(0.1, 0.1, 0.1),
        );
        // outermost ring holds exactly two, opposite each other
        assert_eq!(centers[0], Point3::new(0.0, -2.0, 2.0));
        assert!((centers[1].x - 0.0).abs() < 1e-9);
        assert!((centers[1].y - 2.0).abs() < 1e-9);
    }
}

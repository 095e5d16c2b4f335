//! Hottest-cylinder search
//!
//! Per z-slice steepest-ascent local search for the in-plane disk of
//! maximal integrated signal. Slices are independent, so the found centers
//! need not be axially aligned; the resulting "cylinder" is a best-effort
//! envelope, not a straight shape.

use super::Cylinder;
use crate::errors::QaError;
use crate::float_types::Real;
use crate::grid::Grid;
use crate::mask::LabelMask;
use crate::volume::VoxelSource;
use hashbrown::HashMap;
use nalgebra::Point3;

/// Search parameters for [`find_hottest_cylinder`].
///
/// `radius` is the fixed radius of the scored disk; `bounding_radius`
/// bounds the neighborhood around `(center_x, center_y)` the search may
/// visit. The cylinder of `bounding_radius` across `[start_z, end_z]` must
/// fit both the image grid and the output grid.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HotSearch {
    pub center_x: Real,
    pub center_y: Real,
    pub start_z: Real,
    pub end_z: Real,
    pub radius: Real,
    pub bounding_radius: Real,
}

impl HotSearch {
    fn bounding_cylinder(&self) -> Result<Cylinder, QaError> {
        Cylinder::new(
            self.center_x,
            self.center_y,
            self.start_z,
            self.end_z,
            self.bounding_radius,
        )
    }
}

/// Find, per z-slice, the disk placement of `search.radius` maximizing the
/// summed image intensity, and rasterize the per-slice winners as a binary
/// mask (label 1) over `out_grid`.
///
/// The output grid may differ from the image grid in size, spacing and
/// origin; winners are translated through physical coordinates.
pub fn find_hottest_cylinder<V: VoxelSource + Sync>(
    image: &V,
    search: &HotSearch,
    out_grid: &Grid,
) -> Result<LabelMask, QaError> {
    if !(search.radius > 0.0) {
        return Err(QaError::InvalidArgument(format!(
            "disk radius must be positive, got {}",
            search.radius
        )));
    }
    if search.radius > search.bounding_radius {
        return Err(QaError::Configuration(format!(
            "disk radius exceeds the search bound: {} > {}",
            search.radius, search.bounding_radius
        )));
    }
    let bounding = search.bounding_cylinder()?;
    bounding.check_fits(image.grid())?;
    bounding.check_fits(out_grid)?;

    let img_grid = *image.grid();
    let z0 = img_grid
        .to_index(&Point3::new(search.center_x, search.center_y, search.start_z))
        .z;
    let z1 = img_grid
        .to_index(&Point3::new(search.center_x, search.center_y, search.end_z))
        .z;
    let (z0, z1) = img_grid.clamp_axis(2, z0, z1);
    let slices: Vec<usize> = (z0..=z1).collect();

    #[cfg(feature = "parallel")]
    let winners: Vec<(usize, Point3<i64>)> = {
        use rayon::prelude::*;
        slices
            .par_iter()
            .map(|&z| (z, hottest_in_slice(image, search, z)))
            .collect()
    };
    #[cfg(not(feature = "parallel"))]
    let winners: Vec<(usize, Point3<i64>)> = slices
        .iter()
        .map(|&z| (z, hottest_in_slice(image, search, z)))
        .collect();

    let mut mask = LabelMask::new(*out_grid);
    for (z, best) in winners {
        let center = img_grid.to_point(&Point3::new(best.x, best.y, z as i64));
        stamp_disk(&mut mask, &center, search.radius);
    }
    Ok(mask)
}

/// Steepest-ascent search over one slice. Explicit LIFO stack, memoized
/// scores, four-neighbor expansion of strictly improving candidates only.
/// A degenerate neighborhood leaves the seed as the winner.
fn hottest_in_slice<V: VoxelSource>(image: &V, search: &HotSearch, z: usize) -> Point3<i64> {
    let grid = image.grid();
    let z_phys = grid.to_point(&Point3::new(0, 0, z as i64)).z;
    let seed = grid.to_index(&Point3::new(search.center_x, search.center_y, z_phys));
    let reach = search.bounding_radius - search.radius;

    let mut memo: HashMap<(i64, i64), Real> = HashMap::new();
    let mut stack: Vec<(i64, i64)> = vec![(seed.x, seed.y)];
    let mut best = (seed.x, seed.y);
    let mut best_score = Real::NEG_INFINITY;

    while let Some((x, y)) = stack.pop() {
        let candidate = Point3::new(x, y, z as i64);
        if !grid.contains_index(&candidate) {
            continue;
        }
        let p = grid.to_point(&candidate);
        let dx = p.x - search.center_x;
        let dy = p.y - search.center_y;
        if dx * dx + dy * dy > reach * reach {
            continue;
        }
        let score = *memo
            .entry((x, y))
            .or_insert_with(|| disk_sum(image, &p, search.radius, z));
        if score > best_score {
            best_score = score;
            best = (x, y);
            stack.push((x + 1, y));
            stack.push((x - 1, y));
            stack.push((x, y + 1));
            stack.push((x, y - 1));
        }
    }
    Point3::new(best.0, best.1, z as i64)
}

/// Side-effect-free disk score: sum of image intensities over the in-plane
/// closed disk of `radius` around `center` at slice `z`.
fn disk_sum<V: VoxelSource>(image: &V, center: &Point3<Real>, radius: Real, z: usize) -> Real {
    let grid = image.grid();
    let lo = grid.to_index(&Point3::new(center.x - radius, center.y - radius, center.z));
    let hi = grid.to_index(&Point3::new(center.x + radius, center.y + radius, center.z));
    let (x0, x1) = grid.clamp_axis(0, lo.x, hi.x);
    let (y0, y1) = grid.clamp_axis(1, lo.y, hi.y);
    let r2 = radius * radius;
    let mut sum = 0.0;
    for y in y0..=y1 {
        for x in x0..=x1 {
            let p = grid.to_point(&Point3::new(x as i64, y as i64, z as i64));
            let dx = p.x - center.x;
            let dy = p.y - center.y;
            if dx * dx + dy * dy <= r2 {
                sum += image.value(x, y, z);
            }
        }
    }
    sum
}

/// Rasterize the winning disk into the output mask at the slice nearest the
/// winner's physical z.
fn stamp_disk(mask: &mut LabelMask, center: &Point3<Real>, radius: Real) {
    let grid = *mask.grid();
    let slice = grid.to_index(center).z;
    let (z, _) = grid.clamp_axis(2, slice, slice);
    let lo = grid.to_index(&Point3::new(center.x - radius, center.y - radius, center.z));
    let hi = grid.to_index(&Point3::new(center.x + radius, center.y + radius, center.z));
    let (x0, x1) = grid.clamp_axis(0, lo.x, hi.x);
    let (y0, y1) = grid.clamp_axis(1, lo.y, hi.y);
    let r2 = radius * radius;
    for y in y0..=y1 {
        for x in x0..=x1 {
            let p = grid.to_point(&Point3::new(x as i64, y as i64, z as i64));
            let dx = p.x - center.x;
            let dy = p.y - center.y;
            if dx * dx + dy * dy <= r2 {
                mask.set_label(x, y, z, 1);
            }
        }
    }
}

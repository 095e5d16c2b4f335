//! Dense integer label masks over a voxel grid
//!
//! 0 is background; ROI labels are assigned sequentially starting at 1 and
//! are unique per ROI instance. A mask is mutated only while it is being
//! built and is returned to the caller as an immutable result.

use crate::float_types::Real;
use crate::grid::Grid;
use nalgebra::Point3;

/// A dense 3D array of ROI labels over a [`Grid`].
#[derive(Clone, Debug, PartialEq)]
pub struct LabelMask {
    grid: Grid,
    labels: Vec<u32>,
}

impl LabelMask {
    /// An all-background mask over `grid`.
    pub fn new(grid: Grid) -> Self {
        let labels = vec![0; grid.len()];
        Self { grid, labels }
    }

    /// The grid this mask is defined on.
    #[inline]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Label of one voxel.
    #[inline]
    pub fn label_at(&self, x: usize, y: usize, z: usize) -> u32 {
        self.labels[self.grid.linearize(x, y, z)]
    }

    #[inline]
    pub(crate) fn set_label(&mut self, x: usize, y: usize, z: usize, label: u32) {
        let offset = self.grid.linearize(x, y, z);
        self.labels[offset] = label;
    }

    /// Highest label present in the mask (0 for an all-background mask).
    pub fn max_label(&self) -> u32 {
        self.labels.iter().copied().max().unwrap_or(0)
    }

    /// Number of voxels carrying `label`.
    pub fn count_label(&self, label: u32) -> usize {
        self.labels.iter().filter(|&&v| v == label).count()
    }

    /// Flat label storage, x-fastest.
    #[inline]
    pub fn as_slice(&self) -> &[u32] {
        &self.labels
    }

    /// Iterate the labeled voxels as `(index, label)` pairs.
    pub fn labeled_voxels(&self) -> impl Iterator<Item = (Point3<i64>, u32)> + '_ {
        let [nx, ny, _] = self.grid.size();
        self.labels.iter().enumerate().filter(|&(_, &v)| v != 0).map(move |(offset, &v)| {
            let x = offset % nx;
            let y = (offset / nx) % ny;
            let z = offset / (nx * ny);
            (Point3::new(x as i64, y as i64, z as i64), v)
        })
    }

    /// Physical centroid of all voxels carrying `label`, if any.
    pub fn label_centroid(&self, label: u32) -> Option<Point3<Real>> {
        let mut sum = Point3::new(0.0, 0.0, 0.0);
        let mut count = 0usize;
        for (idx, v) in self.labeled_voxels() {
            if v == label {
                let p = self.grid.to_point(&idx);
                sum.x += p.x;
                sum.y += p.y;
                sum.z += p.z;
                count += 1;
            }
        }
        if count == 0 {
            return None;
        }
        let n = count as Real;
        Some(Point3::new(sum.x / n, sum.y / n, sum.z / n))
    }
}

//! Read-only voxel intensity access
//!
//! Image decoding and series loading live outside this crate; whatever loads
//! the data only has to expose it through [`VoxelSource`].

use crate::errors::QaError;
use crate::float_types::Real;
use crate::grid::Grid;

/// A read-only 3D intensity accessor over a [`Grid`].
pub trait VoxelSource {
    /// The grid the intensities are sampled on.
    fn grid(&self) -> &Grid;

    /// Intensity of one voxel. Indices must be in bounds.
    fn value(&self, x: usize, y: usize, z: usize) -> Real;
}

/// An in-memory intensity volume, x-fastest flat storage.
#[derive(Clone, Debug, PartialEq)]
pub struct Volume {
    grid: Grid,
    data: Vec<Real>,
}

impl Volume {
    /// Wrap existing voxel data; the length must match the grid.
    pub fn new(grid: Grid, data: Vec<Real>) -> Result<Self, QaError> {
        if data.len() != grid.len() {
            return Err(QaError::InvalidArgument(format!(
                "volume data length {} does not match grid ({} voxels)",
                data.len(),
                grid.len()
            )));
        }
        Ok(Self { grid, data })
    }

    /// An all-zero volume over `grid`.
    pub fn zeros(grid: Grid) -> Self {
        let data = vec![0.0; grid.len()];
        Self { grid, data }
    }

    /// Build a volume by evaluating `f` at every voxel index.
    pub fn from_fn<F>(grid: Grid, mut f: F) -> Self
    where
        F: FnMut(usize, usize, usize) -> Real,
    {
        let [nx, ny, nz] = grid.size();
        let mut data = Vec::with_capacity(grid.len());
        for z in 0..nz {
            for y in 0..ny {
                for x in 0..nx {
                    data.push(f(x, y, z));
                }
            }
        }
        Self { grid, data }
    }

    /// Overwrite one voxel.
    pub fn set_value(&mut self, x: usize, y: usize, z: usize, value: Real) {
        let offset = self.grid.linearize(x, y, z);
        self.data[offset] = value;
    }
}

impl VoxelSource for Volume {
    #[inline]
    fn grid(&self) -> &Grid {
        &self.grid
    }

    #[inline]
    fn value(&self, x: usize, y: usize, z: usize) -> Real {
        self.data[self.grid.linearize(x, y, z)]
    }
}

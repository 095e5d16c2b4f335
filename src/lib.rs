//! Geometric ROI placement and image-quality metrics for nuclear-medicine
//! phantom QA.
//!
//! Given a reconstructed voxel volume, this crate places geometric regions
//! of interest inside phantom structures and computes the standard quality
//! metrics derived from them:
//!
//! - [`pack_spheres`](roi::pack_spheres): tile non-overlapping spherical
//!   ROIs inside a cylinder by concentric-shell packing (background
//!   variability).
//! - [`build_cylinder_mask`](roi::build_cylinder_mask): rasterize a fixed
//!   cylinder as a binary mask.
//! - [`find_hottest_cylinder`](roi::find_hottest_cylinder): per-slice
//!   greedy search for the disk of maximal integrated signal (hot/background
//!   contrast).
//! - [`nema_fwhm`](profile::nema_fwhm) / [`gaussfit_fwhm`](fit::gaussfit_fwhm):
//!   line-spread-function FWHM by the NEMA quadratic method and by a
//!   nonlinear Gaussian fit.
//! - [`jackknife`](stats::jackknife): leave-one-out standard error for an
//!   arbitrary scalar statistic.
//!
//! Image loading, per-label statistics and result output are external
//! collaborators; the core performs no I/O and never logs.
//!
//! # Features
//! - **f64** (default): use f64 as Real
//! - **f32**: use f32 as Real, conflicts with f64
//! - **parallel**: use rayon to score hottest-cylinder slices in parallel

#![forbid(unsafe_code)]
#![warn(clippy::missing_const_for_fn, clippy::approx_constant, clippy::all)]

pub mod errors;
pub mod fit;
pub mod float_types;
pub mod grid;
pub mod mask;
pub mod profile;
pub mod roi;
pub mod stats;
pub mod volume;

#[cfg(any(all(feature = "f64", feature = "f32"), not(any(feature = "f64", feature = "f32"))))]
compile_error!("Either 'f64' or 'f32' feature must be specified, but not both");

pub use errors::QaError;
pub use fit::{gaussfit_fwhm, GaussFit, GaussGuess};
pub use float_types::Real;
pub use grid::Grid;
pub use mask::LabelMask;
pub use profile::{extract_line_profile, nema_fwhm, Axis, LineProfile, NemaFwhm};
pub use roi::{build_cylinder_mask, find_hottest_cylinder, pack_spheres, Cylinder, HotSearch};
pub use stats::{jackknife, JackknifeEstimate};
pub use volume::{Volume, VoxelSource};

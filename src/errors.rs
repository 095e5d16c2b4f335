//! Failure modes of the geometric and numeric routines

use crate::float_types::Real;
use nalgebra::Point3;

/// All the errors the QA core can surface.
///
/// Every error is raised synchronously to the immediate caller before any
/// partial result becomes observable; nothing is retried internally.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum QaError {
    /// A geometric precondition was violated before any voxel was written
    #[error("configuration error: {0}")]
    Configuration(String),
    /// A cylinder or search region maps outside the voxel grid
    #[error("configuration error: point ({}, {}, {}) outside grid", point.x, point.y, point.z)]
    OutOfGrid { point: Point3<Real> },
    /// A line profile lacks a usable peak margin or half-max crossing
    #[error("insufficient data: {0}")]
    InsufficientData(String),
    /// The nonlinear fit failed to converge
    #[error("gaussian fit did not converge after {iterations} iterations")]
    FitDiverged { iterations: usize },
    /// A caller-supplied parameter is malformed
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

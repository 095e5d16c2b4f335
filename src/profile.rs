//! Line-profile extraction and NEMA FWHM estimation
//!
//! The NEMA method fits the unique quadratic through the profile peak and
//! its two neighbors, takes half the quadratic's vertex value as the
//! half-maximum ordinate, and linearly interpolates the two crossings of
//! that ordinate. The result is in profile-sample units; multiply by the
//! sampling pitch for a physical width.

use crate::errors::QaError;
use crate::float_types::Real;
use crate::volume::VoxelSource;
use core::str::FromStr;
use nalgebra::Point3;

/// In-plane profile direction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
}

impl FromStr for Axis {
    type Err = QaError;

    fn from_str(token: &str) -> Result<Self, Self::Err> {
        match token {
            "x" => Ok(Axis::X),
            "y" => Ok(Axis::Y),
            other => Err(QaError::InvalidArgument(format!(
                "unknown profile direction {:?}, expected \"x\" or \"y\"",
                other
            ))),
        }
    }
}

/// NEMA quadratic-interpolation FWHM result with overlay diagnostics.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NemaFwhm {
    /// Full width at half maximum, in profile-sample units.
    pub fwhm: Real,
    /// Index of the profile maximum (first occurrence on ties).
    pub peak_index: usize,
    /// Half of the fitted quadratic's vertex value.
    pub half_max: Real,
    /// Quadratic coefficients `[a, b, c]` of `y = a·x² + b·x + c`.
    pub coefficients: [Real; 3],
    /// Sample index left of each half-max crossing.
    pub left_index: usize,
    pub right_index: usize,
    /// Interpolated fractional crossing positions.
    pub left_crossing: Real,
    pub right_crossing: Real,
}

impl NemaFwhm {
    /// Evaluate the fitted quadratic, e.g. to draw an overlay.
    #[inline]
    pub fn quadratic(&self, x: Real) -> Real {
        let [a, b, c] = self.coefficients;
        (a * x + b) * x + c
    }
}

/// Estimate the FWHM of a 1-D profile by the NEMA quadratic method.
///
/// The peak must not sit on either profile boundary, and both half-max
/// crossings must exist within the profile; otherwise
/// [`QaError::InsufficientData`] is returned before anything is read out
/// of range.
pub fn nema_fwhm(profile: &[Real]) -> Result<NemaFwhm, QaError> {
    if profile.len() < 3 {
        return Err(QaError::InsufficientData(format!(
            "profile of {} samples is too short for a quadratic fit",
            profile.len()
        )));
    }
    let peak_index = argmax(profile);
    if peak_index == 0 || peak_index + 1 >= profile.len() {
        return Err(QaError::InsufficientData(format!(
            "profile peak at boundary index {}, no neighbors to fit",
            peak_index
        )));
    }

    // Lagrange coefficients of the quadratic through the peak triple
    let x1 = (peak_index - 1) as Real;
    let x2 = peak_index as Real;
    let x3 = (peak_index + 1) as Real;
    let y1 = profile[peak_index - 1];
    let y2 = profile[peak_index];
    let y3 = profile[peak_index + 1];
    let d = (x1 - x2) * (x1 - x3) * (x2 - x3);
    let a = (x3 * (y2 - y1) + x2 * (y1 - y3) + x1 * (y3 - y2)) / d;
    let b = (x1 * x1 * (y2 - y3) + x3 * x3 * (y1 - y2) + x2 * x2 * (y3 - y1)) / d;
    let c = (x2 * x2 * (x3 * y1 - x1 * y3) + x2 * (x1 * x1 * y3 - x3 * x3 * y1)
        + x1 * x3 * (x3 - x1) * y2)
        / d;

    // Half of the vertex value (4ac - b^2)/(4a)
    let half_max = (4.0 * a * c - b * b) / (8.0 * a);

    // Left crossing: first rising pair straddling the half max
    let mut i = 0;
    while profile[i + 1] < half_max {
        i += 1;
        if i + 1 >= profile.len() {
            return Err(QaError::InsufficientData(
                "no left half-max crossing within the profile".into(),
            ));
        }
    }
    let left_index = i;
    let left_crossing = interpolate_crossing(profile, i, half_max);

    // Right crossing: first falling pair straddling the half max
    i += 1;
    loop {
        if i + 1 >= profile.len() {
            return Err(QaError::InsufficientData(
                "no right half-max crossing within the profile".into(),
            ));
        }
        if profile[i + 1] <= half_max {
            break;
        }
        i += 1;
    }
    let right_index = i;
    let right_crossing = interpolate_crossing(profile, i, half_max);

    Ok(NemaFwhm {
        fwhm: right_crossing - left_crossing,
        peak_index,
        half_max,
        coefficients: [a, b, c],
        left_index,
        right_index,
        left_crossing,
        right_crossing,
    })
}

/// Fractional position where the segment `(i, y[i]) -> (i+1, y[i+1])`
/// crosses `level`.
#[inline]
fn interpolate_crossing(profile: &[Real], i: usize, level: Real) -> Real {
    i as Real + (level - profile[i]) / (profile[i + 1] - profile[i])
}

fn argmax(values: &[Real]) -> usize {
    let mut best = 0;
    for (i, &v) in values.iter().enumerate() {
        if v > values[best] {
            best = i;
        }
    }
    best
}

/// A 1-D intensity profile extracted from a volume, with its physical
/// sampling pitch.
#[derive(Clone, Debug, PartialEq)]
pub struct LineProfile {
    pub values: Vec<Real>,
    /// Physical distance between consecutive samples.
    pub spacing: Real,
}

/// Extract an axis-aligned line profile through the hottest voxel of a
/// square window.
///
/// The window covers `center ± radius` in-plane at physical height `z`.
/// The in-window intensity peak is located first; the profile then runs
/// along `axis` through that peak, over the window's index range
/// (upper edge exclusive). Fails with [`QaError::OutOfGrid`] when the
/// window leaves the image.
pub fn extract_line_profile<V: VoxelSource>(
    image: &V,
    center_x: Real,
    center_y: Real,
    radius: Real,
    z: Real,
    axis: Axis,
) -> Result<LineProfile, QaError> {
    let grid = image.grid();
    let lo_point = Point3::new(center_x - radius, center_y - radius, z);
    let hi_point = Point3::new(center_x + radius, center_y + radius, z);
    for corner in [&lo_point, &hi_point] {
        if !grid.in_bounds(corner) {
            return Err(QaError::OutOfGrid { point: *corner });
        }
    }
    let lo = grid.to_index(&lo_point);
    let hi = grid.to_index(&hi_point);
    let z_idx = lo.z as usize;

    // Hottest voxel in the window
    let mut peak = (lo.x as usize, lo.y as usize);
    let mut peak_val = image.value(peak.0, peak.1, z_idx);
    for y in lo.y as usize..=hi.y as usize {
        for x in lo.x as usize..=hi.x as usize {
            let v = image.value(x, y, z_idx);
            if v > peak_val {
                peak = (x, y);
                peak_val = v;
            }
        }
    }

    let (values, spacing) = match axis {
        Axis::X => (
            (lo.x as usize..hi.x as usize)
                .map(|x| image.value(x, peak.1, z_idx))
                .collect(),
            grid.spacing().x,
        ),
        Axis::Y => (
            (lo.y as usize..hi.y as usize)
                .map(|y| image.value(peak.0, y, z_idx))
                .collect(),
            grid.spacing().y,
        ),
    };
    Ok(LineProfile { values, spacing })
}

//! Gaussian FWHM estimation by nonlinear least squares
//!
//! Fits `y = a · exp(−4·ln2·(x−b)² / w²)` — a Gaussian parametrized
//! directly by its FWHM `w` — to a profile sampled at `x = 0..n−1`, using
//! Levenberg–Marquardt on the 3×3 normal equations.

use crate::errors::QaError;
use crate::float_types::{tolerance, Real, LN_2};
use nalgebra::{Matrix3, Vector3};

const MAX_ITERATIONS: usize = 100;
const LAMBDA_START: Real = 1e-3;
const LAMBDA_CEIL: Real = 1e12;

/// Converged Gaussian parameters; `width` is the FWHM estimate.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GaussFit {
    pub amplitude: Real,
    pub center: Real,
    pub width: Real,
    /// Levenberg–Marquardt iterations spent.
    pub iterations: usize,
}

/// Initial guess for [`gaussfit_fwhm`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GaussGuess {
    pub amplitude: Real,
    pub center: Real,
    pub width: Real,
}

impl GaussGuess {
    /// Default guess for a profile: peak value, middle sample, unit width.
    pub fn for_profile(profile: &[Real]) -> Self {
        let amplitude = profile.iter().copied().fold(Real::NEG_INFINITY, Real::max);
        Self {
            amplitude,
            center: profile.len() as Real / 2.0,
            width: 1.0,
        }
    }
}

#[inline]
fn model(x: Real, a: Real, b: Real, w: Real) -> Real {
    a * (-4.0 * LN_2 * (x - b) * (x - b) / (w * w)).exp()
}

/// Fit the FWHM-parametrized Gaussian to `profile` by Levenberg–Marquardt.
///
/// With `guess = None` the default of [`GaussGuess::for_profile`] is used.
/// Non-convergence within the iteration budget is [`QaError::FitDiverged`].
pub fn gaussfit_fwhm(profile: &[Real], guess: Option<GaussGuess>) -> Result<GaussFit, QaError> {
    if profile.len() < 3 {
        return Err(QaError::InsufficientData(format!(
            "profile of {} samples cannot constrain three Gaussian parameters",
            profile.len()
        )));
    }
    let guess = guess.unwrap_or_else(|| GaussGuess::for_profile(profile));
    if !guess.width.is_finite() || guess.width == 0.0 {
        return Err(QaError::InvalidArgument(format!(
            "initial width must be finite and nonzero, got {}",
            guess.width
        )));
    }

    let mut a = guess.amplitude;
    let mut b = guess.center;
    let mut w = guess.width;
    let mut lambda = LAMBDA_START;
    let mut cost = sum_of_squares(profile, a, b, w);
    // squared-step convergence threshold
    let step_tol = tolerance() * tolerance();

    for iteration in 0..MAX_ITERATIONS {
        // Jacobian of the model and the gradient of the residuals
        let mut jtj = Matrix3::<Real>::zeros();
        let mut jtr = Vector3::<Real>::zeros();
        for (i, &y) in profile.iter().enumerate() {
            let x = i as Real;
            let u = x - b;
            let e = (-4.0 * LN_2 * u * u / (w * w)).exp();
            let da = e;
            let db = a * e * (8.0 * LN_2 * u / (w * w));
            let dw = a * e * (8.0 * LN_2 * u * u / (w * w * w));
            let j = Vector3::new(da, db, dw);
            jtj += j * j.transpose();
            jtr += j * (y - model(x, a, b, w));
        }

        // Damped normal equations; raise lambda until a step improves the cost
        let mut stepped = false;
        while lambda <= LAMBDA_CEIL {
            let mut damped = jtj;
            for k in 0..3 {
                damped[(k, k)] += lambda * jtj[(k, k)];
            }
            let Some(delta) = damped.lu().solve(&jtr) else {
                lambda *= 10.0;
                continue;
            };
            let (na, nb, nw) = (a + delta.x, b + delta.y, w + delta.z);
            if nw == 0.0 {
                lambda *= 10.0;
                continue;
            }
            let new_cost = sum_of_squares(profile, na, nb, nw);
            if new_cost < cost {
                a = na;
                b = nb;
                w = nw;
                cost = new_cost;
                lambda = (lambda * 0.1).max(1e-12);
                if delta.norm_squared() < step_tol {
                    return Ok(GaussFit { amplitude: a, center: b, width: w, iterations: iteration + 1 });
                }
                stepped = true;
                break;
            }
            lambda *= 10.0;
        }
        if !stepped {
            // the damping ceiling was hit without any further improvement;
            // treat a vanishing gradient as converged
            if jtr.norm_squared() < step_tol {
                return Ok(GaussFit { amplitude: a, center: b, width: w, iterations: iteration + 1 });
            }
            return Err(QaError::FitDiverged { iterations: iteration + 1 });
        }
    }
    Err(QaError::FitDiverged { iterations: MAX_ITERATIONS })
}

fn sum_of_squares(profile: &[Real], a: Real, b: Real, w: Real) -> Real {
    profile
        .iter()
        .enumerate()
        .map(|(i, &y)| {
            let r = y - model(i as Real, a, b, w);
            r * r
        })
        .sum()
}

//! Jackknife resampling and the small-sample helpers it builds on

use crate::errors::QaError;
use crate::float_types::Real;

/// Arithmetic mean. Returns NaN for an empty sample.
pub fn mean(sample: &[Real]) -> Real {
    sample.iter().sum::<Real>() / sample.len() as Real
}

/// Sample standard deviation with one delta degree of freedom.
/// Returns NaN for fewer than two values.
pub fn sample_std(sample: &[Real]) -> Real {
    let n = sample.len();
    let m = mean(sample);
    let ss: Real = sample.iter().map(|&v| (v - m) * (v - m)).sum();
    (ss / (n as Real - 1.0)).sqrt()
}

/// A jackknife point estimate with its standard error.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct JackknifeEstimate {
    pub estimate: Real,
    pub standard_error: Real,
}

/// Jackknife standard-error estimation for an arbitrary scalar statistic.
///
/// `estimate` is the statistic over the full sample; the standard error is
/// the leave-one-out formula
/// `sqrt((n−1)/n · Σᵢ (jkᵢ − mean(jk))²)`.
/// Fewer than two samples leave the error undefined and are rejected with
/// [`QaError::InvalidArgument`]. Panics inside `statistic` propagate.
pub fn jackknife<F>(statistic: F, sample: &[Real]) -> Result<JackknifeEstimate, QaError>
where
    F: Fn(&[Real]) -> Real,
{
    let n = sample.len();
    if n < 2 {
        return Err(QaError::InvalidArgument(format!(
            "jackknife needs at least 2 samples, got {}",
            n
        )));
    }

    let estimate = statistic(sample);
    let mut leave_one_out = Vec::with_capacity(n - 1);
    let mut replicates = Vec::with_capacity(n);
    for i in 0..n {
        leave_one_out.clear();
        leave_one_out.extend_from_slice(&sample[..i]);
        leave_one_out.extend_from_slice(&sample[i + 1..]);
        replicates.push(statistic(&leave_one_out));
    }

    let m = mean(&replicates);
    let ss: Real = replicates.iter().map(|&v| (v - m) * (v - m)).sum();
    let standard_error = ((n as Real - 1.0) / n as Real * ss).sqrt();
    Ok(JackknifeEstimate { estimate, standard_error })
}

use approx::assert_relative_eq;
use nalgebra::{Point3, Vector3};
use phantomiq::{
    extract_line_profile, gaussfit_fwhm, nema_fwhm, stats, Axis, Grid, QaError, Real, Volume,
};

/// A volume holding a thin line source at `(line_x, line_y)` through all
/// slices, with a triangular in-plane spread.
fn line_source(g: Grid, line_x: usize, line_y: usize) -> Volume {
    Volume::from_fn(g, |x, y, _| {
        if y == line_y {
            match (x as i64 - line_x as i64).abs() {
                0 => 1.0,
                1 => 0.25,
                _ => 0.0,
            }
        } else {
            0.0
        }
    })
}

#[test]
fn profile_through_the_window_peak() {
    let g = Grid::new(
        [24, 24, 6],
        Vector3::new(1.0, 1.0, 1.0),
        Point3::origin(),
    )
    .unwrap();
    let image = line_source(g, 10, 12);
    let profile = extract_line_profile(&image, 10.0, 12.0, 4.0, 2.0, Axis::X).unwrap();
    // window runs x = 6..14 (upper edge exclusive), peak at x = 10
    assert_eq!(profile.values.len(), 8);
    assert_eq!(profile.values[4], 1.0);
    assert_eq!(profile.values[3], 0.25);
    assert_eq!(profile.values[5], 0.25);
    assert_relative_eq!(profile.spacing, 1.0);

    let fit = nema_fwhm(&profile.values).unwrap();
    assert_eq!(fit.peak_index, 4);
    // triangle of height 1 with shoulders 0.25: half max 0.5 is crossed
    // 2/3 of a sample away from the peak on each side
    assert_relative_eq!(fit.fwhm, 4.0 / 3.0, max_relative = 1e-12);
}

#[test]
fn spacing_converts_sample_units_to_physical() {
    let g = Grid::new(
        [24, 24, 6],
        Vector3::new(2.0, 1.0, 1.0),
        Point3::origin(),
    )
    .unwrap();
    let image = line_source(g, 10, 12);
    let profile = extract_line_profile(&image, 20.0, 12.0, 8.0, 2.0, Axis::X).unwrap();
    assert_relative_eq!(profile.spacing, 2.0);
    let fit = nema_fwhm(&profile.values).unwrap();
    assert_relative_eq!(fit.fwhm * profile.spacing, 8.0 / 3.0, max_relative = 1e-12);
}

#[test]
fn y_profiles_cut_the_other_way() {
    let g = Grid::new(
        [24, 24, 6],
        Vector3::new(1.0, 1.0, 1.0),
        Point3::origin(),
    )
    .unwrap();
    // a line source along x gives a one-voxel-wide peak in y
    let image = line_source(g, 10, 12);
    let profile = extract_line_profile(&image, 10.0, 12.0, 3.0, 1.0, Axis::Y).unwrap();
    assert_eq!(profile.values.len(), 6);
    assert_eq!(profile.values[3], 1.0);
    assert_eq!(profile.values[2], 0.0);
}

#[test]
fn window_outside_the_image_is_rejected() {
    let g = Grid::new(
        [24, 24, 6],
        Vector3::new(1.0, 1.0, 1.0),
        Point3::origin(),
    )
    .unwrap();
    let image = line_source(g, 10, 12);
    assert!(matches!(
        extract_line_profile(&image, 2.0, 12.0, 4.0, 2.0, Axis::X),
        Err(QaError::OutOfGrid { .. })
    ));
    assert!(matches!(
        extract_line_profile(&image, 10.0, 12.0, 4.0, 7.0, Axis::X),
        Err(QaError::OutOfGrid { .. })
    ));
}

#[test]
fn lsf_style_aggregation_over_slices() {
    // the classic line-spread workflow: one FWHM per slice, then a mean
    // with a jackknife standard error
    let g = Grid::new(
        [24, 24, 6],
        Vector3::new(1.0, 1.0, 1.0),
        Point3::origin(),
    )
    .unwrap();
    let image = line_source(g, 10, 12);
    let mut widths: Vec<Real> = Vec::new();
    for z in 0..4 {
        let profile =
            extract_line_profile(&image, 10.0, 12.0, 4.0, z as Real, Axis::X).unwrap();
        widths.push(nema_fwhm(&profile.values).unwrap().fwhm * profile.spacing);
    }
    let summary = stats::jackknife(stats::mean, &widths).unwrap();
    assert_relative_eq!(summary.estimate, 4.0 / 3.0, max_relative = 1e-12);
    assert!(summary.standard_error.abs() < 1e-12);
}

#[test]
fn both_estimators_agree_on_a_gaussian_line() {
    let sigma: Real = 1.2;
    let fwhm_true = 2.0 * (2.0 * (2.0 as Real).ln()).sqrt() * sigma;
    let profile: Vec<Real> = (0..13)
        .map(|i| {
            let d = i as Real - 6.0;
            (-(d * d) / (2.0 * sigma * sigma)).exp()
        })
        .collect();
    let nema = nema_fwhm(&profile).unwrap();
    let gauss = gaussfit_fwhm(&profile, None).unwrap();
    assert_relative_eq!(gauss.width, fwhm_true, max_relative = 1e-6);
    // the quadratic method is approximate on a true Gaussian
    assert_relative_eq!(nema.fwhm, fwhm_true, max_relative = 0.05);
}

use nalgebra::{Point3, Vector3};
use phantomiq::{find_hottest_cylinder, Grid, HotSearch, QaError, Real, Volume};

fn grid(size: [usize; 3], spacing: Real) -> Grid {
    Grid::new(
        size,
        Vector3::new(spacing, spacing, spacing),
        Point3::origin(),
    )
    .unwrap()
}

/// A smooth blob centered at `(cx, cy)` in every slice, so steepest ascent
/// has a gradient to follow from anywhere in the search bound.
fn blob_volume(g: Grid, cx: Real, cy: Real) -> Volume {
    Volume::from_fn(g, |x, y, _| {
        let dx = x as Real - cx;
        let dy = y as Real - cy;
        (-(dx * dx + dy * dy) / 72.0).exp()
    })
}

fn search(cx: Real, cy: Real) -> HotSearch {
    HotSearch {
        center_x: cx,
        center_y: cy,
        start_z: 2.0,
        end_z: 5.0,
        radius: 2.5,
        bounding_radius: 12.0,
    }
}

#[test]
fn climbs_to_the_hottest_disk() {
    let g = grid([32, 32, 8], 1.0);
    let image = blob_volume(g, 20.0, 18.0);
    let mask = find_hottest_cylinder(&image, &search(16.0, 16.0), &g).unwrap();

    for z in 2..=5 {
        assert_eq!(mask.label_at(20, 18, z), 1, "blob center at z = {}", z);
        assert_eq!(mask.label_at(16, 16, z), 0, "seed is outside the winning disk");
    }
    assert_eq!(mask.label_at(20, 18, 1), 0);
    assert_eq!(mask.label_at(20, 18, 6), 0);
    // a disk of radius 2.5 covers 21 unit voxels, over 4 slices
    assert_eq!(mask.count_label(1), 21 * 4);
}

#[test]
fn optimal_seed_is_a_fixed_point() {
    let g = grid([32, 32, 8], 1.0);
    let image = blob_volume(g, 20.0, 18.0);
    // the bound around the blob center must still fit the grid
    let mut offset = search(16.0, 16.0);
    offset.bounding_radius = 11.0;
    let mut optimum = search(20.0, 18.0);
    optimum.bounding_radius = 11.0;
    let from_offset = find_hottest_cylinder(&image, &offset, &g).unwrap();
    let from_optimum = find_hottest_cylinder(&image, &optimum, &g).unwrap();
    assert_eq!(from_offset, from_optimum);
    assert_eq!(from_offset.label_at(20, 18, 2), 1);
}

#[test]
fn winner_is_translated_into_a_finer_output_grid() {
    let coarse = grid([32, 32, 8], 1.0);
    let fine = grid([64, 64, 16], 0.5);
    let image = blob_volume(coarse, 20.0, 18.0);
    let mask = find_hottest_cylinder(&image, &search(16.0, 16.0), &fine).unwrap();

    // image slice z = 2.0 lands on fine slice 4; physical (20, 18) is fine (40, 36)
    assert_eq!(mask.label_at(40, 36, 4), 1);
    assert_eq!(mask.label_at(40, 36, 5), 0);
    assert_eq!(mask.label_at(40, 36, 10), 1);
    // fine voxels just inside/outside the 2.5 disk around (20, 18)
    assert_eq!(mask.label_at(45, 36, 4), 1);
    assert_eq!(mask.label_at(46, 36, 4), 0);
}

#[test]
fn search_bound_must_fit_both_grids() {
    let g = grid([32, 32, 8], 1.0);
    let image = blob_volume(g, 20.0, 18.0);
    let mut wide = search(16.0, 16.0);
    wide.bounding_radius = 20.0;
    assert!(matches!(
        find_hottest_cylinder(&image, &wide, &g),
        Err(QaError::OutOfGrid { .. })
    ));

    let small_out = grid([16, 16, 8], 1.0);
    assert!(matches!(
        find_hottest_cylinder(&image, &search(16.0, 16.0), &small_out),
        Err(QaError::OutOfGrid { .. })
    ));
}

#[test]
fn disk_radius_cannot_exceed_the_bound() {
    let g = grid([32, 32, 8], 1.0);
    let image = blob_volume(g, 20.0, 18.0);
    let mut bad = search(16.0, 16.0);
    bad.radius = 13.0;
    bad.bounding_radius = 12.9;
    assert!(matches!(
        find_hottest_cylinder(&image, &bad, &g),
        Err(QaError::Configuration(_))
    ));
}

#[test]
fn degenerate_neighborhood_keeps_the_seed() {
    // reach shrinks to zero and the seed itself is inadmissible; the seed
    // disk is still produced instead of crashing
    let g = grid([32, 32, 8], 1.0);
    let image = blob_volume(g, 20.0, 18.0);
    let pinned = HotSearch {
        center_x: 16.2,
        center_y: 16.0,
        start_z: 2.0,
        end_z: 5.0,
        radius: 2.5,
        bounding_radius: 2.5,
    };
    let mask = find_hottest_cylinder(&image, &pinned, &g).unwrap();
    assert_eq!(mask.label_at(16, 16, 2), 1);
    assert_eq!(mask.label_at(20, 18, 2), 0);
}

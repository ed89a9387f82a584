use super::*;

fn path(d: &str) -> BezPath {
    BezPath::from_svg(d).unwrap()
}

#[test]
fn lines_keep_exact_vertices() {
    let out = sample_path(&path("M0 0 L10 0 L10 10"), 64);
    assert!(out.skipped.is_empty());
    assert_eq!(out.polylines.len(), 1);
    assert_eq!(
        out.polylines[0].points(),
        &[
            Point2D::new(0.0, 0.0),
            Point2D::new(10.0, 0.0),
            Point2D::new(10.0, 10.0)
        ]
    );
}

#[test]
fn curves_are_sampled_at_fixed_resolution() {
    let out = sample_path(&path("M0 0 C0 10 10 10 10 0"), 4);
    let pts = out.polylines[0].points();
    assert_eq!(pts.len(), 5);
    assert_eq!(pts[0], Point2D::new(0.0, 0.0));
    assert_eq!(pts[4], Point2D::new(10.0, 0.0));
    // t = 0.5 on this symmetric arch
    assert!((pts[2].x - 5.0).abs() < 1e-9);
    assert!((pts[2].y - 7.5).abs() < 1e-9);
}

#[test]
fn quad_then_line_has_no_duplicate_join() {
    let out = sample_path(&path("M0 0 Q5 5 10 0 L20 0"), 8);
    let pts = out.polylines[0].points();
    assert_eq!(pts.len(), 1 + 8 + 1);
    assert!(pts.windows(2).all(|w| w[0] != w[1]));
}

#[test]
fn subpaths_become_separate_polylines() {
    let out = sample_path(&path("M0 0 L1 0 M5 5 L6 6"), 64);
    assert_eq!(out.polylines.len(), 2);
    assert_eq!(out.polylines[1].first(), Point2D::new(5.0, 5.0));
}

#[test]
fn close_returns_to_start() {
    let out = sample_path(&path("M0 0 L1 0 L1 1 Z"), 64);
    let pl = &out.polylines[0];
    assert_eq!(pl.len(), 4);
    assert_eq!(pl.first(), pl.last());
}

#[test]
fn lone_move_is_skipped_with_warning() {
    let p = BezPath::from_vec(vec![
        PathEl::MoveTo(Point2D::new(3.0, 3.0)),
        PathEl::MoveTo(Point2D::new(0.0, 0.0)),
        PathEl::LineTo(Point2D::new(1.0, 1.0)),
    ]);
    let out = sample_path(&p, 64);
    assert_eq!(out.polylines.len(), 1);
    assert_eq!(out.skipped.len(), 1);
    assert!(out.skipped[0].to_string().starts_with("geometry error:"));
}

use super::*;
use crate::foundation::core::Point;

fn rect_stroke(x0: f64, y0: f64, x1: f64, y1: f64) -> Polyline {
    let mut pts = Vec::new();
    for i in 0..=10 {
        let t = i as f64 / 10.0;
        pts.push(Point::new(x0 + (x1 - x0) * t, y0));
    }
    for i in 0..=10 {
        let t = i as f64 / 10.0;
        pts.push(Point::new(x1, y0 + (y1 - y0) * t));
    }
    for i in 0..=10 {
        let t = i as f64 / 10.0;
        pts.push(Point::new(x1 - (x1 - x0) * t, y1));
    }
    for i in 0..=10 {
        let t = i as f64 / 10.0;
        pts.push(Point::new(x0, y1 - (y1 - y0) * t));
    }
    Polyline::new(pts).unwrap()
}

#[test]
fn border_stroke_is_detected() {
    let global = Rect::new(0.0, 0.0, 100.0, 100.0);
    assert!(is_outer_frame(
        &rect_stroke(0.0, 0.0, 100.0, 100.0),
        global,
        OuterFrameRule::default()
    ));
}

#[test]
fn inner_shape_is_not_a_border() {
    let global = Rect::new(0.0, 0.0, 100.0, 100.0);
    assert!(!is_outer_frame(
        &rect_stroke(20.0, 20.0, 60.0, 60.0),
        global,
        OuterFrameRule::default()
    ));
}

#[test]
fn diagonal_spanning_stroke_is_not_a_border() {
    let global = Rect::new(0.0, 0.0, 100.0, 100.0);
    let pts = (0..=50)
        .map(|i| Point::new(i as f64 * 2.0, i as f64 * 2.0))
        .collect();
    let diag = Polyline::new(pts).unwrap();
    assert!(!is_outer_frame(&diag, global, OuterFrameRule::default()));
}

#[test]
fn tiny_speck_is_noise() {
    let global = Rect::new(0.0, 0.0, 1000.0, 1000.0);
    let speck = rect_stroke(10.0, 10.0, 12.0, 12.0);
    assert!(is_noise(&speck, global, 0.01));
    assert!(!is_noise(&speck, global, 0.0));
    assert!(!is_noise(&rect_stroke(0.0, 0.0, 300.0, 2.0), global, 0.01));
}

#[test]
fn short_polylines_are_removed() {
    let mut v = vec![
        Polyline::new(vec![Point::new(0.0, 0.0)]).unwrap(),
        rect_stroke(0.0, 0.0, 1.0, 1.0),
    ];
    retain_min_points(&mut v, 2);
    assert_eq!(v.len(), 1);
}

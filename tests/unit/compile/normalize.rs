use super::*;
use crate::geometry::polyline::Polyline;

fn pts(v: &[(f64, f64)]) -> Vec<Point2D> {
    v.iter().map(|&(x, y)| Point2D::new(x, y)).collect()
}

fn frame(index: usize, v: &[(f64, f64)]) -> Frame {
    let mut f = Frame::new(index);
    f.polylines.push(Polyline::new(pts(v)).unwrap());
    f
}

#[test]
fn unit_square_maps_to_half_range() {
    let n = Normalization::new(Point2D::ZERO, 32767.0, 1.0);
    let square = pts(&[(-0.5, -0.5), (0.5, -0.5), (0.5, 0.5), (-0.5, 0.5)]);
    let out: Vec<(i16, i16)> = square.into_iter().map(|p| n.apply(p)).collect();
    assert_eq!(
        out,
        vec![
            (-16383, -16383),
            (16383, -16383),
            (16383, 16383),
            (-16383, 16383)
        ]
    );
}

#[test]
fn sequence_bounds_fill_the_device_range() {
    let frames = vec![
        frame(0, &[(0.0, 0.0), (10.0, 0.0)]),
        frame(1, &[(10.0, 5.0), (20.0, 5.0)]),
    ];
    let n = Normalization::from_frames(&frames, FitAxis::Max, 1.0);
    assert_eq!(n.center, Point2D::new(10.0, 2.5));
    assert_eq!(n.apply(Point2D::new(0.0, 0.0)), (-32767, -8192));
    assert_eq!(n.apply(Point2D::new(20.0, 5.0)), (32767, 8192));
}

#[test]
fn same_transform_for_every_frame() {
    let small = frame(0, &[(0.0, 0.0), (1.0, 1.0)]);
    let large = frame(1, &[(0.0, 0.0), (100.0, 100.0)]);
    let n = Normalization::from_frames(&[small, large], FitAxis::Max, 1.0);
    // the small frame does not get rescaled to fill the range on its own
    let (x, _) = n.apply(Point2D::new(1.0, 1.0));
    assert!(x < -30000);
}

#[test]
fn fill_ratio_and_invert_y() {
    let f = frame(0, &[(0.0, 0.0), (2.0, 2.0)]);
    let n = Normalization::from_frames(&[f], FitAxis::Max, 0.5).with_invert_y(true);
    assert_eq!(n.apply(Point2D::new(2.0, 2.0)), (16383, -16383));
    assert_eq!(n.apply(Point2D::new(0.0, 0.0)), (-16383, 16383));
}

#[test]
fn fit_axis_min_clips_long_axis() {
    let f = frame(0, &[(0.0, 0.0), (4.0, 1.0)]);
    let n = Normalization::from_frames(&[f], FitAxis::Min, 1.0);
    assert_eq!(n.apply(Point2D::new(4.0, 1.0)), (32767, 32767));
    let y = Normalization::from_frames(&[frame(0, &[(0.0, 0.0), (4.0, 1.0)])], FitAxis::Y, 1.0);
    assert_eq!(n.scale, y.scale);
}

#[test]
fn single_point_sequence_uses_span_floor() {
    let f = frame(0, &[(3.0, 3.0)]);
    let n = Normalization::from_frames(&[f], FitAxis::Max, 1.0);
    assert_eq!(n.scale, DEVICE_SPAN / MIN_SPAN);
    assert_eq!(n.apply(Point2D::new(3.0, 3.0)), (0, 0));
    assert_eq!(n.apply(Point2D::new(4.0, 2.0)), (32767, -32767));
}

#[test]
fn empty_sequence_is_identity() {
    let n = Normalization::from_frames(&[Frame::new(0), Frame::new(1)], FitAxis::Max, 0.95);
    assert_eq!(n.center, Point2D::ZERO);
    assert_eq!(n.scale, 1.0);
    assert!(sequence_bounds(&[Frame::new(0)]).is_none());
}

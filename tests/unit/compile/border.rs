use super::*;
use crate::container::PointColor;

const C: PointColor = PointColor::Indexed(7);
const H: i16 = 31_000;

/// Blank move to `path[0]`, then `per_leg` lit points along each leg, ending on its corner.
fn polyline_stroke(path: &[(i16, i16)], per_leg: usize) -> Vec<DevicePoint> {
    let mut out = vec![DevicePoint::blank(path[0].0, path[0].1, C)];
    for leg in path.windows(2) {
        let (a, b) = (leg[0], leg[1]);
        for i in 1..=per_leg {
            let t = i as f64 / per_leg as f64;
            let x = f64::from(a.0) + (f64::from(b.0) - f64::from(a.0)) * t;
            let y = f64::from(a.1) + (f64::from(b.1) - f64::from(a.1)) * t;
            out.push(DevicePoint::lit(x.round() as i16, y.round() as i16, C));
        }
    }
    out
}

fn rectangle(per_leg: usize) -> Vec<DevicePoint> {
    polyline_stroke(&[(-H, -H), (H, -H), (H, H), (-H, H), (-H, -H)], per_leg)
}

fn diagonal() -> Vec<DevicePoint> {
    polyline_stroke(&[(-20_000, -20_000), (20_000, 20_000)], 50)
}

#[test]
fn strokes_open_at_blank_points() {
    let lit = DevicePoint::lit(0, 0, C);
    let blank = DevicePoint::blank(0, 0, C);
    assert_eq!(split_strokes(&[blank, lit, lit, blank, lit]), vec![0..3, 3..5]);
    assert_eq!(split_strokes(&[lit, blank, lit]), vec![0..1, 1..3]);
    assert!(split_strokes(&[]).is_empty());
}

#[test]
fn full_range_rectangle_is_a_border() {
    let rule = BorderStrokeRule::default();
    assert!(is_border_stroke(&rectangle(10), rule));
    // Too few lit points.
    assert!(!is_border_stroke(&rectangle(5), rule));
    // Too small.
    assert!(!is_border_stroke(&diagonal(), rule));
}

#[test]
fn diagonal_legs_fail_the_axis_rule() {
    let z = polyline_stroke(&[(-H, H), (H, H), (-H, -H), (H, -H)], 20);
    assert!(!is_border_stroke(&z, BorderStrokeRule::default()));
}

#[test]
fn l_shaped_half_border_is_detected() {
    let half = polyline_stroke(&[(-H, H), (-H, -H), (H, -H)], 40);
    assert!(is_border_stroke(&half, BorderStrokeRule::default()));
}

#[test]
fn border_strokes_are_removed_and_last_bit_moves() {
    let other = polyline_stroke(&[(20_000, -20_000), (-20_000, 20_000)], 50);
    let mut points = diagonal();
    points.extend(rectangle(10));
    points.extend(other.iter().copied());
    let mut expected = diagonal();
    expected.extend(other);

    let removed = remove_border_strokes(&mut points, BorderStrokeRule::default());
    assert_eq!(removed, 1);
    assert_eq!(points.len(), expected.len());
    assert!(points.last().unwrap().is_last());
    assert_eq!(points.iter().filter(|p| p.is_last()).count(), 1);
    for (a, b) in points.iter().zip(&expected) {
        assert_eq!((a.x, a.y, a.is_blanked()), (b.x, b.y, b.is_blanked()));
    }
}

#[test]
fn frame_of_only_borders_is_kept() {
    let mut points = rectangle(10);
    let before = points.clone();
    assert_eq!(remove_border_strokes(&mut points, BorderStrokeRule::default()), 0);
    assert_eq!(points, before);
}

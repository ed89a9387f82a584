use crate::foundation::core::Point2D;
use crate::geometry::polyline::Polyline;

/// Ramer–Douglas–Peucker simplification with an explicit work stack.
///
/// Inputs shorter than 3 points, or `epsilon <= 0`, are returned unchanged. The result is a
/// subsequence of `points` that always keeps both endpoints. When several interior points share
/// the maximum distance, the earliest one is kept.
pub fn simplify_points(points: &[Point2D], epsilon: f64) -> Vec<Point2D> {
    if points.len() < 3 || !(epsilon > 0.0) {
        return points.to_vec();
    }

    let mut keep = vec![false; points.len()];
    keep[0] = true;
    keep[points.len() - 1] = true;

    let mut stack = vec![(0usize, points.len() - 1)];
    while let Some((start, end)) = stack.pop() {
        if end <= start + 1 {
            continue;
        }
        let a = points[start];
        let b = points[end];

        let mut max_d = 0.0;
        let mut max_k = None;
        for (k, &p) in points.iter().enumerate().take(end).skip(start + 1) {
            let d = distance_to_chord(p, a, b);
            if d > max_d {
                max_d = d;
                max_k = Some(k);
            }
        }

        if let Some(k) = max_k
            && max_d > epsilon
        {
            keep[k] = true;
            stack.push((start, k));
            stack.push((k, end));
        }
    }

    points
        .iter()
        .zip(keep)
        .filter_map(|(&p, k)| k.then_some(p))
        .collect()
}

/// Simplify a polyline in place, keeping its color.
pub fn simplify_polyline(polyline: &mut Polyline, epsilon: f64) {
    let simplified = simplify_points(polyline.points(), epsilon);
    polyline.set_points(simplified);
}

/// Distance from `p` to the segment `a..b`; collapses to point distance for a closed chord.
fn distance_to_chord(p: Point2D, a: Point2D, b: Point2D) -> f64 {
    let ab = b - a;
    let len_sq = ab.hypot2();
    if len_sq <= f64::EPSILON {
        return (p - a).hypot();
    }
    let t = ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    (p - (a + ab * t)).hypot()
}

#[cfg(test)]
#[path = "../../tests/unit/geometry/simplify.rs"]
mod tests;

use kurbo::{CubicBez, ParamCurve, PathEl, QuadBez};

use crate::foundation::core::{BezPath, Point2D};
use crate::foundation::error::LaserError;
use crate::geometry::polyline::Polyline;

/// Polylines flattened from one path, plus the subpaths that had to be skipped.
#[derive(Debug, Default)]
pub struct SampledPath {
    /// One polyline per usable subpath.
    pub polylines: Vec<Polyline>,
    /// Subpaths that could not be flattened.
    pub skipped: Vec<LaserError>,
}

/// Flatten `path` into one polyline per subpath.
///
/// Line segments contribute their end point only. Curves contribute `curve_samples` evenly
/// spaced parameter samples, the last of which is the segment's exact end point. A close
/// element returns to the subpath start. Subpaths without segments or with non-finite
/// coordinates are skipped and reported.
pub fn sample_path(path: &BezPath, curve_samples: usize) -> SampledPath {
    let n = curve_samples.max(1);
    let mut out = SampledPath::default();
    let mut current: Vec<Point2D> = Vec::new();
    let mut start = Point2D::ZERO;

    for el in path.elements() {
        match *el {
            PathEl::MoveTo(p) => {
                flush(&mut current, &mut out);
                start = p;
                current.push(p);
            }
            PathEl::LineTo(p) => {
                begin_if_needed(&mut current, start);
                current.push(p);
            }
            PathEl::QuadTo(c, p) => {
                let p0 = begin_if_needed(&mut current, start);
                let q = QuadBez::new(p0, c, p);
                push_samples(&mut current, |t| q.eval(t), p, n);
            }
            PathEl::CurveTo(c1, c2, p) => {
                let p0 = begin_if_needed(&mut current, start);
                let cb = CubicBez::new(p0, c1, c2, p);
                push_samples(&mut current, |t| cb.eval(t), p, n);
            }
            PathEl::ClosePath => {
                if current.last().is_some_and(|&last| last != start) {
                    current.push(start);
                }
                flush(&mut current, &mut out);
            }
        }
    }
    flush(&mut current, &mut out);
    out
}

fn flush(points: &mut Vec<Point2D>, out: &mut SampledPath) {
    let points = std::mem::take(points);
    if let [only] = points.as_slice() {
        out.skipped.push(LaserError::geometry(format!(
            "subpath at ({:.3}, {:.3}) has no segments",
            only.x, only.y
        )));
        return;
    }
    if points.iter().any(|p| !p.is_finite()) {
        out.skipped
            .push(LaserError::geometry("subpath has non-finite coordinates"));
        return;
    }
    out.polylines.extend(Polyline::new(points));
}

/// Start a subpath at `start` when a drawing element has no current point. Returns the
/// current point.
fn begin_if_needed(current: &mut Vec<Point2D>, start: Point2D) -> Point2D {
    if current.is_empty() {
        current.push(start);
    }
    current[current.len() - 1]
}

fn push_samples(current: &mut Vec<Point2D>, eval: impl Fn(f64) -> Point2D, end: Point2D, n: usize) {
    for i in 1..n {
        current.push(eval(i as f64 / n as f64));
    }
    current.push(end);
}

#[cfg(test)]
#[path = "../../tests/unit/geometry/sample.rs"]
mod tests;

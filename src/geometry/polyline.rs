use crate::foundation::core::{Point2D, Rect, Rgb8, extend_bounds};
use crate::foundation::error::GeometryWarning;

/// Ordered, non-empty run of source-space points drawn as one stroke.
///
/// The first point is reached with a blank move; every following point is lit.
#[derive(Clone, Debug, PartialEq)]
pub struct Polyline {
    points: Vec<Point2D>,
    /// Stroke color. `None` lets the encoder fall back to its default.
    pub color: Option<Rgb8>,
}

impl Polyline {
    /// Build a polyline, returning `None` for an empty point list.
    pub fn new(points: Vec<Point2D>) -> Option<Self> {
        if points.is_empty() {
            return None;
        }
        Some(Self {
            points,
            color: None,
        })
    }

    /// Set the stroke color.
    pub fn with_color(mut self, color: Rgb8) -> Self {
        self.color = Some(color);
        self
    }

    /// Points in drawing order.
    pub fn points(&self) -> &[Point2D] {
        &self.points
    }

    /// Number of points, at least one.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Always `false`; present for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Start point.
    pub fn first(&self) -> Point2D {
        self.points[0]
    }

    /// End point.
    pub fn last(&self) -> Point2D {
        self.points[self.points.len() - 1]
    }

    /// Reverse the drawing direction.
    pub fn reverse(&mut self) {
        self.points.reverse();
    }

    /// Axis-aligned bounds of the points.
    pub fn bounds(&self) -> Rect {
        let mut b = None;
        for &p in &self.points {
            b = extend_bounds(b, p);
        }
        // Non-empty by construction.
        b.unwrap_or_default()
    }

    /// Replace the point list, keeping the color. Empty replacements are ignored.
    pub(crate) fn set_points(&mut self, points: Vec<Point2D>) {
        if !points.is_empty() {
            self.points = points;
        }
    }

    /// Take the points.
    pub fn into_points(self) -> Vec<Point2D> {
        self.points
    }
}

/// One source-space frame: polylines in draw order plus the warnings raised while extracting them.
///
/// A frame with zero polylines is valid and is kept to preserve timing.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Frame {
    /// Zero-based position in the sequence.
    pub index: usize,
    /// Name stored in the container header; generated from the index when absent.
    pub name: Option<String>,
    /// Strokes in drawing order.
    pub polylines: Vec<Polyline>,
    /// Recoverable problems met while extracting.
    pub warnings: Vec<GeometryWarning>,
}

impl Frame {
    /// Empty frame at `index`.
    pub fn new(index: usize) -> Self {
        Self {
            index,
            ..Self::default()
        }
    }

    /// Total points over every polyline.
    pub fn point_count(&self) -> usize {
        self.polylines.iter().map(Polyline::len).sum()
    }

    /// Union of polyline bounds, `None` for an empty frame.
    pub fn bounds(&self) -> Option<Rect> {
        self.polylines
            .iter()
            .map(Polyline::bounds)
            .reduce(|a, b| a.union(b))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/geometry/polyline.rs"]
mod tests;

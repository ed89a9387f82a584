//! Device-space border removal.
//!
//! A rectangular frame drawn around the picture is sometimes split across several source
//! subpaths, which the per-polyline outer-frame filter cannot see. Once a frame is budgeted its
//! strokes are contiguous runs of device points, so the border can be recognised as a single
//! stroke here.

use std::ops::Range;

use crate::container::DevicePoint;
use crate::foundation::core::DEVICE_SPAN;

/// Tolerances for a border stroke in device coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BorderStrokeRule {
    /// Strokes with fewer lit points are never borders.
    pub min_lit_points: usize,
    /// Minimum share of the device span covered on both axes.
    pub rel_tol: f64,
    /// Edge proximity, relative to the device span.
    pub edge_rel_eps: f64,
    /// Minimum share of lit points lying on the stroke's bbox edges.
    pub min_edge_fraction: f64,
    /// Minimum share of segments that run horizontally or vertically.
    pub min_axis_aligned_fraction: f64,
}

impl Default for BorderStrokeRule {
    fn default() -> Self {
        Self {
            min_lit_points: 40,
            rel_tol: 0.90,
            edge_rel_eps: 0.015,
            min_edge_fraction: 0.35,
            min_axis_aligned_fraction: 0.75,
        }
    }
}

/// Index ranges of the strokes in `points`. A stroke opens at every blanked point and runs
/// through the lit points after it; lit points before the first blank form their own stroke.
pub fn split_strokes(points: &[DevicePoint]) -> Vec<Range<usize>> {
    let mut strokes = Vec::new();
    let mut start = 0;
    for (i, p) in points.iter().enumerate() {
        if p.is_blanked() && i > start {
            strokes.push(start..i);
            start = i;
        }
    }
    if start < points.len() {
        strokes.push(start..points.len());
    }
    strokes
}

/// `true` when the lit part of `stroke` traces a near-full-range axis-aligned rectangle.
pub fn is_border_stroke(stroke: &[DevicePoint], rule: BorderStrokeRule) -> bool {
    let lit: Vec<(f64, f64)> = stroke
        .iter()
        .filter(|p| !p.is_blanked())
        .map(|p| (f64::from(p.x), f64::from(p.y)))
        .collect();
    if lit.len() < rule.min_lit_points.max(1) {
        return false;
    }

    let (mut x0, mut x1, mut y0, mut y1) = (f64::MAX, f64::MIN, f64::MAX, f64::MIN);
    for &(x, y) in &lit {
        x0 = x0.min(x);
        x1 = x1.max(x);
        y0 = y0.min(y);
        y1 = y1.max(y);
    }
    let min_extent = rule.rel_tol * DEVICE_SPAN;
    if x1 - x0 < min_extent || y1 - y0 < min_extent {
        return false;
    }

    let eps = rule.edge_rel_eps * DEVICE_SPAN;
    let near = |a: f64, b: f64| (a - b).abs() <= eps;

    let mut on_edge = 0usize;
    // x0y1, x1y1, x0y0, x1y0
    let mut corners = [false; 4];
    for &(x, y) in &lit {
        let (left, right, bottom, top) = (near(x, x0), near(x, x1), near(y, y0), near(y, y1));
        if left || right || bottom || top {
            on_edge += 1;
        }
        match (left, right, bottom, top) {
            (true, _, _, true) => corners[0] = true,
            (_, true, _, true) => corners[1] = true,
            (true, _, true, _) => corners[2] = true,
            (_, true, true, _) => corners[3] = true,
            _ => {}
        }
    }
    let axis_aligned = lit
        .windows(2)
        .filter(|w| (w[1].0 - w[0].0).abs() <= eps || (w[1].1 - w[0].1).abs() <= eps)
        .count();

    let edge_frac = on_edge as f64 / lit.len() as f64;
    let axis_frac = axis_aligned as f64 / (lit.len() - 1).max(1) as f64;
    let corner_hits = corners.iter().filter(|&&c| c).count();
    edge_frac >= rule.min_edge_fraction
        && corner_hits >= 3
        && axis_frac >= rule.min_axis_aligned_fraction
}

/// Drop border strokes from an encoded frame. Returns the number of strokes removed.
///
/// When every stroke looks like a border the frame is left untouched. The last-point bit is
/// moved to the new final point.
pub fn remove_border_strokes(points: &mut Vec<DevicePoint>, rule: BorderStrokeRule) -> usize {
    let strokes = split_strokes(points);
    let keep: Vec<bool> = strokes
        .iter()
        .map(|r| !is_border_stroke(&points[r.clone()], rule))
        .collect();
    let removed = keep.iter().filter(|&&k| !k).count();
    if removed == 0 || removed == strokes.len() {
        return 0;
    }

    let mut kept = Vec::with_capacity(points.len());
    for (range, keep) in strokes.into_iter().zip(keep) {
        if keep {
            kept.extend(points[range].iter().map(|p| p.with_last(false)));
        }
    }
    if let Some(last) = kept.pop() {
        kept.push(last.with_last(true));
    }
    *points = kept;
    removed
}

#[cfg(test)]
#[path = "../../tests/unit/compile/border.rs"]
mod tests;

use crate::foundation::core::Rect;
use crate::geometry::polyline::Polyline;

/// Tolerances for recognising a border stroke drawn around the whole picture.
#[derive(Clone, Copy, Debug)]
pub struct OuterFrameRule {
    /// Minimum share of the global extent the stroke must cover on both axes.
    pub rel_tol: f64,
    /// Edge proximity, relative to the larger global extent.
    pub edge_rel_eps: f64,
    /// Minimum share of points lying on the stroke's own bbox edges.
    pub min_edge_fraction: f64,
}

impl Default for OuterFrameRule {
    fn default() -> Self {
        Self {
            rel_tol: 0.90,
            edge_rel_eps: 0.012,
            min_edge_fraction: 0.35,
        }
    }
}

/// Drop polylines with fewer than `min_points` points.
pub fn retain_min_points(polylines: &mut Vec<Polyline>, min_points: usize) {
    polylines.retain(|pl| pl.len() >= min_points.max(1));
}

/// `true` when the polyline is small on both axes relative to the sequence bounds.
pub fn is_noise(polyline: &Polyline, global: Rect, min_rel_size: f64) -> bool {
    if min_rel_size <= 0.0 {
        return false;
    }
    let gw = global.width().max(1e-9);
    let gh = global.height().max(1e-9);
    let b = polyline.bounds();
    b.width() / gw < min_rel_size && b.height() / gh < min_rel_size
}

/// `true` when the polyline looks like a rectangular border around the whole sequence.
pub fn is_outer_frame(polyline: &Polyline, global: Rect, rule: OuterFrameRule) -> bool {
    let gw = global.width();
    let gh = global.height();
    if gw <= 1e-9 || gh <= 1e-9 {
        return false;
    }

    let b = polyline.bounds();
    if b.width() / gw < rule.rel_tol || b.height() / gh < rule.rel_tol {
        return false;
    }

    let eps = rule.edge_rel_eps * gw.max(gh);
    let near = |a: f64, v: f64| (a - v).abs() <= eps;

    let mut on_edge = 0usize;
    // x0y0, x1y0, x0y1, x1y1
    let mut corners = [false; 4];
    for p in polyline.points() {
        let left = near(p.x, b.x0);
        let right = near(p.x, b.x1);
        let low = near(p.y, b.y0);
        let high = near(p.y, b.y1);
        if left || right || low || high {
            on_edge += 1;
        }
        match (left, right, low, high) {
            (true, _, true, _) => corners[0] = true,
            (_, true, true, _) => corners[1] = true,
            (true, _, _, true) => corners[2] = true,
            (_, true, _, true) => corners[3] = true,
            _ => {}
        }
    }

    let frac = on_edge as f64 / polyline.len().max(1) as f64;
    let corner_hits = corners.iter().filter(|&&c| c).count();
    frac >= rule.min_edge_fraction && corner_hits >= 3
}

#[cfg(test)]
#[path = "../../tests/unit/geometry/filter.rs"]
mod tests;

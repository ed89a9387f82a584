use crate::container::{DevicePoint, PointColor};
use crate::geometry::polyline::Polyline;

use super::normalize::Normalization;

/// Lowest derived per-frame point ceiling.
pub const MIN_CEILING: usize = 200;
/// Highest derived per-frame point ceiling.
pub const MAX_CEILING: usize = 60_000;

/// Device-rate parameters that bound how many points one frame may carry.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct BudgetConfig {
    /// Device rate in thousands of points per second.
    pub kpps: u32,
    /// Target frame rate.
    pub fps: f64,
    /// Share of the nominal per-frame capacity spent on drawing.
    pub ppf_ratio: f64,
    /// Fixed ceiling that bypasses the derived one.
    pub max_points_override: Option<u32>,
    /// Emit one blanked origin point for frames that would otherwise be empty.
    pub never_empty: bool,
}

impl Default for BudgetConfig {
    fn default() -> Self {
        Self {
            kpps: 30,
            fps: 25.0,
            ppf_ratio: 0.75,
            max_points_override: None,
            never_empty: true,
        }
    }
}

impl BudgetConfig {
    /// Points allowed per frame.
    pub fn ceiling(&self) -> usize {
        if let Some(n) = self.max_points_override {
            return n as usize;
        }
        let nominal = f64::from(self.kpps) * 1000.0 / self.fps * self.ppf_ratio;
        if !nominal.is_finite() {
            return MAX_CEILING;
        }
        (nominal.max(0.0) as usize).clamp(MIN_CEILING, MAX_CEILING)
    }
}

/// Outcome of budgeting one frame.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BudgetedFrame {
    /// Device points in drawing order, last-point bit set on the final one.
    pub points: Vec<DevicePoint>,
    /// Source points discarded because the ceiling was reached.
    pub dropped: usize,
    /// The single point is the synthetic never-empty placeholder.
    pub synthetic: bool,
}

impl BudgetedFrame {
    /// Whether the ceiling cut the frame short.
    pub fn truncated(&self) -> bool {
        self.dropped > 0
    }
}

/// Normalize and emit polylines in order, stopping at `ceiling` points.
///
/// Each polyline opens with a blank move to its first point; the rest are lit. `color_of`
/// resolves the device color of a polyline. The last emitted point carries the last-point bit.
pub fn budget_polylines<F>(
    polylines: &[Polyline],
    norm: &Normalization,
    ceiling: usize,
    never_empty: bool,
    mut color_of: F,
) -> BudgetedFrame
where
    F: FnMut(Option<&Polyline>) -> PointColor,
{
    let total: usize = polylines.iter().map(Polyline::len).sum();
    let mut points = Vec::with_capacity(total.min(ceiling));
    'outer: for pl in polylines {
        let color = color_of(Some(pl));
        for (i, &p) in pl.points().iter().enumerate() {
            if points.len() >= ceiling {
                break 'outer;
            }
            let (x, y) = norm.apply(p);
            points.push(if i == 0 {
                DevicePoint::blank(x, y, color)
            } else {
                DevicePoint::lit(x, y, color)
            });
        }
    }
    let dropped = total - points.len();

    let mut synthetic = false;
    if points.is_empty() && never_empty && ceiling > 0 {
        points.push(DevicePoint::blank(0, 0, color_of(None)));
        synthetic = true;
    }
    if let Some(last) = points.pop() {
        points.push(last.with_last(true));
    }
    BudgetedFrame {
        points,
        dropped,
        synthetic,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/compile/budget.rs"]
mod tests;

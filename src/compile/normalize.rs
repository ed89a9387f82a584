use crate::foundation::core::{
    DEVICE_MAX, DEVICE_MIN, DEVICE_SPAN, Point2D, Rect, round_half_toward_zero,
};
use crate::geometry::polyline::Frame;

/// Smallest extent used as the normalization span.
pub const MIN_SPAN: f64 = 1e-6;

/// Which bounding-box extent maps onto the device span.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum FitAxis {
    /// Larger of width and height; the whole drawing fits.
    #[default]
    Max,
    /// Smaller of width and height; the longer axis may clip.
    Min,
    /// Width only.
    X,
    /// Height only.
    Y,
}

impl FitAxis {
    fn span(self, bounds: Rect) -> f64 {
        let (w, h) = (bounds.width(), bounds.height());
        match self {
            Self::Max => w.max(h),
            Self::Min => w.min(h),
            Self::X => w,
            Self::Y => h,
        }
    }
}

/// Sequence-wide mapping from source space to device coordinates.
///
/// Computed once from the union of every frame and then applied unchanged to each of them.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Normalization {
    /// Source-space point mapped onto the device origin.
    pub center: Point2D,
    /// Device units per source unit before `fill_ratio`.
    pub scale: f64,
    /// Share of the device range used, in (0, 1].
    pub fill_ratio: f64,
    /// Flip the vertical axis (y-down sources onto a y-up device).
    pub invert_y: bool,
}

impl Default for Normalization {
    fn default() -> Self {
        Self::new(Point2D::ZERO, 1.0, 1.0)
    }
}

impl Normalization {
    /// Mapping without a vertical flip.
    pub fn new(center: Point2D, scale: f64, fill_ratio: f64) -> Self {
        Self {
            center,
            scale,
            fill_ratio,
            invert_y: false,
        }
    }

    /// Set the vertical flip.
    pub fn with_invert_y(mut self, invert_y: bool) -> Self {
        self.invert_y = invert_y;
        self
    }

    /// Fit `bounds` into the device range. No bounds yields the identity mapping.
    pub fn from_bounds(bounds: Option<Rect>, fit_axis: FitAxis, fill_ratio: f64) -> Self {
        match bounds {
            Some(b) => {
                let span = fit_axis.span(b).max(MIN_SPAN);
                Self::new(b.center(), DEVICE_SPAN / span, fill_ratio)
            }
            None => Self::new(Point2D::ZERO, 1.0, fill_ratio),
        }
    }

    /// Fit the union of every frame's geometry.
    pub fn from_frames(frames: &[Frame], fit_axis: FitAxis, fill_ratio: f64) -> Self {
        Self::from_bounds(sequence_bounds(frames), fit_axis, fill_ratio)
    }

    /// Map one source point to clamped device coordinates.
    pub fn apply(&self, p: Point2D) -> (i16, i16) {
        let k = self.scale * self.fill_ratio;
        let dx = (p.x - self.center.x) * k;
        let mut dy = (p.y - self.center.y) * k;
        if self.invert_y {
            dy = -dy;
        }
        (to_device(dx), to_device(dy))
    }
}

/// Bounding box of every point in every frame, or `None` when the sequence has no geometry.
pub fn sequence_bounds(frames: &[Frame]) -> Option<Rect> {
    frames
        .iter()
        .filter_map(Frame::bounds)
        .reduce(|a, b| a.union(b))
}

fn to_device(v: f64) -> i16 {
    if v.is_nan() {
        return 0;
    }
    round_half_toward_zero(v).clamp(f64::from(DEVICE_MIN), f64::from(DEVICE_MAX)) as i16
}

#[cfg(test)]
#[path = "../../tests/unit/compile/normalize.rs"]
mod tests;

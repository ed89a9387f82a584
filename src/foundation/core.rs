pub use kurbo::{Affine, BezPath, Point, Rect};

/// Source-space point (pixel or path units).
pub type Point2D = Point;

/// Lowest coordinate any emitted device point may carry.
pub const DEVICE_MIN: i32 = -32_767;
/// Highest coordinate any emitted device point may carry.
pub const DEVICE_MAX: i32 = 32_767;
/// Full addressable device extent along one axis.
pub const DEVICE_SPAN: f64 = (DEVICE_MAX - DEVICE_MIN) as f64;

/// Straight RGB8 color. Serialized as a `[r, g, b]` array.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(from = "[u8; 3]", into = "[u8; 3]")]
pub struct Rgb8 {
    /// Red.
    pub r: u8,
    /// Green.
    pub g: u8,
    /// Blue.
    pub b: u8,
}

impl Rgb8 {
    /// Full white.
    pub const WHITE: Self = Self::new(255, 255, 255);
    /// Black.
    pub const BLACK: Self = Self::new(0, 0, 0);

    /// Color from components.
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Sum of channels, used as a brightness proxy.
    pub fn brightness(self) -> u16 {
        u16::from(self.r) + u16::from(self.g) + u16::from(self.b)
    }

    pub(crate) fn distance_sq(self, other: Self) -> u32 {
        fn d(a: u8, b: u8) -> u32 {
            let v = i32::from(a) - i32::from(b);
            (v * v) as u32
        }
        d(self.r, other.r) + d(self.g, other.g) + d(self.b, other.b)
    }
}

impl From<[u8; 3]> for Rgb8 {
    fn from(v: [u8; 3]) -> Self {
        Self::new(v[0], v[1], v[2])
    }
}

impl From<Rgb8> for [u8; 3] {
    fn from(c: Rgb8) -> Self {
        [c.r, c.g, c.b]
    }
}

/// Grow an optional bounding box to include `p`.
pub(crate) fn extend_bounds(bounds: Option<Rect>, p: Point) -> Option<Rect> {
    Some(match bounds {
        Some(r) => r.union_pt(p),
        None => Rect::from_points(p, p),
    })
}

/// Round to the nearest integer, resolving exact halves toward zero.
///
/// Keeps the device mapping symmetric around the sequence center: `-0.5 * s` and `0.5 * s`
/// land on mirrored integers.
pub fn round_half_toward_zero(v: f64) -> f64 {
    if v >= 0.0 {
        (v - 0.5).ceil().max(0.0)
    } else {
        -((-v - 0.5).ceil().max(0.0))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;

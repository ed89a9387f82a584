use image::RgbImage;

use crate::foundation::core::{Point2D, Rgb8};
use crate::geometry::polyline::Polyline;

/// Largest accepted sampling window half-width, in pixels.
pub const MAX_HALF_WIDTH: u32 = 64;

/// Stroke color sampling from the image a polyline was traced from.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ColorSampleConfig {
    /// Sample stroke colors from the frame's color image.
    pub enabled: bool,
    /// Sample every Nth point.
    pub stride: usize,
    /// Half-width of the square window searched around each sample.
    pub half_width: u32,
}

impl Default for ColorSampleConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            stride: 6,
            half_width: 1,
        }
    }
}

/// Median color of the brightest pixel near every `stride`-th point, or white without samples.
pub fn sample_polyline_color(
    polyline: &Polyline,
    image: Option<&RgbImage>,
    cfg: &ColorSampleConfig,
) -> Rgb8 {
    let Some(image) = image else {
        return Rgb8::WHITE;
    };
    let samples: Vec<Rgb8> = polyline
        .points()
        .iter()
        .step_by(cfg.stride.max(1))
        .filter_map(|&p| brightest_near(image, p, cfg.half_width))
        .collect();
    median_color(&samples).unwrap_or(Rgb8::WHITE)
}

fn brightest_near(image: &RgbImage, p: Point2D, half_width: u32) -> Option<Rgb8> {
    let (w, h) = image.dimensions();
    let (x, y) = (p.x.round(), p.y.round());
    if !(x >= 0.0 && y >= 0.0 && x < f64::from(w) && y < f64::from(h)) {
        return None;
    }
    let (x, y) = (x as u32, y as u32);
    let (x0, x1) = (x.saturating_sub(half_width), x.saturating_add(half_width).min(w - 1));
    let (y0, y1) = (y.saturating_sub(half_width), y.saturating_add(half_width).min(h - 1));

    let mut best: Option<Rgb8> = None;
    for yy in y0..=y1 {
        for xx in x0..=x1 {
            let [r, g, b] = image.get_pixel(xx, yy).0;
            let c = Rgb8::new(r, g, b);
            if best.is_none_or(|cur| c.brightness() > cur.brightness()) {
                best = Some(c);
            }
        }
    }
    best
}

fn median_color(samples: &[Rgb8]) -> Option<Rgb8> {
    if samples.is_empty() {
        return None;
    }
    let channel = |f: fn(&Rgb8) -> u8| {
        let mut v: Vec<u8> = samples.iter().map(f).collect();
        v.sort_unstable();
        let mid = v.len() / 2;
        if v.len() % 2 == 1 {
            v[mid]
        } else {
            ((u16::from(v[mid - 1]) + u16::from(v[mid])) / 2) as u8
        }
    };
    Some(Rgb8::new(channel(|c| c.r), channel(|c| c.g), channel(|c| c.b)))
}

#[cfg(test)]
#[path = "../../tests/unit/compile/color.rs"]
mod tests;

use image::{Rgb, RgbImage};
use imageproc::drawing::draw_line_segment_mut;

use super::palette::Palette;
use super::{ContainerFrame, DevicePoint, PointColor};
use crate::foundation::core::{DEVICE_MAX, DEVICE_MIN, DEVICE_SPAN, Rgb8};

/// Rasterize one decoded frame on a black canvas for visual verification.
///
/// The full device range maps onto the canvas, device +Y pointing up. A segment is drawn from
/// each point to the next whenever the next point is lit, in the next point's color.
pub fn render_preview(
    frame: &ContainerFrame,
    palette: &Palette,
    width: u32,
    height: u32,
) -> RgbImage {
    let mut img = RgbImage::new(width.max(1), height.max(1));
    let (w, h) = (img.width(), img.height());
    for pair in frame.points.windows(2) {
        let (prev, cur) = (&pair[0], &pair[1]);
        if cur.is_blanked() {
            continue;
        }
        let color = resolve_color(cur, palette);
        draw_line_segment_mut(
            &mut img,
            to_canvas(prev, w, h),
            to_canvas(cur, w, h),
            Rgb([color.r, color.g, color.b]),
        );
    }
    img
}

fn resolve_color(p: &DevicePoint, palette: &Palette) -> Rgb8 {
    match p.color {
        PointColor::Rgb(c) => c,
        PointColor::Indexed(i) => palette.get(i),
    }
}

fn to_canvas(p: &DevicePoint, w: u32, h: u32) -> (f32, f32) {
    let clamp = |v: i16| f64::from(v).clamp(f64::from(DEVICE_MIN), f64::from(DEVICE_MAX));
    let u = (clamp(p.x) - f64::from(DEVICE_MIN)) / DEVICE_SPAN;
    let v = (f64::from(DEVICE_MAX) - clamp(p.y)) / DEVICE_SPAN;
    (
        (u * f64::from(w - 1)) as f32,
        (v * f64::from(h - 1)) as f32,
    )
}

#[cfg(test)]
#[path = "../../tests/unit/container/preview.rs"]
mod tests;

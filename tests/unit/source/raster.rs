use super::*;
use crate::foundation::core::{Point2D, Rgb8};
use image::{Luma, Rgb};

fn bar_mask() -> GrayImage {
    let mut img = GrayImage::new(20, 12);
    for y in 5..8 {
        for x in 2..18 {
            img.put_pixel(x, y, Luma([255]));
        }
    }
    img
}

#[test]
fn thick_bar_traces_to_one_simplified_stroke() {
    let src = RasterSource::new(vec![RasterFrame::Image {
        mask: bar_mask(),
        color: None,
    }]);
    let frame = src.extract(0, &CompileConfig::default()).unwrap();
    assert_eq!(frame.polylines.len(), 1);
    let pl = &frame.polylines[0];
    assert_eq!(pl.points(), &[Point2D::new(3.0, 6.0), Point2D::new(15.0, 6.0)]);
    assert!(pl.color.is_none());
}

#[test]
fn short_chains_are_dropped() {
    let src = RasterSource::new(vec![RasterFrame::Image {
        mask: bar_mask(),
        color: None,
    }]);
    let cfg = CompileConfig {
        min_polyline_points: 30,
        ..CompileConfig::default()
    };
    assert!(src.extract(0, &cfg).unwrap().polylines.is_empty());
}

#[test]
fn blank_mask_gives_empty_frame() {
    let src = RasterSource::new(vec![RasterFrame::Image {
        mask: GrayImage::new(16, 16),
        color: None,
    }]);
    let frame = src.extract(0, &CompileConfig::default()).unwrap();
    assert!(frame.polylines.is_empty());
    assert!(frame.warnings.is_empty());
}

#[test]
fn stroke_color_comes_from_color_image() {
    let mut color = RgbImage::new(20, 12);
    for y in 5..8 {
        for x in 2..18 {
            color.put_pixel(x, y, Rgb([220, 30, 40]));
        }
    }
    let src = RasterSource::new(vec![RasterFrame::Image {
        mask: bar_mask(),
        color: Some(color),
    }]);
    let cfg = CompileConfig::profile("arcade");
    let cfg = CompileConfig {
        min_polyline_points: 2,
        ..cfg
    };
    let frame = src.extract(0, &cfg).unwrap();
    assert_eq!(frame.polylines[0].color, Some(Rgb8::new(220, 30, 40)));
}

#[test]
fn missing_file_is_resource_error_for_that_frame() {
    let src = RasterSource::from_files(vec!["/nonexistent/frame_0001.png".into()]);
    let err = src.extract(0, &CompileConfig::default()).unwrap_err();
    assert!(err.is_resource());
    assert!(matches!(err, LaserError::Resource { frame: Some(0), .. }));
}

#[test]
fn out_of_range_index_is_rejected() {
    let src = RasterSource::default();
    assert!(src.extract(3, &CompileConfig::default()).is_err());
}

use super::*;
use crate::foundation::core::Point2D;

fn frame_with(color: Option<Rgb8>) -> Frame {
    let mut f = Frame::new(3);
    let mut pl = Polyline::new(vec![Point2D::new(0.0, 0.0), Point2D::new(1.0, 1.0)]).unwrap();
    pl.color = color;
    f.polylines.push(pl);
    f
}

#[test]
fn frames_get_prefixed_names_unless_named() {
    let enc = FrameEncoder::new(&CompileConfig::default(), Normalization::default());
    let mut f = frame_with(None);
    assert_eq!(enc.frame_name(&f), "F0003");
    f.name = Some("intro".to_owned());
    assert_eq!(enc.frame_name(&f), "intro");
    f.name = Some(String::new());
    assert_eq!(enc.frame_name(&f), "F0003");
    f.name = Some("   ".to_owned());
    assert_eq!(enc.frame_name(&f), "F0003");
}

#[test]
fn blank_named_empty_frame_still_encodes() {
    let cfg = CompileConfig {
        company: String::new(),
        budget: crate::compile::budget::BudgetConfig {
            never_empty: false,
            ..Default::default()
        },
        ..CompileConfig::default()
    };
    let enc = FrameEncoder::new(&cfg, Normalization::default());
    let mut f = Frame::new(2);
    f.name = Some("   ".to_owned());
    let (out, stats) = enc.encode(&f);
    assert_eq!(stats.points, 0);
    assert_eq!(out.name, "F0002");
    let bytes =
        crate::container::writer::encode_frame(&out, 2, 3, enc.palette()).unwrap();
    assert_eq!(&bytes[8..13], b"F0002");
}

#[test]
fn truecolor_uses_polyline_color_or_white() {
    let enc = FrameEncoder::new(&CompileConfig::default(), Normalization::default());
    let (out, stats) = enc.encode(&frame_with(Some(Rgb8::new(1, 2, 3))));
    assert_eq!(out.format, ContainerFormat::Truecolor2d);
    assert_eq!(out.company, "LASERLN");
    assert_eq!(stats.points, 2);
    assert!(out.points.iter().all(|p| p.color == PointColor::Rgb(Rgb8::new(1, 2, 3))));

    let (out, _) = enc.encode(&frame_with(None));
    assert_eq!(out.points[0].color, PointColor::Rgb(Rgb8::WHITE));
}

#[test]
fn indexed_maps_to_nearest_entry_or_default_index() {
    let cfg = CompileConfig::profile("la_linea");
    let enc = FrameEncoder::new(&cfg, Normalization::default());
    let (out, _) = enc.encode(&frame_with(None));
    assert_eq!(out.format, ContainerFormat::Indexed3d);
    assert_eq!(out.points[0].color, PointColor::Indexed(1));

    let (out, _) = enc.encode(&frame_with(Some(Rgb8::new(0, 0, 250))));
    assert_eq!(out.points[1].color, PointColor::Indexed(3));
}

#[test]
fn empty_frame_gets_synthetic_point() {
    let enc = FrameEncoder::new(&CompileConfig::default(), Normalization::default());
    let (out, stats) = enc.encode(&Frame::new(0));
    assert!(stats.synthetic);
    assert_eq!(out.points.len(), 1);
    assert!(out.points[0].is_blanked());
}

fn l_half(corner: (f64, f64), a: (f64, f64), b: (f64, f64)) -> Polyline {
    let mut pts = Vec::new();
    for (from, to) in [(a, corner), (corner, b)] {
        for i in 0..40 {
            let t = f64::from(i) / 40.0;
            pts.push(Point2D::new(
                from.0 + (to.0 - from.0) * t,
                from.1 + (to.1 - from.1) * t,
            ));
        }
    }
    pts.push(Point2D::new(b.0, b.1));
    Polyline::new(pts).unwrap()
}

#[test]
fn split_border_is_removed_in_device_space() {
    let h = 31_000.0;
    let mut f = Frame::new(0);
    f.polylines.push(l_half((-h, -h), (-h, h), (h, -h)));
    f.polylines.push(
        Polyline::new(vec![Point2D::new(-100.0, 0.0), Point2D::new(100.0, 50.0)]).unwrap(),
    );
    f.polylines.push(l_half((h, h), (h, -h), (-h, h)));

    let keep = FrameEncoder::new(&CompileConfig::default(), Normalization::default());
    let (out, stats) = keep.encode(&f);
    assert_eq!(stats.border_strokes, 0);
    assert_eq!(out.points.len(), 81 + 2 + 81);

    let cfg = CompileConfig {
        remove_outer_frame: true,
        ..CompileConfig::default()
    };
    let strip = FrameEncoder::new(&cfg, Normalization::default());
    let (out, stats) = strip.encode(&f);
    assert_eq!(stats.border_strokes, 2);
    assert_eq!(stats.points, 2);
    let xy: Vec<(i16, i16)> = out.points.iter().map(|p| (p.x, p.y)).collect();
    assert_eq!(xy, vec![(-100, 0), (100, 50)]);
    assert!(out.points[0].is_blanked());
    assert!(out.points[1].is_last());
}

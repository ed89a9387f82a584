use super::*;
use crate::container::writer::write_container;

fn square(format: ContainerFormat, color: PointColor) -> ContainerFrame {
    let mut f = ContainerFrame::new(format, "F0000", "LASERLN");
    f.points = vec![
        DevicePoint::blank(-16383, -16383, color),
        DevicePoint::lit(16383, -16383, color),
        DevicePoint::lit(16383, 16383, color),
        DevicePoint::lit(-16383, 16383, color),
    ];
    f
}

fn encode(frames: &[ContainerFrame]) -> Vec<u8> {
    let mut out = Vec::new();
    write_container(&mut out, frames).unwrap();
    out
}

#[test]
fn one_indexed_frame_then_terminator_reads_one_frame() {
    let bytes = encode(&[square(ContainerFormat::Indexed3d, PointColor::Indexed(7))]);
    let c = read_container(bytes.as_slice()).unwrap();
    assert_eq!(c.frames.len(), 1);
    let f = &c.frames[0];
    assert_eq!(f.points.len(), 4);
    assert_eq!((f.points[2].x, f.points[2].y), (16383, 16383));
    assert!(f.points[0].is_blanked());
    assert!(f.points[3].is_last());
    assert!(c.palette.is_none());
}

#[test]
fn truecolor_2d_reads_zero_z() {
    let color = PointColor::Rgb(Rgb8::new(1, 2, 3));
    let bytes = encode(&[square(ContainerFormat::Truecolor2d, color)]);
    let c = read_container(bytes.as_slice()).unwrap();
    assert!(c.frames[0].points.iter().all(|p| p.z == 0 && p.color == color));
}

#[test]
fn named_empty_frame_is_not_end_of_stream() {
    let empty = ContainerFrame::new(ContainerFormat::Indexed2d, "F0000", "LASERLN");
    let second = square(ContainerFormat::Indexed2d, PointColor::Indexed(1));
    let c = read_container(encode(&[empty, second]).as_slice()).unwrap();
    assert_eq!(c.frames.len(), 2);
    assert!(c.frames[0].points.is_empty());
    assert_eq!(c.frames[1].frame_number, 1);
    assert_eq!(c.frames[1].total_frames, 2);
}

#[test]
fn bytes_after_terminator_are_ignored() {
    let mut bytes = encode(&[square(ContainerFormat::Indexed3d, PointColor::Indexed(7))]);
    bytes.extend_from_slice(b"garbage after the end");
    assert_eq!(read_container(bytes.as_slice()).unwrap().frames.len(), 1);
}

#[test]
fn missing_terminator_ends_cleanly_on_header_boundary() {
    let mut bytes = encode(&[square(ContainerFormat::Indexed3d, PointColor::Indexed(7))]);
    bytes.truncate(bytes.len() - HEADER_LEN);
    assert_eq!(read_container(bytes.as_slice()).unwrap().frames.len(), 1);
}

#[test]
fn truncation_is_a_format_error() {
    let bytes = encode(&[square(ContainerFormat::Truecolor3d, PointColor::Indexed(7))]);
    let cut_records = &bytes[..HEADER_LEN + 15];
    assert!(matches!(read_container(cut_records), Err(LaserError::Format(_))));
    let cut_header = &bytes[..HEADER_LEN + 40 + 10];
    let err = read_container(cut_header).unwrap_err();
    assert!(err.to_string().contains("truncated header"));
}

#[test]
fn unsupported_format_code_is_rejected() {
    let mut bytes = encode(&[square(ContainerFormat::Indexed3d, PointColor::Indexed(7))]);
    bytes[7] = 3;
    assert!(matches!(read_container(bytes.as_slice()), Err(LaserError::Format(_))));
}

#[test]
fn bad_magic_on_later_header_is_rejected() {
    let mut bytes = encode(&[square(ContainerFormat::Indexed3d, PointColor::Indexed(7))]);
    let term = bytes.len() - HEADER_LEN;
    bytes[term] = b'X';
    assert!(matches!(read_container(bytes.as_slice()), Err(LaserError::Format(_))));
}

#[test]
fn color_table_records_become_the_palette() {
    let header = Header {
        format_code: PALETTE_CODE,
        name: "PAL".to_owned(),
        company: String::new(),
        record_count: 2,
        frame_number: 0,
        total_frames: 0,
        projector: 0,
    };
    let mut bytes = header.encode().to_vec();
    bytes.extend_from_slice(&[9, 8, 7, 6, 5, 4]);
    bytes.extend(encode(&[square(ContainerFormat::Indexed2d, PointColor::Indexed(1))]));

    let c = read_container(bytes.as_slice()).unwrap();
    assert_eq!(c.frames.len(), 1);
    let palette = c.palette.unwrap();
    assert_eq!(palette.get(0), Rgb8::new(9, 8, 7));
    assert_eq!(palette.get(1), Rgb8::new(6, 5, 4));
    assert_eq!(palette.get(2), Rgb8::BLACK);
}

#[test]
fn iterator_yields_frames_then_stops_after_error() {
    let a = square(ContainerFormat::Indexed2d, PointColor::Indexed(1));
    let mut bytes = encode(&[a.clone(), a]);
    let second = HEADER_LEN + 4 * 6;
    bytes[second] = b'X';
    let mut reader = FrameReader::new(bytes.as_slice());
    assert!(reader.next().unwrap().is_ok());
    assert!(reader.next().unwrap().is_err());
    assert!(reader.next().is_none());
}

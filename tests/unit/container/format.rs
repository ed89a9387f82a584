use super::*;

#[test]
fn record_lengths_follow_layout() {
    assert_eq!(ContainerFormat::Indexed3d.record_len(), 8);
    assert_eq!(ContainerFormat::Indexed2d.record_len(), 6);
    assert_eq!(ContainerFormat::Truecolor3d.record_len(), 10);
    assert_eq!(ContainerFormat::Truecolor2d.record_len(), 8);
}

#[test]
fn codes_round_trip_and_unknown_codes_fail() {
    for f in [
        ContainerFormat::Indexed3d,
        ContainerFormat::Indexed2d,
        ContainerFormat::Truecolor3d,
        ContainerFormat::Truecolor2d,
    ] {
        assert_eq!(ContainerFormat::from_code(f.code()).unwrap(), f);
    }
    for code in [2u8, 3, 6, 255] {
        let err = ContainerFormat::from_code(code).unwrap_err();
        assert!(err.to_string().contains("unsupported format code"));
    }
}

#[test]
fn header_layout_is_big_endian() {
    let h = Header {
        format_code: 5,
        name: "F0001".to_owned(),
        company: "LASERLN".to_owned(),
        record_count: 0x0102,
        frame_number: 3,
        total_frames: 0x0a0b,
        projector: 2,
    };
    let b = h.encode();
    assert_eq!(&b[0..4], b"ILDA");
    assert_eq!(&b[4..7], &[0, 0, 0]);
    assert_eq!(b[7], 5);
    assert_eq!(&b[8..16], b"F0001\0\0\0");
    assert_eq!(&b[16..24], b"LASERLN\0");
    assert_eq!(&b[24..26], &[1, 2]);
    assert_eq!(&b[26..28], &[0, 3]);
    assert_eq!(&b[28..30], &[0x0a, 0x0b]);
    assert_eq!(b[30], 2);
    assert_eq!(b[31], 0);
    assert_eq!(Header::decode(&b).unwrap(), h);
}

#[test]
fn long_names_are_cut_to_eight_bytes() {
    let h = Header {
        format_code: 0,
        name: "ABCDEFGHIJ".to_owned(),
        company: String::new(),
        record_count: 0,
        frame_number: 0,
        total_frames: 0,
        projector: 0,
    };
    let back = Header::decode(&h.encode()).unwrap();
    assert_eq!(back.name, "ABCDEFGH");
    assert!(back.company.is_empty());
}

#[test]
fn bad_magic_is_rejected() {
    let mut b = [0u8; HEADER_LEN];
    b[0..4].copy_from_slice(b"ILDB");
    assert!(matches!(Header::decode(&b), Err(LaserError::Format(_))));
}

#[test]
fn padded_names_read_as_terminator_after_encoding() {
    let mut h = Header {
        format_code: 5,
        name: " \0 ".to_owned(),
        company: String::new(),
        record_count: 0,
        frame_number: 0,
        total_frames: 1,
        projector: 0,
    };
    assert!(!h.is_terminator());
    assert!(h.reads_as_terminator());
    let decoded = Header::decode(&h.encode()).unwrap();
    assert!(decoded.is_terminator());

    h.name = " x".to_owned();
    assert!(!h.reads_as_terminator());
    h.name.clear();
    h.record_count = 1;
    assert!(!h.reads_as_terminator());
}

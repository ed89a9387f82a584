use super::*;

#[test]
fn standard_table_layout() {
    let p = Palette::standard();
    assert_eq!(p.entries().len(), PALETTE_LEN);
    assert_eq!(p.get(0), Rgb8::BLACK);
    assert_eq!(p.get(1), Rgb8::new(255, 0, 0));
    assert_eq!(p.get(7), Rgb8::WHITE);
    assert_eq!(p.get(14), Rgb8::new(128, 128, 128));
    // cube starts at 15 with blue varying fastest
    assert_eq!(p.get(15), Rgb8::new(0, 0, 0));
    assert_eq!(p.get(16), Rgb8::new(0, 0, 51));
    assert_eq!(p.get(230), Rgb8::WHITE);
    assert_eq!(p.get(255), Rgb8::BLACK);
}

#[test]
fn white63_overrides_low_indices_only() {
    let p = Palette::white63();
    assert_eq!(p.get(0), Rgb8::BLACK);
    assert!((1..=63).all(|i| p.get(i) == Rgb8::WHITE));
    assert_eq!(p.get(64), Palette::standard().get(64));
    assert_eq!(p.get(64), Rgb8::new(51, 102, 51));
}

#[test]
fn nearest_prefers_named_entries_and_skips_slot_zero() {
    let p = Palette::standard();
    assert_eq!(p.nearest(Rgb8::new(250, 5, 5)), 1);
    assert_eq!(p.nearest(Rgb8::WHITE), 7);
    assert_eq!(p.nearest(Rgb8::BLACK), 15);
}

#[test]
fn lookup_by_name_is_case_insensitive() {
    assert_eq!(Palette::by_name("IDTF14"), Some(Palette::standard()));
    assert_eq!(Palette::by_name(" white63 "), Some(Palette::white63()));
    assert!(Palette::by_name("sepia").is_none());
}

#[test]
fn short_tables_pad_with_black() {
    let p = Palette::from_entries(vec![Rgb8::WHITE; 3]);
    assert_eq!(p.entries().len(), PALETTE_LEN);
    assert_eq!(p.get(2), Rgb8::WHITE);
    assert_eq!(p.get(3), Rgb8::BLACK);
}

use super::*;

fn checker_image() -> Image {
    let palette = Palette::new(vec![
        PaletteEntry { red: 0, green: 0, blue: 0 },
        PaletteEntry { red: 255, green: 255, blue: 255 },
    ])
    .unwrap();
    Image::new(2, 2, palette, vec![0, 1, 1, 0]).unwrap()
}

// ============================================================================
// Construction
// ============================================================================

#[test]
fn test_pixel_buffer_size_checked() {
    let palette = Palette::new(Vec::new()).unwrap();
    assert!(Image::new(4, 4, palette, vec![0; 15]).is_err());
}

#[test]
fn test_palette_entry_limit() {
    assert!(Palette::new(vec![PaletteEntry::default(); 257]).is_err());
    assert!(Palette::new(vec![PaletteEntry::default(); 256]).is_ok());
}

#[test]
fn test_pixel_lookup() {
    let img = checker_image();
    assert_eq!(img.pixel(0, 0), Some(0));
    assert_eq!(img.pixel(1, 0), Some(1));
    assert_eq!(img.pixel(0, 1), Some(1));
    assert_eq!(img.pixel(2, 0), None);
    assert_eq!(img.pixel(0, 2), None);
}

// ============================================================================
// Blob round trip
// ============================================================================

#[test]
fn test_write_then_read_round_trip() {
    let img = checker_image();
    let mut blob = Vec::new();
    img.write_to(&mut blob);

    let parsed = Image::read_from(&blob).unwrap();
    assert_eq!(parsed.width(), 2);
    assert_eq!(parsed.height(), 2);
    assert_eq!(parsed.palette().len(), 2);
    assert_eq!(parsed.pixels(), img.pixels());
}

#[test]
fn test_read_truncated_blob_fails() {
    let img = checker_image();
    let mut blob = Vec::new();
    img.write_to(&mut blob);
    blob.truncate(blob.len() - 2);
    assert!(Image::read_from(&blob).is_err());
}

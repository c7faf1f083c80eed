//! Icon library against real files

mod common;

use std::fs;
use std::sync::Arc;

use ember_core::config::DisplayConfig;
use ember_core::icon::{encode_hex, Bitmap, StatusIcon};
use ember_host::{IconError, IconLibrary};
use tempfile::TempDir;

fn library_with(files: &[(&str, &str)]) -> (TempDir, IconLibrary) {
    let dir = tempfile::tempdir().unwrap();
    for (name, text) in files {
        fs::write(dir.path().join(format!("{name}.hex")), text).unwrap();
    }
    let library = IconLibrary::new(dir.path());
    (dir, library)
}

#[test]
fn test_load_declared_icon() {
    let (_dir, mut library) = library_with(&[(
        "arrow",
        "// arrow, 8x2px\n// 0xFF in a comment is ignored\n0x81, 0x7e\n",
    )]);

    let icon = library.load("arrow").unwrap();
    assert_eq!((icon.width(), icon.height()), (8, 2));
    assert_eq!(icon.as_bytes(), &[0x81, 0x7E]);
}

#[test]
fn test_missing_icon_is_none() {
    let (_dir, mut library) = library_with(&[]);
    assert!(library.load("flame").is_none());
    assert!(matches!(library.read("flame"), Err(IconError::NotFound(_))));
}

#[test]
fn test_unreadable_icon_is_none() {
    let (dir, mut library) = library_with(&[]);
    // A directory where the file should be
    fs::create_dir(dir.path().join("flame.hex")).unwrap();
    assert!(library.load("flame").is_none());
}

#[test]
fn test_short_data_padded_to_defaults() {
    let (_dir, mut library) = library_with(&[("short", "0xff, 0xff")]);
    let icon = library.load("short").unwrap();
    assert_eq!((icon.width(), icon.height()), (16, 16));
    assert_eq!(icon.count_lit(), 16);
    assert!(icon.bits().skip(16).all(|lit| !lit));
}

#[test]
fn test_configured_default_size() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("blob.hex"), "0xff ".repeat(8)).unwrap();
    let config = DisplayConfig {
        icon_width: 8,
        icon_height: 8,
        ..Default::default()
    };
    let mut library = IconLibrary::from_config(dir.path(), &config);
    let icon = library.load("blob").unwrap();
    assert_eq!((icon.width(), icon.height()), (8, 8));
    assert_eq!(icon.count_lit(), 64);
}

#[test]
fn test_cache_returns_same_bitmap() {
    let (dir, mut library) = library_with(&[("dot", "// 8x1px\n0x80")]);
    let first = library.load("dot").unwrap();

    // Later edits aren't seen until the cache is cleared
    fs::write(dir.path().join("dot.hex"), "// 8x1px\n0x01").unwrap();
    let second = library.load("dot").unwrap();
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(library.cached(), 1);

    library.clear_cache();
    let third = library.load("dot").unwrap();
    assert_eq!(third.as_bytes(), &[0x01]);
}

#[test]
fn test_series_skips_missing_frames() {
    let (_dir, mut library) = library_with(&[
        ("frame_1", "// 8x1px\n0x01"),
        ("frame_3", "// 8x1px\n0x03"),
    ]);
    let frames = library.load_series("frame_", 1..5);
    let bytes: Vec<u8> = frames.iter().map(|f| f.as_bytes()[0]).collect();
    assert_eq!(bytes, [0x01, 0x03]);
}

#[test]
fn test_sheet() {
    let (_dir, library) = library_with(&[(
        "pair",
        "// 8x1px\n0xf0\n---IMAGE---\n// 8x1px\n0x0f\n",
    )]);
    let icons = library.read_sheet("pair").unwrap();
    assert_eq!(icons.len(), 2);
    assert_eq!(icons[0].as_bytes(), &[0xF0]);
    assert_eq!(icons[1].as_bytes(), &[0x0F]);
}

#[test]
fn test_encoded_file_round_trips() {
    let original = Bitmap::from_bits(24, 8, (0..24 * 8).map(|i| i % 3 == 0));
    let text = encode_hex(&original);
    let (_dir, mut library) = library_with(&[("pattern", text.as_str())]);
    let loaded = library.load("pattern").unwrap();
    assert_eq!(*loaded, original);
}

#[test]
fn test_shipped_status_icons_load() {
    let mut library = IconLibrary::new(common::shipped_icons());
    for icon in StatusIcon::ALL {
        let bitmap = library
            .load(icon.name())
            .unwrap_or_else(|| panic!("missing {}", icon.name()));
        assert_eq!((bitmap.width(), bitmap.height()), (16, 16));
        assert!(bitmap.count_lit() > 0);
    }
}

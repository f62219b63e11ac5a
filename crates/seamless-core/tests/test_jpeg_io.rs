use seamless_core::io::jpeg::{load_image, save_jpeg};
use seamless_core::raster::{rgb_to_gray, Raster};

#[test]
fn test_jpeg_round_trip_rgb() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let path = dir.path().join("solid.jpg");

    let original = Raster::from_vec(
        vec![100u8, 150, 200].repeat(32 * 32),
        32,
        32,
        3,
    )
    .expect("test buffer matches dims");

    save_jpeg(&path, &original, 95).expect("save jpeg");
    let loaded = load_image(&path).expect("load jpeg");

    assert_eq!((loaded.width, loaded.height, loaded.channels), (32, 32, 3));
    // JPEG is lossy; a solid color should still survive nearly intact.
    for (i, (&a, &b)) in loaded.data.iter().zip(original.data.iter()).enumerate() {
        assert!(
            (a as i32 - b as i32).abs() <= 8,
            "element {i}: loaded {a}, original {b}"
        );
    }
}

#[test]
fn test_jpeg_gray_save_and_reload() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let path = dir.path().join("gray.jpg");

    let gray = Raster::filled(16, 16, 1, 128u8);
    save_jpeg(&path, &gray, 95).expect("save gray jpeg");

    // load_image always expands to RGB; all channels should match the
    // original gray level.
    let loaded = load_image(&path).expect("load jpeg");
    assert_eq!((loaded.width, loaded.height, loaded.channels), (16, 16, 3));
    for &v in &loaded.data {
        assert!((v as i32 - 128).abs() <= 8, "gray level drifted: {v}");
    }
}

#[test]
fn test_save_rejects_unsupported_channel_count() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let path = dir.path().join("bad.jpg");
    let two_channel = Raster::filled(4, 4, 2, 0u8);
    assert!(save_jpeg(&path, &two_channel, 90).is_err());
}

#[test]
fn test_load_missing_file_errors() {
    let err = load_image(std::path::Path::new("/nonexistent/definitely-missing.jpg"));
    assert!(err.is_err());
}

#[test]
fn test_rgb_to_gray_luma_weights() {
    let img = Raster::from_vec(vec![255u8, 0, 0, 0, 255, 0, 0, 0, 255, 255, 255, 255], 4, 1, 3)
        .expect("test buffer matches dims");
    let gray = rgb_to_gray(&img).expect("convert");
    assert_eq!(gray.channels, 1);
    assert_eq!(gray.data.len(), 4);
    // Rec.601: 0.299 R, 0.587 G, 0.114 B (truncating cast).
    assert_eq!(gray.data[0], 76);
    assert_eq!(gray.data[1], 149);
    assert_eq!(gray.data[2], 29);
    assert!(gray.data[3] >= 254, "white should stay white, got {}", gray.data[3]);
}

#[test]
fn test_rgb_to_gray_rejects_gray_input() {
    let gray = Raster::filled(4, 4, 1, 10u8);
    assert!(rgb_to_gray(&gray).is_err());
}

use seamless_core::border::{add_border, crop, BorderMode};
use seamless_core::raster::Raster;

fn gray(width: usize, height: usize, values: &[u8]) -> Raster<u8> {
    Raster::from_vec(values.to_vec(), width, height, 1).expect("test buffer matches dims")
}

// ---------------------------------------------------------------------------
// add_border
// ---------------------------------------------------------------------------

#[test]
fn test_reflect_border_row_pattern() {
    // [a, b, c] with 3 pixels of border either side must read
    // c, b, a | a, b, c | c, b, a  -- mirrored, no edge pixel repeated.
    let src = gray(3, 1, &[1, 2, 3]);
    let dst = add_border(&src, 0, 0, 3, 3, BorderMode::Reflect);
    assert_eq!(dst.width, 9);
    assert_eq!(dst.data, vec![3, 2, 1, 1, 2, 3, 3, 2, 1]);
}

#[test]
fn test_reflect_border_column_pattern() {
    let src = gray(1, 3, &[1, 2, 3]);
    let dst = add_border(&src, 2, 2, 0, 0, BorderMode::Reflect);
    assert_eq!(dst.height, 7);
    assert_eq!(dst.data, vec![2, 1, 1, 2, 3, 3, 2]);
}

#[test]
fn test_constant_border_is_zero() {
    let src = gray(2, 2, &[9, 9, 9, 9]);
    let dst = add_border(&src, 1, 1, 1, 1, BorderMode::Constant);
    assert_eq!((dst.width, dst.height), (4, 4));
    // Interior preserved.
    assert_eq!(dst.data[1 * 4 + 1], 9);
    assert_eq!(dst.data[2 * 4 + 2], 9);
    // Every border pixel is zero.
    for y in 0..4 {
        for x in 0..4 {
            if (1..3).contains(&x) && (1..3).contains(&y) {
                continue;
            }
            assert_eq!(dst.data[y * 4 + x], 0, "border pixel ({x},{y})");
        }
    }
}

#[test]
fn test_border_preserves_interleaved_channels() {
    let src = Raster::from_vec(vec![10, 20, 30, 40, 50, 60], 2, 1, 3)
        .expect("test buffer matches dims");
    let dst = add_border(&src, 0, 0, 1, 1, BorderMode::Reflect);
    assert_eq!(dst.width, 4);
    // Left border mirrors pixel 0, right border mirrors pixel 1.
    assert_eq!(&dst.data[0..3], &[10, 20, 30]);
    assert_eq!(&dst.data[3..6], &[10, 20, 30]);
    assert_eq!(&dst.data[6..9], &[40, 50, 60]);
    assert_eq!(&dst.data[9..12], &[40, 50, 60]);
}

#[test]
fn test_zero_margins_copy_through() {
    let src = gray(3, 2, &[1, 2, 3, 4, 5, 6]);
    let dst = add_border(&src, 0, 0, 0, 0, BorderMode::Reflect);
    assert_eq!(dst.data, src.data);
}

// ---------------------------------------------------------------------------
// crop
// ---------------------------------------------------------------------------

#[test]
fn test_crop_cuts_edges() {
    let mut img = gray(4, 4, &(1..=16).collect::<Vec<u8>>());
    crop(&mut img, 1, 1, 1, 1);
    assert_eq!((img.width, img.height), (2, 2));
    assert_eq!(img.data, vec![6, 7, 10, 11]);
}

#[test]
fn test_crop_right_bottom_only() {
    let mut img = gray(4, 2, &[1, 2, 3, 4, 5, 6, 7, 8]);
    crop(&mut img, 0, 1, 0, 2);
    assert_eq!((img.width, img.height), (2, 1));
    assert_eq!(img.data, vec![1, 2]);
}

#[test]
fn test_crop_degenerate_is_a_no_op() {
    let original = gray(3, 3, &(1..=9).collect::<Vec<u8>>());
    let mut img = original.clone();
    crop(&mut img, 2, 2, 0, 0);
    assert_eq!(img, original);

    let mut img = original.clone();
    crop(&mut img, 0, 0, 3, 0);
    assert_eq!(img, original);
}

#[test]
fn test_crop_rgb_keeps_channels_together() {
    let mut img = Raster::from_vec(
        vec![
            1, 2, 3, 4, 5, 6, //
            7, 8, 9, 10, 11, 12,
        ],
        2,
        2,
        3,
    )
    .expect("test buffer matches dims");
    crop(&mut img, 0, 1, 1, 0);
    assert_eq!((img.width, img.height), (1, 1));
    assert_eq!(img.data, vec![4, 5, 6]);
}

use seamless_core::mask::{create_mask, create_vertical_mask};

#[test]
fn test_mask_left_stripe() {
    let mask = create_mask(10, 4, 0.25, true, false);
    assert_eq!((mask.width, mask.height, mask.channels), (10, 4, 1));
    for y in 0..4 {
        for x in 0..10 {
            let expected = if x < 2 { 0 } else { 255 };
            assert_eq!(mask.data[y * 10 + x], expected, "pixel ({x},{y})");
        }
    }
}

#[test]
fn test_mask_right_stripe() {
    let mask = create_mask(10, 4, 0.25, false, true);
    for y in 0..4 {
        for x in 0..10 {
            let expected = if x >= 8 { 0 } else { 255 };
            assert_eq!(mask.data[y * 10 + x], expected, "pixel ({x},{y})");
        }
    }
}

#[test]
fn test_mask_both_sides() {
    let mask = create_mask(10, 2, 0.3, true, true);
    for y in 0..2 {
        for x in 0..10 {
            let expected = if x < 3 || x >= 7 { 0 } else { 255 };
            assert_eq!(mask.data[y * 10 + x], expected, "pixel ({x},{y})");
        }
    }
}

#[test]
fn test_mask_neither_side_is_all_white() {
    let mask = create_mask(8, 8, 0.5, false, false);
    assert!(mask.data.iter().all(|&v| v == 255));
}

#[test]
fn test_mask_stripe_width_floors() {
    // 0.1 * 15 = 1.5 -> 1 column.
    let mask = create_mask(15, 1, 0.1, true, false);
    assert_eq!(mask.data[0], 0);
    assert_eq!(mask.data[1], 255);
}

#[test]
fn test_vertical_mask_top_stripe() {
    let mask = create_vertical_mask(4, 10, 0.25, true, false);
    for y in 0..10 {
        for x in 0..4 {
            let expected = if y < 2 { 0 } else { 255 };
            assert_eq!(mask.data[y * 4 + x], expected, "pixel ({x},{y})");
        }
    }
}

#[test]
fn test_vertical_mask_bottom_stripe() {
    let mask = create_vertical_mask(4, 10, 0.25, false, true);
    for y in 0..10 {
        for x in 0..4 {
            let expected = if y >= 8 { 0 } else { 255 };
            assert_eq!(mask.data[y * 4 + x], expected, "pixel ({x},{y})");
        }
    }
}

#[test]
fn test_vertical_mask_neither_side_is_all_white() {
    let mask = create_vertical_mask(6, 6, 0.9, false, false);
    assert!(mask.data.iter().all(|&v| v == 255));
}

#[test]
fn test_mask_full_range_clamps() {
    let mask = create_mask(4, 2, 1.5, true, false);
    assert!(mask.data.iter().all(|&v| v == 0));
}

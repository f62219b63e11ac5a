//! Chamfer distance transform for feather-blend masks.

use ndarray::Array2;

use crate::raster::Raster;

const AXIAL: f32 = 1.0;
const DIAGONAL: f32 = 1.4;

/// Two-pass chamfer distance transform of a single-channel mask, in place.
///
/// Pixels inside the mask (value > 0) keep their value; outside pixels
/// receive the approximate distance to the mask region, saturating at 255.
/// The neighborhood is the 3-4-5-style chamfer extended with two
/// knight-move neighbors weighted axial + diagonal.
pub fn distance_transform(mask: &mut Raster<u8>) {
    debug_assert_eq!(mask.channels, 1);
    let w = mask.width;
    let h = mask.height;
    if w == 0 || h == 0 {
        return;
    }

    let mut dist = Array2::<f32>::zeros((h, w));
    for y in 0..h {
        for x in 0..w {
            dist[[y, x]] = if mask.data[y * w + x] > 0 { 0.0 } else { 255.0 };
        }
    }

    // Forward pass, top-left to bottom-right.
    for y in 0..h as isize {
        for x in 0..w as isize {
            let current = dist[[y as usize, x as usize]];
            if current == 0.0 {
                continue;
            }
            let mut min_val = current;
            min_val = min_val.min(get(&dist, x - 1, y) + AXIAL);
            min_val = min_val.min(get(&dist, x, y - 1) + AXIAL);
            min_val = min_val.min(get(&dist, x - 1, y - 1) + DIAGONAL);
            min_val = min_val.min(get(&dist, x + 1, y - 1) + DIAGONAL);
            min_val = min_val.min(get(&dist, x - 2, y - 1) + AXIAL + DIAGONAL);
            min_val = min_val.min(get(&dist, x - 1, y - 2) + AXIAL + DIAGONAL);
            dist[[y as usize, x as usize]] = min_val;
        }
    }

    // Backward pass, bottom-right to top-left, mirrored neighborhood.
    for y in (0..h as isize).rev() {
        for x in (0..w as isize).rev() {
            let mut min_val = dist[[y as usize, x as usize]];
            min_val = min_val.min(get(&dist, x + 1, y) + AXIAL);
            min_val = min_val.min(get(&dist, x, y + 1) + AXIAL);
            min_val = min_val.min(get(&dist, x + 1, y + 1) + DIAGONAL);
            min_val = min_val.min(get(&dist, x - 1, y + 1) + DIAGONAL);
            min_val = min_val.min(get(&dist, x + 2, y + 1) + AXIAL + DIAGONAL);
            min_val = min_val.min(get(&dist, x + 1, y + 2) + AXIAL + DIAGONAL);
            dist[[y as usize, x as usize]] = min_val;
        }
    }

    for y in 0..h {
        for x in 0..w {
            let d = dist[[y, x]];
            if d != 0.0 {
                mask.data[y * w + x] = d as u8;
            }
        }
    }
}

/// Distance at `(x, y)`, or +inf outside the buffer.
fn get(dist: &Array2<f32>, x: isize, y: isize) -> f32 {
    let (h, w) = dist.dim();
    if x < 0 || y < 0 || x >= w as isize || y >= h as isize {
        f32::INFINITY
    } else {
        dist[[y as usize, x as usize]]
    }
}

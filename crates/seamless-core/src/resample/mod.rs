//! Separable 5x5 Gaussian resampling: 2:1 downsample and 1:2 upsample with
//! reflective borders. Generic over the pixel type; u8 takes an integer
//! SIMD fast path (see [`simd`]).

pub mod simd;

use crate::consts::GAUSSIAN_KERNEL;
use crate::parallel::for_each_row_band;
use crate::raster::{Pixel, Raster};

/// Mirror an out-of-range index back into `[0, n)`: `-i` below zero,
/// `2n - i - 2` past the end. No edge element is repeated. Indices further
/// than one mirror period away are clamped to the nearest edge.
pub fn reflect(i: isize, n: isize) -> isize {
    let r = if i < 0 {
        -i
    } else if i >= n {
        2 * n - i - 2
    } else {
        i
    };
    r.clamp(0, n - 1)
}

/// Low-pass and halve: `(W, H)` to `(W / 2, H / 2)`.
///
/// Each output pixel is the 5x5 Gaussian-weighted sum around the source
/// position `(2x, 2y)`, with reflective borders on all four sides.
pub fn downsample<T: Pixel>(src: &Raster<T>) -> Raster<T> {
    if let Some(fast) = T::downsample_fast(src) {
        return fast;
    }
    downsample_scalar(src)
}

/// Scalar reference implementation of [`downsample`]. The fast path must
/// match this modulo the final rounding/clamp.
pub fn downsample_scalar<T: Pixel>(src: &Raster<T>) -> Raster<T> {
    let new_w = src.width / 2;
    let new_h = src.height / 2;
    let channels = src.channels;
    let mut dst = Raster::new(new_w, new_h, channels);
    if new_w == 0 || new_h == 0 {
        return dst;
    }

    let row_len = dst.row_len();
    let src_h = src.height as isize;
    let src_w = src.width as isize;
    for_each_row_band(&mut dst.data, row_len, |start_row, band| {
        for (dy, row) in band.chunks_mut(row_len).enumerate() {
            let y = (start_row + dy) as isize;
            for x in 0..new_w {
                for c in 0..channels {
                    let mut sum = 0.0f32;
                    for i in -2..3isize {
                        let sy = reflect(2 * y + i, src_h) as usize;
                        let wy = GAUSSIAN_KERNEL[(i + 2) as usize];
                        for j in -2..3isize {
                            let sx = reflect(2 * x as isize + j, src_w) as usize;
                            let wx = GAUSSIAN_KERNEL[(j + 2) as usize];
                            let v = src.data[(sy * src.width + sx) * channels + c];
                            sum += wy * wx * v.to_f32();
                        }
                    }
                    row[x * channels + c] = T::from_downsample(sum);
                }
            }
        }
    });
    dst
}

/// Zero-insertion upsample: `(W, H)` to `(2W, 2H)`.
///
/// Odd output coordinates carry no source sample; surviving samples are
/// scaled by `factor` before the 5x5 Gaussian is applied. The blenders
/// always pass [`crate::consts::UPSAMPLE_GAIN`].
pub fn upsample<T: Pixel>(src: &Raster<T>, factor: f32) -> Raster<T> {
    let new_w = src.width * 2;
    let new_h = src.height * 2;
    let channels = src.channels;
    let mut dst = Raster::new(new_w, new_h, channels);
    if new_w == 0 || new_h == 0 {
        return dst;
    }

    let row_len = dst.row_len();
    let nh = new_h as isize;
    let nw = new_w as isize;
    for_each_row_band(&mut dst.data, row_len, |start_row, band| {
        for (dy, row) in band.chunks_mut(row_len).enumerate() {
            let y = (start_row + dy) as isize;
            for x in 0..new_w {
                for c in 0..channels {
                    let mut sum = 0.0f32;
                    for ki in 0..5isize {
                        let sy = reflect(y + ki - 2, nh);
                        if sy % 2 != 0 {
                            continue;
                        }
                        for kj in 0..5isize {
                            let sx = reflect(x as isize + kj - 2, nw);
                            if sx % 2 != 0 {
                                continue;
                            }
                            let pos = ((sy / 2) as usize * src.width + (sx / 2) as usize)
                                * channels
                                + c;
                            sum += GAUSSIAN_KERNEL[ki as usize]
                                * GAUSSIAN_KERNEL[kj as usize]
                                * src.data[pos].to_f32()
                                * factor;
                        }
                    }
                    row[x * channels + c] = T::from_upsample(sum);
                }
            }
        }
    });
    dst
}

//! Integer separable fast path for the u8 downsample.
//!
//! Horizontal pass: each source row contributing to an output row is
//! convolved with the unnormalized taps [1, 4, 6, 4, 1] into an i32 buffer.
//! Vertical pass: five such buffers combine as
//! `(r0 + 4*(r1 + r2 + r3) + 2*r2 + r4 + 128) >> 8`, packing back to u8.
//! Output rows advance by two source rows, so three of the five horizontal
//! buffers roll over between consecutive output rows.
//!
//! On x86_64 with AVX2 the vertical combine and the single-channel
//! horizontal pass run eight lanes at a time; the scalar loops are the
//! bit-exact fallback and handle row edges and tails.

use crate::parallel::for_each_row_band;
use crate::raster::Raster;

use super::reflect;

pub fn downsample_u8(src: &Raster<u8>) -> Raster<u8> {
    let new_w = src.width / 2;
    let new_h = src.height / 2;
    let mut dst = Raster::new(new_w, new_h, src.channels);
    if new_w == 0 || new_h == 0 {
        return dst;
    }

    let row_len = dst.row_len();
    for_each_row_band(&mut dst.data, row_len, |start_row, band| {
        convolve_band(src, start_row, band, row_len);
    });
    dst
}

/// Convolve the output rows `[start_row, start_row + band_rows)` with a
/// rolling window of five horizontally convolved source rows.
fn convolve_band(src: &Raster<u8>, start_row: usize, band: &mut [u8], row_len: usize) {
    let src_h = src.height as isize;
    let mut rows: [Vec<i32>; 5] = std::array::from_fn(|_| vec![0i32; row_len]);

    // Seed the window around source row 2 * start_row.
    let center = start_row as isize * 2;
    for (slot, buf) in rows.iter_mut().enumerate() {
        let sy = reflect(center + slot as isize - 2, src_h) as usize;
        hconv_row(src.row(sy), src.width, src.channels, buf);
    }

    for (i, out_row) in band.chunks_mut(row_len).enumerate() {
        if i > 0 {
            // Advance two source rows: slots 2..4 become 0..2, refill 3..4.
            let base = (start_row + i) as isize * 2;
            rows.rotate_left(2);
            let (_, tail) = rows.split_at_mut(3);
            let sy1 = reflect(base + 1, src_h) as usize;
            let sy2 = reflect(base + 2, src_h) as usize;
            hconv_row(src.row(sy1), src.width, src.channels, &mut tail[0]);
            hconv_row(src.row(sy2), src.width, src.channels, &mut tail[1]);
        }
        vconv_row(&rows[0], &rows[1], &rows[2], &rows[3], &rows[4], out_row);
    }
}

fn hconv_row(src_row: &[u8], src_w: usize, channels: usize, out: &mut [i32]) {
    match channels {
        1 => hconv_row_1(src_row, src_w, out),
        _ => hconv_row_3(src_row, src_w, out),
    }
}

/// Single-channel horizontal pass.
fn hconv_row_1(src_row: &[u8], src_w: usize, out: &mut [i32]) {
    let dst_w = out.len();
    let mut x = 0;

    #[cfg(target_arch = "x86_64")]
    if dst_w > 9 && is_x86_feature_detected!("avx2") {
        // Column 0 touches reflected indices; keep it scalar.
        hconv_scalar_1(src_row, src_w, out, 0, 1);
        // SAFETY: AVX2 is available; the vector loop stays within
        // x in [1, dst_w - 8), whose widest load ends at source byte
        // 2 * dst_w - 2 < src_w.
        x = unsafe { avx2::hconv_1(src_row, out, 1, dst_w - 8) };
    }

    hconv_scalar_1(src_row, src_w, out, x, dst_w);
}

fn hconv_scalar_1(src_row: &[u8], src_w: usize, out: &mut [i32], start: usize, end: usize) {
    let n = src_w as isize;
    for x in start..end {
        let xx = 2 * x as isize;
        let s0 = src_row[reflect(xx - 2, n) as usize] as i32;
        let s1 = src_row[reflect(xx - 1, n) as usize] as i32;
        let s2 = src_row[xx as usize] as i32;
        let s3 = src_row[reflect(xx + 1, n) as usize] as i32;
        let s4 = src_row[reflect(xx + 2, n) as usize] as i32;
        out[x] = s0 + 4 * s1 + 6 * s2 + 4 * s3 + s4;
    }
}

/// Interleaved RGB horizontal pass.
fn hconv_row_3(src_row: &[u8], src_w: usize, out: &mut [i32]) {
    let dst_w = out.len() / 3;
    let n = src_w as isize;
    for x in 0..dst_w {
        let xx = 2 * x as isize;
        let p0 = reflect(xx - 2, n) as usize;
        let p1 = reflect(xx - 1, n) as usize;
        let p2 = xx as usize;
        let p3 = reflect(xx + 1, n) as usize;
        let p4 = reflect(xx + 2, n) as usize;
        for c in 0..3 {
            out[x * 3 + c] = src_row[p0 * 3 + c] as i32
                + 4 * (src_row[p1 * 3 + c] as i32)
                + 6 * (src_row[p2 * 3 + c] as i32)
                + 4 * (src_row[p3 * 3 + c] as i32)
                + src_row[p4 * 3 + c] as i32;
        }
    }
}

/// Vertical combine of five horizontal buffers into one u8 output row.
fn vconv_row(r0: &[i32], r1: &[i32], r2: &[i32], r3: &[i32], r4: &[i32], out: &mut [u8]) {
    let mut x = 0;

    #[cfg(target_arch = "x86_64")]
    if is_x86_feature_detected!("avx2") {
        // SAFETY: AVX2 is available; loads and the 8-byte store stay within
        // the slices for x + 8 <= out.len().
        x = unsafe { avx2::vconv(r0, r1, r2, r3, r4, out) };
    }

    for i in x..out.len() {
        let sum = r0[i] + 4 * (r1[i] + r2[i] + r3[i]) + 2 * r2[i] + r4[i];
        out[i] = ((sum + 128) >> 8).clamp(0, 255) as u8;
    }
}

#[cfg(target_arch = "x86_64")]
mod avx2 {
    use std::arch::x86_64::*;

    /// Single-channel horizontal taps for outputs `[start, end)` in blocks
    /// of eight. Returns the first unprocessed output index.
    ///
    /// # Safety
    ///
    /// Caller must ensure AVX2 is available, `start >= 1`, and
    /// `2 * (end - 1) + 16 <= src_row.len()` so every 16-byte load is in
    /// bounds.
    #[target_feature(enable = "avx2")]
    pub unsafe fn hconv_1(src_row: &[u8], out: &mut [i32], start: usize, end: usize) -> usize {
        let w1_4 = _mm256_setr_epi16(1, 4, 1, 4, 1, 4, 1, 4, 1, 4, 1, 4, 1, 4, 1, 4);
        let w6_4 = _mm256_setr_epi16(6, 4, 6, 4, 6, 4, 6, 4, 6, 4, 6, 4, 6, 4, 6, 4);

        let mut x = start;
        while x < end {
            let base = 2 * x - 2;
            // Pairs (s[2x-2+2k], s[2x-1+2k]) weighted (1, 4).
            let a01 = _mm256_cvtepu8_epi16(_mm_loadu_si128(
                src_row.as_ptr().add(base) as *const __m128i
            ));
            let m1 = _mm256_madd_epi16(a01, w1_4);
            // Pairs (s[2x+2k], s[2x+1+2k]) weighted (6, 4).
            let a23 = _mm256_cvtepu8_epi16(_mm_loadu_si128(
                src_row.as_ptr().add(base + 2) as *const __m128i
            ));
            let m2 = _mm256_madd_epi16(a23, w6_4);
            // High half of each 32-bit lane is s[2x+2+2k], weight 1.
            let a4 = _mm256_cvtepu8_epi16(_mm_loadu_si128(
                src_row.as_ptr().add(base + 3) as *const __m128i
            ));
            let fifth = _mm256_srli_epi32::<16>(a4);

            let sum = _mm256_add_epi32(_mm256_add_epi32(m1, m2), fifth);
            _mm256_storeu_si256(out.as_mut_ptr().add(x) as *mut __m256i, sum);
            x += 8;
        }
        x
    }

    /// Vertical combine in blocks of eight lanes. Returns the first
    /// unprocessed index.
    ///
    /// # Safety
    ///
    /// Caller must ensure AVX2 is available and all five row slices are at
    /// least `out.len()` long.
    #[target_feature(enable = "avx2")]
    pub unsafe fn vconv(
        r0: &[i32],
        r1: &[i32],
        r2: &[i32],
        r3: &[i32],
        r4: &[i32],
        out: &mut [u8],
    ) -> usize {
        let bias = _mm256_set1_epi32(128);
        let len = out.len();
        let mut x = 0;
        while x + 8 <= len {
            let v0 = _mm256_loadu_si256(r0.as_ptr().add(x) as *const __m256i);
            let v1 = _mm256_loadu_si256(r1.as_ptr().add(x) as *const __m256i);
            let v2 = _mm256_loadu_si256(r2.as_ptr().add(x) as *const __m256i);
            let v3 = _mm256_loadu_si256(r3.as_ptr().add(x) as *const __m256i);
            let v4 = _mm256_loadu_si256(r4.as_ptr().add(x) as *const __m256i);

            // v0 + v4 + 2*v2 + 4*(v1 + v2 + v3)
            let mut sum = _mm256_add_epi32(v0, v4);
            sum = _mm256_add_epi32(sum, _mm256_slli_epi32::<1>(v2));
            let t = _mm256_add_epi32(_mm256_add_epi32(v1, v3), v2);
            sum = _mm256_add_epi32(sum, _mm256_slli_epi32::<2>(t));

            sum = _mm256_add_epi32(sum, bias);
            sum = _mm256_srli_epi32::<8>(sum);

            let lo = _mm256_castsi256_si128(sum);
            let hi = _mm256_extracti128_si256::<1>(sum);
            let packed = _mm_packs_epi32(lo, hi);
            let out8 = _mm_packus_epi16(packed, packed);
            _mm_storel_epi64(out.as_mut_ptr().add(x) as *mut __m128i, out8);
            x += 8;
        }
        x
    }
}

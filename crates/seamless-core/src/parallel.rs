//! Row-band work partitioner.
//!
//! Every compute-heavy kernel in the crate is row-parallel and writes to
//! disjoint output rows, so work is dispatched by splitting the output into
//! contiguous row bands, one per worker, with no per-row locking. Small
//! buffers run sequentially on the calling thread.

use std::ops::Range;

use rayon::prelude::*;

use crate::consts::PARALLEL_PIXEL_THRESHOLD;

/// Split `n_rows` into at most `workers` contiguous ranges covering
/// `[0, n_rows)` exactly once. Remainder rows go one per leading band.
pub fn row_bands(n_rows: usize, workers: usize) -> Vec<Range<usize>> {
    let workers = workers.max(1);
    let per_band = n_rows / workers;
    let mut remainder = n_rows % workers;
    let mut bands = Vec::with_capacity(workers);
    let mut start = 0;
    for _ in 0..workers {
        let mut end = start + per_band;
        if remainder > 0 {
            end += 1;
            remainder -= 1;
        }
        if end > start {
            bands.push(start..end);
        }
        start = end;
    }
    bands
}

/// Run `kernel(start_row, band)` over disjoint row bands of `data`.
///
/// `data` is split at row boundaries (`row_len` elements per row), so no two
/// kernel invocations can alias. All writes are visible when this returns.
pub fn for_each_row_band<T, F>(data: &mut [T], row_len: usize, kernel: F)
where
    T: Send,
    F: Fn(usize, &mut [T]) + Sync,
{
    if row_len == 0 || data.is_empty() {
        return;
    }
    debug_assert_eq!(data.len() % row_len, 0);

    if data.len() < PARALLEL_PIXEL_THRESHOLD {
        kernel(0, data);
        return;
    }

    let n_rows = data.len() / row_len;
    let bands = row_bands(n_rows, rayon::current_num_threads());
    let mut slices = Vec::with_capacity(bands.len());
    let mut rest = data;
    for band in &bands {
        let (head, tail) = rest.split_at_mut(band.len() * row_len);
        slices.push((band.start, head));
        rest = tail;
    }
    slices
        .into_par_iter()
        .for_each(|(start_row, band)| kernel(start_row, band));
}

/// Like [`for_each_row_band`], but bands two buffers with the same row count
/// in lockstep (e.g. an image accumulator and its weight accumulator).
pub fn for_each_row_band_pair<A, B, F>(
    a: &mut [A],
    a_row_len: usize,
    b: &mut [B],
    b_row_len: usize,
    kernel: F,
) where
    A: Send,
    B: Send,
    F: Fn(usize, &mut [A], &mut [B]) + Sync,
{
    if a_row_len == 0 || b_row_len == 0 || a.is_empty() {
        return;
    }
    debug_assert_eq!(a.len() % a_row_len, 0);
    debug_assert_eq!(b.len() % b_row_len, 0);
    debug_assert_eq!(a.len() / a_row_len, b.len() / b_row_len);

    if a.len() + b.len() < PARALLEL_PIXEL_THRESHOLD {
        kernel(0, a, b);
        return;
    }

    let n_rows = a.len() / a_row_len;
    let bands = row_bands(n_rows, rayon::current_num_threads());
    let mut slices = Vec::with_capacity(bands.len());
    let mut rest_a = a;
    let mut rest_b = b;
    for band in &bands {
        let (head_a, tail_a) = rest_a.split_at_mut(band.len() * a_row_len);
        let (head_b, tail_b) = rest_b.split_at_mut(band.len() * b_row_len);
        slices.push((band.start, head_a, head_b));
        rest_a = tail_a;
        rest_b = tail_b;
    }
    slices
        .into_par_iter()
        .for_each(|(start_row, band_a, band_b)| kernel(start_row, band_a, band_b));
}

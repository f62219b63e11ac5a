use seamless_core::parallel::{for_each_row_band, for_each_row_band_pair, row_bands};

// ---------------------------------------------------------------------------
// row_bands
// ---------------------------------------------------------------------------

#[test]
fn test_row_bands_cover_exactly_once() {
    for &(n_rows, workers) in &[(10usize, 3usize), (100, 7), (64, 64), (1, 4), (17, 4)] {
        let bands = row_bands(n_rows, workers);
        let mut covered = vec![0u32; n_rows];
        for band in &bands {
            for row in band.clone() {
                covered[row] += 1;
            }
        }
        assert!(
            covered.iter().all(|&c| c == 1),
            "every row must be covered exactly once for {n_rows} rows / {workers} workers"
        );
    }
}

#[test]
fn test_row_bands_are_contiguous_and_ordered() {
    let bands = row_bands(100, 7);
    let mut expected_start = 0;
    for band in &bands {
        assert_eq!(band.start, expected_start);
        expected_start = band.end;
    }
    assert_eq!(expected_start, 100);
}

#[test]
fn test_row_bands_remainder_goes_to_leading_bands() {
    // 10 rows over 3 workers: 4, 3, 3.
    let bands = row_bands(10, 3);
    let lens: Vec<usize> = bands.iter().map(|b| b.len()).collect();
    assert_eq!(lens, vec![4, 3, 3]);
}

#[test]
fn test_row_bands_more_workers_than_rows() {
    let bands = row_bands(5, 8);
    let lens: Vec<usize> = bands.iter().map(|b| b.len()).collect();
    assert_eq!(lens, vec![1, 1, 1, 1, 1]);
}

#[test]
fn test_row_bands_empty_input() {
    assert!(row_bands(0, 4).is_empty());
}

#[test]
fn test_row_bands_zero_workers_clamps_to_one() {
    let bands = row_bands(10, 0);
    assert_eq!(bands.len(), 1);
    assert_eq!(bands[0], 0..10);
}

// ---------------------------------------------------------------------------
// for_each_row_band
// ---------------------------------------------------------------------------

#[test]
fn test_for_each_row_band_small_buffer_sequential() {
    // Below the parallel threshold; still must see every row once.
    let row_len = 8;
    let n_rows = 16;
    let mut data = vec![0u32; n_rows * row_len];
    for_each_row_band(&mut data, row_len, |start_row, band| {
        for (i, row) in band.chunks_mut(row_len).enumerate() {
            row.fill((start_row + i) as u32);
        }
    });
    for (y, row) in data.chunks(row_len).enumerate() {
        assert!(row.iter().all(|&v| v == y as u32), "row {y} mis-written");
    }
}

#[test]
fn test_for_each_row_band_large_buffer_parallel() {
    // Above the parallel threshold (1024 * 128 = 131072 elements).
    let row_len = 128;
    let n_rows = 1024;
    let mut data = vec![0u32; n_rows * row_len];
    for_each_row_band(&mut data, row_len, |start_row, band| {
        for (i, row) in band.chunks_mut(row_len).enumerate() {
            row.fill((start_row + i) as u32);
        }
    });
    for (y, row) in data.chunks(row_len).enumerate() {
        assert!(row.iter().all(|&v| v == y as u32), "row {y} mis-written");
    }
}

#[test]
fn test_for_each_row_band_empty_buffer() {
    let mut data: Vec<u32> = Vec::new();
    for_each_row_band(&mut data, 8, |_, _| panic!("kernel must not run"));
}

// ---------------------------------------------------------------------------
// for_each_row_band_pair
// ---------------------------------------------------------------------------

#[test]
fn test_for_each_row_band_pair_lockstep() {
    let a_row_len = 12;
    let b_row_len = 4;
    let n_rows = 600;
    let mut a = vec![0u32; n_rows * a_row_len];
    let mut b = vec![0u32; n_rows * b_row_len];
    for_each_row_band_pair(&mut a, a_row_len, &mut b, b_row_len, |start_row, ba, bb| {
        for (i, row) in ba.chunks_mut(a_row_len).enumerate() {
            row.fill((start_row + i) as u32);
        }
        for (i, row) in bb.chunks_mut(b_row_len).enumerate() {
            row.fill(2 * (start_row + i) as u32);
        }
    });
    for (y, row) in a.chunks(a_row_len).enumerate() {
        assert!(row.iter().all(|&v| v == y as u32));
    }
    for (y, row) in b.chunks(b_row_len).enumerate() {
        assert!(row.iter().all(|&v| v == 2 * y as u32));
    }
}

/// Minimum element count (rows * row_len) to use row-level Rayon parallelism.
pub const PARALLEL_PIXEL_THRESHOLD: usize = 65_536;

/// Binomial 1D kernel coefficients: [1, 4, 6, 4, 1] / 16. The resampler's
/// 5x5 Gaussian is the tensor product of this kernel with itself.
pub const GAUSSIAN_KERNEL: [f32; 5] = [
    1.0 / 16.0,
    4.0 / 16.0,
    6.0 / 16.0,
    4.0 / 16.0,
    1.0 / 16.0,
];

/// Hard cap on pyramid depth.
pub const MAX_BANDS: usize = 7;

/// Gain applied to surviving samples during zero-insertion upsampling.
/// Three of four output positions receive no sample, so x4 keeps the
/// intensity scale of the source.
pub const UPSAMPLE_GAIN: f32 = 4.0;

/// Guard against division by zero when normalizing by accumulated weights.
pub const WEIGHT_EPS: f32 = 1e-5;

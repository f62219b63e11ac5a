use num_traits::Zero;

use crate::error::{Result, SeamlessError};

pub const RGB_CHANNELS: usize = 3;
pub const GRAY_CHANNELS: usize = 1;

/// A contiguous row-major pixel buffer with interleaved channels.
///
/// `data.len() == width * height * channels` holds for the lifetime of the
/// raster. Source and output images are `Raster<u8>`, pyramid intermediates
/// are `Raster<i16>` (signed, to hold Laplacian differences), accumulators
/// are `Raster<f32>`.
#[derive(Clone, Debug, PartialEq)]
pub struct Raster<T> {
    pub data: Vec<T>,
    pub width: usize,
    pub height: usize,
    pub channels: usize,
}

impl<T: Copy + Zero> Raster<T> {
    /// Allocate a zero-filled raster.
    pub fn new(width: usize, height: usize, channels: usize) -> Self {
        Self {
            data: vec![T::zero(); width * height * channels],
            width,
            height,
            channels,
        }
    }

    /// Allocate a raster filled with `value`.
    pub fn filled(width: usize, height: usize, channels: usize, value: T) -> Self {
        Self {
            data: vec![value; width * height * channels],
            width,
            height,
            channels,
        }
    }
}

impl<T: Copy> Raster<T> {
    /// Wrap an existing buffer, validating its length against the geometry.
    pub fn from_vec(data: Vec<T>, width: usize, height: usize, channels: usize) -> Result<Self> {
        if data.len() != width * height * channels {
            return Err(SeamlessError::InvalidDimensions {
                width,
                height,
                channels,
            });
        }
        Ok(Self {
            data,
            width,
            height,
            channels,
        })
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Elements per row (`width * channels`).
    pub fn row_len(&self) -> usize {
        self.width * self.channels
    }

    pub fn row(&self, y: usize) -> &[T] {
        let len = self.row_len();
        &self.data[y * len..(y + 1) * len]
    }

    pub fn row_mut(&mut self, y: usize) -> &mut [T] {
        let len = self.row_len();
        &mut self.data[y * len..(y + 1) * len]
    }

    /// Same-geometry raster with every element converted by `f`.
    pub fn map<U, F>(&self, f: F) -> Raster<U>
    where
        F: Fn(T) -> U,
    {
        Raster {
            data: self.data.iter().map(|&v| f(v)).collect(),
            width: self.width,
            height: self.height,
            channels: self.channels,
        }
    }
}

/// Convert an RGB raster to grayscale using Rec.601 luma weights.
pub fn rgb_to_gray(img: &Raster<u8>) -> Result<Raster<u8>> {
    if img.channels != RGB_CHANNELS {
        return Err(SeamlessError::ChannelMismatch {
            expected: RGB_CHANNELS,
            actual: img.channels,
        });
    }
    let data = img
        .data
        .chunks_exact(RGB_CHANNELS)
        .map(|px| {
            (0.299 * px[0] as f32 + 0.587 * px[1] as f32 + 0.114 * px[2] as f32) as u8
        })
        .collect();
    Ok(Raster {
        data,
        width: img.width,
        height: img.height,
        channels: GRAY_CHANNELS,
    })
}

/// A point on the output canvas.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Point {
    pub x: i64,
    pub y: i64,
}

impl Point {
    pub fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }
}

/// An axis-aligned region on the output canvas.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Rect {
    pub x: i64,
    pub y: i64,
    pub width: i64,
    pub height: i64,
}

impl Rect {
    pub fn new(x: i64, y: i64, width: i64, height: i64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Bottom-right corner (exclusive).
    pub fn br(&self) -> Point {
        Point {
            x: self.x + self.width,
            y: self.y + self.height,
        }
    }
}

/// Scalar pixel type understood by the resampling engine.
///
/// Each type carries its own conversion from the float convolution sum:
/// u8 rounds and clamps (ceil on downsample, half-up on upsample, matching
/// the integer fast path), i16 and f32 keep the unclamped value.
pub trait Pixel: Copy + Send + Sync + Zero + 'static {
    fn to_f32(self) -> f32;

    /// Convert an accumulated downsample sum to the pixel type.
    fn from_downsample(sum: f32) -> Self;

    /// Convert an accumulated upsample sum to the pixel type.
    fn from_upsample(sum: f32) -> Self;

    /// Type-specific fast path for the 2:1 downsample; `None` falls back
    /// to the scalar kernel.
    fn downsample_fast(_src: &Raster<Self>) -> Option<Raster<Self>> {
        None
    }
}

impl Pixel for u8 {
    fn to_f32(self) -> f32 {
        self as f32
    }

    fn from_downsample(sum: f32) -> Self {
        sum.ceil().clamp(0.0, 255.0) as u8
    }

    fn from_upsample(sum: f32) -> Self {
        (sum + 0.5).floor().clamp(0.0, 255.0) as u8
    }

    fn downsample_fast(src: &Raster<Self>) -> Option<Raster<Self>> {
        Some(crate::resample::simd::downsample_u8(src))
    }
}

impl Pixel for i16 {
    fn to_f32(self) -> f32 {
        self as f32
    }

    fn from_downsample(sum: f32) -> Self {
        sum as i16
    }

    fn from_upsample(sum: f32) -> Self {
        sum as i16
    }
}

impl Pixel for f32 {
    fn to_f32(self) -> f32 {
        self
    }

    fn from_downsample(sum: f32) -> Self {
        sum
    }

    fn from_upsample(sum: f32) -> Self {
        sum
    }
}

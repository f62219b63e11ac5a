//! Seam-hiding blenders.
//!
//! Both variants share the same lifecycle: construct for an output canvas,
//! `feed` each source image with a weight mask and its placement, call
//! `blend` exactly once, then read `result`.

mod feather;
mod multiband;

pub use feather::FeatherBlender;
pub use multiband::MultiBandBlender;

use crate::consts::WEIGHT_EPS;
use crate::error::{Result, SeamlessError};
use crate::parallel::for_each_row_band;
use crate::raster::{Point, Raster, Rect, GRAY_CHANNELS, RGB_CHANNELS};

/// Which blending algorithm a [`Blender`] runs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BlenderKind {
    /// Multi-resolution Laplacian pyramid blending with `num_bands` levels.
    MultiBand { num_bands: usize },
    /// Flat weighted averaging, optionally feathering the masks through a
    /// distance transform.
    Feather { distance_transform: bool },
}

/// A seam-hiding compositor for one output canvas.
pub enum Blender {
    MultiBand(MultiBandBlender),
    Feather(FeatherBlender),
}

impl Blender {
    pub fn new(kind: BlenderKind, out_size: Rect) -> Self {
        match kind {
            BlenderKind::MultiBand { num_bands } => {
                Blender::MultiBand(MultiBandBlender::new(out_size, num_bands))
            }
            BlenderKind::Feather { distance_transform } => {
                Blender::Feather(FeatherBlender::new(out_size, distance_transform))
            }
        }
    }

    /// Accumulate one source image. `image` is RGB, `mask` is a gray weight
    /// mask of the same size, `top_left` places both on the canvas.
    pub fn feed(&mut self, image: &Raster<u8>, mask: &Raster<u8>, top_left: Point) -> Result<()> {
        match self {
            Blender::MultiBand(b) => b.feed(image, mask, top_left),
            Blender::Feather(b) => b.feed(image, mask, top_left),
        }
    }

    /// Finalize the accumulated inputs into the result raster.
    pub fn blend(&mut self) -> Result<()> {
        match self {
            Blender::MultiBand(b) => b.blend(),
            Blender::Feather(b) => b.blend(),
        }
    }

    /// The blended RGB output, available after [`Blender::blend`].
    pub fn result(&self) -> Option<&Raster<u8>> {
        match self {
            Blender::MultiBand(b) => b.result(),
            Blender::Feather(b) => b.result(),
        }
    }

    pub fn take_result(&mut self) -> Option<Raster<u8>> {
        match self {
            Blender::MultiBand(b) => b.take_result(),
            Blender::Feather(b) => b.take_result(),
        }
    }
}

/// Feed preconditions shared by both variants.
fn validate_feed(image: &Raster<u8>, mask: &Raster<u8>) -> Result<()> {
    if image.channels != RGB_CHANNELS {
        return Err(SeamlessError::ChannelMismatch {
            expected: RGB_CHANNELS,
            actual: image.channels,
        });
    }
    if mask.channels != GRAY_CHANNELS {
        return Err(SeamlessError::ChannelMismatch {
            expected: GRAY_CHANNELS,
            actual: mask.channels,
        });
    }
    if image.width != mask.width || image.height != mask.height {
        return Err(SeamlessError::MaskSizeMismatch {
            image_width: image.width,
            image_height: image.height,
            mask_width: mask.width,
            mask_height: mask.height,
        });
    }
    Ok(())
}

/// Divide an accumulator by its weight accumulator into an i16 raster.
fn normalize_level(out: &Raster<f32>, out_mask: &Raster<f32>) -> Raster<i16> {
    let channels = out.channels;
    let width = out.width;
    let mut dst: Raster<i16> = Raster::new(width, out.height, channels);
    let row_len = dst.row_len();
    for_each_row_band(&mut dst.data, row_len, |start_row, band| {
        for (r, row) in band.chunks_mut(row_len).enumerate() {
            let y = start_row + r;
            for x in 0..width {
                let w = out_mask.data[y * width + x];
                let base = (y * width + x) * channels;
                for z in 0..channels {
                    row[x * channels + z] = (out.data[base + z] / (w + WEIGHT_EPS)).round() as i16;
                }
            }
        }
    });
    dst
}

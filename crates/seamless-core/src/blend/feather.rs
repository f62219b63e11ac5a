//! Feather blending: flat weighted averaging without multi-resolution
//! decomposition, optionally smoothing each mask with a distance transform.

use tracing::{debug, info};

use crate::consts::WEIGHT_EPS;
use crate::distance::distance_transform;
use crate::error::{Result, SeamlessError};
use crate::parallel::{for_each_row_band, for_each_row_band_pair};
use crate::raster::{Point, Raster, Rect, GRAY_CHANNELS, RGB_CHANNELS};

use super::{normalize_level, validate_feed};

pub struct FeatherBlender {
    output_size: Rect,
    do_distance_transform: bool,
    out: Option<Raster<f32>>,
    out_mask: Option<Raster<f32>>,
    result: Option<Raster<u8>>,
}

impl FeatherBlender {
    pub fn new(out_size: Rect, do_distance_transform: bool) -> Self {
        let w = out_size.width.max(0) as usize;
        let h = out_size.height.max(0) as usize;
        Self {
            output_size: out_size,
            do_distance_transform,
            out: Some(Raster::new(w, h, RGB_CHANNELS)),
            out_mask: Some(Raster::new(w, h, GRAY_CHANNELS)),
            result: None,
        }
    }

    pub fn output_size(&self) -> Rect {
        self.output_size
    }

    pub fn result(&self) -> Option<&Raster<u8>> {
        self.result.as_ref()
    }

    pub fn take_result(&mut self) -> Option<Raster<u8>> {
        self.result.take()
    }

    pub fn feed(&mut self, image: &Raster<u8>, mask: &Raster<u8>, top_left: Point) -> Result<()> {
        validate_feed(image, mask)?;
        let os = self.output_size;
        let (out, out_mask) = match (self.out.as_mut(), self.out_mask.as_mut()) {
            (Some(out), Some(out_mask)) => (out, out_mask),
            _ => return Err(SeamlessError::BlenderConsumed),
        };

        let feathered;
        let mask = if self.do_distance_transform {
            let mut m = mask.clone();
            distance_transform(&mut m);
            feathered = m;
            &feathered
        } else {
            mask
        };

        // Clip the placement to the canvas; off-canvas pixels contribute
        // nothing.
        let x0 = top_left.x.max(os.x);
        let y0 = top_left.y.max(os.y);
        let x1 = (top_left.x + image.width as i64).min(os.br().x);
        let y1 = (top_left.y + image.height as i64).min(os.br().y);
        if x1 <= x0 || y1 <= y0 {
            debug!(x = top_left.x, y = top_left.y, "feed outside canvas, skipped");
            return Ok(());
        }

        let out_row_len = out.row_len();
        let mask_row_len = out_mask.row_len();
        let oy0 = (y0 - os.y) as usize;
        let oy1 = (y1 - os.y) as usize;
        let ox0 = (x0 - os.x) as usize;
        let cols = (x1 - x0) as usize;
        // Source offsets of the clipped window.
        let sy0 = (y0 - top_left.y) as usize;
        let sx0 = (x0 - top_left.x) as usize;

        let out_band = &mut out.data[oy0 * out_row_len..oy1 * out_row_len];
        let mask_band = &mut out_mask.data[oy0 * mask_row_len..oy1 * mask_row_len];
        for_each_row_band_pair(
            out_band,
            out_row_len,
            mask_band,
            mask_row_len,
            |start_row, rows_out, rows_mask| {
                for (r, (out_row, mask_row)) in rows_out
                    .chunks_mut(out_row_len)
                    .zip(rows_mask.chunks_mut(mask_row_len))
                    .enumerate()
                {
                    let sy = sy0 + start_row + r;
                    let img_row = image.row(sy);
                    let m_row = mask.row(sy);
                    for i in 0..cols {
                        let w = m_row[sx0 + i] as f32 / 256.0;
                        let out_base = (ox0 + i) * RGB_CHANNELS;
                        let img_base = (sx0 + i) * RGB_CHANNELS;
                        for z in 0..RGB_CHANNELS {
                            out_row[out_base + z] += img_row[img_base + z] as f32 * w;
                        }
                        mask_row[ox0 + i] += w;
                    }
                }
            },
        );

        Ok(())
    }

    pub fn blend(&mut self) -> Result<()> {
        let out = self.out.take().ok_or(SeamlessError::BlenderConsumed)?;
        let out_mask = self.out_mask.take().ok_or(SeamlessError::BlenderConsumed)?;

        info!(
            width = self.output_size.width,
            height = self.output_size.height,
            "normalizing feather accumulator"
        );

        let normalized = normalize_level(&out, &out_mask);
        drop(out);
        drop(out_mask);

        let mut result: Raster<u8> = Raster::new(normalized.width, normalized.height, RGB_CHANNELS);
        let row_len = result.row_len();
        for_each_row_band(&mut result.data, row_len, |start_row, band| {
            let base = start_row * row_len;
            for (i, v) in band.iter_mut().enumerate() {
                *v = normalized.data[base + i].clamp(0, 255) as u8;
            }
        });

        self.result = Some(result);
        Ok(())
    }
}

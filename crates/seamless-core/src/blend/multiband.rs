//! Multi-resolution (Laplacian pyramid) blending.

use tracing::{debug, info};

use crate::border::{add_border, crop, BorderMode};
use crate::consts::{MAX_BANDS, UPSAMPLE_GAIN, WEIGHT_EPS};
use crate::error::{Result, SeamlessError};
use crate::parallel::{for_each_row_band, for_each_row_band_pair};
use crate::raster::{Point, Raster, Rect, GRAY_CHANNELS, RGB_CHANNELS};
use crate::resample::{downsample, upsample};

use super::{normalize_level, validate_feed};

/// Laplacian pyramid blender.
///
/// Each `feed` decomposes the input into band-pass levels and accumulates
/// them, weighted by the Gaussian pyramid of its mask, into per-level f32
/// accumulators. `blend` normalizes every level by the accumulated weights
/// and collapses the pyramid from coarsest to finest.
pub struct MultiBandBlender {
    num_bands: usize,
    /// Canvas rounded up so both dimensions divide by `2^num_bands`.
    output_size: Rect,
    /// Caller-requested canvas, restored by a final crop.
    real_out_size: Rect,
    out: Option<Vec<Raster<f32>>>,
    out_mask: Option<Vec<Raster<f32>>>,
    result: Option<Raster<u8>>,
}

impl MultiBandBlender {
    /// Create a blender for `out_size`, clamping the requested band count to
    /// [`MAX_BANDS`] and to what the canvas dimensions can support.
    pub fn new(out_size: Rect, requested_bands: usize) -> Self {
        let real_out_size = out_size;

        let max_len = out_size.width.max(out_size.height).max(1) as f64;
        let depth_cap = max_len.log2().floor() as usize;
        let num_bands = requested_bands.min(MAX_BANDS).min(depth_cap);

        let step = 1i64 << num_bands;
        let mut output_size = out_size;
        output_size.width += (step - output_size.width % step) % step;
        output_size.height += (step - output_size.height % step) % step;

        let mut out = Vec::with_capacity(num_bands + 1);
        let mut out_mask = Vec::with_capacity(num_bands + 1);
        let mut w = output_size.width as usize;
        let mut h = output_size.height as usize;
        out.push(Raster::new(w, h, RGB_CHANNELS));
        out_mask.push(Raster::new(w, h, GRAY_CHANNELS));
        for _ in 0..num_bands {
            w = (w + 1) / 2;
            h = (h + 1) / 2;
            out.push(Raster::new(w, h, RGB_CHANNELS));
            out_mask.push(Raster::new(w, h, GRAY_CHANNELS));
        }

        Self {
            num_bands,
            output_size,
            real_out_size,
            out: Some(out),
            out_mask: Some(out_mask),
            result: None,
        }
    }

    pub fn num_bands(&self) -> usize {
        self.num_bands
    }

    /// The padded working canvas: the requested size rounded up to a
    /// `2^num_bands` multiple on both axes.
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
        let num_bands = self.num_bands;
        let os = self.output_size;
        let (out, out_mask) = match (self.out.as_mut(), self.out_mask.as_mut()) {
            (Some(out), Some(out_mask)) => (out, out_mask),
            _ => return Err(SeamlessError::BlenderConsumed),
        };

        let (tl_new, br_new) =
            match aligned_region(os, num_bands, top_left, image.width, image.height) {
                Some(region) => region,
                None => {
                    // Wholly off-canvas placement: nothing to accumulate.
                    debug!(x = top_left.x, y = top_left.y, "feed outside canvas, skipped");
                    return Ok(());
                }
            };

        // Signed margins between the placement and the expanded region.
        // Negative values mean the caller placed the image partially off
        // canvas; those rows/columns are cut before padding.
        let top = top_left.y - tl_new.y;
        let left = top_left.x - tl_new.x;
        let bottom = br_new.y - top_left.y - image.height as i64;
        let right = br_new.x - top_left.x - image.width as i64;

        let cut_top = (-top).max(0) as usize;
        let cut_bottom = (-bottom).max(0) as usize;
        let cut_left = (-left).max(0) as usize;
        let cut_right = (-right).max(0) as usize;
        if cut_left + cut_right >= image.width || cut_top + cut_bottom >= image.height {
            return Ok(());
        }

        let mut image_p = image.clone();
        let mut mask_p = mask.clone();
        if cut_top + cut_bottom + cut_left + cut_right > 0 {
            crop(&mut image_p, cut_top, cut_bottom, cut_left, cut_right);
            crop(&mut mask_p, cut_top, cut_bottom, cut_left, cut_right);
        }
        let image_p = add_border(
            &image_p,
            top.max(0) as usize,
            bottom.max(0) as usize,
            left.max(0) as usize,
            right.max(0) as usize,
            BorderMode::Reflect,
        );
        let mask_p = add_border(
            &mask_p,
            top.max(0) as usize,
            bottom.max(0) as usize,
            left.max(0) as usize,
            right.max(0) as usize,
            BorderMode::Constant,
        );

        debug!(
            x = tl_new.x,
            y = tl_new.y,
            width = br_new.x - tl_new.x,
            height = br_new.y - tl_new.y,
            "feeding band-aligned region"
        );

        // Laplacian pyramid of the image: L_j = G_j - upsample(G_{j+1}),
        // with the coarsest Gaussian as the last level.
        let mut laplacians: Vec<Raster<i16>> = Vec::with_capacity(num_bands + 1);
        let mut current: Raster<i16> = image_p.map(i16::from);
        for _ in 0..num_bands {
            let next = downsample(&current);
            let mut up = upsample(&next, UPSAMPLE_GAIN);
            compute_laplacian(&current, &mut up);
            laplacians.push(up);
            current = next;
        }
        laplacians.push(current);

        // Gaussian pyramid of the mask.
        let mut mask_levels: Vec<Raster<i16>> = Vec::with_capacity(num_bands + 1);
        let mut level_mask: Raster<i16> = mask_p.map(i16::from);
        for _ in 0..num_bands {
            let next = downsample(&level_mask);
            mask_levels.push(level_mask);
            level_mask = next;
        }
        mask_levels.push(level_mask);

        // Accumulate every level at its canvas offset; the offsets halve
        // with each deeper level and stay on grid by the region alignment.
        let mut x_tl = tl_new.x - os.x;
        let mut y_tl = tl_new.y - os.y;
        let mut x_br = br_new.x - os.x;
        let mut y_br = br_new.y - os.y;
        for level in 0..=num_bands {
            accumulate_level(
                &mut out[level],
                &mut out_mask[level],
                &laplacians[level],
                &mask_levels[level],
                x_tl,
                y_tl,
                x_br - x_tl,
                y_br - y_tl,
            );
            x_tl /= 2;
            y_tl /= 2;
            x_br /= 2;
            y_br /= 2;
        }

        Ok(())
    }

    pub fn blend(&mut self) -> Result<()> {
        let out = self.out.take().ok_or(SeamlessError::BlenderConsumed)?;
        let out_mask = self.out_mask.take().ok_or(SeamlessError::BlenderConsumed)?;

        info!(
            num_bands = self.num_bands,
            width = self.output_size.width,
            height = self.output_size.height,
            "collapsing accumulator pyramids"
        );

        // Normalize each level into an i16 pyramid, releasing the f32
        // accumulators as we go. The level-0 weight accumulator survives to
        // blank uncovered pixels at the end.
        let mut final_out: Vec<Raster<i16>> = Vec::with_capacity(out.len());
        let mut levels = out.into_iter().zip(out_mask);
        let mask0 = match levels.next() {
            Some((o, m)) => {
                final_out.push(normalize_level(&o, &m));
                m
            }
            None => return Err(SeamlessError::BlenderConsumed),
        };
        for (o, m) in levels {
            final_out.push(normalize_level(&o, &m));
        }

        // Collapse from the coarsest level: upsample and add into the level
        // below, in place.
        let mut blended = match final_out.pop() {
            Some(level) => level,
            None => return Err(SeamlessError::BlenderConsumed),
        };
        while let Some(mut lower) = final_out.pop() {
            let up = upsample(&blended, UPSAMPLE_GAIN);
            add_in_place(&mut lower, &up);
            blended = lower;
        }

        // Materialize u8, blanking pixels no input covered, then trim the
        // construction padding off the right/bottom.
        let width = self.output_size.width as usize;
        let height = self.output_size.height as usize;
        let mut result: Raster<u8> = Raster::new(width, height, RGB_CHANNELS);
        let row_len = result.row_len();
        for_each_row_band(&mut result.data, row_len, |start_row, band| {
            for (r, row) in band.chunks_mut(row_len).enumerate() {
                let y = start_row + r;
                for x in 0..width {
                    if mask0.data[y * width + x] <= WEIGHT_EPS {
                        continue;
                    }
                    let base = (y * width + x) * RGB_CHANNELS;
                    for z in 0..RGB_CHANNELS {
                        row[x * RGB_CHANNELS + z] = blended.data[base + z].clamp(0, 255) as u8;
                    }
                }
            }
        });

        let cut_bottom = (self.output_size.height - self.real_out_size.height).max(0) as usize;
        let cut_right = (self.output_size.width - self.real_out_size.width).max(0) as usize;
        crop(&mut result, 0, cut_bottom, 0, cut_right);

        self.result = Some(result);
        Ok(())
    }
}

/// Expand a placement to a band-aligned accumulation region.
///
/// Grows the placement by the blend gap (`3 * 2^num_bands`), clamps it to
/// the canvas, floors the top-left onto the `2^num_bands` grid, rounds the
/// dimensions up to the same grid, and shifts back inside if the expansion
/// crossed the right/bottom edge. Returns `None` for a placement wholly
/// outside the canvas.
fn aligned_region(
    canvas: Rect,
    num_bands: usize,
    top_left: Point,
    width: usize,
    height: usize,
) -> Option<(Point, Point)> {
    let step = 1i64 << num_bands;
    let gap = 3 * step;
    let br_canvas = canvas.br();

    let mut tl_new = Point::new(
        (top_left.x - gap).max(canvas.x),
        (top_left.y - gap).max(canvas.y),
    );
    let mut br_new = Point::new(
        (top_left.x + width as i64 + gap).min(br_canvas.x),
        (top_left.y + height as i64 + gap).min(br_canvas.y),
    );

    tl_new.x = canvas.x + (((tl_new.x - canvas.x) >> num_bands) << num_bands);
    tl_new.y = canvas.y + (((tl_new.y - canvas.y) >> num_bands) << num_bands);

    let mut region_w = br_new.x - tl_new.x;
    let mut region_h = br_new.y - tl_new.y;
    if region_w <= 0 || region_h <= 0 {
        return None;
    }
    region_w += (step - region_w % step) % step;
    region_h += (step - region_h % step) % step;
    br_new.x = tl_new.x + region_w;
    br_new.y = tl_new.y + region_h;

    let dx = (br_new.x - br_canvas.x).max(0);
    let dy = (br_new.y - br_canvas.y).max(0);
    tl_new.x -= dx;
    br_new.x -= dx;
    tl_new.y -= dy;
    br_new.y -= dy;

    Some((tl_new, br_new))
}

/// Replace `upsampled` with `original - upsampled`, elementwise.
fn compute_laplacian(original: &Raster<i16>, upsampled: &mut Raster<i16>) {
    debug_assert_eq!(original.width, upsampled.width);
    debug_assert_eq!(original.height, upsampled.height);
    let row_len = upsampled.row_len();
    let orig = &original.data;
    for_each_row_band(&mut upsampled.data, row_len, |start_row, band| {
        let base = start_row * row_len;
        for (i, v) in band.iter_mut().enumerate() {
            *v = orig[base + i] - *v;
        }
    });
}

/// Elementwise `dst += src`, truncating to the shorter buffer.
fn add_in_place(dst: &mut Raster<i16>, src: &Raster<i16>) {
    debug_assert_eq!(dst.len(), src.len());
    let row_len = dst.row_len();
    let src_data = &src.data;
    for_each_row_band(&mut dst.data, row_len, |start_row, band| {
        let base = start_row * row_len;
        let end = (base + band.len()).min(src_data.len());
        for (v, s) in band.iter_mut().zip(&src_data[base..end]) {
            *v += *s;
        }
    });
}

/// Accumulate one pyramid level of an input into the level accumulators.
///
/// `(x_tl, y_tl)` is the region's offset on the level-sized canvas, `cols`
/// and `rows` its extent at this level. Reads and writes are bounds-checked;
/// contributions that fall outside either raster are dropped.
#[allow(clippy::too_many_arguments)]
fn accumulate_level(
    out: &mut Raster<f32>,
    out_mask: &mut Raster<f32>,
    laplacian: &Raster<i16>,
    mask: &Raster<i16>,
    x_tl: i64,
    y_tl: i64,
    cols: i64,
    rows: i64,
) {
    if rows <= 0 || cols <= 0 {
        return;
    }
    let out_w = out.width;
    let out_h = out.height;

    let y0 = y_tl.max(0);
    let y1 = (y_tl + rows).min(out_h as i64);
    if y1 <= y0 {
        return;
    }
    let skip = (y0 - y_tl) as usize;
    let y0 = y0 as usize;
    let y1 = y1 as usize;

    let out_row_len = out.row_len();
    let mask_row_len = out_mask.row_len();
    let out_band = &mut out.data[y0 * out_row_len..y1 * out_row_len];
    let mask_band = &mut out_mask.data[y0 * mask_row_len..y1 * mask_row_len];

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
                let k = skip + start_row + r;
                if k >= laplacian.height || k >= mask.height {
                    continue;
                }
                let lap_row = laplacian.row(k);
                let m_row = mask.row(k);
                for i in 0..cols as usize {
                    if i >= mask.width || i >= laplacian.width {
                        break;
                    }
                    let ox = x_tl + i as i64;
                    if ox < 0 || ox >= out_w as i64 {
                        continue;
                    }
                    let ox = ox as usize;
                    let w = m_row[i] as f32 / 255.0;
                    let lap_base = i * RGB_CHANNELS;
                    let out_base = ox * RGB_CHANNELS;
                    for z in 0..RGB_CHANNELS {
                        out_row[out_base + z] += lap_row[lap_base + z] as f32 * w;
                    }
                    mask_row[ox] += w;
                }
            }
        },
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mask::create_mask;

    #[test]
    fn aligned_region_stays_on_grid() {
        let canvas = Rect::new(0, 0, 512, 512);
        for &bands in &[1usize, 3, 5] {
            let step = 1i64 << bands;
            let (tl, br) = aligned_region(canvas, bands, Point::new(37, 81), 100, 60)
                .expect("placement is on canvas");
            assert_eq!((tl.x - canvas.x) % step, 0);
            assert_eq!((tl.y - canvas.y) % step, 0);
            assert_eq!((br.x - tl.x) % step, 0);
            assert_eq!((br.y - tl.y) % step, 0);
            assert!(tl.x >= canvas.x && tl.y >= canvas.y);
            assert!(br.x <= canvas.br().x && br.y <= canvas.br().y);
        }
    }

    #[test]
    fn aligned_region_covers_the_placement() {
        let canvas = Rect::new(0, 0, 256, 256);
        let (tl, br) = aligned_region(canvas, 3, Point::new(40, 48), 64, 64)
            .expect("placement is on canvas");
        assert!(tl.x <= 40 && tl.y <= 48);
        assert!(br.x >= 40 + 64 && br.y >= 48 + 64);
    }

    #[test]
    fn aligned_region_rejects_off_canvas_placements() {
        let canvas = Rect::new(0, 0, 512, 512);
        assert!(aligned_region(canvas, 3, Point::new(600, 0), 100, 100).is_none());
        assert!(aligned_region(canvas, 3, Point::new(0, -300), 100, 100).is_none());
    }

    #[test]
    fn feed_conserves_mask_weight() {
        let mut blender = MultiBandBlender::new(Rect::new(0, 0, 8, 8), 1);
        let image = Raster::filled(4, 4, RGB_CHANNELS, 100u8);
        let mask = create_mask(4, 4, 0.0, false, false);

        blender
            .feed(&image, &mask, Point::new(0, 0))
            .expect("feed left half");
        blender
            .feed(&image, &mask, Point::new(4, 0))
            .expect("feed right half");

        let out_mask = &blender.out_mask.as_ref().expect("not blended yet")[0];
        for y in 0..8 {
            for x in 0..8 {
                let expected = if y < 4 { 1.0 } else { 0.0 };
                let got = out_mask.data[y * 8 + x];
                approx::assert_abs_diff_eq!(got, expected, epsilon = 1e-4);
            }
        }
    }
}

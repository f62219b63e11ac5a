use crate::raster::Raster;

/// How pixels outside the source are synthesized when growing a raster.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BorderMode {
    /// Zero fill.
    Constant,
    /// Mirror about the image edge; no edge pixel is repeated
    /// (`.. c, b, a | a, b, c ..`).
    Reflect,
}

/// Grow a raster by the given margins.
pub fn add_border(
    src: &Raster<u8>,
    top: usize,
    bottom: usize,
    left: usize,
    right: usize,
    mode: BorderMode,
) -> Raster<u8> {
    let new_w = src.width + left + right;
    let new_h = src.height + top + bottom;
    let channels = src.channels;
    let mut dst = Raster::new(new_w, new_h, channels);
    if src.width == 0 || src.height == 0 {
        return dst;
    }

    for y in 0..new_h {
        let src_y = match border_index(y, top, src.height, mode) {
            Some(sy) => sy,
            None => continue,
        };
        let src_row = src.row(src_y);
        let dst_row = dst.row_mut(y);

        // Interior columns are a straight row copy.
        dst_row[left * channels..(left + src.width) * channels].copy_from_slice(src_row);

        if mode == BorderMode::Reflect {
            // Margins wider than the source clamp to the far edge, like the
            // vertical mirror in border_index.
            for x in 0..left {
                let sx = (left - x - 1).min(src.width - 1);
                dst_row[x * channels..(x + 1) * channels]
                    .copy_from_slice(&src_row[sx * channels..(sx + 1) * channels]);
            }
            for x in (left + src.width)..new_w {
                let sx = src.width.saturating_sub(x - (left + src.width) + 1);
                dst_row[x * channels..(x + 1) * channels]
                    .copy_from_slice(&src_row[sx * channels..(sx + 1) * channels]);
            }
        }
    }

    dst
}

/// Source row for destination row `y`, or `None` when the row is entirely
/// border in constant mode (left as zeros).
fn border_index(y: usize, top: usize, src_h: usize, mode: BorderMode) -> Option<usize> {
    if y >= top && y < top + src_h {
        return Some(y - top);
    }
    match mode {
        BorderMode::Constant => None,
        BorderMode::Reflect => {
            if y < top {
                Some((top - y - 1).min(src_h - 1))
            } else {
                Some(src_h.saturating_sub(y - (top + src_h) + 1))
            }
        }
    }
}

/// Shrink a raster by cutting rows/columns from its edges. Returns the
/// raster unchanged if the cut would produce a non-positive dimension.
pub fn crop<T: Copy>(
    img: &mut Raster<T>,
    cut_top: usize,
    cut_bottom: usize,
    cut_left: usize,
    cut_right: usize,
) {
    if cut_left + cut_right >= img.width || cut_top + cut_bottom >= img.height {
        return;
    }
    let new_w = img.width - cut_left - cut_right;
    let new_h = img.height - cut_top - cut_bottom;
    let channels = img.channels;

    let mut cropped = Vec::with_capacity(new_w * new_h * channels);
    for y in 0..new_h {
        let src_row = img.row(y + cut_top);
        cropped.extend_from_slice(&src_row[cut_left * channels..(cut_left + new_w) * channels]);
    }

    img.data = cropped;
    img.width = new_w;
    img.height = new_h;
}

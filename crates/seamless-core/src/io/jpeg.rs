use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use image::codecs::jpeg::JpegEncoder;
use image::ExtendedColorType;

use crate::error::{Result, SeamlessError};
use crate::raster::{Raster, GRAY_CHANNELS, RGB_CHANNELS};

/// Decode an image file into an RGB raster.
pub fn load_image(path: &Path) -> Result<Raster<u8>> {
    let img = image::open(path)?.to_rgb8();
    let (w, h) = img.dimensions();
    Raster::from_vec(img.into_raw(), w as usize, h as usize, RGB_CHANNELS)
}

/// Encode an RGB or grayscale raster as JPEG. `quality` is 1..=100.
pub fn save_jpeg(path: &Path, raster: &Raster<u8>, quality: u8) -> Result<()> {
    let color = match raster.channels {
        RGB_CHANNELS => ExtendedColorType::Rgb8,
        GRAY_CHANNELS => ExtendedColorType::L8,
        actual => {
            return Err(SeamlessError::ChannelMismatch {
                expected: RGB_CHANNELS,
                actual,
            })
        }
    };

    let file = File::create(path)?;
    let mut encoder = JpegEncoder::new_with_quality(BufWriter::new(file), quality.clamp(1, 100));
    encoder.encode(
        &raster.data,
        raster.width as u32,
        raster.height as u32,
        color,
    )?;
    Ok(())
}

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SeamlessError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image format error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Mask size {mask_width}x{mask_height} does not match image size {image_width}x{image_height}")]
    MaskSizeMismatch {
        image_width: usize,
        image_height: usize,
        mask_width: usize,
        mask_height: usize,
    },

    #[error("Invalid raster dimensions: {width}x{height} with {channels} channel(s)")]
    InvalidDimensions {
        width: usize,
        height: usize,
        channels: usize,
    },

    #[error("Expected {expected} channel(s), got {actual}")]
    ChannelMismatch { expected: usize, actual: usize },

    #[error("Blender result already finalized; feed/blend cannot be called again")]
    BlenderConsumed,
}

pub type Result<T> = std::result::Result<T, SeamlessError>;

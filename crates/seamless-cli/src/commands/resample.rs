use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use seamless_core::consts::UPSAMPLE_GAIN;
use seamless_core::io::jpeg::{load_image, save_jpeg};
use seamless_core::resample::{downsample, upsample};

#[derive(Args)]
pub struct ResampleArgs {
    /// Input image file
    pub file: PathBuf,

    /// Resampling direction
    #[arg(long, value_enum, default_value = "down")]
    pub direction: Direction,

    /// How many times to apply the operation
    #[arg(long, default_value = "1")]
    pub times: usize,

    /// JPEG quality of the output (1-100)
    #[arg(long, default_value = "95")]
    pub quality: u8,

    /// Output file path
    #[arg(short, long, default_value = "resampled.jpg")]
    pub output: PathBuf,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum Direction {
    /// Gaussian low-pass and halve
    Down,
    /// Zero-insertion double
    Up,
}

pub fn run(args: &ResampleArgs) -> Result<()> {
    let mut image = load_image(&args.file)
        .with_context(|| format!("Failed to load {}", args.file.display()))?;

    println!("Loaded {}x{} image", image.width, image.height);

    for _ in 0..args.times {
        image = match args.direction {
            Direction::Down => downsample(&image),
            Direction::Up => upsample(&image, UPSAMPLE_GAIN),
        };
    }

    println!("Resampled to {}x{}", image.width, image.height);
    save_jpeg(&args.output, &image, args.quality)
        .with_context(|| format!("Failed to save {}", args.output.display()))?;
    println!("Saved to {}", args.output.display());
    Ok(())
}

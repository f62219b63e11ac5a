use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use seamless_core::distance::distance_transform;
use seamless_core::io::jpeg::save_jpeg;
use seamless_core::mask::{create_mask, create_vertical_mask};

#[derive(Args)]
pub struct MaskArgs {
    /// Mask width in pixels
    pub width: usize,

    /// Mask height in pixels
    pub height: usize,

    /// Stripe size as a fraction of the cut axis (0.0-1.0)
    #[arg(long, default_value = "0.1")]
    pub range: f32,

    /// Zero a stripe at the left edge
    #[arg(long)]
    pub left: bool,

    /// Zero a stripe at the right edge
    #[arg(long)]
    pub right: bool,

    /// Zero a stripe at the top edge
    #[arg(long)]
    pub top: bool,

    /// Zero a stripe at the bottom edge
    #[arg(long)]
    pub bottom: bool,

    /// Apply the chamfer distance transform to the generated mask
    #[arg(long)]
    pub distance: bool,

    /// Output file path
    #[arg(short, long, default_value = "mask.jpg")]
    pub output: PathBuf,
}

pub fn run(args: &MaskArgs) -> Result<()> {
    let mut mask = if args.top || args.bottom {
        create_vertical_mask(args.width, args.height, args.range, args.top, args.bottom)
    } else {
        create_mask(args.width, args.height, args.range, args.left, args.right)
    };

    if args.distance {
        distance_transform(&mut mask);
    }

    save_jpeg(&args.output, &mask, 100)
        .with_context(|| format!("Failed to save {}", args.output.display()))?;
    println!("Saved {}x{} mask to {}", mask.width, mask.height, args.output.display());
    Ok(())
}

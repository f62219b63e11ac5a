use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Args, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use seamless_core::blend::{Blender, BlenderKind};
use seamless_core::io::jpeg::{load_image, save_jpeg};
use seamless_core::mask::{create_mask, create_vertical_mask};
use seamless_core::raster::{rgb_to_gray, Point, Raster, Rect};
use tracing::debug;

use crate::config::{BlenderConfig, MaskConfig, StitchConfig};

#[derive(Args)]
pub struct StitchArgs {
    /// Two input images for the quick side-by-side mode (left, right)
    pub images: Vec<PathBuf>,

    /// Stitch job config file (TOML); overrides the quick mode
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Blending algorithm
    #[arg(long, value_enum, default_value = "multiband")]
    pub blender: BlenderChoice,

    /// Number of pyramid bands (multiband only)
    #[arg(long, default_value = "5")]
    pub bands: usize,

    /// Overlap fraction of the image width in quick mode (0.0-0.5)
    #[arg(long, default_value = "0.1")]
    pub overlap: f32,

    /// Feather the masks with a distance transform (feather only)
    #[arg(long)]
    pub distance_transform: bool,

    /// JPEG quality of the output (1-100)
    #[arg(long, default_value = "95")]
    pub quality: u8,

    /// Output file path
    #[arg(short, long, default_value = "stitched.jpg")]
    pub output: PathBuf,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum BlenderChoice {
    Multiband,
    Feather,
}

pub fn run(args: &StitchArgs) -> Result<()> {
    if let Some(ref config_path) = args.config {
        let contents = fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read {}", config_path.display()))?;
        let config: StitchConfig = toml::from_str(&contents).context("Invalid stitch config")?;
        debug!(inputs = config.inputs.len(), "loaded stitch config");
        return run_config(&config);
    }
    run_quick(args)
}

/// Side-by-side stitch of exactly two images with generated stripe masks.
fn run_quick(args: &StitchArgs) -> Result<()> {
    let [left_path, right_path] = args.images.as_slice() else {
        bail!("quick mode takes exactly two images (or use --config)");
    };

    let left = load_image(left_path)
        .with_context(|| format!("Failed to load {}", left_path.display()))?;
    let right = load_image(right_path)
        .with_context(|| format!("Failed to load {}", right_path.display()))?;

    // Cut the overlap stripe from the facing edge of each mask.
    let left_mask = create_mask(left.width, left.height, args.overlap, false, true);
    let right_mask = create_mask(right.width, right.height, args.overlap, true, false);

    let overlap_px = (left.width as f32 * args.overlap) as i64;
    let out_width = left.width as i64 + right.width as i64 - 2 * overlap_px;
    let out_height = left.height.max(right.height) as i64;
    let out_size = Rect::new(0, 0, out_width, out_height);

    let kind = match args.blender {
        BlenderChoice::Multiband => BlenderKind::MultiBand {
            num_bands: args.bands,
        },
        BlenderChoice::Feather => BlenderKind::Feather {
            distance_transform: args.distance_transform,
        },
    };

    let mut blender = Blender::new(kind, out_size);
    blender.feed(&left, &left_mask, Point::new(0, 0))?;
    blender.feed(&right, &right_mask, Point::new(out_width - right.width as i64, 0))?;
    blender.blend()?;

    save_result(&mut blender, &args.output, args.quality)
}

/// Stitch an arbitrary set of placed inputs described by a TOML job.
fn run_config(config: &StitchConfig) -> Result<()> {
    if config.inputs.is_empty() {
        bail!("stitch config lists no inputs");
    }
    if config.width <= 0 || config.height <= 0 {
        bail!("output canvas must be positive, got {}x{}", config.width, config.height);
    }

    let kind = match config.blender {
        BlenderConfig::MultiBand { bands } => BlenderKind::MultiBand { num_bands: bands },
        BlenderConfig::Feather { distance_transform } => {
            BlenderKind::Feather { distance_transform }
        }
    };
    let mut blender = Blender::new(kind, Rect::new(0, 0, config.width, config.height));

    let pb = ProgressBar::new(config.inputs.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{msg:20} [{bar:40}] {pos}/{len}")?
            .progress_chars("=> "),
    );

    for input in &config.inputs {
        pb.set_message(
            input
                .path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default(),
        );
        let image = load_image(&input.path)
            .with_context(|| format!("Failed to load {}", input.path.display()))?;
        let mask = build_mask(&image, &input.mask)?;
        blender.feed(&image, &mask, Point::new(input.x, input.y))?;
        pb.inc(1);
    }

    pb.set_message("blending");
    blender.blend()?;
    pb.finish_with_message("Done");

    save_result(&mut blender, &config.output, config.quality)
}

fn build_mask(image: &Raster<u8>, config: &MaskConfig) -> Result<Raster<u8>> {
    let mask = match config {
        MaskConfig::Full => create_mask(image.width, image.height, 0.0, false, false),
        MaskConfig::Horizontal { range, left, right } => {
            create_mask(image.width, image.height, *range, *left, *right)
        }
        MaskConfig::Vertical { range, top, bottom } => {
            create_vertical_mask(image.width, image.height, *range, *top, *bottom)
        }
        MaskConfig::File { path } => {
            let raster = load_image(path)
                .with_context(|| format!("Failed to load mask {}", path.display()))?;
            rgb_to_gray(&raster)?
        }
    };
    Ok(mask)
}

fn save_result(blender: &mut Blender, output: &Path, quality: u8) -> Result<()> {
    let result = blender
        .take_result()
        .context("blend produced no result")?;
    save_jpeg(output, &result, quality)
        .with_context(|| format!("Failed to save {}", output.display()))?;
    println!("Saved to {}", output.display());
    Ok(())
}

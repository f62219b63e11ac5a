use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Declarative stitch job loaded from a TOML file.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StitchConfig {
    /// Output image path.
    pub output: PathBuf,
    /// Output canvas size in pixels.
    pub width: i64,
    pub height: i64,
    #[serde(default)]
    pub blender: BlenderConfig,
    /// JPEG quality for the result (1-100).
    #[serde(default = "default_quality")]
    pub quality: u8,
    #[serde(default)]
    pub inputs: Vec<InputConfig>,
}

fn default_quality() -> u8 {
    95
}

/// Blending algorithm selection.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BlenderConfig {
    /// Laplacian pyramid blending.
    MultiBand {
        #[serde(default = "default_bands")]
        bands: usize,
    },
    /// Flat weighted averaging.
    Feather {
        #[serde(default)]
        distance_transform: bool,
    },
}

fn default_bands() -> usize {
    5
}

impl Default for BlenderConfig {
    fn default() -> Self {
        BlenderConfig::MultiBand {
            bands: default_bands(),
        }
    }
}

/// One source image with its canvas placement and weight mask.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct InputConfig {
    pub path: PathBuf,
    /// Canvas position of the image's top-left corner.
    #[serde(default)]
    pub x: i64,
    #[serde(default)]
    pub y: i64,
    #[serde(default)]
    pub mask: MaskConfig,
}

/// Weight mask specification for one input.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MaskConfig {
    /// Full-weight mask (all 255).
    #[default]
    Full,
    /// Zeroed column stripe of width `range * image_width` on the chosen
    /// sides.
    Horizontal {
        range: f32,
        #[serde(default)]
        left: bool,
        #[serde(default)]
        right: bool,
    },
    /// Zeroed row stripe of height `range * image_height` on the chosen
    /// sides.
    Vertical {
        range: f32,
        #[serde(default)]
        top: bool,
        #[serde(default)]
        bottom: bool,
    },
    /// Grayscale mask image loaded from disk, converted from RGB if needed.
    File { path: PathBuf },
}

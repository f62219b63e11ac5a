mod commands;
mod config;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "seamless", about = "Seam-hiding image compositor")]
#[command(version)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Blend overlapping images into one seamless output
    Stitch(commands::stitch::StitchArgs),
    /// Run an image through the Gaussian resampler
    Resample(commands::resample::ResampleArgs),
    /// Generate a blend mask and save it for inspection
    Mask(commands::mask::MaskArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match &cli.command {
        Commands::Stitch(args) => commands::stitch::run(args),
        Commands::Resample(args) => commands::resample::run(args),
        Commands::Mask(args) => commands::mask::run(args),
    }
}

//! Command-line argument parsing for the terrain demo.

use std::path::PathBuf;

use clap::Parser;

use crate::Config;

/// Terrain demo command-line arguments.
///
/// CLI values override settings loaded from `config.ron`.
#[derive(Parser, Debug, Default)]
#[command(name = "vista", about = "Procedural heightmap terrain generator")]
pub struct CliArgs {
    /// Noise seed.
    #[arg(long)]
    pub seed: Option<u32>,

    /// Heightmap width in cells.
    #[arg(long)]
    pub width: Option<u32>,

    /// Heightmap height in cells.
    #[arg(long)]
    pub height: Option<u32>,

    /// Noise scale (grid cells per noise unit).
    #[arg(long)]
    pub scale: Option<f32>,

    /// Number of noise octaves.
    #[arg(long)]
    pub octaves: Option<u32>,

    /// Write the biome color map to this PNG file.
    #[arg(long)]
    pub color_map: Option<PathBuf>,

    /// Write a grayscale heightmap to this PNG file.
    #[arg(long)]
    pub heightmap: Option<PathBuf>,

    /// Upload the generated assets to a headless GPU device.
    #[arg(long)]
    pub gpu: bool,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Path to config directory (overrides default location).
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl Config {
    /// Apply CLI overrides to a loaded config.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(seed) = args.seed {
            self.terrain.seed = seed;
        }
        let heightmap = &mut self.terrain.heightmap;
        if let Some(w) = args.width {
            heightmap.width = w;
        }
        if let Some(h) = args.height {
            heightmap.height = h;
        }
        if let Some(scale) = args.scale {
            heightmap.scale = scale;
        }
        if let Some(octaves) = args.octaves {
            heightmap.octaves = octaves;
        }
        if let Some(ref path) = args.color_map {
            self.output.color_map_png = Some(path.clone());
        }
        if let Some(ref path) = args.heightmap {
            self.output.heightmap_png = Some(path.clone());
        }
        if args.gpu {
            self.output.upload_to_gpu = true;
        }
        if let Some(ref level) = args.log_level {
            self.debug.log_level = level.clone();
        }
    }
}

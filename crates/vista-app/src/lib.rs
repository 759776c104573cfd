//! Procedural terrain generator: configuration in, mesh and color map out.

pub mod export;
pub mod pipeline;
pub mod platform;

pub use export::{ExportError, write_color_map_png, write_heightmap_png};
pub use pipeline::{
    GeneratedTerrain, PipelineError, TerrainSettings, build_heightmap, finish_terrain,
    generate_terrain, run,
};
pub use platform::{APP_NAME, PlatformDirs, PlatformError};

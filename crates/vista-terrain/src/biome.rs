//! Biome classification: maps normalized heights to terrain bands and colors.

mod band;
mod color_map;
mod table;

pub use band::{Rgba8, TerrainBand};
pub use color_map::ColorMap;
pub use table::{BiomeTable, BiomeTableError};

//! Procedural terrain generation: fractal noise, heightmap normalization, and biome coloring.

mod fractal;
mod heightmap;

pub mod biome;

pub use biome::{BiomeTable, BiomeTableError, ColorMap, Rgba8, TerrainBand};
pub use fractal::{GradientNoise, Noise2D, NoiseKind, NoiseSampler, max_amplitude};
pub use heightmap::{
    DegeneratePolicy, Heightmap, HeightmapBuilder, HeightmapError, HeightmapParams, map_range,
};

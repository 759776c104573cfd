//! One pass of the terrain pipeline: noise, heightmap, biome colors, mesh.

use vista_config::{Config, ConfigError};
use vista_mesh::{MeshBuffer, MeshError, MeshGenerator, MeshParams};
use vista_render::{GpuInitError, TerrainAssets, UploadError, WgpuBackend};
use vista_terrain::{
    BiomeTable, ColorMap, DegeneratePolicy, GradientNoise, Heightmap, HeightmapBuilder,
    HeightmapError, HeightmapParams, NoiseKind, NoiseSampler,
};

use crate::export::{ExportError, write_color_map_png, write_heightmap_png};
use crate::platform::PlatformError;

/// Any failure between reading the config and uploading the result.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Platform(#[from] PlatformError),

    #[error("heightmap generation failed: {0}")]
    Heightmap(#[from] HeightmapError),

    #[error("invalid mesh parameters: {0}")]
    Mesh(#[from] MeshError),

    #[error("export failed: {0}")]
    Export(#[from] ExportError),

    #[error("GPU initialization failed: {0}")]
    Gpu(#[from] GpuInitError),

    #[error("upload failed: {0}")]
    Upload(#[from] UploadError),
}

/// Everything needed to generate one terrain.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TerrainSettings {
    pub seed: u32,
    pub noise: NoiseKind,
    pub heightmap: HeightmapParams,
    pub degenerate: DegeneratePolicy,
    pub mesh: MeshParams,
    pub biomes: BiomeTable,
}

impl From<&Config> for TerrainSettings {
    fn from(config: &Config) -> Self {
        Self {
            seed: config.terrain.seed,
            noise: config.terrain.noise,
            heightmap: config.terrain.heightmap.clone(),
            degenerate: config.terrain.degenerate,
            mesh: config.mesh.clone(),
            biomes: config.biomes.clone(),
        }
    }
}

/// Output of [`generate_terrain`]. The heightmap itself is not kept.
#[derive(Debug, Clone)]
pub struct GeneratedTerrain {
    pub mesh: MeshBuffer,
    pub color_map: ColorMap,
}

/// Sample the configured noise into a normalized heightmap.
pub fn build_heightmap(settings: &TerrainSettings) -> Result<Heightmap, HeightmapError> {
    let noise = GradientNoise::new(settings.noise, settings.seed);
    HeightmapBuilder::new(NoiseSampler::new(noise), settings.degenerate).build(&settings.heightmap)
}

/// Classify and mesh a heightmap, consuming it.
pub fn finish_terrain(
    generator: &MeshGenerator,
    biomes: &BiomeTable,
    heightmap: Heightmap,
) -> GeneratedTerrain {
    let color_map = ColorMap::from_heightmap(&heightmap, biomes);
    let mesh = generator.generate(&heightmap);

    tracing::info!(
        width = heightmap.width(),
        height = heightmap.height(),
        triangles = mesh.triangle_count(),
        colors = color_map.unique_color_count(),
        "generated terrain"
    );

    GeneratedTerrain { mesh, color_map }
}

/// Run the whole pipeline once.
///
/// # Errors
///
/// Returns [`PipelineError::Mesh`] for invalid mesh parameters, checked
/// before any sampling, and [`PipelineError::Heightmap`] if the heightmap
/// cannot be built.
pub fn generate_terrain(settings: &TerrainSettings) -> Result<GeneratedTerrain, PipelineError> {
    let _span = tracing::info_span!("generate_terrain", seed = settings.seed).entered();
    let generator = MeshGenerator::new(settings.mesh.clone())?;
    let heightmap = build_heightmap(settings)?;
    Ok(finish_terrain(&generator, &settings.biomes, heightmap))
}

/// Generate a terrain from `config` and deliver it to every configured output.
///
/// The heightmap PNG is written before the heightmap is consumed by meshing.
pub fn run(config: &Config) -> Result<GeneratedTerrain, PipelineError> {
    let settings = TerrainSettings::from(config);
    let _span = tracing::info_span!("generate_terrain", seed = settings.seed).entered();

    let generator = MeshGenerator::new(settings.mesh.clone())?;
    let heightmap = build_heightmap(&settings)?;
    if let Some(path) = &config.output.heightmap_png {
        write_heightmap_png(path, &heightmap)?;
    }

    let terrain = finish_terrain(&generator, &settings.biomes, heightmap);
    if let Some(path) = &config.output.color_map_png {
        write_color_map_png(path, &terrain.color_map)?;
    }

    if config.output.upload_to_gpu {
        let mut backend = WgpuBackend::headless_blocking()?;
        let assets = TerrainAssets::upload(&mut backend, &terrain.mesh, &terrain.color_map)?;
        tracing::info!(
            vertices = assets.vertex_count,
            triangles = assets.triangle_count(),
            "terrain resident on GPU"
        );
    }

    Ok(terrain)
}

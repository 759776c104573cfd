//! Terrain meshing: heightmap triangulation, vertex interleaving, and the GPU vertex layout.

pub mod grid;
pub mod terrain_mesh;
pub mod vertex_format;

pub use grid::{TerrainGrid, Triangulation, elevation, grid_position, grid_uv};
pub use terrain_mesh::{MeshBuffer, MeshError, MeshGenerator, MeshParams, NormalMode};
pub use vertex_format::{
    FLOATS_PER_VERTEX, TERRAIN_VERTEX_ATTRIBUTES, TERRAIN_VERTEX_LAYOUT, TerrainVertex,
    terrain_vertex_buffer_layout,
};

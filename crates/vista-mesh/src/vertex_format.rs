//! Interleaved terrain vertex and its canonical `wgpu::VertexBufferLayout`.
//!
//! ## Attribute Packing
//!
//! | Location | Offset | Format    | Field    |
//! |----------|--------|-----------|----------|
//! | 0        | 0      | Float32x3 | position |
//! | 1        | 12     | Float32x3 | normal   |
//! | 2        | 24     | Float32x2 | uv       |

use std::mem;

use wgpu::{VertexAttribute, VertexBufferLayout, VertexFormat, VertexStepMode};

/// Floats per interleaved vertex: position (3) + normal (3) + uv (2).
pub const FLOATS_PER_VERTEX: usize = 8;

/// A single terrain vertex, laid out exactly as the GPU reads it.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct TerrainVertex {
    /// World-space position.
    pub position: [f32; 3],
    /// Surface normal.
    pub normal: [f32; 3],
    /// Texture coordinates into the biome color map.
    pub uv: [f32; 2],
}

static_assertions::assert_eq_size!(TerrainVertex, [f32; FLOATS_PER_VERTEX]);

/// Vertex attributes for the terrain mesh format.
pub const TERRAIN_VERTEX_ATTRIBUTES: [VertexAttribute; 3] = [
    VertexAttribute {
        format: VertexFormat::Float32x3,
        offset: 0,
        shader_location: 0,
    },
    VertexAttribute {
        format: VertexFormat::Float32x3,
        offset: mem::size_of::<[f32; 3]>() as u64,
        shader_location: 1,
    },
    VertexAttribute {
        format: VertexFormat::Float32x2,
        offset: mem::size_of::<[f32; 6]>() as u64,
        shader_location: 2,
    },
];

/// The vertex buffer layout for the terrain render pipeline.
pub const TERRAIN_VERTEX_LAYOUT: VertexBufferLayout<'static> = VertexBufferLayout {
    array_stride: mem::size_of::<TerrainVertex>() as u64,
    step_mode: VertexStepMode::Vertex,
    attributes: &TERRAIN_VERTEX_ATTRIBUTES,
};

/// Return the terrain vertex buffer layout as an owned value.
pub fn terrain_vertex_buffer_layout() -> VertexBufferLayout<'static> {
    TERRAIN_VERTEX_LAYOUT
}

const _: () = assert!(TERRAIN_VERTEX_ATTRIBUTES[0].offset == 0);
const _: () = assert!(TERRAIN_VERTEX_ATTRIBUTES[1].offset == 12);
const _: () = assert!(TERRAIN_VERTEX_ATTRIBUTES[2].offset == 24);
const _: () = assert!(
    TERRAIN_VERTEX_ATTRIBUTES[2].offset + 8 == mem::size_of::<TerrainVertex>() as u64,
    "uv must end exactly at the vertex stride"
);

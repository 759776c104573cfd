//! Heightmap-to-mesh conversion producing a flat, non-indexed vertex stream.
//!
//! [`MeshGenerator`] first builds the indexed [`TerrainGrid`] and then walks its
//! triangle list, emitting one fully interleaved [`TerrainVertex`] per
//! triangle corner. Shared grid vertices are duplicated rather than indexed,
//! so the renderer can issue a plain non-indexed draw.

use glam::Vec3;
use serde::{Deserialize, Serialize};
use vista_terrain::Heightmap;

use crate::grid::{TerrainGrid, Triangulation};
use crate::vertex_format::{FLOATS_PER_VERTEX, TerrainVertex};

/// How vertex normals are assigned.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum NormalMode {
    /// Every vertex gets the fixed up vector `(0, 1, 0)`.
    #[default]
    Up,
    /// Each triangle's own face normal, repeated on its three corners.
    Flat,
    /// Face normals averaged over every triangle sharing a grid vertex.
    Smooth,
}

/// Parameters for turning a heightmap into a mesh.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MeshParams {
    /// Elevation multiplier at normalized height 0 and at 1.
    pub height_scale_range: (f32, f32),
    /// Normal assignment.
    pub normals: NormalMode,
    /// Which quad rows are triangulated.
    pub triangulation: Triangulation,
}

impl Default for MeshParams {
    fn default() -> Self {
        Self {
            height_scale_range: (1.0, 10.0),
            normals: NormalMode::Up,
            triangulation: Triangulation::Legacy,
        }
    }
}

/// Errors from invalid mesh parameters.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MeshError {
    #[error("height scale range must be finite, got ({0}, {1})")]
    NonFiniteHeightScale(f32, f32),
}

impl MeshParams {
    /// Check that every parameter yields finite vertex positions.
    pub fn validate(&self) -> Result<(), MeshError> {
        let (low, high) = self.height_scale_range;
        if !(low.is_finite() && high.is_finite()) {
            return Err(MeshError::NonFiniteHeightScale(low, high));
        }
        Ok(())
    }
}

/// A non-indexed triangle list ready for GPU upload.
///
/// Always holds `3 * triangle_count` vertices, in emission order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MeshBuffer {
    vertices: Vec<TerrainVertex>,
}

impl MeshBuffer {
    pub fn vertices(&self) -> &[TerrainVertex] {
        &self.vertices
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.vertices.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Interleaved floats, [`FLOATS_PER_VERTEX`] per vertex.
    pub fn as_floats(&self) -> &[f32] {
        bytemuck::cast_slice(&self.vertices)
    }

    /// Raw bytes for a vertex-buffer upload (zero-copy).
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    /// Size of the vertex data in bytes.
    pub fn byte_len(&self) -> usize {
        self.vertices.len() * FLOATS_PER_VERTEX * std::mem::size_of::<f32>()
    }
}

/// Converts heightmaps into [`MeshBuffer`]s.
#[derive(Clone, Debug, Default)]
pub struct MeshGenerator {
    params: MeshParams,
}

impl MeshGenerator {
    /// Create a generator, rejecting parameters that would produce
    /// non-finite positions.
    pub fn new(params: MeshParams) -> Result<Self, MeshError> {
        params.validate()?;
        Ok(Self { params })
    }

    /// A generator with default normals and triangulation and the given
    /// elevation multiplier range.
    pub fn with_height_range(height_scale_range: (f32, f32)) -> Result<Self, MeshError> {
        Self::new(MeshParams {
            height_scale_range,
            ..Default::default()
        })
    }

    pub fn params(&self) -> &MeshParams {
        &self.params
    }

    /// Build the indexed grid for `heightmap`.
    pub fn generate_grid(&self, heightmap: &Heightmap) -> TerrainGrid {
        TerrainGrid::from_heightmap(
            heightmap,
            self.params.height_scale_range,
            self.params.triangulation,
        )
    }

    /// Build the non-indexed vertex stream for `heightmap`.
    pub fn generate(&self, heightmap: &Heightmap) -> MeshBuffer {
        let _span = tracing::debug_span!(
            "generate_mesh",
            width = heightmap.width(),
            height = heightmap.height()
        )
        .entered();

        let grid = self.generate_grid(heightmap);
        let mesh = expand(&grid, self.params.normals);

        tracing::debug!(
            triangles = mesh.triangle_count(),
            bytes = mesh.byte_len(),
            "assembled terrain mesh"
        );
        mesh
    }
}

/// Emit one interleaved vertex per (triangle, corner) pair.
fn expand(grid: &TerrainGrid, mode: NormalMode) -> MeshBuffer {
    let positions = grid.positions();
    let uvs = grid.uvs();
    let smooth = match mode {
        NormalMode::Smooth => Some(grid.vertex_normals()),
        NormalMode::Up | NormalMode::Flat => None,
    };

    let mut vertices = Vec::with_capacity(grid.indices().len());
    for triangle in grid.triangles() {
        let flat = match mode {
            NormalMode::Flat => grid.face_normal(triangle).try_normalize().unwrap_or(Vec3::Y),
            NormalMode::Up | NormalMode::Smooth => Vec3::Y,
        };

        for i in triangle {
            let i = i as usize;
            let normal = smooth.as_ref().map_or(flat, |normals| normals[i]);
            vertices.push(TerrainVertex {
                position: positions[i].to_array(),
                normal: normal.to_array(),
                uv: uvs[i].to_array(),
            });
        }
    }

    MeshBuffer { vertices }
}

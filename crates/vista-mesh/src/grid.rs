//! Indexed terrain grid: one shared vertex per heightmap cell plus a triangle list.

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};
use vista_terrain::{Heightmap, map_range};

/// Which rows of quads are triangulated.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Triangulation {
    /// Quads for rows `0..height - 2`. The last row of quads is left open.
    #[default]
    Legacy,
    /// Quads for rows `0..height - 1`, covering the whole grid.
    Full,
}

impl Triangulation {
    /// Number of quad rows emitted for a grid with `height` rows.
    pub fn quad_rows(self, height: u32) -> u32 {
        match self {
            Self::Legacy => height.saturating_sub(2),
            Self::Full => height.saturating_sub(1),
        }
    }
}

/// Scale a normalized height into world-space elevation.
///
/// The multiplier itself grows with height, from `range.0` at `0.0` to
/// `range.1` at `1.0`, which exaggerates peaks relative to valleys.
pub fn elevation(height: f32, range: (f32, f32)) -> f32 {
    height * map_range(0.0, 1.0, range.0, range.1, height)
}

/// World-space position of grid cell `(x, y)`.
///
/// The grid is centered on the origin in XZ; rows advance toward -Z.
pub fn grid_position(x: u32, y: u32, width: u32, height: u32, elevation: f32) -> Vec3 {
    let origin_x = (width as f32 - 1.0) / -2.0;
    let origin_z = (height as f32 - 1.0) / 2.0;
    Vec3::new(origin_x + x as f32, elevation, origin_z - y as f32)
}

/// Texture coordinate of grid cell `(x, y)`.
pub fn grid_uv(x: u32, y: u32, width: u32, height: u32) -> Vec2 {
    Vec2::new(x as f32 / width as f32, y as f32 / height as f32)
}

/// The indexed form of a terrain mesh.
///
/// Triangles wind clockwise when viewed from above (+Y).
#[derive(Clone, Debug, PartialEq)]
pub struct TerrainGrid {
    width: u32,
    height: u32,
    positions: Vec<Vec3>,
    uvs: Vec<Vec2>,
    indices: Vec<u32>,
}

impl TerrainGrid {
    /// Lay out one vertex per heightmap cell and triangulate the quads
    /// selected by `triangulation`.
    pub fn from_heightmap(
        heightmap: &Heightmap,
        height_scale_range: (f32, f32),
        triangulation: Triangulation,
    ) -> Self {
        let (width, height) = heightmap.dimensions();
        let cell_count = width as usize * height as usize;
        let quad_cols = width.saturating_sub(1);
        let quad_rows = triangulation.quad_rows(height);

        let mut positions = Vec::with_capacity(cell_count);
        let mut uvs = Vec::with_capacity(cell_count);
        let mut indices = Vec::with_capacity(quad_cols as usize * quad_rows as usize * 6);

        for y in 0..height {
            for x in 0..width {
                let h = heightmap.get(x, y);
                positions.push(grid_position(
                    x,
                    y,
                    width,
                    height,
                    elevation(h, height_scale_range),
                ));
                uvs.push(grid_uv(x, y, width, height));

                if x < quad_cols && y < quad_rows {
                    let idx = y * width + x;
                    indices.extend_from_slice(&[
                        idx,
                        idx + width,
                        idx + width + 1,
                        idx + width + 1,
                        idx + 1,
                        idx,
                    ]);
                }
            }
        }

        Self {
            width,
            height,
            positions,
            uvs,
            indices,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// One position per grid cell, row-major.
    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    /// One texture coordinate per grid cell, row-major.
    pub fn uvs(&self) -> &[Vec2] {
        &self.uvs
    }

    /// Triangle list, three indices per triangle.
    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Corner indices of every triangle.
    pub fn triangles(&self) -> impl Iterator<Item = [u32; 3]> + '_ {
        self.indices.chunks_exact(3).map(|t| [t[0], t[1], t[2]])
    }

    /// Unnormalized normal of a triangle, pointing up for this grid's winding.
    /// Its length is twice the triangle's area.
    pub fn face_normal(&self, triangle: [u32; 3]) -> Vec3 {
        let [a, b, c] = triangle.map(|i| self.positions[i as usize]);
        (c - a).cross(b - a)
    }

    /// Area-weighted average of the face normals around each grid vertex.
    ///
    /// Vertices touched by no triangle get the up vector.
    pub fn vertex_normals(&self) -> Vec<Vec3> {
        let mut normals = vec![Vec3::ZERO; self.positions.len()];
        for triangle in self.triangles() {
            let n = self.face_normal(triangle);
            for i in triangle {
                normals[i as usize] += n;
            }
        }
        for n in &mut normals {
            *n = n.try_normalize().unwrap_or(Vec3::Y);
        }
        normals
    }
}

//! Terrain mesh and color map uploaded together.

use vista_mesh::MeshBuffer;
use vista_terrain::ColorMap;

use crate::backend::{MeshUpload, RenderBackend, TextureUpload, UploadError};

/// Handles for one generated terrain, owned by backend `B`.
pub struct TerrainAssets<B: RenderBackend> {
    pub mesh: B::Mesh,
    pub color_map: B::Texture,
    /// Vertices to draw, three per triangle.
    pub vertex_count: u32,
    /// Color map size in texels.
    pub color_map_size: (u32, u32),
}

impl<B: RenderBackend> TerrainAssets<B> {
    /// Upload `mesh` and `colors` through `backend`.
    ///
    /// Both inputs are checked against the backend before anything is sent,
    /// so a color map the backend cannot hold never leaves a mesh uploaded
    /// behind it.
    pub fn upload(
        backend: &mut B,
        mesh: &MeshBuffer,
        colors: &ColorMap,
    ) -> Result<Self, UploadError> {
        let mesh_upload = MeshUpload::from_mesh("terrain-mesh", mesh)?;
        let texture_upload = TextureUpload::from_color_map("terrain-color-map", colors)?;
        backend.check_mesh(&mesh_upload)?;
        backend.check_texture(&texture_upload)?;

        let mesh_handle = backend.upload_mesh(&mesh_upload)?;
        let texture_handle = backend.upload_texture(&texture_upload)?;

        log::info!(
            "Uploaded terrain: {} vertices, {}x{} color map",
            mesh_upload.vertex_count,
            texture_upload.width,
            texture_upload.height
        );

        Ok(Self {
            mesh: mesh_handle,
            color_map: texture_handle,
            vertex_count: mesh_upload.vertex_count,
            color_map_size: (texture_upload.width, texture_upload.height),
        })
    }

    /// Triangles in the uploaded stream.
    pub fn triangle_count(&self) -> u32 {
        self.vertex_count / 3
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::TextureFilter;
    use vista_mesh::{FLOATS_PER_VERTEX, MeshGenerator};
    use vista_terrain::{BiomeTable, Heightmap};

    #[derive(Debug, PartialEq)]
    struct RecordedMesh {
        floats: Vec<f32>,
        stride: u64,
        vertex_count: u32,
    }

    #[derive(Debug, PartialEq)]
    struct RecordedTexture {
        width: u32,
        height: u32,
        filter: TextureFilter,
        pixels: Vec<u8>,
    }

    #[derive(Default)]
    struct RecordingBackend {
        meshes: usize,
        textures: usize,
        reject_textures: bool,
        max_texture_dimension: Option<u32>,
    }

    impl RenderBackend for RecordingBackend {
        type Mesh = RecordedMesh;
        type Texture = RecordedTexture;

        fn check_texture(&self, texture: &TextureUpload<'_>) -> Result<(), UploadError> {
            texture.validate()?;
            if let Some(limit) = self.max_texture_dimension
                && texture.width.max(texture.height) > limit
            {
                return Err(UploadError::ExceedsLimit {
                    resource: "texture dimension",
                    requested: texture.width.max(texture.height) as u64,
                    limit: limit as u64,
                });
            }
            Ok(())
        }

        fn upload_mesh(&mut self, mesh: &MeshUpload<'_>) -> Result<RecordedMesh, UploadError> {
            self.meshes += 1;
            Ok(RecordedMesh {
                floats: bytemuck::cast_slice(mesh.vertices).to_vec(),
                stride: mesh.layout.array_stride,
                vertex_count: mesh.vertex_count,
            })
        }

        fn upload_texture(
            &mut self,
            texture: &TextureUpload<'_>,
        ) -> Result<RecordedTexture, UploadError> {
            if self.reject_textures {
                return Err(UploadError::Backend("out of memory".into()));
            }
            self.textures += 1;
            Ok(RecordedTexture {
                width: texture.width,
                height: texture.height,
                filter: texture.filter,
                pixels: texture.pixels.to_vec(),
            })
        }
    }

    fn heightmap() -> Heightmap {
        let samples = vec![0.0, 0.25, 0.5, 0.75, 1.0, 0.5, 0.2, 0.4, 0.6];
        Heightmap::from_normalized(3, 3, samples).unwrap()
    }

    #[test]
    fn test_upload_forwards_mesh_and_colors() {
        let hm = heightmap();
        let mesh = MeshGenerator::default().generate(&hm);
        let colors = ColorMap::from_heightmap(&hm, &BiomeTable::default());

        let mut backend = RecordingBackend::default();
        let assets = TerrainAssets::upload(&mut backend, &mesh, &colors).unwrap();

        assert_eq!(backend.meshes, 1);
        assert_eq!(backend.textures, 1);
        assert_eq!(assets.vertex_count as usize, mesh.vertex_count());
        assert_eq!(assets.triangle_count() as usize, mesh.triangle_count());
        assert_eq!(assets.mesh.floats.as_slice(), mesh.as_floats());
        assert_eq!(assets.mesh.floats.len(), mesh.vertex_count() * FLOATS_PER_VERTEX);
        assert_eq!(assets.mesh.stride, 32);
        assert_eq!(assets.color_map.filter, TextureFilter::Nearest);
        assert_eq!(assets.color_map.pixels.as_slice(), colors.as_bytes());
        assert_eq!(assets.color_map_size, (3, 3));
    }

    #[test]
    fn test_backend_failure_propagates() {
        let hm = heightmap();
        let mesh = MeshGenerator::default().generate(&hm);
        let colors = ColorMap::from_heightmap(&hm, &BiomeTable::default());

        let mut backend = RecordingBackend {
            reject_textures: true,
            ..Default::default()
        };
        let result = TerrainAssets::upload(&mut backend, &mesh, &colors);
        assert!(matches!(result, Err(UploadError::Backend(_))));
    }

    #[test]
    fn test_oversized_color_map_uploads_nothing() {
        let hm = heightmap();
        let mesh = MeshGenerator::default().generate(&hm);
        let colors = ColorMap::from_heightmap(&hm, &BiomeTable::default());

        let mut backend = RecordingBackend {
            max_texture_dimension: Some(2),
            ..Default::default()
        };
        let result = TerrainAssets::upload(&mut backend, &mesh, &colors);
        assert!(matches!(
            result,
            Err(UploadError::ExceedsLimit {
                requested: 3,
                limit: 2,
                ..
            })
        ));
        assert_eq!(backend.meshes, 0);
        assert_eq!(backend.textures, 0);
    }
}

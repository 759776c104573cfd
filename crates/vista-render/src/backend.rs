//! Backend-neutral upload boundary for terrain assets.
//!
//! A [`RenderBackend`] accepts an interleaved, non-indexed vertex stream plus
//! its layout, and an RGBA8 color map plus a filter mode. It hands back
//! opaque handles; everything after upload is the backend's business.

use vista_mesh::{FLOATS_PER_VERTEX, MeshBuffer, TERRAIN_VERTEX_LAYOUT};
use vista_terrain::ColorMap;

/// Bytes per RGBA8 texel.
pub const BYTES_PER_TEXEL: usize = 4;

/// Errors raised before or during an upload.
#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    /// The vertex stream does not fit a single non-indexed draw.
    #[error("mesh has {0} vertices, more than a single draw can address")]
    TooManyVertices(usize),

    /// The vertex stream is not a whole number of vertices.
    #[error("vertex data length {len} is not a multiple of the {stride}-byte stride")]
    MisalignedVertexData { len: usize, stride: u64 },

    /// Width or height is zero.
    #[error("texture dimensions must be non-zero, got {width}x{height}")]
    ZeroDimensions { width: u32, height: u32 },

    /// Pixel data length doesn't match the dimensions.
    #[error("texture data size ({actual}) does not match expected ({expected}) for {width}x{height}")]
    DataSizeMismatch {
        actual: usize,
        expected: usize,
        width: u32,
        height: u32,
    },

    /// The upload is larger than the backend supports.
    #[error("{resource} of {requested} exceeds the backend limit of {limit}")]
    ExceedsLimit {
        resource: &'static str,
        requested: u64,
        limit: u64,
    },

    /// The backend could not accept the data.
    #[error("backend rejected upload: {0}")]
    Backend(String),
}

/// Sampling mode for an uploaded texture.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TextureFilter {
    /// Point sampling; keeps biome band edges crisp.
    #[default]
    Nearest,
    /// Bilinear sampling.
    Linear,
}

/// An interleaved vertex stream ready for upload.
#[derive(Debug, Clone)]
pub struct MeshUpload<'a> {
    pub label: &'a str,
    /// Raw interleaved vertex bytes.
    pub vertices: &'a [u8],
    /// How the bytes are laid out per vertex.
    pub layout: wgpu::VertexBufferLayout<'static>,
    pub vertex_count: u32,
    pub triangle_count: u32,
}

impl<'a> MeshUpload<'a> {
    /// Describe a terrain mesh with the canonical position/normal/uv layout.
    pub fn from_mesh(label: &'a str, mesh: &'a MeshBuffer) -> Result<Self, UploadError> {
        let vertex_count = u32::try_from(mesh.vertex_count())
            .map_err(|_| UploadError::TooManyVertices(mesh.vertex_count()))?;
        let upload = Self {
            label,
            vertices: mesh.as_bytes(),
            layout: TERRAIN_VERTEX_LAYOUT,
            vertex_count,
            triangle_count: vertex_count / 3,
        };
        upload.validate()?;
        Ok(upload)
    }

    /// Check that the byte length agrees with the layout stride and vertex count.
    pub fn validate(&self) -> Result<(), UploadError> {
        let stride = self.layout.array_stride;
        let len = self.vertices.len();
        if stride == 0 || len as u64 % stride != 0 || len as u64 / stride != self.vertex_count as u64
        {
            return Err(UploadError::MisalignedVertexData { len, stride });
        }
        Ok(())
    }

    /// Floats per vertex implied by the layout stride.
    pub fn floats_per_vertex(&self) -> usize {
        self.layout.array_stride as usize / std::mem::size_of::<f32>()
    }
}

/// An RGBA8 image ready for upload.
#[derive(Debug, Clone)]
pub struct TextureUpload<'a> {
    pub label: &'a str,
    /// Row-major RGBA8 texels, top row first.
    pub pixels: &'a [u8],
    pub width: u32,
    pub height: u32,
    pub filter: TextureFilter,
}

impl<'a> TextureUpload<'a> {
    /// Describe a biome color map, sampled with nearest filtering.
    pub fn from_color_map(label: &'a str, colors: &'a ColorMap) -> Result<Self, UploadError> {
        let upload = Self {
            label,
            pixels: colors.as_bytes(),
            width: colors.width(),
            height: colors.height(),
            filter: TextureFilter::Nearest,
        };
        upload.validate()?;
        Ok(upload)
    }

    pub fn validate(&self) -> Result<(), UploadError> {
        if self.width == 0 || self.height == 0 {
            return Err(UploadError::ZeroDimensions {
                width: self.width,
                height: self.height,
            });
        }
        let expected = self.width as usize * self.height as usize * BYTES_PER_TEXEL;
        if self.pixels.len() != expected {
            return Err(UploadError::DataSizeMismatch {
                actual: self.pixels.len(),
                expected,
                width: self.width,
                height: self.height,
            });
        }
        Ok(())
    }

    /// Bytes per texture row.
    pub fn bytes_per_row(&self) -> u32 {
        self.width * BYTES_PER_TEXEL as u32
    }
}

/// A sink for terrain geometry and color maps.
pub trait RenderBackend {
    /// Opaque handle to an uploaded vertex stream.
    type Mesh;
    /// Opaque handle to an uploaded texture.
    type Texture;

    /// Reject a mesh this backend cannot hold, without uploading anything.
    fn check_mesh(&self, mesh: &MeshUpload<'_>) -> Result<(), UploadError> {
        mesh.validate()
    }

    /// Reject a texture this backend cannot hold, without uploading anything.
    fn check_texture(&self, texture: &TextureUpload<'_>) -> Result<(), UploadError> {
        texture.validate()
    }

    fn upload_mesh(&mut self, mesh: &MeshUpload<'_>) -> Result<Self::Mesh, UploadError>;

    fn upload_texture(&mut self, texture: &TextureUpload<'_>)
    -> Result<Self::Texture, UploadError>;
}

const _: () = assert!(
    TERRAIN_VERTEX_LAYOUT.array_stride as usize == FLOATS_PER_VERTEX * std::mem::size_of::<f32>()
);

//! Upload of generated terrain to a rendering backend.
//!
//! [`RenderBackend`] is the seam; [`WgpuBackend`] is the wgpu implementation
//! and [`TerrainAssets`] bundles one terrain's mesh and color map handles.

pub mod assets;
pub mod backend;
pub mod wgpu_backend;

pub use assets::TerrainAssets;
pub use backend::{
    BYTES_PER_TEXEL, MeshUpload, RenderBackend, TextureFilter, TextureUpload, UploadError,
};
pub use wgpu_backend::{COLOR_MAP_FORMAT, GpuInitError, GpuMesh, GpuTexture, WgpuBackend};

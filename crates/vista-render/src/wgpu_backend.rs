//! [`RenderBackend`] implementation on top of wgpu.
//!
//! Works with any device/queue pair, including a headless one from
//! [`WgpuBackend::headless_blocking`] when there is no window to draw into.

use wgpu::util::DeviceExt;

use crate::backend::{MeshUpload, RenderBackend, TextureFilter, TextureUpload, UploadError};

/// Color map texel format. Band colors are authored in sRGB.
pub const COLOR_MAP_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8UnormSrgb;

/// Errors from headless device creation.
#[derive(Debug, thiserror::Error)]
pub enum GpuInitError {
    /// No compatible GPU adapter found.
    #[error("no compatible GPU adapter found")]
    NoAdapter,

    /// Failed to request GPU device.
    #[error("failed to request GPU device: {0}")]
    DeviceRequest(#[from] wgpu::RequestDeviceError),
}

/// An uploaded, non-indexed terrain vertex buffer.
pub struct GpuMesh {
    pub vertex_buffer: wgpu::Buffer,
    pub vertex_count: u32,
}

/// An uploaded color map with a matching sampler.
pub struct GpuTexture {
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
    pub sampler: wgpu::Sampler,
    /// Width and height in texels.
    pub dimensions: (u32, u32),
}

/// Uploads terrain assets through a wgpu device and queue.
pub struct WgpuBackend {
    device: wgpu::Device,
    queue: wgpu::Queue,
}

impl WgpuBackend {
    pub fn new(device: wgpu::Device, queue: wgpu::Queue) -> Self {
        Self { device, queue }
    }

    /// Create a backend on the default adapter without a surface.
    pub async fn headless() -> Result<Self, GpuInitError> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let adapter = match instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: None,
                force_fallback_adapter: false,
            })
            .await
        {
            Ok(adapter) => adapter,
            Err(_) => return Err(GpuInitError::NoAdapter),
        };

        let info = adapter.get_info();
        log::info!(
            "Selected GPU: {} ({:?}, {:?})",
            info.name,
            info.backend,
            info.device_type
        );

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("vista-device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: wgpu::MemoryHints::default(),
                experimental_features: wgpu::ExperimentalFeatures::default(),
                trace: wgpu::Trace::Off,
            })
            .await?;

        Ok(Self::new(device, queue))
    }

    /// Blocking wrapper around [`WgpuBackend::headless`].
    pub fn headless_blocking() -> Result<Self, GpuInitError> {
        pollster::block_on(Self::headless())
    }

    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    fn create_sampler(&self, filter: TextureFilter) -> wgpu::Sampler {
        let (label, filter_mode, mipmap_filter) = match filter {
            TextureFilter::Nearest => (
                "sampler-nearest",
                wgpu::FilterMode::Nearest,
                wgpu::MipmapFilterMode::Nearest,
            ),
            TextureFilter::Linear => (
                "sampler-linear",
                wgpu::FilterMode::Linear,
                wgpu::MipmapFilterMode::Linear,
            ),
        };
        self.device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some(label),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            mag_filter: filter_mode,
            min_filter: filter_mode,
            mipmap_filter,
            ..Default::default()
        })
    }
}

impl RenderBackend for WgpuBackend {
    type Mesh = GpuMesh;
    type Texture = GpuTexture;

    fn check_mesh(&self, mesh: &MeshUpload<'_>) -> Result<(), UploadError> {
        mesh.validate()?;
        let limit = self.device.limits().max_buffer_size;
        let requested = mesh.vertices.len() as u64;
        if requested > limit {
            return Err(UploadError::ExceedsLimit {
                resource: "vertex buffer size",
                requested,
                limit,
            });
        }
        Ok(())
    }

    fn check_texture(&self, texture: &TextureUpload<'_>) -> Result<(), UploadError> {
        texture.validate()?;
        let limit = self.device.limits().max_texture_dimension_2d;
        let requested = texture.width.max(texture.height);
        if requested > limit {
            return Err(UploadError::ExceedsLimit {
                resource: "texture dimension",
                requested: requested as u64,
                limit: limit as u64,
            });
        }
        Ok(())
    }

    fn upload_mesh(&mut self, mesh: &MeshUpload<'_>) -> Result<GpuMesh, UploadError> {
        self.check_mesh(mesh)?;

        let vertex_buffer = self
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(mesh.label),
                contents: mesh.vertices,
                usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            });

        log::debug!(
            "Created vertex buffer '{}' ({} bytes, {} triangles)",
            mesh.label,
            mesh.vertices.len(),
            mesh.triangle_count
        );

        Ok(GpuMesh {
            vertex_buffer,
            vertex_count: mesh.vertex_count,
        })
    }

    fn upload_texture(&mut self, upload: &TextureUpload<'_>) -> Result<GpuTexture, UploadError> {
        self.check_texture(upload)?;

        let size = wgpu::Extent3d {
            width: upload.width,
            height: upload.height,
            depth_or_array_layers: 1,
        };

        let texture = self.device.create_texture(&wgpu::TextureDescriptor {
            label: Some(upload.label),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: COLOR_MAP_FORMAT,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        self.queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            upload.pixels,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(upload.bytes_per_row()),
                rows_per_image: None,
            },
            size,
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let sampler = self.create_sampler(upload.filter);

        Ok(GpuTexture {
            texture,
            view,
            sampler,
            dimensions: (upload.width, upload.height),
        })
    }
}

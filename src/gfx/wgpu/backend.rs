//! wgpu 资源工厂
//!
//! 实现 `GpuBackend`：每种顶点属性一个独立的顶点缓冲，索引统一为 `u32`，
//! 纹理用 image crate 解码后上下翻转并转换为 RGBA8 上传。

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::debug;
use wgpu::util::DeviceExt;

use crate::core::error::{GraphicsError, Result};
use crate::geometry::MeshId;
use crate::renderer::{GpuBackend, VertexAttribute};

use super::context::WgpuContext;

/// 模型纹理格式
pub const TEXTURE_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8UnormSrgb;

/// 子网格的 GPU 缓冲
#[derive(Debug)]
pub struct WgpuVertexArray {
    mesh: MeshId,

    /// 按 `VertexAttribute::location` 存放
    vertex_buffers: [Option<Arc<wgpu::Buffer>>; 3],
    index_buffer: Option<Arc<wgpu::Buffer>>,
    index_count: u32,
}

impl WgpuVertexArray {
    pub fn mesh(&self) -> MeshId {
        self.mesh
    }

    pub fn vertex_buffer(&self, attribute: VertexAttribute) -> Option<&Arc<wgpu::Buffer>> {
        self.vertex_buffers[attribute.location() as usize].as_ref()
    }

    pub fn has_attribute(&self, attribute: VertexAttribute) -> bool {
        self.vertex_buffer(attribute).is_some()
    }

    pub fn index_buffer(&self) -> Option<&Arc<wgpu::Buffer>> {
        self.index_buffer.as_ref()
    }

    pub fn index_count(&self) -> u32 {
        self.index_count
    }
}

/// 已上传的纹理
#[derive(Debug, Clone)]
pub struct WgpuTexture {
    pub view: Arc<wgpu::TextureView>,
    pub path: PathBuf,
    pub width: u32,
    pub height: u32,
}

/// wgpu 资源工厂
pub struct WgpuBackend {
    device: Arc<wgpu::Device>,
    queue: Arc<wgpu::Queue>,
}

impl WgpuBackend {
    pub fn new(context: &WgpuContext) -> Self {
        Self {
            device: context.device.clone(),
            queue: context.queue.clone(),
        }
    }

    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    /// 由内存中的 RGBA8 像素创建纹理
    pub fn create_texture_rgba8(&self, label: &str, width: u32, height: u32, pixels: &[u8]) -> wgpu::TextureView {
        let size = wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        };
        let texture = self.device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: TEXTURE_FORMAT,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        self.queue.write_texture(
            wgpu::ImageCopyTexture {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            pixels,
            wgpu::ImageDataLayout {
                offset: 0,
                bytes_per_row: Some(4 * width),
                rows_per_image: Some(height),
            },
            size,
        );

        texture.create_view(&wgpu::TextureViewDescriptor::default())
    }
}

impl GpuBackend for WgpuBackend {
    type VertexArray = WgpuVertexArray;
    type Texture = WgpuTexture;

    fn create_vertex_array(&mut self, mesh: MeshId) -> Result<WgpuVertexArray> {
        Ok(WgpuVertexArray {
            mesh,
            vertex_buffers: [None, None, None],
            index_buffer: None,
            index_count: 0,
        })
    }

    fn create_vertex_buffer(
        &mut self,
        vertex_array: &mut WgpuVertexArray,
        attribute: VertexAttribute,
        data: &[f32],
    ) -> Result<()> {
        if data.is_empty() || data.len() % attribute.components() != 0 {
            return Err(GraphicsError::ResourceCreation(format!(
                "mesh {}: {} buffer has {} floats",
                vertex_array.mesh,
                attribute.name(),
                data.len()
            ))
            .into());
        }

        let label = format!("Mesh {} {} Buffer", vertex_array.mesh, attribute.name());
        let buffer = self.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&label),
            contents: bytemuck::cast_slice(data),
            usage: wgpu::BufferUsages::VERTEX,
        });

        vertex_array.vertex_buffers[attribute.location() as usize] = Some(Arc::new(buffer));
        Ok(())
    }

    fn create_index_buffer(&mut self, vertex_array: &mut WgpuVertexArray, indices: &[u32]) -> Result<()> {
        if indices.is_empty() {
            return Err(GraphicsError::ResourceCreation(format!(
                "mesh {}: empty index buffer",
                vertex_array.mesh
            ))
            .into());
        }

        let label = format!("Mesh {} Index Buffer", vertex_array.mesh);
        let buffer = self.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&label),
            contents: bytemuck::cast_slice(indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        vertex_array.index_buffer = Some(Arc::new(buffer));
        vertex_array.index_count = indices.len() as u32;
        Ok(())
    }

    fn upload_texture(&mut self, path: &Path) -> Result<WgpuTexture> {
        let image = image::open(path).map_err(|e| GraphicsError::TextureLoad {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        // 纹理坐标原点在左下角
        let rgba = image.flipv().to_rgba8();
        let (width, height) = rgba.dimensions();
        debug!("Decoded {} ({}x{})", path.display(), width, height);

        let label = path.display().to_string();
        let view = self.create_texture_rgba8(&label, width, height, &rgba);

        Ok(WgpuTexture {
            view: Arc::new(view),
            path: path.to_path_buf(),
            width,
            height,
        })
    }
}

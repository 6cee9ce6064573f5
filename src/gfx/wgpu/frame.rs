//! 帧记录器
//!
//! `ModelRenderer::draw` 在这里记录绘制命令：每次 `draw` 拍下着色器当前的 uniform
//! 和纹理槽位，`submit` 时统一写入一个按对齐步长排列的 uniform 缓冲，
//! 然后在一个渲染通道内依次回放。
//!
//! 纹理槽位与 OpenGL 的纹理单元一样，绑定后一直有效，直到被覆盖。
//! 采样器指向负数或越界的槽位时使用 1x1 白色纹理。

use std::sync::Arc;

use tracing::warn;
use wgpu::util::DeviceExt;

use crate::renderer::DrawTarget;

use super::backend::{WgpuBackend, WgpuTexture, WgpuVertexArray};
use super::shader::{ProgramPipeline, ShaderLayouts, ShaderUniforms, WgpuShader, SAMPLER_COUNT};

/// 纹理槽位数
pub const MAX_TEXTURE_SLOTS: usize = 8;

/// 向上对齐到 `alignment` 的整数倍
pub fn align_to(value: u64, alignment: u64) -> u64 {
    value.div_ceil(alignment) * alignment
}

struct DrawCommand {
    program: Arc<ProgramPipeline>,
    uniforms: ShaderUniforms,
    vertex_buffers: Vec<Arc<wgpu::Buffer>>,
    index_buffer: Arc<wgpu::Buffer>,
    index_count: u32,

    /// 仅带纹理的管线使用：漫反射、高光
    textures: Option<[Option<Arc<wgpu::TextureView>>; SAMPLER_COUNT]>,
}

/// 一帧的输出目标
pub struct FrameTarget<'a> {
    /// 颜色附件（开启 MSAA 时是多重采样纹理）
    pub color: &'a wgpu::TextureView,

    /// MSAA 解析目标
    pub resolve: Option<&'a wgpu::TextureView>,

    pub depth: &'a wgpu::TextureView,
    pub clear_color: wgpu::Color,
}

/// 帧记录器
pub struct WgpuFrame {
    commands: Vec<DrawCommand>,
    slots: [Option<Arc<wgpu::TextureView>>; MAX_TEXTURE_SLOTS],
}

impl WgpuFrame {
    pub fn new() -> Self {
        Self {
            commands: Vec::new(),
            slots: Default::default(),
        }
    }

    /// 已记录的绘制次数
    pub fn draw_count(&self) -> usize {
        self.commands.len()
    }

    fn slot_view(&self, slot: i32) -> Option<Arc<wgpu::TextureView>> {
        usize::try_from(slot)
            .ok()
            .and_then(|slot| self.slots.get(slot))
            .and_then(|view| view.clone())
    }

    /// 把记录的命令写入编码器
    pub fn submit(
        self,
        device: &wgpu::Device,
        encoder: &mut wgpu::CommandEncoder,
        layouts: &ShaderLayouts,
        target: FrameTarget<'_>,
    ) {
        let alignment = device.limits().min_uniform_buffer_offset_alignment as u64;
        let stride = align_to(ShaderUniforms::SIZE, alignment);

        let mut contents = vec![0u8; (stride as usize) * self.commands.len().max(1)];
        for (i, command) in self.commands.iter().enumerate() {
            let offset = i * stride as usize;
            contents[offset..offset + ShaderUniforms::SIZE as usize]
                .copy_from_slice(bytemuck::bytes_of(&command.uniforms));
        }

        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Frame Uniform Buffer"),
            contents: &contents,
            usage: wgpu::BufferUsages::UNIFORM,
        });

        let uniform_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Frame Uniform Bind Group"),
            layout: &layouts.uniform,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                    buffer: &uniform_buffer,
                    offset: 0,
                    size: wgpu::BufferSize::new(ShaderUniforms::SIZE),
                }),
            }],
        });

        let texture_bind_groups: Vec<Option<wgpu::BindGroup>> = self
            .commands
            .iter()
            .map(|command| {
                command.textures.as_ref().map(|[diffuse, specular]| {
                    layouts.texture_bind_group(device, diffuse.as_deref(), specular.as_deref())
                })
            })
            .collect();

        let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Scene Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target.color,
                resolve_target: target.resolve,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(target.clear_color),
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: target.depth,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Discard,
                }),
                stencil_ops: None,
            }),
            timestamp_writes: None,
            occlusion_query_set: None,
        });

        for (i, (command, texture_bind_group)) in self.commands.iter().zip(&texture_bind_groups).enumerate() {
            render_pass.set_pipeline(&command.program.pipeline);
            render_pass.set_bind_group(0, &uniform_bind_group, &[(i as u64 * stride) as u32]);
            if let Some(bind_group) = texture_bind_group {
                render_pass.set_bind_group(1, bind_group, &[]);
            }
            for (slot, buffer) in command.vertex_buffers.iter().enumerate() {
                render_pass.set_vertex_buffer(slot as u32, buffer.slice(..));
            }
            render_pass.set_index_buffer(command.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
            render_pass.draw_indexed(0..command.index_count, 0, 0..1);
        }
    }
}

impl Default for WgpuFrame {
    fn default() -> Self {
        Self::new()
    }
}

impl DrawTarget<WgpuBackend> for WgpuFrame {
    type Shader = WgpuShader;

    fn bind_texture(&mut self, texture: &WgpuTexture, slot: u32) {
        match self.slots.get_mut(slot as usize) {
            Some(bound) => *bound = Some(texture.view.clone()),
            None => warn!("Texture slot {} out of range, {} not bound", slot, texture.path.display()),
        }
    }

    fn draw(&mut self, vertex_array: &WgpuVertexArray, shader: &WgpuShader) {
        let has_uv_coords = vertex_array.has_attribute(crate::renderer::VertexAttribute::TexCoord);
        let program = shader.program(has_uv_coords).clone();

        let vertex_buffers: Option<Vec<Arc<wgpu::Buffer>>> = program
            .vertex_attributes
            .iter()
            .map(|&attribute| vertex_array.vertex_buffer(attribute).cloned())
            .collect();

        let (Some(vertex_buffers), Some(index_buffer)) = (vertex_buffers, vertex_array.index_buffer().cloned()) else {
            warn!("Mesh {} is missing buffers required by the shader, skipped", vertex_array.mesh());
            return;
        };

        let textures = program
            .textured
            .then(|| shader.sampler_slots().map(|slot| self.slot_view(slot)));

        self.commands.push(DrawCommand {
            program,
            uniforms: *shader.uniforms(),
            vertex_buffers,
            index_buffer,
            index_count: vertex_array.index_count(),
            textures,
        });
    }
}

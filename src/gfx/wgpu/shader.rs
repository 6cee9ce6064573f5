//! 着色器程序
//!
//! 两个 WGSL 程序：`model.wgsl`（Phong 光照，带/不带纹理两个变体）和 `light.wgsl`（纯色光源）。
//! 两者共用同一个 uniform 块布局，uniform 通过名字写入。

use std::num::NonZeroU64;
use std::sync::Arc;

use bytemuck::{Pod, Zeroable};
use tracing::debug;

use crate::core::math::Matrix4;
use crate::renderer::{ShaderProgram, VertexAttribute};

use super::backend::WgpuBackend;
use super::context::DEPTH_FORMAT;

const MODEL_SHADER: &str = include_str!("../../renderer/shaders/model.wgsl");
const LIGHT_SHADER: &str = include_str!("../../renderer/shaders/light.wgsl");

/// 采样器 uniform 的数量（漫反射、高光）
pub const SAMPLER_COUNT: usize = 2;

/// 与 WGSL 中 `Uniforms` 结构一一对应
///
/// 所有 vec3 都扩展为 vec4 以满足 uniform 对齐。
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct ShaderUniforms {
    pub model: [[f32; 4]; 4],
    pub mvp: [[f32; 4]; 4],
    pub view_pos: [f32; 4],
    pub sky_direction: [f32; 4],
    pub sky_ambient: [f32; 4],
    pub sky_diffuse: [f32; 4],
    pub sky_specular: [f32; 4],
    pub light_pos: [f32; 4],
    pub light_ambient: [f32; 4],
    pub light_diffuse: [f32; 4],
    pub light_specular: [f32; 4],
    pub light_color: [f32; 4],
    /// x: 天光开关
    pub flags: [i32; 4],
}

impl ShaderUniforms {
    pub const SIZE: u64 = std::mem::size_of::<ShaderUniforms>() as u64;

    pub fn new() -> Self {
        let identity: [[f32; 4]; 4] = Matrix4::identity().into();
        Self {
            model: identity,
            mvp: identity,
            light_color: [1.0; 4],
            ..Zeroable::zeroed()
        }
    }

    /// 按名字写入矩阵，名字未知时返回 false
    pub fn set_mat4(&mut self, name: &str, value: &Matrix4) -> bool {
        let slot = match name {
            "u_Model" => &mut self.model,
            "u_MVP" => &mut self.mvp,
            _ => return false,
        };
        *slot = (*value).into();
        true
    }

    /// 按名字写入三维向量，名字未知时返回 false
    pub fn set_vec3(&mut self, name: &str, value: [f32; 3]) -> bool {
        let slot = match name {
            "u_ViewPos" => &mut self.view_pos,
            "u_DirectionalLight.direction" => &mut self.sky_direction,
            "u_DirectionalLight.ambient" => &mut self.sky_ambient,
            "u_DirectionalLight.diffuse" => &mut self.sky_diffuse,
            "u_DirectionalLight.specular" => &mut self.sky_specular,
            "u_LightProperty.lightPos" => &mut self.light_pos,
            "u_LightProperty.ambient" => &mut self.light_ambient,
            "u_LightProperty.diffuse" => &mut self.light_diffuse,
            "u_LightProperty.specular" => &mut self.light_specular,
            "u_LightColor" => &mut self.light_color,
            _ => return false,
        };
        slot[..3].copy_from_slice(&value);
        true
    }

    /// 按名字写入整数，名字未知时返回 false
    pub fn set_i32(&mut self, name: &str, value: i32) -> bool {
        match name {
            "u_DirectionalLight.enable" => self.flags[0] = value,
            _ => return false,
        }
        true
    }
}

impl Default for ShaderUniforms {
    fn default() -> Self {
        Self::new()
    }
}

/// 采样器 uniform 名对应的下标
fn sampler_index(name: &str) -> Option<usize> {
    match name {
        "u_MaterialProperty.diffuseTex" => Some(0),
        "u_MaterialProperty.specularTex" => Some(1),
        _ => None,
    }
}

/// 所有管线共用的绑定布局和默认资源
pub struct ShaderLayouts {
    /// group 0：uniform 块（动态偏移）
    pub uniform: wgpu::BindGroupLayout,

    /// group 1：漫反射纹理、高光纹理、采样器
    pub textures: wgpu::BindGroupLayout,

    pub sampler: wgpu::Sampler,

    /// 槽位上没有纹理时使用的 1x1 白色纹理
    pub fallback: Arc<wgpu::TextureView>,
}

impl ShaderLayouts {
    pub fn new(backend: &WgpuBackend) -> Self {
        let device = backend.device();

        let uniform = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Uniform Bind Group Layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: true,
                    min_binding_size: NonZeroU64::new(ShaderUniforms::SIZE),
                },
                count: None,
            }],
        });

        let texture_entry = |binding| wgpu::BindGroupLayoutEntry {
            binding,
            visibility: wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Texture {
                sample_type: wgpu::TextureSampleType::Float { filterable: true },
                view_dimension: wgpu::TextureViewDimension::D2,
                multisampled: false,
            },
            count: None,
        };

        let textures = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Material Bind Group Layout"),
            entries: &[
                texture_entry(0),
                texture_entry(1),
                wgpu::BindGroupLayoutEntry {
                    binding: 2,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("Material Sampler"),
            address_mode_u: wgpu::AddressMode::Repeat,
            address_mode_v: wgpu::AddressMode::Repeat,
            address_mode_w: wgpu::AddressMode::Repeat,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        let fallback = Arc::new(backend.create_texture_rgba8("Fallback White Texture", 1, 1, &[255; 4]));

        Self {
            uniform,
            textures,
            sampler,
            fallback,
        }
    }

    /// 为一次绘制创建纹理绑定组
    pub fn texture_bind_group(
        &self,
        device: &wgpu::Device,
        diffuse: Option<&wgpu::TextureView>,
        specular: Option<&wgpu::TextureView>,
    ) -> wgpu::BindGroup {
        device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Material Bind Group"),
            layout: &self.textures,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(diffuse.unwrap_or(self.fallback.as_ref())),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(specular.unwrap_or(self.fallback.as_ref())),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::Sampler(&self.sampler),
                },
            ],
        })
    }
}

/// 一条渲染管线及其顶点输入
pub struct ProgramPipeline {
    pub pipeline: wgpu::RenderPipeline,

    /// 顶点缓冲槽位依次对应的属性
    pub vertex_attributes: &'static [VertexAttribute],

    /// 是否使用 group 1 的纹理绑定
    pub textured: bool,
}

/// 管线的颜色/深度输出格式
#[derive(Debug, Clone, Copy)]
pub struct TargetFormat {
    pub color: wgpu::TextureFormat,
    pub sample_count: u32,
}

struct PipelineDesc<'a> {
    label: &'a str,
    module: &'a wgpu::ShaderModule,
    vs_entry: &'a str,
    fs_entry: &'a str,
    vertex_attributes: &'static [VertexAttribute],
    textured: bool,
    cull_mode: Option<wgpu::Face>,
}

fn vertex_format(attribute: VertexAttribute) -> wgpu::VertexFormat {
    match attribute.components() {
        2 => wgpu::VertexFormat::Float32x2,
        _ => wgpu::VertexFormat::Float32x3,
    }
}

fn create_pipeline(
    device: &wgpu::Device,
    layouts: &ShaderLayouts,
    target: TargetFormat,
    desc: PipelineDesc<'_>,
) -> ProgramPipeline {
    let bind_group_layouts: Vec<&wgpu::BindGroupLayout> = if desc.textured {
        vec![&layouts.uniform, &layouts.textures]
    } else {
        vec![&layouts.uniform]
    };

    let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some(desc.label),
        bind_group_layouts: &bind_group_layouts,
        push_constant_ranges: &[],
    });

    // 每个属性独立一个顶点缓冲
    let attributes: Vec<[wgpu::VertexAttribute; 1]> = desc
        .vertex_attributes
        .iter()
        .map(|&attribute| {
            [wgpu::VertexAttribute {
                offset: 0,
                shader_location: attribute.location(),
                format: vertex_format(attribute),
            }]
        })
        .collect();

    let buffers: Vec<wgpu::VertexBufferLayout> = desc
        .vertex_attributes
        .iter()
        .zip(&attributes)
        .map(|(attribute, layout)| wgpu::VertexBufferLayout {
            array_stride: (attribute.components() * std::mem::size_of::<f32>()) as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: layout,
        })
        .collect();

    let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(desc.label),
        layout: Some(&layout),
        vertex: wgpu::VertexState {
            module: desc.module,
            entry_point: desc.vs_entry,
            buffers: &buffers,
        },
        fragment: Some(wgpu::FragmentState {
            module: desc.module,
            entry_point: desc.fs_entry,
            targets: &[Some(wgpu::ColorTargetState {
                format: target.color,
                blend: Some(wgpu::BlendState::REPLACE),
                write_mask: wgpu::ColorWrites::ALL,
            })],
        }),
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            cull_mode: desc.cull_mode,
            polygon_mode: wgpu::PolygonMode::Fill,
            unclipped_depth: false,
            conservative: false,
        },
        depth_stencil: Some(wgpu::DepthStencilState {
            format: DEPTH_FORMAT,
            depth_write_enabled: true,
            depth_compare: wgpu::CompareFunction::Less,
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState::default(),
        }),
        multisample: wgpu::MultisampleState {
            count: target.sample_count,
            mask: !0,
            alpha_to_coverage_enabled: false,
        },
        multiview: None,
    });

    ProgramPipeline {
        pipeline,
        vertex_attributes: desc.vertex_attributes,
        textured: desc.textured,
    }
}

const TEXTURED_ATTRIBUTES: &[VertexAttribute] =
    &[VertexAttribute::Position, VertexAttribute::Normal, VertexAttribute::TexCoord];
const LIT_ATTRIBUTES: &[VertexAttribute] = &[VertexAttribute::Position, VertexAttribute::Normal];
const POSITION_ONLY: &[VertexAttribute] = &[VertexAttribute::Position];

/// wgpu 着色器程序
///
/// uniform 值保存在 CPU 侧，`draw` 时由帧记录器拍下快照。
pub struct WgpuShader {
    name: &'static str,
    textured: Arc<ProgramPipeline>,
    untextured: Arc<ProgramPipeline>,
    uniforms: ShaderUniforms,
    sampler_slots: [i32; SAMPLER_COUNT],
}

impl WgpuShader {
    /// 模型程序：Phong 光照，带 UV 的子网格采样纹理
    pub fn model(device: &wgpu::Device, layouts: &ShaderLayouts, target: TargetFormat) -> Self {
        debug!("Compiling model shader");
        let module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Model Shader"),
            source: wgpu::ShaderSource::Wgsl(MODEL_SHADER.into()),
        });

        let textured = create_pipeline(
            device,
            layouts,
            target,
            PipelineDesc {
                label: "Model Pipeline (textured)",
                module: &module,
                vs_entry: "vs_main",
                fs_entry: "fs_main",
                vertex_attributes: TEXTURED_ATTRIBUTES,
                textured: true,
                cull_mode: None,
            },
        );
        let untextured = create_pipeline(
            device,
            layouts,
            target,
            PipelineDesc {
                label: "Model Pipeline (untextured)",
                module: &module,
                vs_entry: "vs_untextured",
                fs_entry: "fs_untextured",
                vertex_attributes: LIT_ATTRIBUTES,
                textured: false,
                cull_mode: None,
            },
        );

        Self {
            name: "model",
            textured: Arc::new(textured),
            untextured: Arc::new(untextured),
            uniforms: ShaderUniforms::new(),
            sampler_slots: [0, 1],
        }
    }

    /// 光源程序：只输出 `u_LightColor`
    pub fn light(device: &wgpu::Device, layouts: &ShaderLayouts, target: TargetFormat) -> Self {
        debug!("Compiling light shader");
        let module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Light Shader"),
            source: wgpu::ShaderSource::Wgsl(LIGHT_SHADER.into()),
        });

        let pipeline = Arc::new(create_pipeline(
            device,
            layouts,
            target,
            PipelineDesc {
                label: "Light Pipeline",
                module: &module,
                vs_entry: "vs_main",
                fs_entry: "fs_main",
                vertex_attributes: POSITION_ONLY,
                textured: false,
                cull_mode: Some(wgpu::Face::Back),
            },
        ));

        Self {
            name: "light",
            textured: pipeline.clone(),
            untextured: pipeline,
            uniforms: ShaderUniforms::new(),
            sampler_slots: [0, 1],
        }
    }

    pub fn uniforms(&self) -> &ShaderUniforms {
        &self.uniforms
    }

    /// 漫反射和高光采样器当前指向的纹理槽位
    pub fn sampler_slots(&self) -> [i32; SAMPLER_COUNT] {
        self.sampler_slots
    }

    /// 按顶点数组是否带 UV 选择管线
    pub fn program(&self, has_uv_coords: bool) -> &Arc<ProgramPipeline> {
        if has_uv_coords {
            &self.textured
        } else {
            &self.untextured
        }
    }
}

impl ShaderProgram for WgpuShader {
    fn set_uniform_i32(&mut self, name: &str, value: i32) {
        if let Some(index) = sampler_index(name) {
            self.sampler_slots[index] = value;
        } else if !self.uniforms.set_i32(name, value) {
            debug!("{} shader has no int uniform {}", self.name, name);
        }
    }

    fn set_uniform_vec3(&mut self, name: &str, value: [f32; 3]) {
        if !self.uniforms.set_vec3(name, value) {
            debug!("{} shader has no vec3 uniform {}", self.name, name);
        }
    }

    fn set_uniform_mat4(&mut self, name: &str, value: &Matrix4) {
        if !self.uniforms.set_mat4(name, value) {
            debug!("{} shader has no mat4 uniform {}", self.name, name);
        }
    }
}

//! 渲染器模块
//!
//! 与具体图形 API 无关的模型渲染逻辑：
//!
//! - `backend`：GPU 协作接口（资源工厂、着色器 uniform、绘制目标）
//! - `model`：`ModelRenderer`，持有模型及其 GPU 资源并按子网格绘制
//!
//! wgpu 实现位于 `gfx::wgpu`。

pub mod backend;
pub mod model;

pub use backend::{DrawTarget, GpuBackend, ShaderProgram, VertexAttribute};
pub use model::{sampler_uniform, ModelRenderer, UNBOUND_SAMPLER};

//! wgpu 图形后端实现
//!
//! # 模块结构
//!
//! - `context` - 窗口、表面、设备和深度/MSAA 缓冲
//! - `backend` - `GpuBackend` 实现（顶点缓冲、索引缓冲、纹理上传）
//! - `shader` - WGSL 程序、管线和按名字写入的 uniform
//! - `frame` - `DrawTarget` 实现，记录并回放一帧的绘制命令
//! - `renderer` - 场景渲染器（三个模型 + 相机 + 光照 + GUI）

mod backend;
mod context;
mod frame;
mod renderer;
mod shader;

pub use backend::{WgpuBackend, WgpuTexture, WgpuVertexArray};
pub use context::WgpuContext;
pub use frame::{FrameTarget, WgpuFrame};
pub use renderer::Renderer;
pub use shader::{ShaderLayouts, ShaderUniforms, TargetFormat, WgpuShader};

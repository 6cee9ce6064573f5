//! 图形后端模块
//!
//! 封装底层图形 API 的实现。目前只有 wgpu 一个后端，
//! 它在 Vulkan、Metal、DX12、OpenGL 上运行。

pub mod wgpu;

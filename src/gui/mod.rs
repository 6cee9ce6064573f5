//! GUI 系统模块
//!
//! 基于 egui + wgpu 的调试面板：帧率、视野、视图平移、天光开关、
//! 光源平移和颜色、主体缩放。

mod manager;
mod metrics;
mod state;
pub mod panels;

pub use manager::GuiManager;
pub use metrics::PerformanceMetrics;
pub use state::GuiState;

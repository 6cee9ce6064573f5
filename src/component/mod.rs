//! 场景组件模块
//!
//! 模型摆放、环绕相机和光源。

mod component;
mod camera;
mod light;
mod placement;

pub use component::Component;
pub use camera::OrbitCamera;
pub use light::{Color, DirectionalLight, LightingUniforms, PointLight};
pub use placement::{support_offset, PlacementTransform};

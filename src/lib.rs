//! Mesh Viewer - 模型查看器
//!
//! 从磁盘导入三角网格模型，上传到 GPU，以单一的方向光/点光源 Phong 模型逐帧绘制。
//!
//! # 模块结构
//!
//! - `core`: 配置、场景配置、日志、数学、错误处理
//! - `geometry`: 模型导入、包围盒、法线和拆分
//! - `component`: 模型摆放变换、环绕相机、光源
//! - `renderer`: 与图形 API 无关的 `ModelRenderer` 和 GPU 协作接口
//! - `gfx`: wgpu 实现
//! - `gui`: egui 调节面板
//!
//! # 使用示例
//!
//! ```no_run
//! use mesh_viewer::component::PlacementTransform;
//! use mesh_viewer::geometry::{importer, BoundingBox};
//! use std::path::Path;
//!
//! let object = importer::import(Path::new("res/Models/Ivysaur_OBJ/Pokemon.obj"))?;
//! let ground = importer::import(Path::new("res/Models/GroundPlane/GroundPlane.obj"))?;
//!
//! let object_box = BoundingBox::from_model(&object);
//! let union = BoundingBox::union(&[object_box, BoundingBox::from_model(&ground)]);
//!
//! let mut placement = PlacementTransform::new(&union, &object_box);
//! placement.set_uniform_scale(5.0);
//! let model_matrix = placement.matrix();
//! # let _ = model_matrix;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod component;
pub mod core;
pub mod geometry;
pub mod gfx;
pub mod gui;
pub mod renderer;

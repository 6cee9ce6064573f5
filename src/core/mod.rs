//! 核心功能模块
//!
//! 本模块提供了查看器的基础功能，包括数学库、日志系统、配置管理和错误处理。
//! 这些模块独立于具体的图形 API。
//!
//! # 模块组织
//!
//! - `math`：基于 nalgebra 的类型别名和矩阵辅助函数
//! - `log`：日志系统
//! - `config`：查看器配置（config.toml）
//! - `scene`：场景配置（scene.toml）
//! - `error`：错误处理，定义统一的错误类型

pub mod config;
pub mod error;
pub mod log;
pub mod math;
pub mod scene;

// 重新导出常用类型，方便使用
pub use config::Config;
pub use error::{ImportError, Result, ViewerError};
pub use math::{Matrix4, Vector2, Vector3, Vector4};
pub use scene::SceneConfig;

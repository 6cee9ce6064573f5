//! 场景配置模块
//!
//! 定义场景配置：要加载的模型、相机轨道参数、光照参数以及初始摆放。
//!
//! # 配置文件格式 (scene.toml)
//!
//! ```toml
//! [models]
//! object = "res/Models/Ivysaur_OBJ/Pokemon.obj"
//! ground = "res/Models/GroundPlane/GroundPlane.obj"
//! light = "res/Models/Light/Light.obj"
//!
//! [camera]
//! fov = 45.0
//! orbit_radius = 60.0
//!
//! [directional_light]
//! enabled = true
//! direction = [0.0, 1.0, 0.0]
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::core::error::{ConfigError, Result};

/// 场景配置
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SceneConfig {
    #[serde(default)]
    pub models: ModelPaths,

    #[serde(default)]
    pub camera: CameraConfig,

    #[serde(default)]
    pub directional_light: DirectionalLightConfig,

    #[serde(default)]
    pub point_light: PointLightConfig,

    #[serde(default)]
    pub placement: PlacementConfig,

    /// 清屏颜色 (RGBA)
    #[serde(default = "default_clear_color")]
    pub clear_color: [f32; 4],
}

/// 三个模型文件的路径
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelPaths {
    /// 主体模型
    #[serde(default = "default_object_model")]
    pub object: String,

    /// 地面模型，每帧被放到主体下方
    #[serde(default = "default_ground_model")]
    pub ground: String,

    /// 点光源的可视化模型
    #[serde(default = "default_light_model")]
    pub light: String,
}

/// 轨道相机配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CameraConfig {
    /// 视野角度（度数）
    #[serde(default = "default_fov")]
    pub fov: f32,

    /// 绕场景中心旋转的半径
    #[serde(default = "default_orbit_radius")]
    pub orbit_radius: f32,

    /// 角速度（弧度/秒）
    #[serde(default = "default_orbit_speed")]
    pub orbit_speed: f32,

    #[serde(default = "default_near_clip")]
    pub near_clip: f32,

    #[serde(default = "default_far_clip")]
    pub far_clip: f32,
}

/// 天光（方向光）配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DirectionalLightConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    #[serde(default = "default_light_direction")]
    pub direction: [f32; 3],

    #[serde(default = "default_ambient")]
    pub ambient: [f32; 3],

    #[serde(default = "default_diffuse")]
    pub diffuse: [f32; 3],

    #[serde(default = "default_specular")]
    pub specular: [f32; 3],
}

/// 点光源配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PointLightConfig {
    #[serde(default = "default_white")]
    pub color: [f32; 3],
}

/// 模型初始摆放
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlacementConfig {
    /// 主体的统一缩放，同时作用于地面
    #[serde(default = "default_object_scale")]
    pub object_scale: f32,

    #[serde(default = "default_light_translation")]
    pub light_translation: [f32; 3],

    #[serde(default = "default_light_scale")]
    pub light_scale: f32,
}

fn default_object_model() -> String { "res/Models/Ivysaur_OBJ/Pokemon.obj".to_string() }
fn default_ground_model() -> String { "res/Models/GroundPlane/GroundPlane.obj".to_string() }
fn default_light_model() -> String { "res/Models/Light/Light.obj".to_string() }
fn default_fov() -> f32 { 45.0 }
fn default_orbit_radius() -> f32 { 60.0 }
fn default_orbit_speed() -> f32 { 1.0 }
fn default_near_clip() -> f32 { 0.1 }
fn default_far_clip() -> f32 { 100.0 }
fn default_true() -> bool { true }
fn default_light_direction() -> [f32; 3] { [0.0, 1.0, 0.0] }
fn default_ambient() -> [f32; 3] { [0.3, 0.3, 0.3] }
fn default_diffuse() -> [f32; 3] { [0.7, 0.7, 0.7] }
fn default_specular() -> [f32; 3] { [1.0, 1.0, 1.0] }
fn default_white() -> [f32; 3] { [1.0, 1.0, 1.0] }
fn default_object_scale() -> f32 { 5.0 }
fn default_light_translation() -> [f32; 3] { [-15.0, 0.0, 0.0] }
fn default_light_scale() -> f32 { 1.4 }
fn default_clear_color() -> [f32; 4] { [0.1, 0.1, 0.1, 1.0] }

impl Default for ModelPaths {
    fn default() -> Self {
        Self {
            object: default_object_model(),
            ground: default_ground_model(),
            light: default_light_model(),
        }
    }
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov: default_fov(),
            orbit_radius: default_orbit_radius(),
            orbit_speed: default_orbit_speed(),
            near_clip: default_near_clip(),
            far_clip: default_far_clip(),
        }
    }
}

impl Default for DirectionalLightConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            direction: default_light_direction(),
            ambient: default_ambient(),
            diffuse: default_diffuse(),
            specular: default_specular(),
        }
    }
}

impl Default for PointLightConfig {
    fn default() -> Self {
        Self { color: default_white() }
    }
}

impl Default for PlacementConfig {
    fn default() -> Self {
        Self {
            object_scale: default_object_scale(),
            light_translation: default_light_translation(),
            light_scale: default_light_scale(),
        }
    }
}

impl SceneConfig {
    /// 从场景文件加载
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path_str = path.as_ref().to_string_lossy().to_string();

        let contents = std::fs::read_to_string(path)
            .map_err(|_| ConfigError::FileNotFound(path_str))?;

        toml::from_str(&contents).map_err(|e| ConfigError::ParseError(e.to_string()).into())
    }

    /// 从场景文件加载，失败时使用默认场景
    pub fn from_file_or_default<P: AsRef<Path>>(path: P) -> Self {
        match Self::from_file(&path) {
            Ok(scene) => scene,
            Err(e) => {
                tracing::warn!("{}, using default scene", e);
                Self::default()
            }
        }
    }
}

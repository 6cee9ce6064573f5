//! GUI 状态管理
//!
//! GuiState 保存面板上所有可调参数，与具体的图形后端无关。
//! 渲染器每帧读取它并写回场景。

use std::ops::RangeInclusive;

use crate::core::SceneConfig;

/// 视野角度范围（度）
pub const FOV_RANGE: RangeInclusive<f32> = 1.0..=120.0;

/// 平移滑块范围
pub const TRANSLATE_RANGE: RangeInclusive<f32> = -100.0..=100.0;

/// 主体缩放范围
pub const SCALE_RANGE: RangeInclusive<f32> = 0.1..=10.0;

/// GUI 状态
#[derive(Debug, Clone)]
pub struct GuiState {
    // 性能监控
    pub fps: f32,
    pub frame_time_ms: f32,

    // 相机
    pub fov: f32,
    pub view_translate: [f32; 3],

    // 光照
    pub sky_light: bool,
    pub light_translation: [f32; 3],
    pub light_color: [f32; 3],

    /// 主体的统一缩放，地面跟随
    pub object_scale: f32,
}

impl GuiState {
    pub fn new(scene: &SceneConfig) -> Self {
        Self {
            fps: 0.0,
            frame_time_ms: 0.0,

            fov: scene.camera.fov,
            view_translate: [0.0; 3],

            sky_light: scene.directional_light.enabled,
            light_translation: scene.placement.light_translation,
            light_color: scene.point_light.color,

            object_scale: scene.placement.object_scale,
        }
    }

    /// 更新性能统计
    pub fn update_performance(&mut self, fps: f32, frame_time_ms: f32) {
        self.fps = fps;
        self.frame_time_ms = frame_time_ms;
    }

    /// 把超出范围的值夹回滑块范围
    pub fn clamp(&mut self) {
        self.fov = self.fov.clamp(*FOV_RANGE.start(), *FOV_RANGE.end());
        self.object_scale = self.object_scale.clamp(*SCALE_RANGE.start(), *SCALE_RANGE.end());
        for value in self.view_translate.iter_mut().chain(self.light_translation.iter_mut()) {
            *value = value.clamp(*TRANSLATE_RANGE.start(), *TRANSLATE_RANGE.end());
        }
        for channel in self.light_color.iter_mut() {
            *channel = channel.clamp(0.0, 1.0);
        }
    }
}

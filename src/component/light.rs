//! 光照组件模块
//!
//! 场景里有两种光：一盏可开关的天光（方向光）和一盏由光源模型表示的点光源。
//! 两者最终都被折算成着色器的 uniform。

use crate::component::Component;
use crate::core::math::Vector3;
use crate::core::scene::{DirectionalLightConfig, PointLightConfig};
use crate::renderer::ShaderProgram;

/// 光源颜色（RGB）
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    pub fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    pub const fn white() -> Self {
        Self { r: 1.0, g: 1.0, b: 1.0 }
    }

    pub fn to_array(&self) -> [f32; 3] {
        [self.r, self.g, self.b]
    }

    /// 逐分量乘以系数
    pub fn scaled(&self, factor: f32) -> [f32; 3] {
        [self.r * factor, self.g * factor, self.b * factor]
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::white()
    }
}

impl From<[f32; 3]> for Color {
    fn from(rgb: [f32; 3]) -> Self {
        Self::new(rgb[0], rgb[1], rgb[2])
    }
}

/// 方向光（天光）
///
/// 三个分量直接给出，不从颜色推导。
#[derive(Debug, Clone)]
pub struct DirectionalLight {
    name: String,
    pub enabled: bool,
    pub direction: Vector3,
    pub ambient: [f32; 3],
    pub diffuse: [f32; 3],
    pub specular: [f32; 3],
}

impl DirectionalLight {
    pub fn from_config(name: impl Into<String>, config: &DirectionalLightConfig) -> Self {
        Self {
            name: name.into(),
            enabled: config.enabled,
            direction: Vector3::from(config.direction),
            ambient: config.ambient,
            diffuse: config.diffuse,
            specular: config.specular,
        }
    }
}

impl Component for DirectionalLight {
    fn name(&self) -> &str {
        &self.name
    }
}

/// 点光源
///
/// 位置每帧由光源模型的摆放矩阵重新计算。
#[derive(Debug, Clone)]
pub struct PointLight {
    name: String,
    pub position: Vector3,
    pub color: Color,
}

impl PointLight {
    /// 环境光系数
    pub const AMBIENT_FACTOR: f32 = 0.1;
    /// 漫反射系数
    pub const DIFFUSE_FACTOR: f32 = 0.5;

    pub fn from_config(name: impl Into<String>, config: &PointLightConfig) -> Self {
        Self {
            name: name.into(),
            position: Vector3::zeros(),
            color: Color::from(config.color),
        }
    }

    pub fn ambient(&self) -> [f32; 3] {
        self.color.scaled(Self::AMBIENT_FACTOR)
    }

    pub fn diffuse(&self) -> [f32; 3] {
        self.color.scaled(Self::DIFFUSE_FACTOR)
    }

    pub fn specular(&self) -> [f32; 3] {
        self.color.to_array()
    }
}

impl Component for PointLight {
    fn name(&self) -> &str {
        &self.name
    }
}

/// 每帧提交给模型着色器的光照 uniform
#[derive(Debug, Clone, Copy)]
pub struct LightingUniforms<'a> {
    pub sky: &'a DirectionalLight,
    pub point: &'a PointLight,
    pub view_position: Vector3,
}

impl LightingUniforms<'_> {
    /// 写入模型着色器
    pub fn apply<S: ShaderProgram + ?Sized>(&self, shader: &mut S) {
        shader.set_uniform_vec3("u_ViewPos", self.view_position.into());

        shader.set_uniform_vec3("u_DirectionalLight.direction", self.sky.direction.into());
        shader.set_uniform_vec3("u_DirectionalLight.ambient", self.sky.ambient);
        shader.set_uniform_vec3("u_DirectionalLight.diffuse", self.sky.diffuse);
        shader.set_uniform_vec3("u_DirectionalLight.specular", self.sky.specular);
        shader.set_uniform_i32("u_DirectionalLight.enable", self.sky.enabled as i32);

        shader.set_uniform_vec3("u_LightProperty.lightPos", self.point.position.into());
        shader.set_uniform_vec3("u_LightProperty.ambient", self.point.ambient());
        shader.set_uniform_vec3("u_LightProperty.diffuse", self.point.diffuse());
        shader.set_uniform_vec3("u_LightProperty.specular", self.point.specular());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::math::Matrix4;
    use std::collections::HashMap;

    #[derive(Default)]
    struct RecordingShader {
        vectors: HashMap<String, [f32; 3]>,
        ints: HashMap<String, i32>,
    }

    impl ShaderProgram for RecordingShader {
        fn set_uniform_i32(&mut self, name: &str, value: i32) {
            self.ints.insert(name.to_string(), value);
        }

        fn set_uniform_vec3(&mut self, name: &str, value: [f32; 3]) {
            self.vectors.insert(name.to_string(), value);
        }

        fn set_uniform_mat4(&mut self, _name: &str, _value: &Matrix4) {}
    }

    #[test]
    fn test_point_light_terms_follow_color() {
        let mut light = PointLight::from_config("Light", &PointLightConfig::default());
        light.color = Color::new(1.0, 0.5, 0.0);

        assert_eq!(light.ambient(), [0.1, 0.05, 0.0]);
        assert_eq!(light.diffuse(), [0.5, 0.25, 0.0]);
        assert_eq!(light.specular(), [1.0, 0.5, 0.0]);
    }

    #[test]
    fn test_sky_light_defaults() {
        let sky = DirectionalLight::from_config("Sky", &DirectionalLightConfig::default());

        assert!(sky.enabled);
        assert_eq!(sky.direction, Vector3::new(0.0, 1.0, 0.0));
        assert_eq!(sky.ambient, [0.3, 0.3, 0.3]);
    }

    #[test]
    fn test_apply_writes_every_lighting_uniform() {
        let mut sky = DirectionalLight::from_config("Sky", &DirectionalLightConfig::default());
        sky.enabled = false;
        let mut point = PointLight::from_config("Light", &PointLightConfig::default());
        point.position = Vector3::new(-15.0, 2.0, 0.0);

        let mut shader = RecordingShader::default();
        LightingUniforms { sky: &sky, point: &point, view_position: Vector3::new(0.0, 0.0, 60.0) }
            .apply(&mut shader);

        assert_eq!(shader.ints["u_DirectionalLight.enable"], 0);
        assert_eq!(shader.vectors["u_LightProperty.lightPos"], [-15.0, 2.0, 0.0]);
        assert_eq!(shader.vectors["u_ViewPos"], [0.0, 0.0, 60.0]);
        assert_eq!(shader.vectors.len(), 9);
    }
}

//! 环绕相机
//!
//! 相机在 XZ 平面上以固定半径绕目标点旋转，始终看向目标。
//! 视图矩阵前面可以再叠加一个用户控制的平移。

use super::Component;
use crate::core::math::{matrix, Matrix4, Vector3};
use crate::core::scene::CameraConfig;

/// 环绕相机
#[derive(Debug, Clone)]
pub struct OrbitCamera {
    name: String,

    /// 看向的目标点（通常是所有模型包围盒并集的中心）
    target: Vector3,

    /// 环绕半径
    pub radius: f32,

    /// 角速度（弧度/秒）
    pub speed: f32,

    /// 已经过的时间（秒）
    elapsed: f32,

    /// 垂直视场角（度）
    pub fov_degrees: f32,

    pub near_z: f32,
    pub far_z: f32,

    /// 视图空间的附加平移
    pub view_translate: Vector3,
}

impl OrbitCamera {
    pub fn new(name: impl Into<String>, target: Vector3, config: &CameraConfig) -> Self {
        Self {
            name: name.into(),
            target,
            radius: config.orbit_radius,
            speed: config.orbit_speed,
            elapsed: 0.0,
            fov_degrees: config.fov,
            near_z: config.near_clip,
            far_z: config.far_clip,
            view_translate: Vector3::zeros(),
        }
    }

    pub fn target(&self) -> Vector3 {
        self.target
    }

    pub fn set_target(&mut self, target: Vector3) {
        self.target = target;
    }

    /// 当前相机位置 `(sin(t)·r, 0, cos(t)·r)`
    pub fn position(&self) -> Vector3 {
        let t = self.elapsed * self.speed;
        Vector3::new(t.sin() * self.radius, 0.0, t.cos() * self.radius)
    }

    /// 视图矩阵：`T(view_translate) * lookAt(position, target, +Y)`
    pub fn view_matrix(&self) -> Matrix4 {
        let look_at = matrix::look_at(&self.position(), &self.target, &Vector3::y());
        matrix::translation(&self.view_translate) * look_at
    }

    /// 透视投影矩阵
    pub fn proj_matrix(&self, aspect: f32) -> Matrix4 {
        matrix::perspective(self.fov_degrees.to_radians(), aspect, self.near_z, self.far_z)
    }

    /// 投影 × 视图
    pub fn view_proj(&self, aspect: f32) -> Matrix4 {
        self.proj_matrix(aspect) * self.view_matrix()
    }
}

impl Component for OrbitCamera {
    fn name(&self) -> &str {
        &self.name
    }

    fn tick(&mut self, delta_time: f32) {
        self.elapsed += delta_time;
    }
}

//! 统一的数学库模块
//!
//! 基于 `nalgebra` 提供图形编程常用的类型别名和矩阵辅助函数。
//!
//! 矩阵约定与着色器一致：列主序、右手坐标系、Y 轴向上。
//! 投影矩阵已经换算到 wgpu 的 [0, 1] 深度范围。

pub use nalgebra::{
    Matrix4 as Mat4, Point3, Vector2 as Vec2, Vector3 as Vec3, Vector4 as Vec4,
};

// 类型别名，使用更简洁的名称
pub type Vector2 = Vec2<f32>;
pub type Vector3 = Vec3<f32>;
pub type Vector4 = Vec4<f32>;
pub type Matrix4 = Mat4<f32>;

/// OpenGL 风格裁剪空间（z ∈ [-1, 1]）到 wgpu 裁剪空间（z ∈ [0, 1]）的换算矩阵
#[rustfmt::skip]
pub const OPENGL_TO_WGPU: [[f32; 4]; 4] = [
    [1.0, 0.0, 0.0, 0.0],
    [0.0, 1.0, 0.0, 0.0],
    [0.0, 0.0, 0.5, 0.0],
    [0.0, 0.0, 0.5, 1.0],
];

fn opengl_to_wgpu() -> Matrix4 {
    Matrix4::from(OPENGL_TO_WGPU)
}

/// 矩阵辅助函数
pub mod matrix {
    use super::*;

    /// 创建平移矩阵
    pub fn translation(offset: &Vector3) -> Matrix4 {
        Matrix4::new_translation(offset)
    }

    /// 创建非均匀缩放矩阵
    pub fn scaling(scale: &Vector3) -> Matrix4 {
        Matrix4::new_nonuniform_scaling(scale)
    }

    /// 欧拉角旋转（弧度，XYZ 顺序）：`Rx(x) * Ry(y) * Rz(z)`
    pub fn euler_xyz(angle: &Vector3) -> Matrix4 {
        let rotation_x = Matrix4::from_axis_angle(&Vector3::x_axis(), angle.x);
        let rotation_y = Matrix4::from_axis_angle(&Vector3::y_axis(), angle.y);
        let rotation_z = Matrix4::from_axis_angle(&Vector3::z_axis(), angle.z);
        rotation_x * rotation_y * rotation_z
    }

    /// 创建透视投影矩阵（`fov_y` 为弧度）
    pub fn perspective(fov_y: f32, aspect: f32, near: f32, far: f32) -> Matrix4 {
        opengl_to_wgpu() * Matrix4::new_perspective(aspect, fov_y, near, far)
    }

    /// 创建正交投影矩阵
    pub fn orthographic(left: f32, right: f32, bottom: f32, top: f32, near: f32, far: f32) -> Matrix4 {
        opengl_to_wgpu() * Matrix4::new_orthographic(left, right, bottom, top, near, far)
    }

    /// 创建 Look-At 视图矩阵
    pub fn look_at(eye: &Vector3, target: &Vector3, up: &Vector3) -> Matrix4 {
        Matrix4::look_at_rh(&Point3::from(*eye), &Point3::from(*target), up)
    }

    /// 用 4x4 矩阵变换一个点（w = 1）
    pub fn transform_point(matrix: &Matrix4, point: &Vector3) -> Vector3 {
        matrix.transform_point(&Point3::from(*point)).coords
    }
}

/// 检查两个浮点数是否近似相等
pub fn approx_eq(a: f32, b: f32, epsilon: f32) -> bool {
    (a - b).abs() < epsilon
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matrix_translation() {
        let mat = matrix::translation(&Vector3::new(1.0, 2.0, 3.0));
        let result = matrix::transform_point(&mat, &Vector3::zeros());

        assert!(approx_eq(result.x, 1.0, 1e-6));
        assert!(approx_eq(result.y, 2.0, 1e-6));
        assert!(approx_eq(result.z, 3.0, 1e-6));
    }

    #[test]
    fn test_euler_xyz_zero_is_identity() {
        assert_eq!(matrix::euler_xyz(&Vector3::zeros()), Matrix4::identity());
    }

    #[test]
    fn test_euler_xyz_applies_z_first() {
        use std::f32::consts::FRAC_PI_2;

        // Rx(90°) * Rz(90°) 作用于 +X：先绕 Z 得到 +Y，再绕 X 得到 +Z
        let rotation = matrix::euler_xyz(&Vector3::new(FRAC_PI_2, 0.0, FRAC_PI_2));
        let result = matrix::transform_point(&rotation, &Vector3::new(1.0, 0.0, 0.0));

        assert!(approx_eq(result.x, 0.0, 1e-5));
        assert!(approx_eq(result.y, 0.0, 1e-5));
        assert!(approx_eq(result.z, 1.0, 1e-5));
    }

    #[test]
    fn test_perspective_maps_near_plane_to_zero_depth() {
        let proj = matrix::perspective(std::f32::consts::FRAC_PI_4, 1.0, 0.1, 100.0);
        let clip = proj * Vector4::new(0.0, 0.0, -0.1, 1.0);

        assert!(approx_eq(clip.z / clip.w, 0.0, 1e-4));
    }
}

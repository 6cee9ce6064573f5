//! 模型摆放变换
//!
//! 由包围盒推导的模型矩阵：旋转和缩放以模型自身的几何中心为支点，
//! 用户给出的平移在回到原位之后以世界坐标叠加。

use crate::core::math::{matrix, Matrix4, Vector3};
use crate::geometry::BoundingBox;

/// 模型摆放变换
///
/// 构造时记录两个不可变的中心：模型自身包围盒的中心（网格中心）
/// 和参考包围盒（通常是所有模型的并集）的中心。只有网格中心参与矩阵计算，
/// 参考中心仅保留以供查询。
#[derive(Debug, Clone, PartialEq)]
pub struct PlacementTransform {
    /// 欧拉角（弧度，XYZ 顺序）
    pub angle: Vector3,

    /// 世界坐标下的平移
    pub translation: Vector3,

    /// 非均匀缩放
    pub scale: Vector3,

    mesh_center: Vector3,
    reference_center: Vector3,
}

impl PlacementTransform {
    /// 由参考包围盒和模型自身的包围盒创建
    pub fn new(reference: &BoundingBox, local: &BoundingBox) -> Self {
        Self {
            angle: Vector3::zeros(),
            translation: Vector3::zeros(),
            scale: Vector3::new(1.0, 1.0, 1.0),
            mesh_center: local.center(),
            reference_center: reference.center(),
        }
    }

    /// 模型几何中心，旋转和缩放的支点
    pub fn mesh_center(&self) -> Vector3 {
        self.mesh_center
    }

    /// 参考包围盒的中心
    pub fn reference_center(&self) -> Vector3 {
        self.reference_center
    }

    /// 设置统一缩放
    pub fn set_uniform_scale(&mut self, scale: f32) {
        self.scale = Vector3::new(scale, scale, scale);
    }

    /// 组合模型矩阵
    ///
    /// `T(center) * T(translation) * R(angle) * S(scale) * T(-center)`
    ///
    /// 每次调用都按当前字段重新计算，不做缓存。
    pub fn matrix(&self) -> Matrix4 {
        let translate_to_origin = matrix::translation(&-self.mesh_center);
        let scale = matrix::scaling(&self.scale);
        let rotate = matrix::euler_xyz(&self.angle);
        let translate = matrix::translation(&self.translation);
        let translate_back = matrix::translation(&self.mesh_center);

        translate_back * translate * rotate * scale * translate_to_origin
    }

    /// 把模型局部坐标中的点变换到世界坐标
    pub fn transform_point(&self, point: &Vector3) -> Vector3 {
        matrix::transform_point(&self.matrix(), point)
    }
}

/// 把支撑物（地面）放到主体正下方所需的平移
///
/// 两者中心对齐后，再向下移动主体缩放后高度的一半。
pub fn support_offset(object: &BoundingBox, support: &BoundingBox, object_scale_y: f32) -> Vector3 {
    let mut offset = object.center() - support.center();
    offset.y -= object.height() / 2.0 * object_scale_y;
    offset
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn test_support_offset_puts_ground_under_object() {
        let object = bbox([-1.0, 2.0, -1.0], [1.0, 6.0, 1.0]);
        let ground = bbox([-10.0, -0.5, -10.0], [10.0, 0.5, 10.0]);

        assert_eq!(support_offset(&object, &ground, 1.0), Vector3::new(0.0, 2.0, 0.0));
        assert_eq!(support_offset(&object, &ground, 5.0), Vector3::new(0.0, -6.0, 0.0));
    }

    fn bbox(min: [f32; 3], max: [f32; 3]) -> BoundingBox {
        BoundingBox::new(Vector3::from(min), Vector3::from(max))
    }

    fn assert_close(a: Vector3, b: Vector3) {
        assert!((a - b).norm() < 1e-4, "{:?} != {:?}", a, b);
    }

    #[test]
    fn test_default_is_identity() {
        let placement = PlacementTransform::new(
            &bbox([-50.0, -3.0, 7.0], [12.0, 9.0, 40.0]),
            &bbox([3.0, 4.0, 5.0], [6.0, 8.0, 10.0]),
        );

        assert_eq!(placement.matrix(), Matrix4::identity());
    }

    #[test]
    fn test_matrix_is_idempotent() {
        let mut placement = PlacementTransform::new(
            &bbox([0.0, 0.0, 0.0], [10.0, 10.0, 10.0]),
            &bbox([1.0, 2.0, 3.0], [4.0, 5.0, 6.0]),
        );
        placement.angle = Vector3::new(0.3, 1.1, -0.7);
        placement.translation = Vector3::new(4.0, -2.0, 9.5);
        placement.scale = Vector3::new(2.0, 0.5, 3.0);

        assert_eq!(placement.matrix(), placement.matrix());
    }

    #[test]
    fn test_scale_pivots_about_mesh_center() {
        let local = bbox([10.0, 0.0, 0.0], [12.0, 2.0, 2.0]);
        let mut placement = PlacementTransform::new(&local, &local);
        placement.set_uniform_scale(5.0);

        // 中心不动，角点离中心的距离放大 5 倍
        assert_close(placement.transform_point(&local.center()), local.center());
        assert_close(
            placement.transform_point(&local.max),
            Vector3::new(16.0, 6.0, 6.0),
        );
    }

    #[test]
    fn test_rotation_pivots_about_mesh_center() {
        let local = bbox([4.0, -1.0, -1.0], [6.0, 1.0, 1.0]);
        let mut placement = PlacementTransform::new(&local, &local);
        placement.angle = Vector3::new(0.0, 0.0, FRAC_PI_2);

        // 绕中心 (5,0,0) 旋转 90°：(6,0,0) -> (5,1,0)
        assert_close(
            placement.transform_point(&Vector3::new(6.0, 0.0, 0.0)),
            Vector3::new(5.0, 1.0, 0.0),
        );
    }

    #[test]
    fn test_translation_is_applied_in_world_space() {
        let local = bbox([0.0, 0.0, 0.0], [2.0, 2.0, 2.0]);
        let mut placement = PlacementTransform::new(&local, &local);
        placement.angle = Vector3::new(0.0, FRAC_PI_2, 0.0);
        placement.set_uniform_scale(3.0);
        placement.translation = Vector3::new(-15.0, 0.0, 0.0);

        assert_close(
            placement.transform_point(&local.center()),
            Vector3::new(-14.0, 1.0, 1.0),
        );
    }

    #[test]
    fn test_reference_center_is_kept_but_not_applied() {
        let reference = bbox([100.0, 100.0, 100.0], [200.0, 200.0, 200.0]);
        let local = bbox([0.0, 0.0, 0.0], [2.0, 2.0, 2.0]);
        let placement = PlacementTransform::new(&reference, &local);

        assert_eq!(placement.reference_center(), Vector3::new(150.0, 150.0, 150.0));
        assert_eq!(placement.mesh_center(), Vector3::new(1.0, 1.0, 1.0));
        assert_eq!(placement.matrix(), Matrix4::identity());
    }
}

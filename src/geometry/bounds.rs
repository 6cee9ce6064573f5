//! 轴对齐包围盒
//!
//! 所有计算都是纯函数：包围盒从不保存在网格上，调用方按需重新计算。
//! 空输入（没有顶点或没有包围盒）属于前置条件错误，直接 panic。

use crate::core::math::{matrix, Matrix4, Vector3};

use super::mesh::{MeshAttributes, Model, COORDINATES_PER_VERTEX};

/// 正交视景体在深度方向两侧额外留出的余量
pub const ORTHO_DEPTH_MARGIN: f32 = 100.0;

/// 轴对齐包围盒，满足逐分量 `min <= max`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min: Vector3,
    pub max: Vector3,
}

impl BoundingBox {
    pub fn new(min: Vector3, max: Vector3) -> Self {
        Self { min, max }
    }

    /// 由 XYZ 紧密排列的位置数组计算包围盒
    ///
    /// # Panics
    ///
    /// 数组为空或长度不是 3 的倍数时 panic。
    pub fn from_positions(positions: &[f32]) -> Self {
        assert!(
            !positions.is_empty() && positions.len() % COORDINATES_PER_VERTEX == 0,
            "position array must hold at least one XYZ triple, got {} floats",
            positions.len()
        );

        let mut points = positions.chunks_exact(COORDINATES_PER_VERTEX);
        let first = points.next().map(Vector3::from_column_slice).unwrap_or_else(Vector3::zeros);

        points.fold(Self::new(first, first), |bbox, p| {
            let point = Vector3::from_column_slice(p);
            Self::new(bbox.min.inf(&point), bbox.max.sup(&point))
        })
    }

    /// 多个子网格的包围盒：先逐个计算，再求并
    pub fn from_meshes(meshes: &[MeshAttributes]) -> Self {
        let boxes: Vec<BoundingBox> = meshes
            .iter()
            .map(|mesh| Self::from_positions(&mesh.positions))
            .collect();
        Self::union(&boxes)
    }

    /// 整个模型的包围盒
    pub fn from_model(model: &Model) -> Self {
        Self::from_meshes(model.meshes())
    }

    /// 多个包围盒的并集
    ///
    /// # Panics
    ///
    /// `boxes` 为空时 panic。
    pub fn union(boxes: &[BoundingBox]) -> Self {
        let (first, rest) = boxes
            .split_first()
            .expect("bounding box union requires at least one box");

        rest.iter().fold(*first, |acc, bbox| acc.merge(bbox))
    }

    /// 与另一个包围盒合并
    pub fn merge(&self, other: &BoundingBox) -> Self {
        Self::new(self.min.inf(&other.min), self.max.sup(&other.max))
    }

    /// 中心点（逐轴取中点）
    pub fn center(&self) -> Vector3 {
        (self.min + self.max) / 2.0
    }

    /// X 方向跨度
    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    /// Y 方向跨度
    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }

    /// Z 方向跨度
    pub fn depth(&self) -> f32 {
        self.max.z - self.min.z
    }

    /// 点是否在包围盒内（含边界）
    pub fn contains(&self, point: &Vector3) -> bool {
        (0..3).all(|i| self.min[i] <= point[i] && point[i] <= self.max[i])
    }

    /// 按目标宽高比推导一个以原点为中心的正交视景体
    ///
    /// 宽高中较小的一边按 `aspect_ratio / current` 放大以匹配目标比例，
    /// 深度方向两侧各留 `ORTHO_DEPTH_MARGIN`。这是取景用的近似，不是精确贴合。
    ///
    /// # Panics
    ///
    /// 包围盒的宽或高为 0 时 panic。
    pub fn ortho_bounds(&self, aspect_ratio: f32) -> OrthoBounds {
        let mut width = (self.min.x - self.max.x).abs();
        let mut height = (self.min.y - self.max.y).abs();
        assert!(
            width > 0.0 && height > 0.0,
            "orthographic framing needs a box with non-zero width and height"
        );

        let factor = aspect_ratio / (width / height);
        if factor > 1.0 {
            width *= factor;
        } else {
            height /= factor;
        }

        OrthoBounds {
            left: -width / 2.0,
            right: width / 2.0,
            bottom: -height / 2.0,
            top: height / 2.0,
            near: self.min.z - ORTHO_DEPTH_MARGIN,
            far: self.max.z + ORTHO_DEPTH_MARGIN,
        }
    }
}

/// 多个模型的包围盒并集
pub fn of_models(models: &[&Model]) -> BoundingBox {
    let boxes: Vec<BoundingBox> = models.iter().map(|model| BoundingBox::from_model(model)).collect();
    BoundingBox::union(&boxes)
}

/// 多组位置数组的包围盒并集
pub fn of_position_sets(sets: &[&[f32]]) -> BoundingBox {
    let boxes: Vec<BoundingBox> = sets.iter().map(|set| BoundingBox::from_positions(set)).collect();
    BoundingBox::union(&boxes)
}

/// 对称的正交视景体
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrthoBounds {
    pub left: f32,
    pub right: f32,
    pub bottom: f32,
    pub top: f32,
    pub near: f32,
    pub far: f32,
}

impl OrthoBounds {
    pub fn aspect_ratio(&self) -> f32 {
        (self.right - self.left) / (self.top - self.bottom)
    }

    pub fn to_matrix(&self) -> Matrix4 {
        matrix::orthographic(self.left, self.right, self.bottom, self.top, self.near, self.far)
    }
}

//! 法线处理
//!
//! - 从三角形面重建顶点法线（源文件没有法线时使用）
//! - 将法线重新归一化为单位长度
//!
//! 两个函数都直接作用于按 XYZ 紧密排列的浮点数组。

use super::mesh::COORDINATES_PER_VERTEX;

/// 退化法线（长度接近 0）时使用的回退方向
pub const FALLBACK_NORMAL: [f32; 3] = [0.0, 1.0, 0.0];

/// 从三角形面重建顶点法线
///
/// 遍历所有三角形，把未归一化的面法线（叉乘结果，长度与面积成正比）
/// 累加到三个顶点上，最后归一化。面积大的三角形权重也更大。
///
/// # 参数
///
/// - `positions`: 顶点位置（XYZ 紧密排列）
/// - `indices`: 三角形索引
///
/// # 返回
///
/// 与 `positions` 等长的单位法线数组
pub fn generate_normals(positions: &[f32], indices: &[u32]) -> Vec<f32> {
    let mut normals = vec![0.0f32; positions.len()];

    let position = |i: usize| -> [f32; 3] {
        let base = i * COORDINATES_PER_VERTEX;
        [positions[base], positions[base + 1], positions[base + 2]]
    };

    for triangle in indices.chunks_exact(3) {
        let i0 = triangle[0] as usize;
        let i1 = triangle[1] as usize;
        let i2 = triangle[2] as usize;

        let p0 = position(i0);
        let p1 = position(i1);
        let p2 = position(i2);

        let edge1 = [p1[0] - p0[0], p1[1] - p0[1], p1[2] - p0[2]];
        let edge2 = [p2[0] - p0[0], p2[1] - p0[1], p2[2] - p0[2]];
        let face_normal = cross(edge1, edge2);

        for i in [i0, i1, i2] {
            let base = i * COORDINATES_PER_VERTEX;
            normals[base] += face_normal[0];
            normals[base + 1] += face_normal[1];
            normals[base + 2] += face_normal[2];
        }
    }

    normalize_all(&mut normals);
    normals
}

/// 将每个法线归一化为单位长度
///
/// 解析器给出的法线不一定严格是单位长度。长度接近 0 的法线替换为
/// `FALLBACK_NORMAL`，保证输出的每个向量长度都为 1。
pub fn normalize_all(normals: &mut [f32]) {
    for normal in normals.chunks_exact_mut(COORDINATES_PER_VERTEX) {
        let n = normalize([normal[0], normal[1], normal[2]]);
        normal.copy_from_slice(&n);
    }
}

#[inline]
fn cross(a: [f32; 3], b: [f32; 3]) -> [f32; 3] {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}

#[inline]
fn normalize(v: [f32; 3]) -> [f32; 3] {
    let length = (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt();

    if !length.is_finite() || length < 1e-12 {
        FALLBACK_NORMAL
    } else {
        let inv_length = 1.0 / length;
        [v[0] * inv_length, v[1] * inv_length, v[2] * inv_length]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn length(n: &[f32]) -> f32 {
        (n[0] * n[0] + n[1] * n[1] + n[2] * n[2]).sqrt()
    }

    #[test]
    fn test_cross() {
        let z = cross([1.0, 0.0, 0.0], [0.0, 1.0, 0.0]);
        assert_eq!(z, [0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_normalize_keeps_direction() {
        let n = normalize([3.0, 4.0, 0.0]);
        assert!((n[0] - 0.6).abs() < 1e-6);
        assert!((n[1] - 0.8).abs() < 1e-6);
    }

    #[test]
    fn test_zero_normal_falls_back() {
        let mut normals = vec![0.0, 0.0, 0.0, 0.0, 0.0, 2.0];
        normalize_all(&mut normals);

        assert_eq!(&normals[0..3], &FALLBACK_NORMAL);
        assert_eq!(&normals[3..6], &[0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_generate_normals_counter_clockwise_triangle() {
        // XY 平面上逆时针的三角形，法线指向 +Z
        let positions = [0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0];
        let normals = generate_normals(&positions, &[0, 1, 2]);

        assert_eq!(normals.len(), positions.len());
        for normal in normals.chunks_exact(3) {
            assert!((normal[2] - 1.0).abs() < 1e-6, "{:?}", normal);
            assert!((length(normal) - 1.0).abs() < 1e-6);
        }
    }

    #[test]
    fn test_generate_normals_shared_vertex_is_averaged() {
        // 两个互相垂直的三角形共享边 (0, 1)
        let positions = [
            0.0, 0.0, 0.0, //
            1.0, 0.0, 0.0, //
            0.0, 1.0, 0.0, //
            0.0, 0.0, -1.0,
        ];
        let normals = generate_normals(&positions, &[0, 1, 2, 0, 1, 3]);

        let shared = &normals[0..3];
        assert!((length(shared) - 1.0).abs() < 1e-6);
        assert!(shared[1] > 0.1 && shared[2] > 0.1, "{:?}", shared);
    }
}

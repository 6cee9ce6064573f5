//! 超大子网格拆分
//!
//! 三角形数超过上限的子网格被拆成若干连续的块。每一块只保留自己引用到的顶点，
//! 并把索引重映射到块内。拆出的块继承原子网格的纹理引用。

use super::mesh::{
    MeshAttributes, COORDINATES_PER_VERTEX, TRIANGLE_VERTICES, UV_COORDINATES_PER_VERTEX,
};

const UNMAPPED: u32 = u32::MAX;

/// 按三角形上限拆分子网格
///
/// 未超过上限时原样返回（单元素数组）。`max_triangles` 为 0 时视为 1。
pub fn split_mesh(mesh: MeshAttributes, max_triangles: usize) -> Vec<MeshAttributes> {
    let max_triangles = max_triangles.max(1);
    if mesh.triangle_count() <= max_triangles {
        return vec![mesh];
    }

    let mut remap = vec![UNMAPPED; mesh.vertex_count()];
    let mut chunks = Vec::with_capacity(mesh.triangle_count().div_ceil(max_triangles));

    for triangles in mesh.indices.chunks(max_triangles * TRIANGLE_VERTICES) {
        let mut chunk = MeshAttributes {
            uv_coords: mesh.uv_coords.as_ref().map(|_| Vec::new()),
            textures: mesh.textures.clone(),
            ..Default::default()
        };
        let mut touched = Vec::new();

        for &old in triangles {
            let slot = &mut remap[old as usize];
            if *slot == UNMAPPED {
                *slot = chunk.vertex_count() as u32;
                touched.push(old);
                copy_vertex(&mesh, &mut chunk, old as usize);
            }
            chunk.indices.push(*slot);
        }

        for old in touched {
            remap[old as usize] = UNMAPPED;
        }

        chunks.push(chunk);
    }

    chunks
}

fn copy_vertex(source: &MeshAttributes, target: &mut MeshAttributes, vertex: usize) {
    let base = vertex * COORDINATES_PER_VERTEX;
    let range = base..base + COORDINATES_PER_VERTEX;
    target.positions.extend_from_slice(&source.positions[range.clone()]);
    target.normals.extend_from_slice(&source.normals[range]);

    if let (Some(source_uv), Some(target_uv)) = (&source.uv_coords, &mut target.uv_coords) {
        let base = vertex * UV_COORDINATES_PER_VERTEX;
        target_uv.extend_from_slice(&source_uv[base..base + UV_COORDINATES_PER_VERTEX]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::mesh::{TextureKind, TextureRef};

    /// 一条由 `quads` 个四边形组成的条带，每个四边形两个三角形
    fn strip(quads: usize) -> MeshAttributes {
        let mut mesh = MeshAttributes::default();
        for i in 0..=quads {
            let x = i as f32;
            mesh.positions.extend_from_slice(&[x, 0.0, 0.0, x, 1.0, 0.0]);
            mesh.normals.extend_from_slice(&[0.0, 0.0, 1.0, 0.0, 0.0, 1.0]);
        }
        mesh.uv_coords = Some((0..mesh.vertex_count() * 2).map(|i| i as f32).collect());
        for i in 0..quads as u32 {
            let a = i * 2;
            mesh.indices.extend_from_slice(&[a, a + 2, a + 1, a + 1, a + 2, a + 3]);
        }
        mesh.textures.push(TextureRef { kind: TextureKind::Diffuse, index: 0 });
        mesh
    }

    #[test]
    fn test_small_mesh_is_untouched() {
        let mesh = strip(2);
        let chunks = split_mesh(mesh.clone(), 4);
        assert_eq!(chunks, vec![mesh]);
    }

    #[test]
    fn test_split_preserves_triangles() {
        let mesh = strip(3); // 6 个三角形
        let chunks = split_mesh(mesh.clone(), 4);

        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].triangle_count(), 4);
        assert_eq!(chunks[1].triangle_count(), 2);

        // 每个块的三角形在原网格中有相同的顶点位置
        let mut original = mesh.indices.chunks(3);
        for chunk in &chunks {
            assert!(chunk.validate().is_ok());
            assert_eq!(chunk.textures, mesh.textures);
            for triangle in chunk.indices.chunks(3) {
                let expected = original.next().unwrap();
                for (&new, &old) in triangle.iter().zip(expected) {
                    let new = new as usize * 3;
                    let old = old as usize * 3;
                    assert_eq!(chunk.positions[new..new + 3], mesh.positions[old..old + 3]);
                }
            }
        }
    }

    #[test]
    fn test_split_chunk_only_keeps_referenced_vertices() {
        let chunks = split_mesh(strip(4), 2);

        assert_eq!(chunks.len(), 4);
        for chunk in &chunks {
            assert_eq!(chunk.vertex_count(), 4);
            assert_eq!(chunk.uv_coords().map(<[f32]>::len), Some(8));
        }
    }
}

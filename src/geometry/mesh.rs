/// 网格数据结构模块
///
/// 定义 CPU 侧的模型数据容器：每个子网格一组扁平的属性数组，
/// 以及模型级别去重后的纹理路径表。

use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// 子网格 ID
///
/// 即子网格在 `Model::meshes()` 中的下标，按导入顺序从 0 开始分配，
/// 在模型生命周期内保持不变。
pub type MeshId = usize;

/// 每个顶点的位置/法线分量数
pub const COORDINATES_PER_VERTEX: usize = 3;

/// 每个顶点的 UV 分量数
pub const UV_COORDINATES_PER_VERTEX: usize = 2;

/// 每个三角形的顶点数
pub const TRIANGLE_VERTICES: usize = 3;

/// 材质纹理槽类型
///
/// 只处理漫反射和高光两种槽，其余槽类型在导入时被忽略。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextureKind {
    Diffuse,
    Specular,
}

impl TextureKind {
    /// 所有受支持的槽类型，按绑定顺序排列
    pub const ALL: [TextureKind; 2] = [TextureKind::Diffuse, TextureKind::Specular];

    pub fn name(self) -> &'static str {
        match self {
            TextureKind::Diffuse => "diffuse",
            TextureKind::Specular => "specular",
        }
    }
}

/// 子网格对纹理的引用：槽类型 + 模型纹理路径表中的下标
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextureRef {
    pub kind: TextureKind,
    pub index: usize,
}

/// 单个子网格的属性集合
///
/// # 不变量
///
/// - `positions.len() == normals.len() == 3 * vertex_count`
/// - `uv_coords` 为 `None` 或长度为 `2 * vertex_count`
/// - `indices.len() % 3 == 0`，且所有索引 `< vertex_count`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshAttributes {
    /// 顶点位置，按 XYZ 紧密排列
    pub positions: Vec<f32>,

    /// 单位长度法线，按 XYZ 紧密排列
    pub normals: Vec<f32>,

    /// 纹理坐标（通道 0），按 UV 紧密排列；源文件没有时为 `None`
    pub uv_coords: Option<Vec<f32>>,

    /// 三角形索引，每 3 个为一个三角形
    pub indices: Vec<u32>,

    /// 材质引用的纹理
    pub textures: Vec<TextureRef>,
}

impl MeshAttributes {
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.positions.len() / COORDINATES_PER_VERTEX
    }

    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / TRIANGLE_VERTICES
    }

    #[inline]
    pub fn has_uv_coords(&self) -> bool {
        self.uv_coords.is_some()
    }

    pub fn uv_coords(&self) -> Option<&[f32]> {
        self.uv_coords.as_deref()
    }

    /// 指定槽类型的第一张纹理在路径表中的下标
    pub fn first_texture(&self, kind: TextureKind) -> Option<usize> {
        self.textures
            .iter()
            .find(|texture| texture.kind == kind)
            .map(|texture| texture.index)
    }

    /// 验证属性数组的长度和索引范围
    pub fn validate(&self) -> Result<(), String> {
        if self.positions.len() % COORDINATES_PER_VERTEX != 0 {
            return Err(format!(
                "位置数据不完整: {} 个浮点数",
                self.positions.len()
            ));
        }

        if self.normals.len() != self.positions.len() {
            return Err(format!(
                "法线数量 {} 与位置数量 {} 不一致",
                self.normals.len(),
                self.positions.len()
            ));
        }

        let vertex_count = self.vertex_count();
        if let Some(uv) = &self.uv_coords {
            if uv.len() != vertex_count * UV_COORDINATES_PER_VERTEX {
                return Err(format!(
                    "UV 数量 {} 与顶点数 {} 不一致",
                    uv.len(),
                    vertex_count
                ));
            }
        }

        if self.indices.len() % TRIANGLE_VERTICES != 0 {
            return Err(format!(
                "索引数量必须是3的倍数，当前为: {}",
                self.indices.len()
            ));
        }

        if let Some((i, &index)) = self
            .indices
            .iter()
            .enumerate()
            .find(|(_, index)| **index as usize >= vertex_count)
        {
            return Err(format!(
                "索引 {} 处的值 {} 超出顶点范围 (顶点数 {})",
                i, index, vertex_count
            ));
        }

        Ok(())
    }
}

/// 模型级别的纹理路径表
///
/// 路径按首次出现的顺序分配下标，相同路径只保存一次。
/// 下标同时也是渲染器中纹理句柄的槽位。
#[derive(Debug, Clone, Default)]
pub struct TexturePathTable {
    paths: Vec<PathBuf>,
    lookup: HashMap<PathBuf, usize>,
}

impl TexturePathTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// 插入路径并返回它的下标；已存在时返回原下标
    pub fn insert(&mut self, path: PathBuf) -> usize {
        if let Some(&index) = self.lookup.get(&path) {
            return index;
        }

        let index = self.paths.len();
        self.lookup.insert(path.clone(), index);
        self.paths.push(path);
        index
    }

    pub fn get(&self, index: usize) -> Option<&Path> {
        self.paths.get(index).map(PathBuf::as_path)
    }

    pub fn index_of(&self, path: &Path) -> Option<usize> {
        self.lookup.get(path).copied()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Path> {
        self.paths.iter().map(PathBuf::as_path)
    }

    pub fn clear(&mut self) {
        self.paths.clear();
        self.lookup.clear();
    }
}

/// 导入后的模型
///
/// 子网格存放在连续数组中，数组下标就是 `MeshId`。
#[derive(Debug, Clone, Default)]
pub struct Model {
    source: PathBuf,
    meshes: Vec<MeshAttributes>,
    texture_paths: TexturePathTable,
}

impl Model {
    /// 创建空模型
    pub fn new() -> Self {
        Self::default()
    }

    /// 由已经整理好的子网格和纹理表组装模型
    pub fn from_parts(
        source: impl Into<PathBuf>,
        meshes: Vec<MeshAttributes>,
        texture_paths: TexturePathTable,
    ) -> Self {
        Self {
            source: source.into(),
            meshes,
            texture_paths,
        }
    }

    /// 模型源文件路径；空模型返回空路径
    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn mesh(&self, id: MeshId) -> Option<&MeshAttributes> {
        self.meshes.get(id)
    }

    pub fn meshes(&self) -> &[MeshAttributes] {
        &self.meshes
    }

    #[inline]
    pub fn mesh_count(&self) -> usize {
        self.meshes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.meshes.is_empty()
    }

    pub fn texture_paths(&self) -> &TexturePathTable {
        &self.texture_paths
    }

    pub fn texture_path(&self, index: usize) -> Option<&Path> {
        self.texture_paths.get(index)
    }

    pub fn vertex_count(&self) -> usize {
        self.meshes.iter().map(MeshAttributes::vertex_count).sum()
    }

    pub fn triangle_count(&self) -> usize {
        self.meshes.iter().map(MeshAttributes::triangle_count).sum()
    }

    /// 清空所有子网格和纹理路径
    pub fn clear(&mut self) {
        self.meshes.clear();
        self.texture_paths.clear();
        self.source = PathBuf::new();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle() -> MeshAttributes {
        MeshAttributes {
            positions: vec![0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0],
            normals: vec![0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 0.0, 0.0, 1.0],
            uv_coords: None,
            indices: vec![0, 1, 2],
            textures: Vec::new(),
        }
    }

    #[test]
    fn test_mesh_counts() {
        let mesh = triangle();
        assert_eq!(mesh.vertex_count(), 3);
        assert_eq!(mesh.triangle_count(), 1);
        assert!(!mesh.has_uv_coords());
        assert!(mesh.validate().is_ok());
    }

    #[test]
    fn test_validation_rejects_out_of_range_index() {
        let mut mesh = triangle();
        mesh.indices[2] = 5;

        let result = mesh.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().contains("超出顶点范围"));
    }

    #[test]
    fn test_validation_rejects_short_uv() {
        let mut mesh = triangle();
        mesh.uv_coords = Some(vec![0.0, 0.0]);
        assert!(mesh.validate().is_err());
    }

    #[test]
    fn test_first_texture_per_kind() {
        let mut mesh = triangle();
        mesh.textures = vec![
            TextureRef { kind: TextureKind::Diffuse, index: 2 },
            TextureRef { kind: TextureKind::Diffuse, index: 0 },
            TextureRef { kind: TextureKind::Specular, index: 1 },
        ];

        assert_eq!(mesh.first_texture(TextureKind::Diffuse), Some(2));
        assert_eq!(mesh.first_texture(TextureKind::Specular), Some(1));
    }

    #[test]
    fn test_texture_table_dedup_keeps_first_index() {
        let mut table = TexturePathTable::new();
        let a = table.insert(PathBuf::from("models/a.png"));
        let b = table.insert(PathBuf::from("models/b.png"));
        let a_again = table.insert(PathBuf::from("models/a.png"));

        assert_eq!((a, b, a_again), (0, 1, 0));
        assert_eq!(table.len(), 2);
        assert_eq!(table.get(1), Some(Path::new("models/b.png")));
        assert_eq!(table.index_of(Path::new("models/a.png")), Some(0));
    }

    #[test]
    fn test_model_clear() {
        let mut table = TexturePathTable::new();
        table.insert(PathBuf::from("a.png"));
        let mut model = Model::from_parts("a.obj", vec![triangle()], table);

        assert_eq!(model.vertex_count(), 3);
        model.clear();

        assert!(model.is_empty());
        assert!(model.texture_paths().is_empty());
        assert_eq!(model.source(), Path::new(""));
    }
}

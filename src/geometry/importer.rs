/// 模型导入器
///
/// 使用 tobj crate 解析 Wavefront OBJ（及其 MTL 材质库），
/// 输出每个子网格一组扁平属性数组和模型级别的纹理路径表。
///
/// # 处理流程
///
/// ```text
/// 文件 ──tobj(合并重复顶点)──> 子网格
///     ├─ 位置：原样拷贝
///     ├─ 法线：缺失时由面重建，然后全部重新归一化
///     ├─ UV：只取通道 0，缺失时记录为 None
///     ├─ 索引：点和线段直接拒绝，多边形按扇形拆成三角形
///     └─ 材质：漫反射/高光纹理路径去重后写入路径表
/// ```
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::core::error::ImportError;

use super::mesh::{
    MeshAttributes, Model, TextureKind, TexturePathTable, TextureRef, COORDINATES_PER_VERTEX,
    TRIANGLE_VERTICES,
};
use super::normals;
use super::split;

/// 默认的子网格三角形上限
pub const DEFAULT_SPLIT_LIMIT: usize = 1_000_000;

/// 导入选项
///
/// 多边形三角化和重复顶点合并总是开启。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportOptions {
    /// 源文件没有法线时由三角形面重建
    pub generate_normals: bool,

    /// 超过该三角形数的子网格会被拆分；`None` 表示不拆分
    pub split_large_meshes: Option<usize>,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            generate_normals: true,
            split_large_meshes: Some(DEFAULT_SPLIT_LIMIT),
        }
    }
}

/// 模型导入器
#[derive(Debug, Clone, Default)]
pub struct ModelImporter {
    options: ImportOptions,
}

impl ModelImporter {
    pub fn new(options: ImportOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ImportOptions {
        &self.options
    }

    /// 支持的文件扩展名（小写，不含点号）
    pub fn supported_extensions() -> &'static [&'static str] {
        &["obj"]
    }

    /// 导入模型文件
    ///
    /// # 错误
    ///
    /// - `UnsupportedFormat`: 扩展名不受支持
    /// - `ParseFailure`: 解析器无法打开或解析文件
    /// - `NoMeshes`: 文件中没有网格
    /// - `MissingAttribute`: 某个网格缺少位置或面
    /// - `UnsupportedPrimitive`: 某个网格包含点或线段
    /// - `InvalidAttribute`: 属性数组长度不一致或索引越界
    pub fn import(&self, path: &Path) -> Result<Model, ImportError> {
        check_extension(path)?;

        // 不让 tobj 三角化：它会把点和线段变成退化三角形，图元数只能在这里检查
        let load_options = tobj::LoadOptions {
            triangulate: false,
            single_index: true, // 合并位置/法线/UV 完全相同的顶点
            ignore_points: false,
            ignore_lines: false,
            ..Default::default()
        };

        let (models, materials) = tobj::load_obj(path, &load_options)
            .map_err(|e| ImportError::ParseFailure(format!("{}: {}", path.display(), e)))?;

        if models.is_empty() {
            return Err(ImportError::NoMeshes);
        }

        let materials = match materials {
            Ok(materials) => materials,
            Err(e) => {
                warn!("Failed to load material library for {}: {}", path.display(), e);
                Vec::new()
            }
        };

        let directory = path.parent().unwrap_or(Path::new(""));
        let mut texture_paths = TexturePathTable::new();
        let mut meshes = Vec::with_capacity(models.len());

        for (index, model) in models.iter().enumerate() {
            let mut attributes = self.process_mesh(index, &model.mesh)?;

            if let Some(material) = model.mesh.material_id.and_then(|id| materials.get(id)) {
                attributes.textures = process_material(material, directory, &mut texture_paths);
            }

            match self.options.split_large_meshes {
                Some(limit) if attributes.triangle_count() > limit => {
                    let chunks = split::split_mesh(attributes, limit);
                    debug!(mesh = index, chunks = chunks.len(), "Split oversized mesh");
                    meshes.extend(chunks);
                }
                _ => meshes.push(attributes),
            }
        }

        let model = Model::from_parts(path, meshes, texture_paths);

        info!(
            "Imported {}: {} vertices, {} triangles, {} meshes, {} textures",
            path.display(),
            model.vertex_count(),
            model.triangle_count(),
            model.mesh_count(),
            model.texture_paths().len()
        );

        Ok(model)
    }

    fn process_mesh(&self, index: usize, mesh: &tobj::Mesh) -> Result<MeshAttributes, ImportError> {
        let indices = triangulate(index, &mesh.indices, &mesh.face_arities)?;

        if mesh.positions.is_empty() {
            return Err(ImportError::MissingAttribute { mesh: index, attribute: "positions" });
        }
        if indices.is_empty() {
            return Err(ImportError::MissingAttribute { mesh: index, attribute: "faces" });
        }

        let positions = mesh.positions.clone();

        // 法线重建会按索引读取位置，越界索引必须先拦下
        let vertex_count = positions.len() / COORDINATES_PER_VERTEX;
        if let Some(&bad) = indices.iter().find(|&&i| i as usize >= vertex_count) {
            return Err(ImportError::InvalidAttribute {
                mesh: index,
                reason: format!("index {} out of range for {} vertices", bad, vertex_count),
            });
        }

        let normals = if mesh.normals.len() == positions.len() {
            let mut normals = mesh.normals.clone();
            normals::normalize_all(&mut normals);
            normals
        } else if self.options.generate_normals {
            debug!(mesh = index, "Mesh has no normals, generating from faces");
            normals::generate_normals(&positions, &indices)
        } else {
            return Err(ImportError::MissingAttribute { mesh: index, attribute: "normals" });
        };

        let uv_coords = if mesh.texcoords.is_empty() {
            warn!(mesh = index, "Mesh has no UV coordinates, textures will not be sampled");
            None
        } else {
            Some(mesh.texcoords.clone())
        };

        let attributes = MeshAttributes {
            positions,
            normals,
            uv_coords,
            indices,
            textures: Vec::new(),
        };

        attributes
            .validate()
            .map_err(|reason| ImportError::InvalidAttribute { mesh: index, reason })?;

        Ok(attributes)
    }
}

/// 把面拆成三角形索引
///
/// `arities` 为空表示所有面都已经是三角形。少于 3 个顶点的面（点、线段）
/// 返回 `UnsupportedPrimitive`，多于 3 个的按 `(v0, vi, vi+1)` 扇形拆分。
fn triangulate(mesh: usize, indices: &[u32], arities: &[u32]) -> Result<Vec<u32>, ImportError> {
    if let Some(&arity) = arities.iter().find(|&&arity| (arity as usize) < TRIANGLE_VERTICES) {
        return Err(ImportError::UnsupportedPrimitive { mesh, arity });
    }

    if arities.is_empty() {
        if indices.len() % TRIANGLE_VERTICES != 0 {
            return Err(ImportError::UnsupportedPrimitive {
                mesh,
                arity: (indices.len() % TRIANGLE_VERTICES) as u32,
            });
        }
        return Ok(indices.to_vec());
    }

    let mut triangles = Vec::with_capacity(indices.len());
    let mut offset = 0;
    for &arity in arities {
        let arity = arity as usize;
        let Some(face) = indices.get(offset..offset + arity) else {
            return Err(ImportError::InvalidAttribute {
                mesh,
                reason: format!("face at index {} runs past {} indices", offset, indices.len()),
            });
        };

        for i in 1..arity - 1 {
            triangles.extend_from_slice(&[face[0], face[i], face[i + 1]]);
        }
        offset += arity;
    }

    if offset != indices.len() {
        return Err(ImportError::InvalidAttribute {
            mesh,
            reason: format!("{} indices left after the last face", indices.len() - offset),
        });
    }

    Ok(triangles)
}

/// 读取材质的漫反射和高光纹理，路径相对模型所在目录解析
fn process_material(
    material: &tobj::Material,
    directory: &Path,
    texture_paths: &mut TexturePathTable,
) -> Vec<TextureRef> {
    TextureKind::ALL
        .iter()
        .filter_map(|&kind| {
            let name = match kind {
                TextureKind::Diffuse => material.diffuse_texture.as_deref(),
                TextureKind::Specular => material.specular_texture.as_deref(),
            }?;
            let name = name.trim();
            if name.is_empty() {
                return None;
            }

            let index = texture_paths.insert(resolve_texture_path(directory, name));
            Some(TextureRef { kind, index })
        })
        .collect()
}

fn resolve_texture_path(directory: &Path, name: &str) -> PathBuf {
    directory.join(name)
}

fn check_extension(path: &Path) -> Result<(), ImportError> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .ok_or_else(|| ImportError::UnsupportedFormat(format!("{} has no extension", path.display())))?;

    if ModelImporter::supported_extensions().contains(&extension.as_str()) {
        Ok(())
    } else {
        Err(ImportError::UnsupportedFormat(format!(".{}", extension)))
    }
}

/// 使用默认选项导入模型
pub fn import(path: &Path) -> Result<Model, ImportError> {
    ModelImporter::default().import(path)
}

impl Model {
    /// 重新导入：先丢弃现有的子网格和纹理，再解析新文件
    ///
    /// 失败时模型保持为空，不会残留旧数据。
    pub fn reimport(&mut self, path: &Path, importer: &ModelImporter) -> Result<(), ImportError> {
        self.clear();
        *self = importer.import(path)?;
        Ok(())
    }
}

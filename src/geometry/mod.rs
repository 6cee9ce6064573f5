/// 几何体导入和处理模块
///
/// 提供模型导入、包围盒计算以及法线/拆分等几何后处理。
///
/// # 模块结构
///
/// - `mesh`: 子网格属性、纹理路径表和模型容器
/// - `importer`: 基于 tobj 的模型导入器
/// - `normals`: 法线重建和归一化
/// - `split`: 超大子网格拆分
/// - `bounds`: 轴对齐包围盒
///
/// # 架构设计
///
/// ```text
/// 文件 (OBJ + MTL)
///     ↓
/// ModelImporter
///     ↓
/// Model (CPU侧数据) ──> BoundingBox / PlacementTransform
///     ↓
/// ModelRenderer (上传到GPU)
/// ```
///
/// # 使用示例
///
/// ```rust,no_run
/// use mesh_viewer::geometry::{importer, BoundingBox};
/// use std::path::Path;
///
/// let model = importer::import(Path::new("model.obj"))?;
/// let bbox = BoundingBox::from_model(&model);
/// println!("中心: {:?}", bbox.center());
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```

pub mod bounds;
pub mod importer;
pub mod mesh;
pub mod normals;
pub mod split;

// 重新导出常用类型
pub use bounds::{BoundingBox, OrthoBounds};
pub use importer::{ImportOptions, ModelImporter};
pub use mesh::{MeshAttributes, MeshId, Model, TextureKind, TexturePathTable, TextureRef};

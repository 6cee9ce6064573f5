//! 模型渲染器
//!
//! 持有一个导入后的 `Model` 以及它在 GPU 上的全部资源：
//! 每个子网格一个顶点数组，模型纹理表中每个路径一张纹理。
//!
//! 顶点数组和纹理都只在加载时创建一次，之后不会扩容或替换，
//! 直到整个模型被清空重新加载。

use std::path::Path;

use tracing::{debug, info};

use crate::core::error::Result;
use crate::geometry::{MeshAttributes, Model, ModelImporter, TextureKind};

use super::backend::{DrawTarget, GpuBackend, ShaderProgram, VertexAttribute};

/// 纹理种类到采样器 uniform 名的映射，也决定了绑定顺序
const SAMPLER_UNIFORMS: [(TextureKind, &str); 2] = [
    (TextureKind::Diffuse, "u_MaterialProperty.diffuseTex"),
    (TextureKind::Specular, "u_MaterialProperty.specularTex"),
];

/// 子网格没有某种纹理时写入对应采样器的槽位，后端按白色纹理采样
pub const UNBOUND_SAMPLER: i32 = -1;

/// 某种纹理对应的采样器 uniform 名
pub fn sampler_uniform(kind: TextureKind) -> &'static str {
    SAMPLER_UNIFORMS
        .iter()
        .find(|(k, _)| *k == kind)
        .map(|(_, name)| *name)
        .unwrap_or_default()
}

/// 模型渲染器
pub struct ModelRenderer<B: GpuBackend> {
    model: Model,

    /// 下标即 `MeshId`
    vertex_arrays: Vec<B::VertexArray>,

    /// 下标即纹理路径表中的索引
    textures: Vec<B::Texture>,
}

impl<B: GpuBackend> ModelRenderer<B> {
    /// 创建空的渲染器
    pub fn new() -> Self {
        Self {
            model: Model::new(),
            vertex_arrays: Vec::new(),
            textures: Vec::new(),
        }
    }

    /// 导入文件并创建渲染器
    pub fn from_file(backend: &mut B, path: &Path, importer: &ModelImporter) -> Result<Self> {
        let mut renderer = Self::new();
        renderer.load(backend, path, importer)?;
        Ok(renderer)
    }

    /// 为已经导入的模型创建渲染器
    pub fn from_model(backend: &mut B, model: Model) -> Result<Self> {
        let mut renderer = Self::new();
        renderer.stage(backend, model)?;
        Ok(renderer)
    }

    /// 导入模型并把全部子网格和纹理上传到 GPU
    ///
    /// 失败时渲染器保持为空：没有子网格，也没有任何 GPU 资源。
    pub fn load(&mut self, backend: &mut B, path: &Path, importer: &ModelImporter) -> Result<()> {
        self.clear();
        let model = importer.import(path)?;
        self.stage(backend, model)
    }

    /// 释放现有的模型和 GPU 资源后重新加载
    ///
    /// 清理由 `load` 完成。
    pub fn reload(&mut self, backend: &mut B, path: &Path, importer: &ModelImporter) -> Result<()> {
        debug!("Reloading {} as {}", self.model.source().display(), path.display());
        self.load(backend, path, importer)
    }

    /// 丢弃模型和全部 GPU 资源
    pub fn clear(&mut self) {
        self.vertex_arrays.clear();
        self.textures.clear();
        self.model.clear();
    }

    /// 只读访问底层模型
    pub fn model(&self) -> &Model {
        &self.model
    }

    pub fn is_loaded(&self) -> bool {
        !self.model.is_empty()
    }

    pub fn vertex_arrays(&self) -> &[B::VertexArray] {
        &self.vertex_arrays
    }

    pub fn textures(&self) -> &[B::Texture] {
        &self.textures
    }

    fn stage(&mut self, backend: &mut B, model: Model) -> Result<()> {
        let mut vertex_arrays = Vec::with_capacity(model.mesh_count());
        for (id, mesh) in model.meshes().iter().enumerate() {
            vertex_arrays.push(stage_mesh(backend, id, mesh)?);
        }

        // 按路径表顺序上传，纹理下标与路径表下标一致
        let mut textures = Vec::with_capacity(model.texture_paths().len());
        for path in model.texture_paths().iter() {
            debug!("Uploading texture {}", path.display());
            textures.push(backend.upload_texture(path)?);
        }

        info!(
            "Staged {}: {} vertex arrays, {} textures",
            model.source().display(),
            vertex_arrays.len(),
            textures.len()
        );

        self.model = model;
        self.vertex_arrays = vertex_arrays;
        self.textures = textures;
        Ok(())
    }

    /// 按子网格 id 升序绘制
    ///
    /// 每个子网格先绑定自己的纹理（每种最多一张），再提交绘制。
    /// 子网格缺少的纹理种类，采样器 uniform 设为 [`UNBOUND_SAMPLER`]，
    /// 不沿用上一个子网格留下的槽位。没有 UV 的子网格不绑定纹理。
    pub fn draw<T: DrawTarget<B>>(&self, target: &mut T, shader: &mut T::Shader) {
        for (mesh, vertex_array) in self.model.meshes().iter().zip(&self.vertex_arrays) {
            if mesh.has_uv_coords() {
                self.bind_mesh_textures(mesh, target, shader, 0);
            }
            target.draw(vertex_array, shader);
        }
    }

    /// 从 `slot` 开始依次绑定子网格的纹理，返回下一个空闲槽位
    fn bind_mesh_textures<T: DrawTarget<B>>(
        &self,
        mesh: &MeshAttributes,
        target: &mut T,
        shader: &mut T::Shader,
        mut slot: u32,
    ) -> u32 {
        for (kind, uniform) in SAMPLER_UNIFORMS {
            let Some(texture) = mesh.first_texture(kind).and_then(|index| self.textures.get(index)) else {
                shader.set_uniform_i32(uniform, UNBOUND_SAMPLER);
                continue;
            };

            target.bind_texture(texture, slot);
            shader.set_uniform_i32(uniform, slot as i32);
            slot += 1;
        }
        slot
    }
}

impl<B: GpuBackend> Default for ModelRenderer<B> {
    fn default() -> Self {
        Self::new()
    }
}

fn stage_mesh<B: GpuBackend>(backend: &mut B, id: usize, mesh: &MeshAttributes) -> Result<B::VertexArray> {
    let mut vertex_array = backend.create_vertex_array(id)?;

    backend.create_vertex_buffer(&mut vertex_array, VertexAttribute::Position, &mesh.positions)?;
    backend.create_vertex_buffer(&mut vertex_array, VertexAttribute::Normal, &mesh.normals)?;
    if let Some(uv_coords) = mesh.uv_coords() {
        backend.create_vertex_buffer(&mut vertex_array, VertexAttribute::TexCoord, uv_coords)?;
    }
    backend.create_index_buffer(&mut vertex_array, &mesh.indices)?;

    Ok(vertex_array)
}

//! GPU 协作接口
//!
//! `ModelRenderer` 不直接调用任何图形 API，而是通过这里的三个 trait 与 GPU 交互：
//!
//! - `GpuBackend`：创建顶点数组、顶点缓冲、索引缓冲并上传纹理
//! - `ShaderProgram`：按名字设置 uniform
//! - `DrawTarget`：一帧之内绑定纹理并提交绘制
//!
//! 具体实现在 `gfx::wgpu` 中；测试使用记录调用的模拟实现。

use std::path::Path;

use crate::core::error::Result;
use crate::core::math::Matrix4;
use crate::geometry::MeshId;

/// 顶点属性种类
///
/// 每种属性占用独立的顶点缓冲，`location` 与着色器中的 `@location` 对应。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VertexAttribute {
    Position,
    Normal,
    TexCoord,
}

impl VertexAttribute {
    pub const ALL: [VertexAttribute; 3] = [
        VertexAttribute::Position,
        VertexAttribute::Normal,
        VertexAttribute::TexCoord,
    ];

    /// 着色器输入位置
    pub fn location(self) -> u32 {
        match self {
            VertexAttribute::Position => 0,
            VertexAttribute::Normal => 1,
            VertexAttribute::TexCoord => 2,
        }
    }

    /// 每个顶点的分量数
    pub fn components(self) -> usize {
        match self {
            VertexAttribute::Position | VertexAttribute::Normal => 3,
            VertexAttribute::TexCoord => 2,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            VertexAttribute::Position => "position",
            VertexAttribute::Normal => "normal",
            VertexAttribute::TexCoord => "texcoord",
        }
    }
}

/// GPU 资源工厂
///
/// 创建出的资源归调用方独占，释放即销毁，不做引用计数共享。
pub trait GpuBackend {
    /// 一个子网格的顶点数组（各属性顶点缓冲 + 索引缓冲）
    type VertexArray;

    /// 已上传的纹理
    type Texture;

    /// 为子网格创建空的顶点数组
    fn create_vertex_array(&mut self, mesh: MeshId) -> Result<Self::VertexArray>;

    /// 创建顶点缓冲并挂到顶点数组上
    fn create_vertex_buffer(
        &mut self,
        vertex_array: &mut Self::VertexArray,
        attribute: VertexAttribute,
        data: &[f32],
    ) -> Result<()>;

    /// 创建索引缓冲并挂到顶点数组上
    fn create_index_buffer(&mut self, vertex_array: &mut Self::VertexArray, indices: &[u32]) -> Result<()>;

    /// 解码并上传纹理
    fn upload_texture(&mut self, path: &Path) -> Result<Self::Texture>;
}

/// 着色器程序的 uniform 接口
pub trait ShaderProgram {
    fn set_uniform_i32(&mut self, name: &str, value: i32);

    fn set_uniform_vec3(&mut self, name: &str, value: [f32; 3]);

    fn set_uniform_mat4(&mut self, name: &str, value: &Matrix4);
}

/// 绘制目标
///
/// 纹理绑定在槽位上一直有效，直到被覆盖。
pub trait DrawTarget<B: GpuBackend> {
    type Shader: ShaderProgram;

    fn bind_texture(&mut self, texture: &B::Texture, slot: u32);

    /// 以着色器当前的 uniform 值绘制整个顶点数组
    fn draw(&mut self, vertex_array: &B::VertexArray, shader: &Self::Shader);
}

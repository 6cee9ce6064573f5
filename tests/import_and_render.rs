//! 导入 + 渲染集成测试
//!
//! 在临时目录中写出 OBJ/MTL 文件，经 `ModelRenderer` 导入，
//! 用记录调用的后端检查上传和绘制顺序。

use std::path::{Path, PathBuf};

use mesh_viewer::core::error::{ImportError, Result, ViewerError};
use mesh_viewer::core::{Matrix4, Vector3};
use mesh_viewer::geometry::{BoundingBox, ImportOptions, ModelImporter, TextureKind};
use mesh_viewer::renderer::{sampler_uniform, DrawTarget, GpuBackend, ModelRenderer, ShaderProgram, VertexAttribute};

const TRIANGLE_OBJ: &str = "\
v 0 0 0
v 1 0 0
v 0 1 0
f 1 2 3
";

const SHARED_MATERIAL_OBJ: &str = "\
mtllib shared.mtl
o first
v 0 0 0
v 1 0 0
v 0 1 0
vt 0 0
vt 1 0
vt 0 1
vn 0 0 1
usemtl skin
f 1/1/1 2/2/1 3/3/1
o second
v 0 0 1
v 1 0 1
v 0 1 1
usemtl skin
f 4/1/1 5/2/1 6/3/1
";

const SHARED_MTL: &str = "\
newmtl skin
map_Kd skin.png
map_Ks skin_spec.png
";

const UNTEXTURED_OBJ: &str = "\
mtllib shared.mtl
v 0 0 0
v 2 0 0
v 0 2 0
usemtl skin
f 1 2 3
";

const QUAD_OBJ: &str = "\
v 0 0 0
v 1 0 0
v 1 1 0
v 0 1 0
f 1 2 3 4
";

const LINE_OBJ: &str = "\
v 0 0 0
v 1 0 0
v 0 1 0
f 1 2 3
l 1 2
";

const POINTS_OBJ: &str = "\
v 0 0 0
v 1 0 0
p 1 2
";

const SCALED_NORMALS_OBJ: &str = "\
v 0 0 0
v 1 0 0
v 0 1 0
vn 0 0 5
f 1//1 2//1 3//1
";

const VERTICES_ONLY_OBJ: &str = "\
# exported without faces
v 0 0 0
v 1 0 0
";

fn temp_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("mesh_viewer_test_{name}"));
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

fn write(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, contents).unwrap();
    path
}

#[derive(Default)]
struct RecordingBackend {
    uploaded: Vec<PathBuf>,
    vertex_arrays: usize,
}

#[derive(Debug)]
struct RecordedVertexArray {
    mesh: usize,
    attributes: Vec<(VertexAttribute, usize)>,
    indices: Vec<u32>,
}

impl GpuBackend for RecordingBackend {
    type VertexArray = RecordedVertexArray;
    type Texture = PathBuf;

    fn create_vertex_array(&mut self, mesh: usize) -> Result<RecordedVertexArray> {
        self.vertex_arrays += 1;
        Ok(RecordedVertexArray {
            mesh,
            attributes: Vec::new(),
            indices: Vec::new(),
        })
    }

    fn create_vertex_buffer(
        &mut self,
        vertex_array: &mut RecordedVertexArray,
        attribute: VertexAttribute,
        data: &[f32],
    ) -> Result<()> {
        vertex_array.attributes.push((attribute, data.len()));
        Ok(())
    }

    fn create_index_buffer(&mut self, vertex_array: &mut RecordedVertexArray, indices: &[u32]) -> Result<()> {
        vertex_array.indices = indices.to_vec();
        Ok(())
    }

    fn upload_texture(&mut self, path: &Path) -> Result<PathBuf> {
        self.uploaded.push(path.to_path_buf());
        Ok(path.to_path_buf())
    }
}

#[derive(Default)]
struct RecordingShader {
    integers: Vec<(String, i32)>,
}

impl ShaderProgram for RecordingShader {
    fn set_uniform_i32(&mut self, name: &str, value: i32) {
        self.integers.push((name.to_string(), value));
    }

    fn set_uniform_vec3(&mut self, _name: &str, _value: [f32; 3]) {}

    fn set_uniform_mat4(&mut self, _name: &str, _value: &Matrix4) {}
}

#[derive(Debug, PartialEq)]
enum Call {
    Bind(String, u32),
    Draw(usize),
}

#[derive(Default)]
struct RecordingTarget {
    calls: Vec<Call>,
}

impl DrawTarget<RecordingBackend> for RecordingTarget {
    type Shader = RecordingShader;

    fn bind_texture(&mut self, texture: &PathBuf, slot: u32) {
        let name = texture.file_name().unwrap().to_string_lossy().into_owned();
        self.calls.push(Call::Bind(name, slot));
    }

    fn draw(&mut self, vertex_array: &RecordedVertexArray, _shader: &RecordingShader) {
        self.calls.push(Call::Draw(vertex_array.mesh));
    }
}

#[test]
fn single_triangle_imports_and_stages() {
    let dir = temp_dir("single_triangle");
    let path = write(&dir, "triangle.obj", TRIANGLE_OBJ);
    let mut backend = RecordingBackend::default();

    let renderer = ModelRenderer::from_file(&mut backend, &path, &ModelImporter::default()).unwrap();

    let model = renderer.model();
    assert_eq!(model.mesh_count(), 1);
    let mesh = model.mesh(0).unwrap();
    assert_eq!(mesh.positions.len(), 9);
    assert_eq!(mesh.indices, vec![0, 1, 2]);
    assert!(mesh.uv_coords.is_none());
    assert!(mesh.textures.is_empty());
    assert!(model.texture_paths().is_empty());

    let vertex_array = &renderer.vertex_arrays()[0];
    assert_eq!(
        vertex_array.attributes,
        vec![(VertexAttribute::Position, 9), (VertexAttribute::Normal, 9)]
    );
    assert_eq!(vertex_array.indices, vec![0, 1, 2]);
    assert!(backend.uploaded.is_empty());

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn generated_normals_have_unit_length() {
    let dir = temp_dir("unit_normals");
    let path = write(&dir, "triangle.obj", TRIANGLE_OBJ);

    let model = ModelImporter::default().import(&path).unwrap();

    for normal in model.mesh(0).unwrap().normals.chunks_exact(3) {
        let length = (normal[0] * normal[0] + normal[1] * normal[1] + normal[2] * normal[2]).sqrt();
        assert!((length - 1.0).abs() < 1e-5, "normal {:?} has length {}", normal, length);
        assert!((normal[2] - 1.0).abs() < 1e-5);
    }

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn supplied_normals_are_renormalized() {
    let dir = temp_dir("scaled_normals");
    let path = write(&dir, "scaled.obj", SCALED_NORMALS_OBJ);

    let model = ModelImporter::default().import(&path).unwrap();

    let mesh = model.mesh(0).unwrap();
    assert_eq!(mesh.normals.len(), 9);
    for normal in mesh.normals.chunks_exact(3) {
        assert!((normal[0]).abs() < 1e-6);
        assert!((normal[1]).abs() < 1e-6);
        assert!((normal[2] - 1.0).abs() < 1e-6, "normal {:?} is not unit length", normal);
    }

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn quad_faces_are_split_into_triangles() {
    let dir = temp_dir("quad");
    let path = write(&dir, "quad.obj", QUAD_OBJ);

    let model = ModelImporter::default().import(&path).unwrap();

    let mesh = model.mesh(0).unwrap();
    assert_eq!(mesh.vertex_count(), 4);
    assert_eq!(mesh.indices, vec![0, 1, 2, 0, 2, 3]);

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn line_elements_are_rejected() {
    let dir = temp_dir("line");
    let path = write(&dir, "line.obj", LINE_OBJ);

    let result = ModelImporter::default().import(&path);

    assert!(matches!(
        result,
        Err(ImportError::UnsupportedPrimitive { mesh: 0, arity: 2 })
    ));

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn point_elements_are_rejected() {
    let dir = temp_dir("points");
    let path = write(&dir, "points.obj", POINTS_OBJ);
    let mut backend = RecordingBackend::default();

    let result = ModelRenderer::from_file(&mut backend, &path, &ModelImporter::default());

    assert!(matches!(
        result,
        Err(ViewerError::Import(ImportError::UnsupportedPrimitive { mesh: 0, arity: 1 }))
    ));
    assert_eq!(backend.vertex_arrays, 0);

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn file_without_faces_has_no_meshes() {
    let dir = temp_dir("no_meshes");
    let path = write(&dir, "empty.obj", VERTICES_ONLY_OBJ);

    let result = ModelImporter::default().import(&path);

    assert!(matches!(result, Err(ImportError::NoMeshes)));

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn missing_normals_fail_without_generation() {
    let dir = temp_dir("missing_normals");
    let path = write(&dir, "triangle.obj", TRIANGLE_OBJ);
    let importer = ModelImporter::new(ImportOptions {
        generate_normals: false,
        ..Default::default()
    });

    let result = importer.import(&path);

    assert!(matches!(
        result,
        Err(ImportError::MissingAttribute { mesh: 0, attribute: "normals" })
    ));

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn oversized_mesh_is_split_on_import() {
    let dir = temp_dir("split");
    let path = write(&dir, "quad.obj", QUAD_OBJ);
    let importer = ModelImporter::new(ImportOptions {
        split_large_meshes: Some(1),
        ..Default::default()
    });

    let model = importer.import(&path).unwrap();

    assert_eq!(model.mesh_count(), 2);
    assert_eq!(model.triangle_count(), 2);
    for mesh in model.meshes() {
        assert_eq!(mesh.indices, vec![0, 1, 2]);
        assert_eq!(mesh.vertex_count(), 3);
        assert_eq!(mesh.normals.len(), 9);
    }

    let unsplit = ModelImporter::new(ImportOptions {
        split_large_meshes: None,
        ..Default::default()
    })
    .import(&path)
    .unwrap();
    assert_eq!(unsplit.mesh_count(), 1);

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn unreadable_file_leaves_renderer_empty() {
    let dir = temp_dir("unreadable");
    let mut backend = RecordingBackend::default();

    let result = ModelRenderer::from_file(&mut backend, &dir.join("missing.obj"), &ModelImporter::default());

    assert!(matches!(result, Err(ViewerError::Import(ImportError::ParseFailure(_)))));
    assert_eq!(backend.vertex_arrays, 0);
    assert!(backend.uploaded.is_empty());

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn textures_shared_by_meshes_are_uploaded_once() {
    let dir = temp_dir("shared_texture");
    write(&dir, "shared.mtl", SHARED_MTL);
    let path = write(&dir, "model.obj", SHARED_MATERIAL_OBJ);
    let mut backend = RecordingBackend::default();

    let renderer = ModelRenderer::from_file(&mut backend, &path, &ModelImporter::default()).unwrap();

    let model = renderer.model();
    assert_eq!(model.mesh_count(), 2);
    assert_eq!(model.texture_paths().len(), 2);
    assert_eq!(model.texture_path(0), Some(dir.join("skin.png").as_path()));
    assert_eq!(model.texture_path(1), Some(dir.join("skin_spec.png").as_path()));
    assert_eq!(backend.uploaded, vec![dir.join("skin.png"), dir.join("skin_spec.png")]);

    for mesh in model.meshes() {
        assert_eq!(mesh.first_texture(TextureKind::Diffuse), Some(0));
        assert_eq!(mesh.first_texture(TextureKind::Specular), Some(1));
    }

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn draw_binds_textures_before_each_mesh() {
    let dir = temp_dir("draw_order");
    write(&dir, "shared.mtl", SHARED_MTL);
    let path = write(&dir, "model.obj", SHARED_MATERIAL_OBJ);
    let mut backend = RecordingBackend::default();
    let renderer = ModelRenderer::from_file(&mut backend, &path, &ModelImporter::default()).unwrap();

    let mut target = RecordingTarget::default();
    let mut shader = RecordingShader::default();
    renderer.draw(&mut target, &mut shader);

    let per_mesh = |mesh| {
        vec![
            Call::Bind("skin.png".to_string(), 0),
            Call::Bind("skin_spec.png".to_string(), 1),
            Call::Draw(mesh),
        ]
    };
    let expected: Vec<Call> = per_mesh(0).into_iter().chain(per_mesh(1)).collect();
    assert_eq!(target.calls, expected);

    let diffuse = sampler_uniform(TextureKind::Diffuse).to_string();
    let specular = sampler_uniform(TextureKind::Specular).to_string();
    assert_eq!(
        shader.integers,
        vec![(diffuse.clone(), 0), (specular.clone(), 1), (diffuse, 0), (specular, 1)]
    );

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn mesh_without_uv_skips_texture_binding() {
    let dir = temp_dir("no_uv");
    write(&dir, "shared.mtl", SHARED_MTL);
    let path = write(&dir, "plain.obj", UNTEXTURED_OBJ);
    let mut backend = RecordingBackend::default();
    let renderer = ModelRenderer::from_file(&mut backend, &path, &ModelImporter::default()).unwrap();

    let mesh = renderer.model().mesh(0).unwrap();
    assert!(!mesh.has_uv_coords());
    assert!(!mesh.textures.is_empty());

    let mut target = RecordingTarget::default();
    let mut shader = RecordingShader::default();
    renderer.draw(&mut target, &mut shader);

    assert_eq!(target.calls, vec![Call::Draw(0)]);
    assert!(shader.integers.is_empty());

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn failed_reload_clears_previous_model() {
    let dir = temp_dir("failed_reload");
    let path = write(&dir, "triangle.obj", TRIANGLE_OBJ);
    let importer = ModelImporter::default();
    let mut backend = RecordingBackend::default();
    let mut renderer = ModelRenderer::from_file(&mut backend, &path, &importer).unwrap();
    assert!(renderer.is_loaded());

    let result = renderer.reload(&mut backend, &dir.join("gone.obj"), &importer);

    assert!(result.is_err());
    assert!(!renderer.is_loaded());
    assert!(renderer.vertex_arrays().is_empty());
    assert!(renderer.textures().is_empty());

    let mut target = RecordingTarget::default();
    renderer.draw(&mut target, &mut RecordingShader::default());
    assert!(target.calls.is_empty());

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn bounds_cover_imported_model() {
    let dir = temp_dir("bounds");
    write(&dir, "shared.mtl", SHARED_MTL);
    let path = write(&dir, "model.obj", SHARED_MATERIAL_OBJ);

    let model = ModelImporter::default().import(&path).unwrap();
    let bbox = BoundingBox::from_model(&model);

    assert_eq!(bbox.min, Vector3::new(0.0, 0.0, 0.0));
    assert_eq!(bbox.max, Vector3::new(1.0, 1.0, 1.0));
    assert_eq!(bbox.center(), Vector3::new(0.5, 0.5, 0.5));

    let _ = std::fs::remove_dir_all(&dir);
}

//! wgpu 场景渲染器
//!
//! 加载主体、地面和光源三个模型，由包围盒推导它们的摆放，
//! 每帧更新相机和光照 uniform，依次绘制三个模型并叠加 GUI。

use std::path::Path;

use tracing::{debug, info, warn};
use winit::event_loop::EventLoop;

use crate::component::{
    support_offset, Component, DirectionalLight, LightingUniforms, OrbitCamera, PlacementTransform,
    PointLight,
};
use crate::core::error::{GraphicsError, Result};
use crate::core::math::{Matrix4, Vector3};
use crate::core::{Config, SceneConfig};
use crate::geometry::{BoundingBox, ModelImporter};
use crate::gui::{GuiManager, GuiState};
use crate::renderer::{ModelRenderer, ShaderProgram};

use super::backend::WgpuBackend;
use super::context::WgpuContext;
use super::frame::{FrameTarget, WgpuFrame};
use super::shader::{ShaderLayouts, TargetFormat, WgpuShader};

/// 场景中的一个模型：GPU 资源、局部包围盒和摆放
struct SceneModel {
    renderer: ModelRenderer<WgpuBackend>,
    bounds: BoundingBox,
    placement: PlacementTransform,
}

impl SceneModel {
    fn load(backend: &mut WgpuBackend, importer: &ModelImporter, path: &str) -> Result<Self> {
        let renderer = ModelRenderer::from_file(backend, Path::new(path), importer)?;
        let bounds = BoundingBox::from_model(renderer.model());
        debug!("{} bounds: {:?}", path, bounds);

        Ok(Self {
            placement: PlacementTransform::new(&bounds, &bounds),
            renderer,
            bounds,
        })
    }
}

/// wgpu 场景渲染器
pub struct Renderer {
    context: WgpuContext,
    backend: WgpuBackend,
    layouts: ShaderLayouts,
    model_shader: WgpuShader,
    light_shader: WgpuShader,

    object: SceneModel,
    ground: SceneModel,
    light: SceneModel,

    camera: OrbitCamera,
    sky: DirectionalLight,
    point: PointLight,

    /// 光源模型局部包围盒的中心
    light_origin: Vector3,

    clear_color: wgpu::Color,
    gui_manager: GuiManager,
}

impl Renderer {
    pub fn new(event_loop: &EventLoop<()>, config: &Config, scene: &SceneConfig) -> Result<Self> {
        info!("Creating wgpu renderer");

        let context = WgpuContext::new(event_loop, config)?;
        let mut backend = WgpuBackend::new(&context);
        let layouts = ShaderLayouts::new(&backend);

        let target = TargetFormat {
            color: context.surface_config.format,
            sample_count: context.sample_count,
        };
        let model_shader = WgpuShader::model(&context.device, &layouts, target);
        let light_shader = WgpuShader::light(&context.device, &layouts, target);

        let importer = ModelImporter::default();
        let mut object = SceneModel::load(&mut backend, &importer, &scene.models.object)?;
        let mut ground = SceneModel::load(&mut backend, &importer, &scene.models.ground)?;
        let mut light = SceneModel::load(&mut backend, &importer, &scene.models.light)?;

        // 所有模型共用并集包围盒作为参考
        let union = BoundingBox::union(&[light.bounds, object.bounds, ground.bounds]);
        for model in [&mut object, &mut ground, &mut light] {
            model.placement = PlacementTransform::new(&union, &model.bounds);
        }
        info!("Scene bounds: {:?} .. {:?}", union.min, union.max);

        object.placement.set_uniform_scale(scene.placement.object_scale);
        light.placement.translation = Vector3::from(scene.placement.light_translation);
        light.placement.set_uniform_scale(scene.placement.light_scale);

        let camera = OrbitCamera::new("MainCamera", union.center(), &scene.camera);
        let sky = DirectionalLight::from_config("SkyLight", &scene.directional_light);
        let point = PointLight::from_config("PointLight", &scene.point_light);
        let light_origin = light.bounds.center();

        let gui_manager = GuiManager::new(
            &context.device,
            context.surface_config.format,
            context.window(),
            GuiState::new(scene),
        );

        let [r, g, b, a] = scene.clear_color.map(f64::from);

        info!("wgpu renderer created successfully");

        Ok(Self {
            context,
            backend,
            layouts,
            model_shader,
            light_shader,
            object,
            ground,
            light,
            camera,
            sky,
            point,
            light_origin,
            clear_color: wgpu::Color { r, g, b, a },
            gui_manager,
        })
    }

    /// 把 GUI 状态写回场景，并推进相机
    pub fn update(&mut self, delta_time: f32) {
        let state = self.gui_manager.state();

        self.camera.fov_degrees = state.fov;
        self.camera.view_translate = Vector3::from(state.view_translate);
        self.sky.enabled = state.sky_light;
        self.light.placement.translation = Vector3::from(state.light_translation);
        self.point.color = state.light_color.into();

        self.object.placement.set_uniform_scale(state.object_scale);
        self.ground.placement.scale = self.object.placement.scale;
        self.ground.placement.translation =
            support_offset(&self.object.bounds, &self.ground.bounds, self.object.placement.scale.y);

        self.point.position = self.light.placement.transform_point(&self.light_origin);

        self.camera.tick(delta_time);
    }

    /// 记录场景绘制命令
    fn record_scene(&mut self) -> WgpuFrame {
        let view_proj = self.camera.view_proj(self.context.aspect_ratio());
        let mut frame = WgpuFrame::new();

        LightingUniforms {
            sky: &self.sky,
            point: &self.point,
            view_position: self.camera.position(),
        }
        .apply(&mut self.model_shader);

        for model in [&self.object, &self.ground] {
            let model_matrix = model.placement.matrix();
            set_transform(&mut self.model_shader, &model_matrix, &view_proj);
            model.renderer.draw(&mut frame, &mut self.model_shader);
        }

        set_transform(&mut self.light_shader, &self.light.placement.matrix(), &view_proj);
        self.light_shader
            .set_uniform_vec3("u_LightColor", self.point.color.to_array());
        self.light.renderer.draw(&mut frame, &mut self.light_shader);

        frame
    }

    /// 绘制一帧
    pub fn draw(&mut self) -> Result<()> {
        let output = match self.context.surface.get_current_texture() {
            Ok(output) => output,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                debug!("Surface lost or outdated, reconfiguring");
                self.context.reconfigure();
                return Ok(());
            }
            Err(wgpu::SurfaceError::Timeout) => {
                warn!("Timed out acquiring surface texture, frame skipped");
                return Ok(());
            }
            Err(e) => {
                return Err(GraphicsError::SwapchainError(format!("Failed to acquire next image: {}", e)).into());
            }
        };
        let view = output.texture.create_view(&wgpu::TextureViewDescriptor::default());

        let delta_time = self.gui_manager.record_frame();
        self.update(delta_time);
        let frame = self.record_scene();

        let mut encoder = self.context.device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("Render Encoder"),
        });

        let (color, resolve) = match self.context.msaa_view() {
            Some(msaa) => (msaa, Some(&view)),
            None => (&view, None),
        };
        frame.submit(
            &self.context.device,
            &mut encoder,
            &self.layouts,
            FrameTarget {
                color,
                resolve,
                depth: self.context.depth_view(),
                clear_color: self.clear_color,
            },
        );

        let gui_commands = self.gui_manager.render(
            &self.context.device,
            &self.context.queue,
            &mut encoder,
            &view,
            self.context.window(),
        );

        self.context
            .queue
            .submit(gui_commands.into_iter().chain(std::iter::once(encoder.finish())));
        output.present();

        Ok(())
    }

    /// 处理窗口大小调整
    pub fn resize(&mut self) {
        let size = self.context.window().inner_size();
        self.context.resize(size.width, size.height);
    }

    /// 处理 GUI 事件，返回 true 表示事件被 GUI 消费
    pub fn handle_gui_event(&mut self, event: &winit::event::WindowEvent) -> bool {
        self.gui_manager.handle_event(self.context.window(), event)
    }

    pub fn window(&self) -> &winit::window::Window {
        self.context.window()
    }

    /// 重新加载主体模型，失败时保留为空模型并返回错误
    pub fn reload_object(&mut self, path: &Path) -> Result<()> {
        let importer = ModelImporter::default();
        self.object.renderer.reload(&mut self.backend, path, &importer)?;
        self.object.bounds = BoundingBox::from_model(self.object.renderer.model());

        let union = BoundingBox::union(&[self.light.bounds, self.object.bounds, self.ground.bounds]);
        let scale = self.object.placement.scale;
        self.object.placement = PlacementTransform::new(&union, &self.object.bounds);
        self.object.placement.scale = scale;
        self.camera.set_target(union.center());
        Ok(())
    }
}

fn set_transform(shader: &mut WgpuShader, model: &Matrix4, view_proj: &Matrix4) {
    shader.set_uniform_mat4("u_Model", model);
    shader.set_uniform_mat4("u_MVP", &(view_proj * model));
}

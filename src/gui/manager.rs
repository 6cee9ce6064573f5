//! GUI 管理器
//!
//! 把 egui 接到 winit 事件和 wgpu 渲染上：每帧先构建调节面板，
//! 再把生成的图元叠加绘制到已经渲染好场景的表面纹理上。
//! 按 F1 可以隐藏或显示面板。

use egui_wgpu::ScreenDescriptor;
use egui_wgpu::Renderer as EguiRenderer;
use egui_winit::State as EguiState;
use winit::window::Window;

use crate::gui::metrics::PerformanceMetrics;
use crate::gui::panels;
use crate::gui::state::GuiState;

/// GUI 管理器
pub struct GuiManager {
    context: egui::Context,
    state: EguiState,
    renderer: EguiRenderer,

    gui_state: GuiState,
    metrics: PerformanceMetrics,
    visible: bool,
}

impl GuiManager {
    /// `surface_format` 必须与 GUI 叠加绘制的目标纹理一致（单采样）
    pub fn new(
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
        window: &Window,
        gui_state: GuiState,
    ) -> Self {
        let context = egui::Context::default();
        let state = EguiState::new(
            context.clone(),
            egui::ViewportId::ROOT,
            window,
            Some(window.scale_factor() as f32),
            None,
        );

        Self {
            context,
            state,
            renderer: EguiRenderer::new(device, surface_format, None, 1),
            gui_state,
            metrics: PerformanceMetrics::new(),
            visible: true,
        }
    }

    /// 把窗口事件交给 egui，返回 true 表示指针或键盘被面板占用
    pub fn handle_event(&mut self, window: &Window, event: &winit::event::WindowEvent) -> bool {
        let response = self.state.on_window_event(window, event);
        self.visible && response.consumed
    }

    /// 记录一帧并返回距上一帧的秒数
    pub fn record_frame(&mut self) -> f32 {
        let delta = self.metrics.record_frame();
        self.gui_state
            .update_performance(self.metrics.fps(), self.metrics.frame_time_ms());
        delta
    }

    /// 构建面板并叠加绘制到 `view`
    ///
    /// 返回 egui 回调产生的命令缓冲，需要先于 `encoder` 提交。
    pub fn render(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        encoder: &mut wgpu::CommandEncoder,
        view: &wgpu::TextureView,
        window: &Window,
    ) -> Vec<wgpu::CommandBuffer> {
        let raw_input = self.state.take_egui_input(window);
        let visible = &mut self.visible;
        let gui_state = &mut self.gui_state;
        let output = self.context.run(raw_input, |ctx| {
            if ctx.input(|i| i.key_pressed(egui::Key::F1)) {
                *visible = !*visible;
            }
            if *visible {
                build_panel(ctx, gui_state);
            }
        });
        self.gui_state.clamp();
        self.state.handle_platform_output(window, output.platform_output);

        let size = window.inner_size();
        let screen = ScreenDescriptor {
            size_in_pixels: [size.width, size.height],
            pixels_per_point: output.pixels_per_point,
        };
        let primitives = self.context.tessellate(output.shapes, output.pixels_per_point);

        for (id, delta) in &output.textures_delta.set {
            self.renderer.update_texture(device, queue, *id, delta);
        }
        let command_buffers = self.renderer.update_buffers(device, queue, encoder, &primitives, &screen);

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("GUI Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Load,
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            self.renderer.render(&mut pass, &primitives, &screen);
        }

        for id in &output.textures_delta.free {
            self.renderer.free_texture(id);
        }

        command_buffers
    }

    pub fn state(&self) -> &GuiState {
        &self.gui_state
    }
}

fn build_panel(ctx: &egui::Context, gui_state: &mut GuiState) {
    egui::SidePanel::left("control_panel")
        .default_width(280.0)
        .resizable(true)
        .show(ctx, |ui| {
            ui.heading("Mesh Viewer");
            ui.label("F1: hide panel");
            ui.separator();

            egui::ScrollArea::vertical().show(ui, |ui| {
                panels::performance::render(ui, gui_state);
                ui.separator();
                panels::scene::render(ui, gui_state);
                ui.separator();
                panels::lighting::render(ui, gui_state);
            });
        });
}

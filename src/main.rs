//! Mesh Viewer - 模型查看器
//!
//! 加载主体、地面和光源三个 OBJ 模型，按包围盒自动摆放，
//! 以环绕相机和 Phong 光照实时绘制，并提供 egui 调节面板。
//!
//! # 使用方法
//!
//! ```bash
//! # 使用 config.toml 和 scene.toml
//! cargo run
//!
//! # 命令行覆盖窗口尺寸、关闭垂直同步
//! cargo run -- --width 1600 --height 900 --no-vsync
//! ```
//!
//! 把 OBJ 文件拖进窗口可以替换主体模型。

use anyhow::Context;
use tracing::{debug, error, info};
use winit::event::{Event, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};

use mesh_viewer::core::{log, Config, SceneConfig};
use mesh_viewer::gfx::wgpu::Renderer;

/// 应用程序入口点
///
/// # 初始化流程
///
/// 1. 加载配置文件（config.toml）并应用命令行参数
/// 2. 初始化日志系统
/// 3. 加载场景配置文件（scene.toml）
/// 4. 创建事件循环和渲染器
/// 5. 启动主循环
fn main() -> anyhow::Result<()> {
    let mut config = Config::from_file_or_default("config.toml");
    config.apply_args(std::env::args());
    config.validate().context("Invalid configuration")?;

    let log_file = config
        .logging
        .file_output
        .then_some(config.logging.log_file.as_str());
    log::init_logger(config.logging.level, config.logging.file_output, log_file);
    info!(version = env!("CARGO_PKG_VERSION"), "Mesh Viewer starting...");

    let scene = SceneConfig::from_file_or_default("scene.toml");

    info!(
        width = config.window.width,
        height = config.window.height,
        vsync = config.graphics.vsync,
        msaa = config.graphics.msaa_samples,
        "Graphics configuration"
    );
    info!(
        object = %scene.models.object,
        ground = %scene.models.ground,
        light = %scene.models.light,
        "Scene configuration"
    );

    let event_loop = EventLoop::new().context("Failed to create event loop")?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut renderer = Renderer::new(&event_loop, &config, &scene).context("Failed to initialize renderer")?;

    info!("Entering main loop...");

    event_loop
        .run(move |event, elwt| match event {
            Event::WindowEvent { event, .. } => {
                // GUI 只消费输入事件，窗口事件照常处理
                renderer.handle_gui_event(&event);

                match event {
                    WindowEvent::CloseRequested => {
                        info!("Close requested, shutting down...");
                        elwt.exit();
                    }
                    WindowEvent::Resized(new_size) => {
                        debug!(width = new_size.width, height = new_size.height, "Window resized");
                        renderer.resize();
                    }
                    WindowEvent::DroppedFile(path) => {
                        info!("Reloading object from {}", path.display());
                        if let Err(e) = renderer.reload_object(&path) {
                            error!("Failed to reload {}: {}", path.display(), e);
                        }
                    }
                    WindowEvent::RedrawRequested => {
                        if let Err(e) = renderer.draw() {
                            error!("Draw failed: {}", e);
                            elwt.exit();
                        }
                    }
                    _ => (),
                }
            }
            Event::AboutToWait => renderer.window().request_redraw(),
            _ => (),
        })
        .context("Event loop terminated with an error")?;

    Ok(())
}

//! 性能监控面板
//!
//! 显示平均帧时间和帧率。

use crate::gui::state::GuiState;

/// 渲染性能面板
pub fn render(ui: &mut egui::Ui, state: &GuiState) {
    ui.collapsing("性能监控", |ui| {
        ui.label(format!(
            "Application average {:.3} ms/frame ({:.1} FPS)",
            state.frame_time_ms, state.fps
        ));

        if state.frame_time_ms > 0.0 {
            let target_60fps = 1000.0 / 60.0;
            if state.frame_time_ms <= target_60fps {
                ui.colored_label(egui::Color32::GREEN, "✓ 性能良好");
            } else {
                ui.colored_label(egui::Color32::RED, "⚠ 性能警告");
            }
        }
    });
}

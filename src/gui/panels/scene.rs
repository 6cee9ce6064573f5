//! 场景控制面板
//!
//! 视野、视图平移和主体缩放。

use crate::gui::state::{GuiState, FOV_RANGE, SCALE_RANGE, TRANSLATE_RANGE};

/// 三个分量各一个滑块
pub(crate) fn vec3_sliders(ui: &mut egui::Ui, label: &str, value: &mut [f32; 3]) {
    ui.label(label);
    for (axis, component) in ["X", "Y", "Z"].iter().zip(value.iter_mut()) {
        ui.add(egui::Slider::new(component, TRANSLATE_RANGE).text(*axis));
    }
}

/// 渲染场景控制面板
pub fn render(ui: &mut egui::Ui, state: &mut GuiState) {
    ui.collapsing("场景控制", |ui| {
        ui.add(egui::Slider::new(&mut state.fov, FOV_RANGE).text("FOV"));
        vec3_sliders(ui, "视图平移:", &mut state.view_translate);

        ui.separator();
        ui.add(egui::Slider::new(&mut state.object_scale, SCALE_RANGE).text("模型缩放"));

        if ui.button("重置视图").clicked() {
            state.view_translate = [0.0; 3];
        }
    });
}

//! 光照面板
//!
//! 天光开关、点光源平移和颜色。

use crate::gui::state::GuiState;

use super::scene::vec3_sliders;

/// 渲染光照面板
pub fn render(ui: &mut egui::Ui, state: &mut GuiState) {
    ui.collapsing("光照", |ui| {
        ui.checkbox(&mut state.sky_light, "天光");
        vec3_sliders(ui, "光源平移:", &mut state.light_translation);

        ui.label("光源颜色:");
        egui::color_picker::color_edit_button_rgb(ui, &mut state.light_color);
    });
}

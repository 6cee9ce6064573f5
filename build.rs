/// Build script for mesh_viewer
///
/// # Shader Strategy:
/// - wgpu: WGSL shaders are embedded with `include_str!` and compiled at runtime
fn main() {
    // Trigger rebuild if shader files change
    println!("cargo:rerun-if-changed=src/renderer/shaders/model.wgsl");
    println!("cargo:rerun-if-changed=src/renderer/shaders/light.wgsl");
}
